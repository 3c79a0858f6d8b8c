//! Game state and shared entity types
//!
//! `GameState` owns everything a run needs: the player and pet entities, the
//! world, every subsystem, the combo state, and the seeded RNG. Subsystems
//! receive the player/pet by reference during their update call and never
//! retain it across frames.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::arrows::ArrowSystem;
use super::boss::BossSystem;
use super::combo::Combo;
use super::geom::Rect;
use super::level;
use super::pet::PetFollower;
use super::snails::SnailSystem;
use super::world::World;
use crate::consts::*;
use crate::tuning::Tuning;

/// Horizontal facing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Unit sign along x
    #[inline]
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn from_sign(v: f32) -> Self {
        if v < 0.0 { Facing::Left } else { Facing::Right }
    }
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub grounded: bool,
    pub alive: bool,
    pub facing: Facing,
    pub health: i32,
    /// Frames of post-hit immunity remaining; 0 means hittable
    pub invuln_frames: u32,
}

impl Player {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            pos: spawn,
            size: Vec2::new(PLAYER_W, PLAYER_H),
            vel: Vec2::ZERO,
            grounded: false,
            alive: true,
            facing: Facing::Right,
            health: PLAYER_MAX_HEALTH,
            invuln_frames: 0,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Y coordinate of the player's feet
    #[inline]
    pub fn feet_y(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    #[inline]
    pub fn invulnerable(&self) -> bool {
        self.invuln_frames > 0
    }
}

/// The companion pet
#[derive(Debug, Clone)]
pub struct Pet {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub grounded: bool,
    pub alive: bool,
    pub facing: Facing,
}

impl Pet {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            pos: spawn,
            size: Vec2::new(PET_W, PET_H),
            vel: Vec2::ZERO,
            grounded: false,
            alive: true,
            facing: Facing::Right,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }
}

/// Side-scrolling camera; tracks the player with a fixed lead
#[derive(Debug, Clone, Default)]
pub struct Camera {
    pub x: f32,
}

impl Camera {
    /// Follow the player, clamped to the level extent
    pub fn follow(&mut self, player_x: f32, end_x: f32) {
        let target = player_x - VIEW_W * 0.3;
        self.x = target.clamp(0.0, (end_x - VIEW_W).max(0.0));
    }
}

/// What struck the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    Arrow,
    Snail,
    BossContact,
    Rock,
}

/// Renderer color tag for floating score text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreColor {
    White,
    Gold,
    Orange,
}

impl ScoreColor {
    pub fn hex(&self) -> &'static str {
        match self {
            ScoreColor::White => "#ffffff",
            ScoreColor::Gold => "#ffd700",
            ScoreColor::Orange => "#ff8c00",
        }
    }
}

/// A score award for the host's floating-text display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEvent {
    pub points: u32,
    pub color: ScoreColor,
    pub label: String,
}

/// Sound cue for the host's audio layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Jump,
    Ricochet,
    ArrowBreak,
    SnailStomp,
    SnailPop,
    BossSlam,
    BossHurt,
    PlayerHurt,
    Collect,
}

/// Value-typed events returned from each tick for the host to consume
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Player took one point of damage at the given world position
    PlayerHit { kind: HitKind, x: f32, y: f32 },
    PlayerDied,
    Score(ScoreEvent),
    Sound(SoundCue),
    BossDefeated,
    LevelComplete,
}

/// Complete simulation state for one run of one level
#[derive(Debug, Clone)]
pub struct GameState {
    pub level: u32,
    pub seed: u64,
    /// Frames simulated since the last reset
    pub frame: u64,
    pub score: u64,
    pub player: Player,
    pub pet: Pet,
    pub camera: Camera,
    pub combo: Combo,
    pub world: World,
    pub arrows: ArrowSystem,
    pub snails: SnailSystem,
    /// Present only on boss levels
    pub boss: Option<BossSystem>,
    pub pet_ai: PetFollower,
    pub tuning: Tuning,
    pub game_over: bool,
    pub level_complete: bool,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a run of the given level with default tuning
    pub fn new(level: u32, seed: u64) -> Self {
        Self::with_tuning(level, seed, Tuning::default())
    }

    pub fn with_tuning(level: u32, seed: u64, tuning: Tuning) -> Self {
        let layout = level::build(level);
        let mut rng = Pcg32::seed_from_u64(seed);

        let arrows = ArrowSystem::new(layout.end_x, &mut rng);
        let snails = SnailSystem::from_spawns(&layout.snail_spawns);
        let boss = layout
            .boss_arena
            .map(|(min_x, max_x)| BossSystem::new(min_x, max_x, tuning.boss_max_health));

        Self {
            level,
            seed,
            frame: 0,
            score: 0,
            player: Player::new(layout.player_spawn),
            pet: Pet::new(layout.pet_spawn),
            camera: Camera::default(),
            combo: Combo::default(),
            world: World::new(layout.platforms, layout.collectibles, layout.end_x),
            arrows,
            snails,
            boss,
            pet_ai: PetFollower::default(),
            tuning,
            game_over: false,
            level_complete: false,
            rng,
        }
    }

    /// Restart the current level in place.
    ///
    /// Idempotent and callable between any two frames; every subsystem's
    /// `reset` is likewise idempotent.
    pub fn reset(&mut self) {
        let layout = level::build(self.level);
        self.rng = Pcg32::seed_from_u64(self.seed);

        self.frame = 0;
        self.score = 0;
        self.player = Player::new(layout.player_spawn);
        self.pet = Pet::new(layout.pet_spawn);
        self.camera = Camera::default();
        self.combo.reset();
        self.world.reset();
        self.arrows.reset(&mut self.rng);
        self.snails.reset();
        if let Some(boss) = &mut self.boss {
            boss.reset();
        }
        self.pet_ai.reset();
        self.game_over = false;
        self.level_complete = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_sign() {
        assert_eq!(Facing::Left.sign(), -1.0);
        assert_eq!(Facing::Right.sign(), 1.0);
        assert_eq!(Facing::from_sign(-3.2), Facing::Left);
        assert_eq!(Facing::from_sign(0.0), Facing::Right);
    }

    #[test]
    fn test_camera_clamps_to_level() {
        let mut cam = Camera::default();
        cam.follow(0.0, 5000.0);
        assert_eq!(cam.x, 0.0);

        cam.follow(10_000.0, 5000.0);
        assert_eq!(cam.x, 5000.0 - VIEW_W);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut state = GameState::new(1, 7);
        state.score = 900;
        state.player.health = 1;
        state.reset();
        let after_one = state.score;
        let health_one = state.player.health;
        state.reset();
        assert_eq!(state.score, after_one);
        assert_eq!(state.player.health, health_one);
        assert_eq!(state.frame, 0);
        assert!(state.player.alive);
    }
}
