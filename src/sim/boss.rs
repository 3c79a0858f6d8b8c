//! Boss subsystem
//!
//! A single long-lived adversary driven by a five-state machine plus a
//! terminal defeated state. Transition table (guard -> next state):
//!
//! - `Patrol`: walk between arena bounds, reversing at each. Attack cooldown
//!   elapsed -> roll `Charging` (60%) or `Jumping` (40%).
//! - `Charging`: run at the player at elevated speed. Within proximity of
//!   the player, or timeout -> `Slamming`.
//! - `Jumping`: upward impulse applied once on entry. Grounded after the
//!   minimum airtime -> `Patrol`.
//! - `Slamming`: zero horizontal velocity. At the impact frame offset, spawn
//!   one falling-rock batch across the arena and open the vulnerability
//!   window. After the slam duration -> `Stunned`.
//! - `Stunned`: motionless. After the stun duration -> `Patrol`, attack
//!   cooldown re-armed.
//! - `Defeated`: terminal; hazards cleared, barriers removed, level
//!   completion fires after a fixed delay.
//!
//! Damage lands only while vulnerable with no invulnerability window
//! running; a hit closes vulnerability and opens a short invulnerability
//! window so one jump cannot land twice. Below half health the boss rages:
//! shorter cooldown, faster movement. The fight starts when the player first
//! crosses the arena threshold, which seals the arena with stone barriers.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::geom::{Rect, overlaps};
use super::level::arena_barriers;
use super::state::Player;
use super::world::World;
use crate::consts::*;
use crate::tuning::Tuning;

const PATROL_SPEED: f32 = 2.0;
const RAGE_PATROL_SPEED: f32 = 3.0;
const CHARGE_SPEED: f32 = 5.5;
const RAGE_CHARGE_SPEED: f32 = 7.5;
const ATTACK_COOLDOWN: u32 = 150;
const RAGE_ATTACK_COOLDOWN: u32 = 75;
const CHARGE_PROXIMITY: f32 = 70.0;
const CHARGE_TIMEOUT: u32 = 150;
const JUMP_IMPULSE: f32 = -15.0;
const MIN_AIRTIME: u32 = 20;
/// Frame offset within `Slamming` at which the impact side effects fire
pub const SLAM_IMPACT_FRAME: u32 = 30;
const SLAM_DURATION: u32 = 130;
const STUN_DURATION: u32 = 100;
const VULN_WINDOW: u32 = 180;
const INVULN_WINDOW: u32 = 50;
const ROCK_BATCH: usize = 6;
const ROCK_GRAVITY: f32 = 0.45;
const DEFEAT_DELAY: u32 = 90;
const BOSS_GRAVITY: f32 = 0.6;
/// Vertical band below the boss's top that counts as its head
const HEAD_BAND: f32 = 22.0;

/// Boss behavior states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossState {
    Patrol,
    Charging,
    Jumping,
    Slamming,
    Stunned,
    Defeated,
}

impl BossState {
    /// Logical state name for the renderer
    pub fn name(&self) -> &'static str {
        match self {
            BossState::Patrol => "patrol",
            BossState::Charging => "charging",
            BossState::Jumping => "jumping",
            BossState::Slamming => "slamming",
            BossState::Stunned => "stunned",
            BossState::Defeated => "defeated",
        }
    }
}

/// A falling rock hazard spawned by the slam impact
#[derive(Debug, Clone)]
pub struct FallingRock {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub active: bool,
}

impl FallingRock {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Outcome of a boss update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossEvent {
    /// Slam landed: rocks spawned, vulnerability window open
    SlamImpact { x: f32 },
    /// Player hit the boss's head during a vulnerability window
    Damaged { x: f32, y: f32 },
    HitPlayer { x: f32, y: f32 },
    RockHitPlayer { x: f32, y: f32 },
    Defeated,
    /// Fired once, a fixed delay after defeat
    LevelComplete,
}

/// The boss and its hazards
#[derive(Debug, Clone)]
pub struct BossSystem {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub state: BossState,
    /// Frames since the current state was entered; 0 on the transition tick
    pub state_timer: u32,
    pub health: u32,
    pub max_health: u32,
    pub vulnerable: bool,
    pub vulnerability_timer: u32,
    pub invulnerability_timer: u32,
    pub min_x: f32,
    pub max_x: f32,
    pub grounded: bool,
    /// Walk direction, -1 or +1
    pub direction: f32,
    pub rocks: Vec<FallingRock>,
    pub fight_started: bool,
    attack_cooldown: u32,
    defeat_countdown: Option<u32>,
}

impl BossSystem {
    pub fn new(min_x: f32, max_x: f32, max_health: u32) -> Self {
        Self {
            pos: Vec2::new(max_x - BOSS_W - 40.0, GROUND_Y - BOSS_H),
            size: Vec2::new(BOSS_W, BOSS_H),
            vel: Vec2::ZERO,
            state: BossState::Patrol,
            state_timer: 0,
            health: max_health,
            max_health,
            vulnerable: false,
            vulnerability_timer: 0,
            invulnerability_timer: 0,
            min_x,
            max_x,
            grounded: true,
            direction: -1.0,
            rocks: Vec::new(),
            fight_started: false,
            attack_cooldown: ATTACK_COOLDOWN,
            defeat_countdown: None,
        }
    }

    /// Back to the pre-fight state, full health, no hazards
    pub fn reset(&mut self) {
        *self = Self::new(self.min_x, self.max_x, self.max_health);
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    /// Rage kicks in at half health
    #[inline]
    fn raged(&self) -> bool {
        self.health * 2 <= self.max_health
    }

    fn patrol_speed(&self) -> f32 {
        if self.raged() { RAGE_PATROL_SPEED } else { PATROL_SPEED }
    }

    fn charge_speed(&self) -> f32 {
        if self.raged() { RAGE_CHARGE_SPEED } else { CHARGE_SPEED }
    }

    fn cooldown(&self) -> u32 {
        if self.raged() { RAGE_ATTACK_COOLDOWN } else { ATTACK_COOLDOWN }
    }

    /// The only place a state changes; `state_timer` is reset here and
    /// nowhere else.
    fn set_state(&mut self, next: BossState) {
        log::debug!("boss: {} -> {}", self.state.name(), next.name());
        self.state = next;
        self.state_timer = 0;
    }

    /// Advance the boss one frame and resolve its player interactions.
    ///
    /// Dormant until the player crosses the arena threshold; crossing seals
    /// the arena with stone barriers.
    pub fn update(
        &mut self,
        player: &mut Player,
        world: &mut World,
        jump_held: bool,
        rng: &mut Pcg32,
        tuning: &Tuning,
    ) -> Vec<BossEvent> {
        let mut events = Vec::new();

        if !self.fight_started {
            if player.center_x() >= self.min_x {
                self.fight_started = true;
                world.insert_barriers(&arena_barriers(self.min_x, self.max_x));
                log::info!("boss fight started, arena sealed");
            } else {
                return events;
            }
        }

        self.state_timer += 1;

        if self.vulnerability_timer > 0 {
            self.vulnerability_timer -= 1;
            if self.vulnerability_timer == 0 {
                self.vulnerable = false;
            }
        }
        if self.invulnerability_timer > 0 {
            self.invulnerability_timer -= 1;
        }

        if self.state == BossState::Defeated {
            if let Some(countdown) = &mut self.defeat_countdown {
                *countdown -= 1;
                if *countdown == 0 {
                    self.defeat_countdown = None;
                    events.push(BossEvent::LevelComplete);
                }
            }
            return events;
        }

        match self.state {
            BossState::Patrol => {
                self.vel.x = self.direction * self.patrol_speed();
                self.pos.x += self.vel.x;
                if self.pos.x <= self.min_x {
                    self.pos.x = self.min_x;
                    self.direction = 1.0;
                } else if self.pos.x + self.size.x >= self.max_x {
                    self.pos.x = self.max_x - self.size.x;
                    self.direction = -1.0;
                }

                if self.attack_cooldown > 0 {
                    self.attack_cooldown -= 1;
                } else if rng.random_bool(0.6) {
                    self.set_state(BossState::Charging);
                } else {
                    self.set_state(BossState::Jumping);
                    self.vel.y = JUMP_IMPULSE;
                    self.grounded = false;
                }
            }
            BossState::Charging => {
                let toward = (player.center_x() - self.center_x()).signum();
                self.direction = toward;
                self.vel.x = toward * self.charge_speed();
                self.pos.x =
                    (self.pos.x + self.vel.x).clamp(self.min_x, self.max_x - self.size.x);

                let close = (player.center_x() - self.center_x()).abs() < CHARGE_PROXIMITY;
                if close || self.state_timer >= CHARGE_TIMEOUT {
                    self.set_state(BossState::Slamming);
                    self.vel.x = 0.0;
                }
            }
            BossState::Jumping => {
                self.pos.x = (self.pos.x + self.direction * self.patrol_speed())
                    .clamp(self.min_x, self.max_x - self.size.x);
                if self.grounded && self.state_timer >= MIN_AIRTIME {
                    self.set_state(BossState::Patrol);
                    self.attack_cooldown = self.cooldown();
                }
            }
            BossState::Slamming => {
                self.vel.x = 0.0;
                if self.state_timer == SLAM_IMPACT_FRAME {
                    self.spawn_rocks(rng);
                    self.vulnerable = true;
                    self.vulnerability_timer = VULN_WINDOW;
                    self.invulnerability_timer = 0;
                    events.push(BossEvent::SlamImpact { x: self.center_x() });
                }
                if self.state_timer >= SLAM_DURATION {
                    self.set_state(BossState::Stunned);
                }
            }
            BossState::Stunned => {
                self.vel = Vec2::ZERO;
                if self.state_timer >= STUN_DURATION {
                    self.set_state(BossState::Patrol);
                    self.attack_cooldown = self.cooldown();
                }
            }
            BossState::Defeated => unreachable!("handled above"),
        }

        // Gravity and arena ground
        self.vel.y += BOSS_GRAVITY;
        if self.vel.y > MAX_FALL_SPEED {
            self.vel.y = MAX_FALL_SPEED;
        }
        self.pos.y += self.vel.y;
        let contact = world.resolve_platform_collision(&mut self.pos, &mut self.vel, self.size);
        self.grounded = contact.grounded;

        self.resolve_player_contact(player, jump_held, world, tuning, &mut events);
        self.update_rocks(player, &mut events);

        events
    }

    fn resolve_player_contact(
        &mut self,
        player: &mut Player,
        jump_held: bool,
        world: &mut World,
        tuning: &Tuning,
        events: &mut Vec<BossEvent>,
    ) {
        let rect = self.rect();
        let player_rect = player.rect();

        // Head hit: descending player, feet in the head band, window open
        let feet = player.feet_y();
        let on_head = feet >= rect.y
            && feet <= rect.y + HEAD_BAND
            && player_rect.right() > rect.x
            && player_rect.x < rect.right()
            && player.vel.y > 0.0
            && !player.grounded;
        if on_head && self.vulnerable && self.invulnerability_timer == 0 {
            self.health = self.health.saturating_sub(1);
            self.vulnerable = false;
            self.vulnerability_timer = 0;
            self.invulnerability_timer = INVULN_WINDOW;
            player.vel.y = if jump_held {
                -tuning.jump_power
            } else {
                -tuning.stomp_bounce
            };
            events.push(BossEvent::Damaged {
                x: rect.center_x(),
                y: rect.y,
            });

            if self.health == 0 {
                self.set_state(BossState::Defeated);
                self.vel = Vec2::ZERO;
                self.rocks.clear();
                world.remove_barriers();
                self.defeat_countdown = Some(DEFEAT_DELAY);
                events.push(BossEvent::Defeated);
                log::info!("boss defeated");
            }
            return;
        }

        // Any other contact while not vulnerable hurts the player
        if !self.vulnerable && !player.invulnerable() && overlaps(&player_rect, &rect) {
            events.push(BossEvent::HitPlayer {
                x: rect.center_x(),
                y: rect.center_y(),
            });
        }
    }

    fn update_rocks(&mut self, player: &mut Player, events: &mut Vec<BossEvent>) {
        let player_rect = player.rect();
        for rock in &mut self.rocks {
            if !rock.active {
                continue;
            }
            rock.vel.y += ROCK_GRAVITY;
            rock.pos += rock.vel;

            if !player.invulnerable() && overlaps(&rock.rect(), &player_rect) {
                rock.active = false;
                events.push(BossEvent::RockHitPlayer {
                    x: rock.rect().center_x(),
                    y: rock.rect().center_y(),
                });
                continue;
            }
            if rock.pos.y + rock.size.y >= GROUND_Y {
                rock.active = false;
            }
        }
        self.rocks.retain(|r| r.active);
    }

    /// One batch of rocks spread across the arena with jitter
    fn spawn_rocks(&mut self, rng: &mut Pcg32) {
        let span = self.max_x - self.min_x;
        let slot = span / ROCK_BATCH as f32;
        for i in 0..ROCK_BATCH {
            let x = self.min_x + (i as f32 + 0.5) * slot + rng.random_range(-30.0..30.0);
            self.rocks.push(FallingRock {
                pos: Vec2::new(x, rng.random_range(-220.0..-60.0)),
                vel: Vec2::new(0.0, rng.random_range(0.0..2.0)),
                size: Vec2::new(ROCK_W, ROCK_H),
                active: true,
            });
        }
    }
}
