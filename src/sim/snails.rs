//! Ground-enemy subsystem: snails
//!
//! Each snail patrols its platform and runs an independent two-phase life
//! cycle: active, then a fixed-duration hidden shell state after being
//! killed, from which it re-emerges with a pop-up impulse. Hidden snails do
//! not collide. Mega variants are tagged at level build and only change
//! size and score value.

use glam::Vec2;

use super::geom::{Rect, overlaps};
use super::level::SnailSpawn;
use super::state::Player;
use crate::consts::*;
use crate::tuning::Tuning;

/// Frames a killed snail stays in its shell
pub const HIDDEN_DURATION: u32 = 300;
/// Final stretch of the shell state with the cosmetic warning wiggle
const WIGGLE_WARN_FRAMES: u32 = 120;
/// Inward margin at patrol edges so the sprite never clips the edge
const EDGE_MARGIN: f32 = 10.0;
const SNAIL_SPEED: f32 = 1.0;
const MEGA_SPEED: f32 = 0.7;
/// Upward impulse on re-emerging from the shell
const POP_IMPULSE: f32 = -4.5;
const SNAIL_GRAVITY: f32 = 0.5;

/// A patrolling snail
#[derive(Debug, Clone)]
pub struct Snail {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Patrol direction, -1 or +1
    pub direction: f32,
    pub platform_x: f32,
    pub platform_w: f32,
    /// Top of the patrol surface
    pub surface_y: f32,
    /// X at the moment of the last kill; re-emergence resets here
    pub base_x: f32,
    pub hidden: bool,
    pub hidden_timer: u32,
    /// Set while the current life is defeated; cleared on re-emergence
    pub killed: bool,
    pub alive: bool,
    pub mega: bool,
    /// Cosmetic offsets; never part of the collision rect
    pub wiggle: f32,
}

impl Snail {
    pub fn from_spawn(spawn: &SnailSpawn) -> Self {
        let scale = if spawn.mega { MEGA_SNAIL_SCALE } else { 1.0 };
        let size = Vec2::new(SNAIL_W * scale, SNAIL_H * scale);
        Self {
            pos: Vec2::new(spawn.x, spawn.surface_y - size.y),
            size,
            vel: Vec2::ZERO,
            direction: -1.0,
            platform_x: spawn.platform_x,
            platform_w: spawn.platform_w,
            surface_y: spawn.surface_y,
            base_x: spawn.x,
            hidden: false,
            hidden_timer: 0,
            killed: false,
            alive: true,
            mega: spawn.mega,
            wiggle: 0.0,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        if self.mega { MEGA_SPEED } else { SNAIL_SPEED }
    }

    /// Score value fed through the combo rule
    #[inline]
    pub fn score_value(&self) -> u32 {
        if self.mega { SCORE_MEGA_SNAIL } else { SCORE_SNAIL }
    }

    fn kill(&mut self) {
        self.killed = true;
        self.alive = false;
        self.hidden = true;
        self.hidden_timer = 0;
        self.base_x = self.pos.x;
        self.wiggle = 0.0;
    }
}

/// Outcome of snail/player collision resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnailEvent {
    /// Stomped from above; snail enters its shell
    Stomped { x: f32, y: f32, mega: bool },
    /// Killed by a powered side touch
    PowerKilled { x: f32, y: f32, mega: bool },
    HitPlayer { x: f32, y: f32 },
    /// Re-emerged from the shell
    Emerged { x: f32, y: f32 },
}

/// Owns every snail in the level
#[derive(Debug, Clone)]
pub struct SnailSystem {
    pub snails: Vec<Snail>,
    spawns: Vec<SnailSpawn>,
}

impl SnailSystem {
    pub fn from_spawns(spawns: &[SnailSpawn]) -> Self {
        Self {
            snails: spawns.iter().map(Snail::from_spawn).collect(),
            spawns: spawns.to_vec(),
        }
    }

    /// Rebuild every snail from its spawn entry
    pub fn reset(&mut self) {
        self.snails = self.spawns.iter().map(Snail::from_spawn).collect();
    }

    /// Advance patrol movement and shell timers one frame.
    ///
    /// Returns `Emerged` events for snails whose shell state expired.
    pub fn update(&mut self) -> Vec<SnailEvent> {
        let mut events = Vec::new();
        for snail in &mut self.snails {
            if snail.hidden {
                snail.hidden_timer += 1;
                let remaining = HIDDEN_DURATION.saturating_sub(snail.hidden_timer);
                snail.wiggle = if remaining <= WIGGLE_WARN_FRAMES {
                    (snail.hidden_timer as f32 * 0.5).sin() * 2.0
                } else {
                    0.0
                };
                if snail.hidden_timer >= HIDDEN_DURATION {
                    snail.hidden = false;
                    snail.alive = true;
                    snail.killed = false;
                    snail.pos.x = snail.base_x;
                    snail.vel.y = POP_IMPULSE;
                    snail.wiggle = 0.0;
                    events.push(SnailEvent::Emerged {
                        x: snail.pos.x,
                        y: snail.pos.y,
                    });
                }
                continue;
            }

            snail.pos.x += snail.direction * snail.speed();
            if snail.pos.x <= snail.platform_x + EDGE_MARGIN {
                snail.direction = 1.0;
            } else if snail.pos.x + snail.size.x >= snail.platform_x + snail.platform_w - EDGE_MARGIN
            {
                snail.direction = -1.0;
            }

            // Settle back onto the patrol surface after the pop impulse
            if snail.vel.y != 0.0 || snail.pos.y + snail.size.y < snail.surface_y {
                snail.vel.y += SNAIL_GRAVITY;
                snail.pos.y += snail.vel.y;
                if snail.pos.y + snail.size.y >= snail.surface_y {
                    snail.pos.y = snail.surface_y - snail.size.y;
                    snail.vel.y = 0.0;
                }
            }
        }
        events
    }

    /// Resolve snail/player collisions.
    ///
    /// A stomp needs the player's feet inside the snail's upper half, moving
    /// downward, coming from above. A powered side touch kills
    /// unconditionally; an unpowered one hurts the player and the snail
    /// survives. Hidden snails never collide.
    pub fn check_collisions(
        &mut self,
        player: &mut Player,
        jump_held: bool,
        power_up: bool,
        tuning: &Tuning,
    ) -> Vec<SnailEvent> {
        let mut events = Vec::new();
        let player_rect = player.rect();

        for snail in &mut self.snails {
            if snail.hidden || !snail.alive {
                continue;
            }
            let rect = snail.rect();

            let feet = player.feet_y();
            let prev_feet = feet - player.vel.y;
            let in_upper_half = feet >= rect.y && feet <= rect.y + rect.h / 2.0;
            let horiz = player_rect.right() > rect.x && player_rect.x < rect.right();
            let stomp = in_upper_half
                && horiz
                && player.vel.y > 0.0
                && prev_feet <= rect.y;
            if stomp {
                snail.kill();
                player.vel.y = if jump_held {
                    -tuning.jump_power
                } else {
                    -tuning.stomp_bounce
                };
                events.push(SnailEvent::Stomped {
                    x: rect.center_x(),
                    y: rect.y,
                    mega: snail.mega,
                });
                continue;
            }

            if !overlaps(&player_rect, &rect) {
                continue;
            }

            if power_up {
                snail.kill();
                events.push(SnailEvent::PowerKilled {
                    x: rect.center_x(),
                    y: rect.y,
                    mega: snail.mega,
                });
            } else if !player.invulnerable() {
                events.push(SnailEvent::HitPlayer {
                    x: rect.center_x(),
                    y: rect.center_y(),
                });
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::SnailSpawn;

    fn spawn() -> SnailSpawn {
        SnailSpawn {
            x: 200.0,
            surface_y: GROUND_Y,
            platform_x: 100.0,
            platform_w: 400.0,
            mega: false,
        }
    }

    fn airborne_player_over(snail: &Snail) -> Player {
        let mut p = Player::new(Vec2::new(
            snail.pos.x,
            snail.pos.y - PLAYER_H + 6.0,
        ));
        p.grounded = false;
        p.vel.y = 8.0;
        p
    }

    #[test]
    fn test_patrol_reverses_at_edges() {
        let mut sys = SnailSystem::from_spawns(&[spawn()]);
        // Walk left to the edge
        for _ in 0..200 {
            sys.update();
        }
        let s = &sys.snails[0];
        assert!(s.pos.x >= s.platform_x);
        assert_eq!(s.direction, 1.0);
    }

    #[test]
    fn test_stomp_enters_hidden_cycle() {
        let mut sys = SnailSystem::from_spawns(&[spawn()]);
        let tuning = Tuning::default();
        let mut player = airborne_player_over(&sys.snails[0]);

        let events = sys.check_collisions(&mut player, false, false, &tuning);
        assert!(matches!(events[0], SnailEvent::Stomped { mega: false, .. }));
        let s = &sys.snails[0];
        assert!(s.hidden && s.killed && !s.alive);
        assert_eq!(s.hidden_timer, 0);
        assert_eq!(player.vel.y, -tuning.stomp_bounce);
    }

    #[test]
    fn test_hidden_snail_does_not_collide() {
        let mut sys = SnailSystem::from_spawns(&[spawn()]);
        let tuning = Tuning::default();
        let mut player = airborne_player_over(&sys.snails[0]);
        sys.check_collisions(&mut player, false, false, &tuning);

        // Overlapping side touch while hidden yields nothing
        let mut player = Player::new(sys.snails[0].pos - Vec2::new(0.0, 10.0));
        player.grounded = true;
        let events = sys.check_collisions(&mut player, false, false, &tuning);
        assert!(events.is_empty());
    }

    #[test]
    fn test_shell_expiry_restores_snail_at_base_x() {
        // Scenario E: timer hits the duration exactly
        let mut sys = SnailSystem::from_spawns(&[spawn()]);
        let tuning = Tuning::default();
        let mut player = airborne_player_over(&sys.snails[0]);
        sys.check_collisions(&mut player, false, false, &tuning);
        let base_x = sys.snails[0].base_x;

        for _ in 0..HIDDEN_DURATION {
            sys.update();
        }
        let s = &sys.snails[0];
        assert!(!s.hidden);
        assert!(s.alive);
        assert!(!s.killed);
        assert_eq!(s.pos.x, base_x);
        assert!(s.vel.y < 0.0, "re-emergence pops upward");
    }

    #[test]
    fn test_side_touch_unpowered_hurts_player_snail_survives() {
        let mut sys = SnailSystem::from_spawns(&[spawn()]);
        let tuning = Tuning::default();
        let snail_pos = sys.snails[0].pos;
        let mut player = Player::new(Vec2::new(snail_pos.x - 20.0, snail_pos.y - 10.0));
        player.grounded = true;

        let events = sys.check_collisions(&mut player, false, false, &tuning);
        assert!(matches!(events[0], SnailEvent::HitPlayer { .. }));
        assert!(sys.snails[0].alive);
    }

    #[test]
    fn test_side_touch_powered_kills_unconditionally() {
        let mut sys = SnailSystem::from_spawns(&[spawn()]);
        let tuning = Tuning::default();
        let snail_pos = sys.snails[0].pos;
        let mut player = Player::new(Vec2::new(snail_pos.x - 20.0, snail_pos.y - 10.0));
        player.grounded = true;

        let events = sys.check_collisions(&mut player, false, true, &tuning);
        assert!(matches!(events[0], SnailEvent::PowerKilled { .. }));
        assert!(sys.snails[0].hidden);
    }

    #[test]
    fn test_mega_snail_scores_more() {
        let mega = SnailSpawn { mega: true, ..spawn() };
        let sys = SnailSystem::from_spawns(&[mega]);
        assert_eq!(sys.snails[0].score_value(), SCORE_MEGA_SNAIL);
        assert!(sys.snails[0].size.x > SNAIL_W);
    }
}
