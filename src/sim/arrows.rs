//! Projectile subsystem: arrows
//!
//! Arrows spawn ahead of the camera in timed bursts, fly on fixed archetype
//! trajectories, and retire off-screen. Against the player the resolution is
//! three-way, in priority order: stomp (deflect kill), powered ricochet,
//! plain hit. Broken arrows linger as physics-only remnants with no
//! collision.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::geom::{Rect, overlaps};
use super::state::Player;
use crate::consts::*;
use crate::tuning::Tuning;

/// Fixed spawn archetypes: (height above ground, vx, vy)
const ARCHETYPES: [(f32, f32, f32); 9] = [
    (20.0, -3.0, 0.0),
    (20.0, -5.5, 0.0),
    (56.0, -3.6, 0.0),
    (56.0, -6.2, 0.0),
    (110.0, -4.2, 0.0),
    (110.0, -5.0, 0.4),
    (170.0, -4.6, 0.8),
    (230.0, -5.4, 1.2),
    (90.0, -7.0, 0.0),
];

/// Frames a broken arrow remnant lingers
const BROKEN_LIFETIME: u32 = 50;
/// Gravity applied to remnants (no collision, purely visual)
const BROKEN_GRAVITY: f32 = 0.5;
/// Despawn margins relative to the camera window
const DESPAWN_LEFT: f32 = 200.0;
const DESPAWN_RIGHT: f32 = 1600.0;
/// Horizontal alignment tolerance for a stomp, as a fraction of arrow width
const STOMP_ALIGN: f32 = 0.85;

/// A flying arrow
#[derive(Debug, Clone)]
pub struct Arrow {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub active: bool,
    /// One ricochet sound per arrow instance
    pub ricochet_played: bool,
}

impl Arrow {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// A visual-only remnant of a stomped arrow
#[derive(Debug, Clone)]
pub struct BrokenArrow {
    pub pos: Vec2,
    pub vel: Vec2,
    pub frames_left: u32,
}

/// Outcome of arrow/player collision resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArrowEvent {
    /// Stomped: arrow destroyed, scores as a deflect kill
    Deflected { x: f32, y: f32 },
    /// Powered side touch bounced the arrow back; fires at most once per arrow
    Ricochet { x: f32, y: f32 },
    HitPlayer { x: f32, y: f32 },
}

/// Owns every arrow and remnant in flight
#[derive(Debug, Clone)]
pub struct ArrowSystem {
    pub arrows: Vec<Arrow>,
    pub broken: Vec<BrokenArrow>,
    end_x: f32,
    burst_timer: u32,
}

impl ArrowSystem {
    pub fn new(end_x: f32, rng: &mut Pcg32) -> Self {
        Self {
            arrows: Vec::new(),
            broken: Vec::new(),
            end_x,
            burst_timer: roll_interval(rng),
        }
    }

    /// Drop every arrow and remnant and restart the burst clock
    pub fn reset(&mut self, rng: &mut Pcg32) {
        self.arrows.clear();
        self.broken.clear();
        self.burst_timer = roll_interval(rng);
    }

    /// Spawn one arrow ahead of `anchor_x` on a random archetype.
    ///
    /// Refuses past the level end marker and at the active-arrow cap.
    pub fn spawn(&mut self, anchor_x: f32, offset: f32, rng: &mut Pcg32, cap: usize) {
        if self.arrows.iter().filter(|a| a.active).count() >= cap {
            return;
        }
        let x = anchor_x + rng.random_range(800.0..1200.0) + offset;
        if x > self.end_x {
            return;
        }
        let (height, vx, vy) = ARCHETYPES[rng.random_range(0..ARCHETYPES.len())];
        self.arrows.push(Arrow {
            pos: Vec2::new(x, GROUND_Y - height - ARROW_H),
            vel: Vec2::new(vx, vy),
            size: Vec2::new(ARROW_W, ARROW_H),
            active: true,
            ricochet_played: false,
        });
    }

    /// Advance arrows and remnants one frame; run the burst spawner.
    ///
    /// While the player holds the power-up the burst clock runs twice as
    /// fast and each burst may bring a stochastic extra arrow.
    pub fn update(&mut self, camera_x: f32, power_up: bool, rng: &mut Pcg32, tuning: &Tuning) {
        let step = if power_up { 2 } else { 1 };
        self.burst_timer = self.burst_timer.saturating_sub(step);
        if self.burst_timer == 0 {
            let mut count = if rng.random_bool(0.25) {
                rng.random_range(2..=3)
            } else {
                1
            };
            if power_up && rng.random_bool(0.3) {
                count += 1;
            }
            for i in 0..count {
                self.spawn(camera_x, i as f32 * 150.0, rng, tuning.arrow_cap);
            }
            self.burst_timer = roll_interval(rng);
        }

        for arrow in &mut self.arrows {
            if !arrow.active {
                continue;
            }
            arrow.pos += arrow.vel;
            if arrow.pos.x + arrow.size.x < camera_x - DESPAWN_LEFT
                || arrow.pos.x > camera_x + VIEW_W + DESPAWN_RIGHT
            {
                arrow.active = false;
            }
        }
        self.arrows.retain(|a| a.active);

        for remnant in &mut self.broken {
            remnant.vel.y += BROKEN_GRAVITY;
            remnant.pos += remnant.vel;
            remnant.frames_left -= 1;
        }
        self.broken.retain(|r| r.frames_left > 0);
    }

    /// Resolve arrow/player collisions.
    ///
    /// Priority: stomp, then powered ricochet, then plain hit. Invulnerable
    /// players are immune to all three. Damage from `HitPlayer` is applied
    /// by the orchestrator. Arrows are marked inactive during the scan and
    /// compacted afterward.
    pub fn check_collisions(
        &mut self,
        player: &mut Player,
        jump_held: bool,
        power_up: bool,
        tuning: &Tuning,
    ) -> Vec<ArrowEvent> {
        let mut events = Vec::new();
        if player.invulnerable() {
            return events;
        }

        let player_rect = player.rect();
        for arrow in &mut self.arrows {
            if !arrow.active {
                continue;
            }
            let rect = arrow.rect();

            let feet = player.feet_y();
            let aligned = (player.center_x() - rect.center_x()).abs() < rect.w * STOMP_ALIGN;
            let stomp = feet >= rect.y
                && feet <= rect.bottom()
                && player.vel.y > 0.0
                && !player.grounded
                && aligned;
            if stomp {
                arrow.active = false;
                self.broken.push(BrokenArrow {
                    pos: arrow.pos,
                    vel: Vec2::new(arrow.vel.x * 0.3, -4.0),
                    frames_left: BROKEN_LIFETIME,
                });
                // Held jump converts the stomp into a full jump
                player.vel.y = if jump_held {
                    -tuning.jump_power
                } else {
                    -tuning.stomp_bounce
                };
                events.push(ArrowEvent::Deflected {
                    x: rect.center_x(),
                    y: rect.y,
                });
                continue;
            }

            if !overlaps(&player_rect, &rect) {
                continue;
            }

            if power_up {
                arrow.vel.x = -arrow.vel.x;
                arrow.vel.y = -2.0;
                if !arrow.ricochet_played {
                    arrow.ricochet_played = true;
                    events.push(ArrowEvent::Ricochet {
                        x: rect.center_x(),
                        y: rect.center_y(),
                    });
                }
            } else {
                arrow.active = false;
                events.push(ArrowEvent::HitPlayer {
                    x: rect.center_x(),
                    y: rect.center_y(),
                });
            }
        }
        self.arrows.retain(|a| a.active);

        events
    }
}

fn roll_interval(rng: &mut Pcg32) -> u32 {
    rng.random_range(90..=170)
}
