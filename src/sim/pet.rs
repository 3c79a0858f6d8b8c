//! Pet companion follower
//!
//! Not a state machine: a continuous per-frame movement decision from the
//! distance to the player, the player's facing, and whether the player is
//! moving. A lookahead probe jumps small gaps and refuses wide pits; a wall
//! probe swaps blocked movement for a jump attempt. A pet that falls out of
//! the world or lags too far behind is respawned through a tiered search
//! that always succeeds.

use glam::Vec2;

use super::geom::Rect;
use super::state::{Facing, Pet, Player};
use super::world::World;
use crate::consts::{KILL_Y, MAX_FALL_SPEED};
use crate::tuning::Tuning;

/// Inside this range, a stationary player facing the pet is petting it
const PETTING_DIST: f32 = 55.0;
/// Beyond this the pet starts following
const FOLLOW_DIST: f32 = 90.0;
/// Beyond this the pet switches to catch-up speed
const CATCHUP_DIST: f32 = 240.0;
/// Beyond this the pet is lost and respawns
const RESPAWN_DIST: f32 = 900.0;
const RESPAWN_COOLDOWN: u32 = 120;
/// Lookahead distances for the gap probe
const GAP_PROBES: [f32; 3] = [24.0, 48.0, 72.0];
const WALL_PROBE: f32 = 12.0;
/// Extra platform width required beyond the pet's own for a respawn target
const RESPAWN_WIDTH_MARGIN: f32 = 30.0;

/// Follower logic and its respawn cooldown
#[derive(Debug, Clone, Default)]
pub struct PetFollower {
    respawn_cooldown: u32,
}

impl PetFollower {
    pub fn reset(&mut self) {
        self.respawn_cooldown = 0;
    }

    /// Advance the pet one frame
    pub fn update(
        &mut self,
        pet: &mut Pet,
        player: &Player,
        world: &World,
        power_up: bool,
        tuning: &Tuning,
    ) {
        if self.respawn_cooldown > 0 {
            self.respawn_cooldown -= 1;
        }

        let dx = player.center_x() - pet.center_x();
        let dist = dx.abs();
        let player_moving = player.vel.x.abs() > 0.1;
        let facing_pet = match player.facing {
            Facing::Left => pet.center_x() < player.center_x(),
            Facing::Right => pet.center_x() > player.center_x(),
        };

        let mut vx = 0.0;
        if dist <= PETTING_DIST && !player_moving && facing_pet {
            // Petting: stay put, look at the player
            pet.facing = Facing::from_sign(dx);
        } else if dist > FOLLOW_DIST {
            let speed = if dist > CATCHUP_DIST {
                tuning.pet_catchup_speed
            } else {
                tuning.pet_speed
            };
            let speed = if power_up { speed * 2.0 } else { speed };
            vx = dx.signum() * speed;
            pet.facing = Facing::from_sign(vx);
        }
        pet.vel.x = vx;

        if pet.vel.x != 0.0 && pet.grounded {
            let sign = pet.vel.x.signum();
            let front = if sign > 0.0 {
                pet.pos.x + pet.size.x
            } else {
                pet.pos.x
            };

            let wall_point = Vec2::new(front + sign * WALL_PROBE, pet.pos.y + pet.size.y * 0.5);
            let wall = world
                .platforms
                .iter()
                .any(|p| !p.is_ground() && p.rect.contains_point(wall_point));
            if wall {
                // Blocked: trade the step for a jump attempt
                pet.vel.y = -tuning.jump_power * 0.85;
                pet.grounded = false;
            } else {
                let supported: Vec<bool> = GAP_PROBES
                    .iter()
                    .map(|d| {
                        let probe = Rect::from_pos_size(
                            Vec2::new(pet.pos.x + sign * d, pet.pos.y + 1.0),
                            pet.size,
                        );
                        world.supported_at(&probe)
                    })
                    .collect();
                if !supported[0] {
                    if supported[1] || supported[2] {
                        // Narrow gap: jump it
                        pet.vel.y = -tuning.jump_power * 0.85;
                        pet.grounded = false;
                    } else {
                        // Wide pit: refuse the step
                        pet.vel.x = 0.0;
                    }
                }
            }
        }

        pet.vel.y += tuning.gravity;
        if pet.vel.y > MAX_FALL_SPEED {
            pet.vel.y = MAX_FALL_SPEED;
        }
        pet.pos += pet.vel;

        let contact = world.resolve_platform_collision(&mut pet.pos, &mut pet.vel, pet.size);
        pet.grounded = contact.grounded;

        let off_world = pet.pos.y > KILL_Y;
        if (off_world || dist > RESPAWN_DIST) && self.respawn_cooldown == 0 {
            self.respawn(pet, player, world);
            self.respawn_cooldown = RESPAWN_COOLDOWN;
        }
    }

    /// Tiered respawn search. Each tier recovers the one above failing;
    /// the final teleport always succeeds, so the pet never ends a frame
    /// with undefined coordinates.
    fn respawn(&self, pet: &mut Pet, player: &Player, world: &World) {
        let min_width = pet.size.x + RESPAWN_WIDTH_MARGIN;
        let player_cx = player.center_x();
        let player_feet = player.feet_y();

        let wide_enough =
            |p: &&super::world::Platform| p.rect.w >= min_width;
        let under_player = |p: &&super::world::Platform| {
            player_cx >= p.rect.x && player_cx < p.rect.right() && p.rect.y >= player_feet - 1.0
        };
        let dist_to_player =
            |p: &&super::world::Platform| (p.rect.center_x() - player_cx).abs() as i64;

        let target = world
            .platforms
            .iter()
            .filter(under_player)
            .find(wide_enough)
            .or_else(|| {
                world
                    .platforms
                    .iter()
                    .filter(wide_enough)
                    .min_by_key(dist_to_player)
            })
            .or_else(|| world.platforms.iter().min_by_key(dist_to_player));

        match target {
            Some(platform) => {
                let r = platform.rect;
                let x = (player.center_x() - pet.size.x / 2.0)
                    .clamp(r.x, r.right() - pet.size.x);
                pet.pos = Vec2::new(x, r.y - pet.size.y);
                log::debug!("pet respawned on platform at ({}, {})", pet.pos.x, pet.pos.y);
            }
            None => {
                // No platforms at all: land exactly on the player
                pet.pos = player.pos;
                log::debug!("pet respawned onto the player");
            }
        }
        pet.vel = Vec2::ZERO;
        pet.grounded = true;
        pet.alive = true;
    }
}
