//! World model: platforms, ground plane, collectibles
//!
//! Platforms are static after construction, except for boss barrier
//! platforms which are inserted when an arena fight starts and removed when
//! it ends. The ground plane is the subset of platforms sitting at
//! `GROUND_Y`; gaps between ground segments are pits, and falling through
//! them is deliberate.

use glam::Vec2;

use super::geom::{EDGE_SLOP, LAND_DEPTH, Rect, overlaps};
use super::state::{ScoreColor, ScoreEvent};
use crate::consts::GROUND_Y;

/// A static platform rectangle
#[derive(Debug, Clone)]
pub struct Platform {
    pub rect: Rect,
    /// Boss barrier platforms are inserted/removed at runtime and are solid
    /// from every direction (normal platforms are one-way floors)
    pub barrier: bool,
}

impl Platform {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            barrier: false,
        }
    }

    /// Platforms whose top sits at the ground plane form the ground
    #[inline]
    pub fn is_ground(&self) -> bool {
        (self.rect.y - GROUND_Y).abs() < 0.5
    }
}

/// A collectible page; flips `collected` once on player overlap
#[derive(Debug, Clone)]
pub struct Collectible {
    pub rect: Rect,
    pub collected: bool,
    pub points: u32,
    pub label: &'static str,
}

impl Collectible {
    pub fn new(x: f32, y: f32, points: u32, label: &'static str) -> Self {
        Self {
            rect: Rect::new(x, y, 24.0, 30.0),
            collected: false,
            points,
            label,
        }
    }
}

/// Result of platform resolution for one entity this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contact {
    pub grounded: bool,
    pub blocked_left: bool,
    pub blocked_right: bool,
}

/// The static world: platform list, collectibles, level extent
#[derive(Debug, Clone)]
pub struct World {
    pub platforms: Vec<Platform>,
    pub collectibles: Vec<Collectible>,
    /// X coordinate of the level end marker
    pub end_x: f32,
}

impl World {
    pub fn new(platforms: Vec<Platform>, collectibles: Vec<Collectible>, end_x: f32) -> Self {
        Self {
            platforms,
            collectibles,
            end_x,
        }
    }

    /// Resolve platform collisions for an entity, mutating its position and
    /// velocity in place.
    ///
    /// Ground-plane platforms ground the entity only while horizontally
    /// overlapping one (pits are gaps). Elevated platforms resolve a
    /// top-landing within `EDGE_SLOP`/`LAND_DEPTH` tolerance; a side hit
    /// pushes the entity out horizontally and reports a blocked flag without
    /// touching vertical velocity, so a falling entity slides off the wall
    /// into the pit below. Entities moving upward pass through non-barrier
    /// platforms from below.
    pub fn resolve_platform_collision(
        &self,
        pos: &mut Vec2,
        vel: &mut Vec2,
        size: Vec2,
    ) -> Contact {
        let mut contact = Contact::default();

        for platform in &self.platforms {
            let r = platform.rect;
            let er = Rect::from_pos_size(*pos, size);
            let feet = er.bottom();

            if platform.is_ground() {
                let horiz = er.right() > r.x && er.x < r.right();
                let in_depth = feet >= r.y && feet - r.y <= LAND_DEPTH;
                if horiz && vel.y >= 0.0 && in_depth {
                    pos.y = r.y - size.y;
                    vel.y = 0.0;
                    contact.grounded = true;
                }
                continue;
            }

            // One-way floors: upward movers pass through unless it's a barrier
            if vel.y < 0.0 && !platform.barrier {
                continue;
            }

            // Top landing, with generous edge tolerance
            let over_top = feet >= r.y && feet - r.y <= LAND_DEPTH;
            let horiz_slop = er.right() > r.x - EDGE_SLOP && er.x < r.right() + EDGE_SLOP;
            if vel.y >= 0.0 && over_top && horiz_slop {
                pos.y = r.y - size.y;
                vel.y = 0.0;
                contact.grounded = true;
                continue;
            }

            // Side contact: push out horizontally, keep falling
            if overlaps(&er, &r) {
                let pen_from_left = er.right() - r.x;
                let pen_from_right = r.right() - er.x;
                if pen_from_left < pen_from_right {
                    pos.x = r.x - size.x;
                    contact.blocked_right = true;
                } else {
                    pos.x = r.right();
                    contact.blocked_left = true;
                }
            }
        }

        contact
    }

    /// Check whether a rect stands on any platform top (within landing
    /// tolerance). Used by probes that must not mutate the entity.
    pub fn supported_at(&self, rect: &Rect) -> bool {
        self.platforms.iter().any(|p| {
            let r = p.rect;
            let feet = rect.bottom();
            rect.right() > r.x && rect.x < r.right() && feet >= r.y && feet - r.y <= LAND_DEPTH
        })
    }

    /// Flip `collected` on every uncollected collectible the player overlaps
    /// and return the score awards.
    pub fn collect(&mut self, player_rect: &Rect) -> Vec<ScoreEvent> {
        let mut events = Vec::new();
        for c in &mut self.collectibles {
            if !c.collected && overlaps(player_rect, &c.rect) {
                c.collected = true;
                events.push(ScoreEvent {
                    points: c.points,
                    color: ScoreColor::White,
                    label: c.label.to_string(),
                });
            }
        }
        events
    }

    /// Insert boss barrier platforms
    pub fn insert_barriers(&mut self, rects: &[Rect]) {
        // Idempotent: a second insert replaces the previous set
        self.remove_barriers();
        for &rect in rects {
            self.platforms.push(Platform {
                rect,
                barrier: true,
            });
        }
    }

    /// Remove every barrier platform
    pub fn remove_barriers(&mut self) {
        self.platforms.retain(|p| !p.barrier);
    }

    /// Clear collectibles back to uncollected and drop barriers
    pub fn reset(&mut self) {
        for c in &mut self.collectibles {
            c.collected = false;
        }
        self.remove_barriers();
    }
}
