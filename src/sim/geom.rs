//! Axis-aligned rectangle geometry
//!
//! The single canonical AABB overlap test used by every subsystem. The
//! platform-edge tolerances shared by all platform-resolution call sites
//! live here as well.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Horizontal slop when testing whether an entity is over a platform edge.
/// Lets a landing entity catch a platform it only just reaches.
pub const EDGE_SLOP: f32 = 5.0;

/// Maximum vertical penetration below a platform top that still resolves as
/// a landing rather than a side hit.
pub const LAND_DEPTH: f32 = 15.0;

/// An axis-aligned rectangle in world space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Build from a top-left position and size vector
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            w: size.x,
            h: size.y,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    /// Check whether a point lies inside this rectangle (half-open)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }
}

/// Half-open AABB overlap test.
///
/// Touching edges do not count as overlap, so two rectangles resting flush
/// against each other never collide.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}
