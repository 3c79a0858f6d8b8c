//! Data-driven game balance
//!
//! The knobs a host is expected to rebalance without recompiling. Defaults
//! are the canonical values; `from_json` accepts a partial override, so a
//! tuning file only needs the fields it changes.

use serde::{Deserialize, Serialize};

/// Simulation balance parameters, consumed (not owned) by the core
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration, px/frame^2
    pub gravity: f32,
    /// Upward jump impulse magnitude, px/frame
    pub jump_power: f32,
    /// Player run speed, px/frame
    pub player_speed: f32,
    /// Small bounce after a stomp without the jump key held
    pub stomp_bounce: f32,
    /// Pet follow speed, px/frame
    pub pet_speed: f32,
    /// Pet catch-up speed when far behind
    pub pet_catchup_speed: f32,
    /// Maximum simultaneously active arrows
    pub arrow_cap: usize,
    pub boss_max_health: u32,
    /// Frames of player immunity after taking a hit
    pub invuln_frames: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.55,
            jump_power: 13.0,
            player_speed: 4.2,
            stomp_bounce: 7.5,
            pet_speed: 2.6,
            pet_catchup_speed: 4.6,
            arrow_cap: 12,
            boss_max_health: 6,
            invuln_frames: 90,
        }
    }
}

impl Tuning {
    /// Parse a tuning override from JSON. Missing fields keep their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning = serde_json::from_str(json)?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
