//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed frame step only; timers are frame counters, never wall clock
//! - Seeded RNG only
//! - Fixed subsystem order (player -> arrows -> snails -> boss -> pet)
//! - No rendering, audio, or platform dependencies

pub mod arrows;
pub mod boss;
pub mod combo;
pub mod geom;
pub mod level;
pub mod pet;
pub mod snails;
pub mod state;
pub mod tick;
pub mod world;

pub use arrows::{Arrow, ArrowEvent, ArrowSystem, BrokenArrow};
pub use boss::{BossEvent, BossState, BossSystem, FallingRock};
pub use combo::Combo;
pub use geom::{Rect, overlaps};
pub use level::{LevelLayout, SnailSpawn};
pub use pet::PetFollower;
pub use snails::{Snail, SnailEvent, SnailSystem};
pub use state::{
    Camera, Facing, GameEvent, GameState, HitKind, Pet, Player, ScoreColor, ScoreEvent, SoundCue,
};
pub use tick::{TickInput, tick};
pub use world::{Collectible, Contact, Platform, World};
