//! Level construction
//!
//! Builds the platform layout, snail spawn table, collectible placement, and
//! boss arena bounds for a level number. Layouts are fixed data; everything
//! stochastic happens later inside the subsystems.

use glam::Vec2;

use super::geom::Rect;
use super::world::{Collectible, Platform};
use crate::consts::*;

/// Where a snail starts and the patrol bounds it is tied to
#[derive(Debug, Clone)]
pub struct SnailSpawn {
    pub x: f32,
    /// Top of the surface the snail patrols
    pub surface_y: f32,
    pub platform_x: f32,
    pub platform_w: f32,
    pub mega: bool,
}

/// Everything the game state needs to start a level
#[derive(Debug, Clone)]
pub struct LevelLayout {
    pub platforms: Vec<Platform>,
    pub collectibles: Vec<Collectible>,
    pub snail_spawns: Vec<SnailSpawn>,
    /// `(min_x, max_x)` arena bounds; `Some` only on boss levels
    pub boss_arena: Option<(f32, f32)>,
    pub end_x: f32,
    pub player_spawn: Vec2,
    pub pet_spawn: Vec2,
}

fn ground(x0: f32, x1: f32) -> Platform {
    Platform::new(x0, GROUND_Y, x1 - x0, 120.0)
}

fn plat(x: f32, y: f32, w: f32) -> Platform {
    Platform::new(x, y, w, 18.0)
}

fn snail(x: f32, surface_y: f32, platform_x: f32, platform_w: f32) -> SnailSpawn {
    SnailSpawn {
        x,
        surface_y,
        platform_x,
        platform_w,
        mega: false,
    }
}

fn mega_snail(x: f32, surface_y: f32, platform_x: f32, platform_w: f32) -> SnailSpawn {
    SnailSpawn {
        mega: true,
        ..snail(x, surface_y, platform_x, platform_w)
    }
}

/// Build the layout for a level number. Levels beyond the handcrafted set
/// reuse the boss layout.
pub fn build(level: u32) -> LevelLayout {
    let layout = match level {
        0 | 1 => meadow(),
        2 => cliffs(),
        _ => keep(),
    };
    log::info!(
        "built level {}: {} platforms, {} snails, {} pages, boss={}",
        level,
        layout.platforms.len(),
        layout.snail_spawns.len(),
        layout.collectibles.len(),
        layout.boss_arena.is_some()
    );
    layout
}

/// Level 1: rolling meadow, two pits, a handful of snails
fn meadow() -> LevelLayout {
    let platforms = vec![
        ground(0.0, 900.0),
        ground(1020.0, 2200.0),
        ground(2340.0, 3800.0),
        plat(420.0, 380.0, 160.0),
        plat(950.0, 420.0, 140.0),
        plat(1500.0, 360.0, 180.0),
        plat(2220.0, 400.0, 150.0),
        plat(2900.0, 340.0, 170.0),
    ];
    let collectibles = vec![
        Collectible::new(490.0, 330.0, 500, "PAGE"),
        Collectible::new(1570.0, 310.0, 500, "PAGE"),
        Collectible::new(2960.0, 290.0, 500, "PAGE"),
    ];
    let snail_spawns = vec![
        snail(600.0, GROUND_Y, 300.0, 600.0),
        snail(1300.0, GROUND_Y, 1020.0, 700.0),
        snail(1560.0, 360.0, 1500.0, 180.0),
        snail(2800.0, GROUND_Y, 2340.0, 900.0),
    ];
    LevelLayout {
        platforms,
        collectibles,
        snail_spawns,
        boss_arena: None,
        end_x: 3800.0,
        player_spawn: Vec2::new(80.0, GROUND_Y - PLAYER_H),
        pet_spawn: Vec2::new(30.0, GROUND_Y - PET_H),
    }
}

/// Level 2: broken cliffs, wider pits, mega snails
fn cliffs() -> LevelLayout {
    let platforms = vec![
        ground(0.0, 700.0),
        ground(880.0, 1500.0),
        ground(1700.0, 2600.0),
        ground(2790.0, 4200.0),
        plat(700.0, 400.0, 120.0),
        plat(1180.0, 350.0, 140.0),
        plat(1520.0, 410.0, 150.0),
        plat(2080.0, 360.0, 160.0),
        plat(2620.0, 420.0, 140.0),
        plat(3200.0, 340.0, 200.0),
        plat(3650.0, 300.0, 140.0),
    ];
    let collectibles = vec![
        Collectible::new(1240.0, 300.0, 500, "PAGE"),
        Collectible::new(2140.0, 310.0, 500, "PAGE"),
        Collectible::new(3280.0, 290.0, 500, "PAGE"),
        Collectible::new(3700.0, 250.0, 500, "PAGE"),
    ];
    let snail_spawns = vec![
        snail(400.0, GROUND_Y, 100.0, 600.0),
        snail(1100.0, GROUND_Y, 880.0, 620.0),
        mega_snail(2000.0, GROUND_Y, 1700.0, 900.0),
        snail(2120.0, 360.0, 2080.0, 160.0),
        snail(3000.0, GROUND_Y, 2790.0, 800.0),
        mega_snail(3700.0, GROUND_Y, 3400.0, 800.0),
    ];
    LevelLayout {
        platforms,
        collectibles,
        snail_spawns,
        boss_arena: None,
        end_x: 4200.0,
        player_spawn: Vec2::new(80.0, GROUND_Y - PLAYER_H),
        pet_spawn: Vec2::new(30.0, GROUND_Y - PET_H),
    }
}

/// Level 3: approach and boss keep. The arena is sealed with stone barriers
/// once the player crosses its threshold.
fn keep() -> LevelLayout {
    let platforms = vec![
        ground(0.0, 1100.0),
        ground(1260.0, 2400.0),
        ground(2400.0, 3600.0),
        plat(500.0, 390.0, 150.0),
        plat(1100.0, 430.0, 160.0),
        plat(1800.0, 370.0, 160.0),
        // Inside the arena: two ledges to dodge rocks from
        plat(2650.0, 390.0, 130.0),
        plat(3220.0, 390.0, 130.0),
    ];
    let collectibles = vec![
        Collectible::new(560.0, 340.0, 500, "PAGE"),
        Collectible::new(1860.0, 320.0, 500, "PAGE"),
    ];
    let snail_spawns = vec![
        snail(700.0, GROUND_Y, 300.0, 800.0),
        mega_snail(1700.0, GROUND_Y, 1260.0, 1100.0),
    ];
    LevelLayout {
        platforms,
        collectibles,
        snail_spawns,
        boss_arena: Some((2500.0, 3500.0)),
        end_x: 3600.0,
        player_spawn: Vec2::new(80.0, GROUND_Y - PLAYER_H),
        pet_spawn: Vec2::new(30.0, GROUND_Y - PET_H),
    }
}

/// Barrier rectangles sealing a boss arena
pub fn arena_barriers(min_x: f32, max_x: f32) -> [Rect; 2] {
    let h = 260.0;
    [
        Rect::new(min_x - 24.0, GROUND_Y - h, 24.0, h),
        Rect::new(max_x, GROUND_Y - h, 24.0, h),
    ]
}
