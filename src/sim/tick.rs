//! Per-frame orchestrator
//!
//! One `tick` call advances the simulation exactly one frame. Fixed order,
//! preserved because later subsystems read the player's freshly updated
//! position:
//!
//!   1. Player input, gravity, integration
//!   2. World collision resolution + camera
//!   3. Projectiles (arrows)
//!   4. Ground enemies (snails)
//!   5. Boss
//!   6. Pet follower
//!   7. Combo landing check
//!
//! All timers are frame counters; same seed and same inputs give identical
//! runs.

use super::arrows::ArrowEvent;
use super::boss::BossEvent;
use super::snails::SnailEvent;
use super::state::{Facing, GameEvent, GameState, HitKind, ScoreColor, ScoreEvent, SoundCue};
use crate::consts::*;

/// Input commands for a single frame (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Edge-triggered jump
    pub jump_pressed: bool,
    /// Level-triggered jump; converts stomps into full jumps
    pub jump_held: bool,
    /// Host-owned power-up flag; scales projectile rate, deflects arrows,
    /// and doubles pet speed
    pub power_up: bool,
}

/// Advance the game state by one frame and return the events the host
/// should react to.
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.game_over || state.level_complete {
        return events;
    }

    state.frame += 1;
    state.combo.begin_frame();
    let tuning = state.tuning;

    // --- Player physics ---
    let mut vx = 0.0;
    if input.left {
        vx -= tuning.player_speed;
    }
    if input.right {
        vx += tuning.player_speed;
    }
    state.player.vel.x = vx;
    if vx != 0.0 {
        state.player.facing = Facing::from_sign(vx);
    }
    if input.jump_pressed && state.player.grounded {
        state.player.vel.y = -tuning.jump_power;
        state.player.grounded = false;
        events.push(GameEvent::Sound(SoundCue::Jump));
    }
    state.player.vel.y += tuning.gravity;
    if state.player.vel.y > MAX_FALL_SPEED {
        state.player.vel.y = MAX_FALL_SPEED;
    }
    state.player.pos += state.player.vel;

    let size = state.player.size;
    let contact =
        state
            .world
            .resolve_platform_collision(&mut state.player.pos, &mut state.player.vel, size);
    state.player.grounded = contact.grounded;

    if state.player.invuln_frames > 0 {
        state.player.invuln_frames -= 1;
    }

    // Pits are bottomless
    if state.player.pos.y > KILL_Y {
        state.player.alive = false;
        state.player.health = 0;
        state.game_over = true;
        events.push(GameEvent::PlayerDied);
        return events;
    }

    for score in state.world.collect(&state.player.rect()) {
        state.score += score.points as u64;
        events.push(GameEvent::Sound(SoundCue::Collect));
        events.push(GameEvent::Score(score));
    }

    state.camera.follow(state.player.pos.x, state.world.end_x);

    // --- Arrows ---
    state
        .arrows
        .update(state.camera.x, input.power_up, &mut state.rng, &tuning);
    let arrow_events =
        state
            .arrows
            .check_collisions(&mut state.player, input.jump_held, input.power_up, &tuning);
    for event in arrow_events {
        match event {
            ArrowEvent::Deflected { .. } => {
                events.push(GameEvent::Sound(SoundCue::ArrowBreak));
                award_kill(state, SCORE_ARROW_DEFLECT, "DEFLECT", ScoreColor::Gold, &mut events);
            }
            ArrowEvent::Ricochet { .. } => events.push(GameEvent::Sound(SoundCue::Ricochet)),
            ArrowEvent::HitPlayer { x, y } => {
                damage_player(state, HitKind::Arrow, x, y, &mut events);
            }
        }
    }

    // --- Snails ---
    let mut snail_events = state.snails.update();
    snail_events.extend(state.snails.check_collisions(
        &mut state.player,
        input.jump_held,
        input.power_up,
        &tuning,
    ));
    for event in snail_events {
        match event {
            SnailEvent::Stomped { mega, .. } => {
                events.push(GameEvent::Sound(SoundCue::SnailStomp));
                let base = if mega { SCORE_MEGA_SNAIL } else { SCORE_SNAIL };
                award_kill(state, base, "SNAIL", ScoreColor::Gold, &mut events);
            }
            SnailEvent::PowerKilled { mega, .. } => {
                events.push(GameEvent::Sound(SoundCue::SnailStomp));
                let base = if mega { SCORE_MEGA_SNAIL } else { SCORE_SNAIL };
                award_kill(state, base, "SNAIL", ScoreColor::Gold, &mut events);
            }
            SnailEvent::HitPlayer { x, y } => {
                damage_player(state, HitKind::Snail, x, y, &mut events);
            }
            SnailEvent::Emerged { .. } => events.push(GameEvent::Sound(SoundCue::SnailPop)),
        }
    }

    // --- Boss ---
    if let Some(mut boss) = state.boss.take() {
        let boss_events = boss.update(
            &mut state.player,
            &mut state.world,
            input.jump_held,
            &mut state.rng,
            &tuning,
        );
        state.boss = Some(boss);
        for event in boss_events {
            match event {
                BossEvent::SlamImpact { .. } => {
                    events.push(GameEvent::Sound(SoundCue::BossSlam));
                }
                BossEvent::Damaged { .. } => {
                    events.push(GameEvent::Sound(SoundCue::BossHurt));
                    award_kill(state, SCORE_BOSS_HIT, "BOSS", ScoreColor::Orange, &mut events);
                }
                BossEvent::HitPlayer { x, y } => {
                    damage_player(state, HitKind::BossContact, x, y, &mut events);
                }
                BossEvent::RockHitPlayer { x, y } => {
                    damage_player(state, HitKind::Rock, x, y, &mut events);
                }
                BossEvent::Defeated => events.push(GameEvent::BossDefeated),
                BossEvent::LevelComplete => {
                    state.level_complete = true;
                    events.push(GameEvent::LevelComplete);
                }
            }
        }
    }

    // --- Pet ---
    state.pet_ai.update(
        &mut state.pet,
        &state.player,
        &state.world,
        input.power_up,
        &tuning,
    );

    // Landing with no kill this frame ends the combo chain
    state.combo.end_frame(state.player.grounded);

    events
}

/// Run a kill through the combo rule, bump the score, and emit the award
fn award_kill(
    state: &mut GameState,
    base: u32,
    label: &str,
    color: ScoreColor,
    events: &mut Vec<GameEvent>,
) {
    let airborne = !state.player.grounded;
    let points = state.combo.score_kill(base, airborne);
    state.score += points as u64;
    let label = if state.combo.active && state.combo.multiplier > 1 {
        format!("{label} x{}", state.combo.multiplier)
    } else {
        label.to_string()
    };
    events.push(GameEvent::Score(ScoreEvent {
        points,
        color,
        label,
    }));
}

/// Apply one point of damage unless the player is in post-hit immunity
fn damage_player(
    state: &mut GameState,
    kind: HitKind,
    x: f32,
    y: f32,
    events: &mut Vec<GameEvent>,
) {
    if state.player.invuln_frames > 0 || !state.player.alive {
        return;
    }
    state.player.health -= 1;
    state.player.invuln_frames = state.tuning.invuln_frames;
    events.push(GameEvent::PlayerHit { kind, x, y });
    events.push(GameEvent::Sound(SoundCue::PlayerHurt));
    if state.player.health <= 0 {
        state.player.alive = false;
        state.game_over = true;
        events.push(GameEvent::PlayerDied);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geom::Rect;

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn run_right() -> TickInput {
        TickInput {
            right: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_player_settles_onto_ground() {
        let mut state = GameState::new(1, 5);
        state.player.pos.y -= 40.0;
        state.player.grounded = false;

        for _ in 0..120 {
            tick(&mut state, &idle());
        }
        assert!(state.player.grounded);
        assert_eq!(state.player.pos.y, GROUND_Y - PLAYER_H);
        assert_eq!(state.player.vel.y, 0.0);
    }

    #[test]
    fn test_jump_leaves_ground_then_lands() {
        let mut state = GameState::new(1, 5);
        for _ in 0..30 {
            tick(&mut state, &idle());
        }
        assert!(state.player.grounded);

        let input = TickInput {
            jump_pressed: true,
            jump_held: true,
            ..Default::default()
        };
        let events = tick(&mut state, &input);
        assert!(!state.player.grounded);
        assert!(state.player.vel.y < 0.0);
        assert!(events.contains(&GameEvent::Sound(SoundCue::Jump)));

        for _ in 0..120 {
            tick(&mut state, &idle());
        }
        assert!(state.player.grounded);
    }

    #[test]
    fn test_subsystem_order_is_fixed_after_player_physics() {
        // An arrow placed exactly where the player will be this frame must
        // see the post-integration position: the hit lands the same tick.
        let mut state = GameState::new(1, 5);
        for _ in 0..30 {
            tick(&mut state, &idle());
        }
        let next_x = state.player.pos.x + state.tuning.player_speed;
        state.arrows.arrows.push(crate::sim::arrows::Arrow {
            pos: glam::Vec2::new(next_x, state.player.pos.y + 10.0),
            vel: glam::Vec2::ZERO,
            size: glam::Vec2::new(ARROW_W, ARROW_H),
            active: true,
            ricochet_played: false,
        });

        let events = tick(&mut state, &run_right());
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::PlayerHit { kind: HitKind::Arrow, .. }))
        );
    }

    #[test]
    fn test_damage_grants_immunity_window() {
        let mut state = GameState::new(1, 5);
        let mut events = Vec::new();
        damage_player(&mut state, HitKind::Snail, 0.0, 0.0, &mut events);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH - 1);
        assert!(state.player.invuln_frames > 0);

        // A second hit inside the window does nothing
        let mut events = Vec::new();
        damage_player(&mut state, HitKind::Snail, 0.0, 0.0, &mut events);
        assert!(events.is_empty());
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH - 1);
    }

    #[test]
    fn test_three_hits_end_the_run() {
        let mut state = GameState::new(1, 5);
        for _ in 0..PLAYER_MAX_HEALTH {
            state.player.invuln_frames = 0;
            let mut events = Vec::new();
            damage_player(&mut state, HitKind::Arrow, 0.0, 0.0, &mut events);
        }
        assert!(state.game_over);
        assert!(!state.player.alive);

        // Dead state ticks are inert
        let events = tick(&mut state, &run_right());
        assert!(events.is_empty());
    }

    #[test]
    fn test_falling_into_pit_is_fatal() {
        let mut state = GameState::new(1, 5);
        // Park the player over the first pit (900..1020 on level 1)
        state.player.pos.x = 940.0;
        state.player.pos.y = GROUND_Y - PLAYER_H;
        state.player.grounded = false;

        let mut died = false;
        for _ in 0..400 {
            let events = tick(&mut state, &idle());
            if events.contains(&GameEvent::PlayerDied) {
                died = true;
                break;
            }
        }
        assert!(died);
        assert!(state.game_over);
    }

    #[test]
    fn test_collectible_awards_score_once() {
        let mut state = GameState::new(1, 5);
        let page = state.world.collectibles[0].rect;
        state.player.pos = glam::Vec2::new(page.x, page.y - 10.0);
        state.player.grounded = false;

        let events = tick(&mut state, &idle());
        assert!(events.iter().any(|e| matches!(e, GameEvent::Score(_))));
        assert!(state.score >= 500);

        let score_after = state.score;
        tick(&mut state, &idle());
        // No double collection while still overlapping
        assert_eq!(state.score, score_after);
    }

    #[test]
    fn test_airborne_stomp_scores_with_combo() {
        // Scenario A end to end: stomp while airborne, combo opens at x1
        let mut state = GameState::new(1, 5);
        for _ in 0..30 {
            tick(&mut state, &idle());
        }
        // Hang an arrow just under the falling player
        state.player.pos.y = 300.0;
        state.player.vel.y = 0.0;
        state.player.grounded = false;
        state.arrows.arrows.push(crate::sim::arrows::Arrow {
            pos: glam::Vec2::new(
                state.player.pos.x,
                state.player.pos.y + PLAYER_H + 2.0,
            ),
            vel: glam::Vec2::ZERO,
            size: glam::Vec2::new(ARROW_W, ARROW_H),
            active: true,
            ricochet_played: false,
        });

        let mut deflected = false;
        for _ in 0..10 {
            let events = tick(&mut state, &idle());
            if let Some(GameEvent::Score(score)) = events
                .iter()
                .find(|e| matches!(e, GameEvent::Score(_)))
            {
                assert_eq!(score.points, SCORE_ARROW_DEFLECT);
                deflected = true;
                break;
            }
        }
        assert!(deflected);
        assert!(state.combo.active);
        assert_eq!(state.combo.multiplier, 1);
        assert!(state.player.vel.y < 0.0, "stomp bounces the player");
    }

    #[test]
    fn test_combo_resets_on_landing() {
        let mut state = GameState::new(1, 5);
        state.combo.begin_frame();
        state.combo.score_kill(100, true);
        assert!(state.combo.active);

        // Let the player stand on the ground for a few frames
        for _ in 0..30 {
            tick(&mut state, &idle());
        }
        assert!(!state.combo.active);
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            TickInput { right: true, ..Default::default() },
            TickInput { right: true, jump_pressed: true, jump_held: true, ..Default::default() },
            TickInput { right: true, jump_held: true, ..Default::default() },
            TickInput::default(),
        ];

        let mut a = GameState::new(2, 777);
        let mut b = GameState::new(2, 777);
        for frame in 0..600 {
            let input = inputs[frame % inputs.len()];
            tick(&mut a, &input);
            tick(&mut b, &input);
        }

        assert_eq!(a.frame, b.frame);
        assert_eq!(a.score, b.score);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.arrows.arrows.len(), b.arrows.arrows.len());
        for (x, y) in a.arrows.arrows.iter().zip(&b.arrows.arrows) {
            assert_eq!(x.pos, y.pos);
        }
    }

    #[test]
    fn test_reset_restores_initial_run() {
        let mut state = GameState::new(1, 99);
        let initial = GameState::new(1, 99);
        for _ in 0..300 {
            tick(&mut state, &run_right());
        }
        state.reset();
        assert_eq!(state.player.pos, initial.player.pos);
        assert_eq!(state.score, 0);
        assert_eq!(state.frame, 0);

        // Identical replay after reset
        let mut fresh = GameState::new(1, 99);
        for _ in 0..120 {
            tick(&mut state, &run_right());
            tick(&mut fresh, &run_right());
        }
        assert_eq!(state.player.pos, fresh.player.pos);
        assert_eq!(state.score, fresh.score);
    }

    #[test]
    fn test_barriers_block_leaving_the_arena() {
        let mut state = GameState::new(3, 11);
        let boss = state.boss.as_ref().expect("level 3 has a boss");
        let min_x = boss.min_x;

        // Teleport to just inside the arena; the next tick starts the fight
        state.player.pos.x = min_x + 30.0;
        state.player.pos.y = GROUND_Y - PLAYER_H;
        tick(&mut state, &idle());
        assert!(state.boss.as_ref().is_some_and(|b| b.fight_started));
        assert!(state.world.platforms.iter().any(|p| p.barrier));

        // Push left against the barrier for a while: it holds
        for _ in 0..240 {
            tick(&mut state, &TickInput { left: true, ..Default::default() });
            if state.game_over {
                break;
            }
        }
        assert!(state.player.pos.x >= min_x - state.player.size.x);
    }

    #[test]
    fn test_render_surface_is_public() {
        // A renderer needs position, size, flags, and state names without
        // reaching into private fields.
        let state = GameState::new(3, 1);
        let _ = state.player.rect();
        let _ = state.pet.rect();
        let _: Rect = state.world.platforms[0].rect;
        if let Some(boss) = &state.boss {
            assert_eq!(boss.state.name(), "patrol");
        }
        assert_eq!(state.camera.x, 0.0);
    }
}
