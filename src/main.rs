//! Headless demo driver
//!
//! Runs the simulation for a few thousand frames with scripted input and
//! logs the events a host would react to. Useful for eyeballing balance and
//! determinism without a renderer:
//!
//! ```text
//! meadow-dash [level] [seed]
//! ```

use meadow_dash::sim::{GameEvent, GameState, TickInput, tick};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let level: u32 = args.next().and_then(|a| a.parse().ok()).unwrap_or(1);
    let seed: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(12345);

    let mut state = GameState::new(level, seed);
    log::info!("running level {level} with seed {seed}");

    let frames = 6000;
    for frame in 0..frames {
        // Scripted input: run right, hop every second or so
        let input = TickInput {
            right: true,
            jump_pressed: frame % 70 == 0,
            jump_held: frame % 70 < 20,
            power_up: false,
            ..Default::default()
        };

        for event in tick(&mut state, &input) {
            match event {
                GameEvent::Score(score) => {
                    log::info!("frame {frame}: +{} ({})", score.points, score.label);
                }
                GameEvent::PlayerHit { kind, .. } => {
                    log::info!("frame {frame}: player hit by {kind:?}");
                }
                GameEvent::PlayerDied => log::warn!("frame {frame}: player died"),
                GameEvent::BossDefeated => log::info!("frame {frame}: boss defeated"),
                GameEvent::LevelComplete => log::info!("frame {frame}: level complete"),
                GameEvent::Sound(_) => {}
            }
        }

        if state.game_over || state.level_complete {
            break;
        }
    }

    println!(
        "frames: {}  score: {}  health: {}  outcome: {}",
        state.frame,
        state.score,
        state.player.health.max(0),
        if state.level_complete {
            "level complete"
        } else if state.game_over {
            "game over"
        } else {
            "time up"
        }
    );
}
