//! Falcon Strike entry point
//!
//! Headless demo driver: runs a scripted session at a synthetic 60 Hz
//! clock and logs the HUD once per simulated second. Pass a JSON config
//! path as the first argument to override the built-in tuning.

use std::{env, fs, process};

use glam::Vec2;

use falcon_strike::{FrameAction, GameConfig, GameSession, NullSound, PointerEvent};

const FRAME_NANOS: u64 = 16_666_667;
const RUN_SECONDS: u64 = 120;

fn load_config() -> GameConfig {
    let Some(path) = env::args().nth(1) else {
        return GameConfig::default();
    };
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) => {
            log::error!("cannot read config {path}: {err}");
            process::exit(1);
        }
    };
    match GameConfig::from_json(&text) {
        Ok(config) => config,
        Err(err) => {
            log::error!("invalid config {path}: {err}");
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let config = load_config();
    let field = Vec2::new(config.screen_width, config.screen_height);
    let mut session = match GameSession::new(
        config,
        42,
        Box::new(NullSound),
        Box::new(|score: u32| log::info!("final score: {score}")),
    ) {
        Ok(session) => session,
        Err(err) => {
            log::error!("cannot start session: {err}");
            process::exit(1);
        }
    };

    // Grab the player and start firing; then sweep it side to side near
    // the bottom of the field so the run plays itself.
    let start = Vec2::new(field.x / 2.0, field.y / 2.0);
    session.handle_pointer(PointerEvent::Press(start));
    session.handle_pointer(PointerEvent::Move(start));

    let mut clock = 0u64;
    for frame in 0..(RUN_SECONDS * 60) {
        clock += FRAME_NANOS;
        let t = frame as f32 / 60.0;
        let x = field.x / 2.0 + (field.x / 3.0) * (t * 0.8).sin();
        session.handle_pointer(PointerEvent::Move(Vec2::new(x, field.y * 0.8)));

        match session.do_frame(clock) {
            FrameAction::Render(view) => {
                if frame % 60 == 0 {
                    log::info!(
                        "t={t:>5.1}s phase={:?} level={} score={} hp={} entities={}",
                        view.phase,
                        view.level,
                        view.score,
                        view.player_hp,
                        view.entities.len()
                    );
                }
                if view.phase.is_terminal() {
                    // Let the end-of-game delay run out so the final
                    // score line is emitted, then stop.
                    for _ in 0..(4 * 60) {
                        clock += FRAME_NANOS;
                        session.do_frame(clock);
                    }
                    break;
                }
            }
            FrameAction::Skip => log::debug!("frame {frame} skipped"),
        }
    }

    session.shutdown();
}
