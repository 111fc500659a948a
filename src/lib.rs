//! Falcon Strike - a vertical-scrolling arcade shooter core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spatial grid, collision, game state)
//! - `config`: Data-driven game balance and tuning
//! - `session`: Wiring between the core and its external collaborators
//!   (frame-tick source, input source, render sink, sound sink)
//!
//! The crate deliberately owns no pixels, no audio mixing and no window:
//! each frame the session hands an ordered entity list plus HUD scalars to
//! whatever renderer the embedder provides, and emits fire-and-forget sound
//! triggers. The collision evaluator runs on its own thread against a
//! copy-on-write snapshot of the entity set and reports candidate hits back
//! over a channel; only the simulation step ever mutates game state.

pub mod config;
pub mod session;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use session::{
    EntityView, FrameAction, FrameView, GameEndSink, GameSession, NullSound, PointerEvent,
    SoundSink,
};

/// Fixed internal constants. Everything tunable lives in [`GameConfig`].
pub mod consts {
    /// Render budget per frame; updates that overrun it skip the render pass
    pub const FRAME_BUDGET_SECS: f32 = 1.0 / 60.0;
    /// Tick gaps beyond this are treated as a pause/resume discontinuity
    pub const MAX_FRAME_GAP_NANOS: u64 = 1_000_000_000;
    /// Frames per sprite animation strip
    pub const ANIM_FRAME_COUNT: u32 = 3;
    /// Sprite animation rate (frames per second)
    pub const ANIM_FPS: f32 = 6.0;
    /// Blink toggle interval during the invincibility window (seconds)
    pub const BLINK_INTERVAL_SECS: f32 = 0.2;
}
