//! Simulation core
//!
//! All gameplay logic lives here, independent of any rendering or
//! platform surface:
//! - Seeded RNG only, so a run is reproducible from its seed
//! - One writer: only the per-frame step mutates [`GameState`]
//! - The collision evaluator reads immutable snapshots on its own
//!   thread and reports back over a channel

pub mod collision;
pub mod entity;
pub mod evaluator;
pub mod grid;
pub mod pacer;
pub mod state;
pub mod tick;

pub use collision::{ChannelListener, CollisionEvent, CollisionListener, scan};
pub use entity::{EnemyClass, Entity, EntityId, EntityKind, Rect};
pub use evaluator::{CollisionEvaluator, SnapshotSlot};
pub use grid::SpatialGrid;
pub use pacer::FramePacer;
pub use state::{GamePhase, GameState};
pub use tick::{TickReport, tick};
