//! Embedder-facing session
//!
//! [`GameSession`] owns one run end to end: the game state, the frame
//! pacer, the collision evaluator thread and the channel its reports
//! arrive on. The embedder feeds it pointer events and per-frame
//! timestamps and receives render/skip decisions; rendering itself and
//! audio playback stay on the embedder's side, behind small traits.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, unbounded};
use glam::Vec2;

use crate::config::{ConfigError, GameConfig};
use crate::sim::{
    ChannelListener, CollisionEvaluator, CollisionEvent, EntityId, EntityKind, FramePacer,
    GamePhase, GameState, Rect, SnapshotSlot, SpatialGrid,
};

/// Audio output seam. The simulation decides *when* a sound plays, the
/// embedder decides *how*.
pub trait SoundSink {
    fn play_explosion(&mut self);
}

/// Sink that drops every sound. Useful headless and in tests.
pub struct NullSound;

impl SoundSink for NullSound {
    fn play_explosion(&mut self) {}
}

/// Notified exactly once per run, after the post-game delay.
pub trait GameEndSink {
    fn game_over(&mut self, score: u32);
}

impl<F: FnMut(u32)> GameEndSink for F {
    fn game_over(&mut self, score: u32) {
        self(score)
    }
}

/// Pointer input in play-field coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press(Vec2),
    Move(Vec2),
    Release,
}

/// One entity as the renderer needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub bounds: Rect,
    pub frame: u32,
    pub visible: bool,
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub entities: Vec<EntityView>,
    pub background_offset: f32,
    pub score: u32,
    pub level: u32,
    pub player_hp: i32,
    pub phase: GamePhase,
}

/// Per-frame verdict: draw this frame, or drop it to catch up.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameAction {
    Render(FrameView),
    Skip,
}

/// One complete run of the game.
pub struct GameSession {
    config: GameConfig,
    state: GameState,
    pacer: FramePacer,
    slot: SnapshotSlot,
    evaluator: Option<CollisionEvaluator>,
    events_rx: Receiver<CollisionEvent>,
    sounds: Box<dyn SoundSink>,
    end_sink: Box<dyn GameEndSink>,
    dragged: Option<EntityId>,
}

impl GameSession {
    /// Validate the config, build the initial state and start the
    /// collision evaluator.
    pub fn new(
        config: GameConfig,
        seed: u64,
        sounds: Box<dyn SoundSink>,
        end_sink: Box<dyn GameEndSink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let state = GameState::new(seed, &config);
        let slot = SnapshotSlot::new();
        slot.publish(state.snapshot());

        let (tx, events_rx) = unbounded();
        let grid = SpatialGrid::new(config.cell_size, config.screen_width, config.screen_height);
        let evaluator = CollisionEvaluator::spawn(
            slot.clone(),
            grid,
            Box::new(ChannelListener::new(tx)),
            config.scan_interval_ms.map(Duration::from_millis),
        );
        log::info!("session started: seed={seed}");

        Ok(Self {
            config,
            state,
            pacer: FramePacer::new(),
            slot,
            evaluator: Some(evaluator),
            events_rx,
            sounds,
            end_sink,
            dragged: None,
        })
    }

    /// Route one pointer event. A press lands on the first draggable
    /// entity whose bounds contain the point; the first move of a run
    /// starts the game.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Press(point) => {
                let hit = self
                    .state
                    .entities
                    .iter()
                    .find(|e| e.draggable && e.bounds().contains(point))
                    .map(|e| e.id);
                if let Some(id) = hit {
                    self.dragged = Some(id);
                    if let Some(entity) = self.state.find_mut(id) {
                        entity.dragging = true;
                    }
                }
            }
            PointerEvent::Move(point) => {
                let Some(id) = self.dragged else {
                    return;
                };
                if self.state.phase == GamePhase::NotStarted {
                    self.state.phase = GamePhase::Playing;
                    log::info!("game started");
                }
                let field = Vec2::new(self.config.screen_width, self.config.screen_height);
                if let Some(entity) = self.state.find_mut(id) {
                    entity.set_position_clamped(point, field);
                }
            }
            PointerEvent::Release => {
                if let Some(id) = self.dragged.take() {
                    if let Some(entity) = self.state.find_mut(id) {
                        entity.dragging = false;
                    }
                }
            }
        }
    }

    /// Run one frame against the given monotonic timestamp: drain the
    /// evaluator's reports, step the simulation, publish the new
    /// snapshot, and decide whether this frame still fits its budget.
    pub fn do_frame(&mut self, timestamp_nanos: u64) -> FrameAction {
        let started = Instant::now();
        let dt = self.pacer.delta(timestamp_nanos);

        let events: Vec<CollisionEvent> = self.events_rx.try_iter().collect();
        let report = crate::sim::tick(&mut self.state, &self.config, dt, &events, self.sounds.as_mut());

        self.slot.publish(self.state.snapshot());

        // The evaluator stops at the terminal transition, before any
        // end-of-game notification goes out.
        if self.state.phase.is_terminal() {
            if let Some(mut evaluator) = self.evaluator.take() {
                evaluator.shutdown();
            }
        }
        if let Some(score) = report.game_ended {
            self.end_sink.game_over(score);
        }

        let spent = started.elapsed().as_nanos() as u64;
        if FramePacer::over_budget(0, spent) {
            log::debug!("frame over budget ({spent} ns), skipping render");
            return FrameAction::Skip;
        }
        FrameAction::Render(self.frame())
    }

    /// Render-side view of the current state.
    pub fn frame(&self) -> FrameView {
        FrameView {
            entities: self
                .state
                .entities
                .iter()
                .map(|e| EntityView {
                    id: e.id,
                    kind: e.kind,
                    bounds: e.bounds(),
                    frame: e.frame,
                    visible: e.visible,
                })
                .collect(),
            background_offset: self.state.background_offset,
            score: self.state.score,
            level: self.state.level,
            player_hp: self.state.player_hp,
            phase: self.state.phase,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Stop the evaluator thread. Called automatically on drop; exposed
    /// for embedders that want a deterministic teardown point.
    pub fn shutdown(&mut self) {
        if let Some(mut evaluator) = self.evaluator.take() {
            evaluator.shutdown();
        }
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
