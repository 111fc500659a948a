//! Simulated game objects and their derived bounds
//!
//! An [`Entity`] is one sprite in the world: player, enemy, bullet or
//! explosion. Bounds are never stored - they are recomputed on demand from
//! position, base size and scale so they can't go stale.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ANIM_FPS, ANIM_FRAME_COUNT};

/// Stable entity identifier, unique for the lifetime of a run.
pub type EntityId = u32;

/// Enemy paint class; speed scales with level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyClass {
    /// Slow mover
    Red,
    /// Medium mover
    Blue,
    /// Fast mover
    Green,
}

impl EnemyClass {
    /// Downward speed at level 1 (world units per second).
    pub fn base_speed(&self) -> f32 {
        match self {
            EnemyClass::Red => 100.0,
            EnemyClass::Blue => 150.0,
            EnemyClass::Green => 200.0,
        }
    }
}

/// Closed entity type tag; behavior is selected by matching on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy(EnemyClass),
    Bullet,
    Explosion,
}

impl EntityKind {
    #[inline]
    pub fn is_enemy(&self) -> bool {
        matches!(self, EntityKind::Enemy(_))
    }
}

/// Axis-aligned rectangle in play-field coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// Rectangle of the given size centered on `center`.
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            left: center.x - size.x / 2.0,
            top: center.y - size.y / 2.0,
            right: center.x + size.x / 2.0,
            bottom: center.y + size.y / 2.0,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Overlap test, exclusive at shared edges (touching is not a hit).
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Containment test, inclusive at edges.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }
}

/// Blink task for the invincibility visual, advanced on the sim timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Blink {
    /// Seconds left before the blink ends and visibility is restored
    remaining: f32,
    /// Toggle interval (seconds)
    interval: f32,
    /// Time since the last toggle
    phase: f32,
}

/// One simulated sprite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Sprite center
    pub pos: Vec2,
    /// World units per second
    pub vel: Vec2,
    /// Sprite box at scale 1 (bitmap-derived)
    base_size: Vec2,
    /// Bounds scale factor
    pub scale: f32,
    /// Whether the input source may start a drag on this entity
    pub draggable: bool,
    /// Whether a drag is currently active on this entity
    pub dragging: bool,
    /// Current animation frame index
    pub frame: u32,
    /// Time accumulated toward the next frame advance
    frame_clock: f32,
    /// Hidden frames while blinking
    pub visible: bool,
    blink: Option<Blink>,
    /// Remaining lifetime for transient entities (explosions)
    pub ttl: Option<f32>,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, base_size: Vec2) -> Self {
        Self {
            id,
            kind,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            base_size,
            scale: 1.0,
            draggable: false,
            dragging: false,
            frame: 0,
            frame_clock: 0.0,
            visible: true,
            blink: None,
            ttl: None,
        }
    }

    /// Current bounds: centered on `pos`, scaled symmetrically around it.
    /// `scale = 1` reproduces the raw bitmap-derived box.
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.base_size * self.scale)
    }

    /// Advance position by `vel * dt`.
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// Move the center to `pos`, clamped so the scaled bounds stay inside
    /// the play field. Used for drag moves; spawn placement writes `pos`
    /// directly (enemies start above the visible area).
    pub fn set_position_clamped(&mut self, pos: Vec2, field: Vec2) {
        let half = self.base_size * self.scale / 2.0;
        self.pos = Vec2::new(
            pos.x.clamp(half.x, (field.x - half.x).max(half.x)),
            pos.y.clamp(half.y, (field.y - half.y).max(half.y)),
        );
    }

    /// Advance the animation strip clock.
    pub fn animate(&mut self, dt: f32) {
        let frame_duration = 1.0 / ANIM_FPS;
        self.frame_clock += dt;
        while self.frame_clock >= frame_duration {
            self.frame_clock -= frame_duration;
            self.frame = (self.frame + 1) % ANIM_FRAME_COUNT;
        }
    }

    /// Start the blink visual: toggle visibility every `interval` seconds
    /// for `duration` seconds, then restore visibility.
    pub fn start_blinking(&mut self, duration: f32, interval: f32) {
        self.blink = Some(Blink {
            remaining: duration,
            interval,
            phase: 0.0,
        });
    }

    /// Advance the blink task, if any.
    pub fn update_blink(&mut self, dt: f32) {
        let Some(blink) = self.blink.as_mut() else {
            return;
        };
        blink.phase += dt;
        while blink.phase >= blink.interval {
            blink.phase -= blink.interval;
            self.visible = !self.visible;
        }
        blink.remaining -= dt;
        if blink.remaining <= 0.0 {
            self.visible = true;
            self.blink = None;
        }
    }

    /// Whether the blink visual is currently active.
    pub fn is_blinking(&self) -> bool {
        self.blink.is_some()
    }
}
