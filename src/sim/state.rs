//! Game state and spawn operations
//!
//! All mutable run state lives here, owned and mutated exclusively by the
//! simulation step (the evaluator only ever reports candidate collisions).
//! Spawn randomness flows through a seeded PCG so runs are reproducible.

use std::sync::Arc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::{EnemyClass, Entity, EntityId, EntityKind};
use crate::config::GameConfig;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the first drag input
    NotStarted,
    /// Active gameplay
    Playing,
    /// Level cap exceeded; terminal
    Won,
    /// HP exhausted; terminal
    Lost,
}

impl GamePhase {
    /// Won and Lost are terminal: motion freezes and only the delayed
    /// game-end report still runs.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Complete game state
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// The entity set: sole owner of all live entities, in insertion order
    pub entities: Vec<Entity>,
    /// Id of the player entity (always present)
    pub player_id: EntityId,
    /// Score (monotonic)
    pub score: u32,
    /// Current level, 1-based
    pub level: u32,
    /// Score needed for the next level-up
    pub next_level_score: u32,
    /// Player hit points
    pub player_hp: i32,
    pub phase: GamePhase,
    /// Simulation clock (seconds since start)
    pub time: f32,
    /// Background scroll offset, wraps modulo the background height
    pub background_offset: f32,
    /// Sim time of the last registered player hit
    pub last_hit_time: Option<f32>,
    /// Sim time of the last fired bullet
    pub last_bullet_time: Option<f32>,
    /// Accumulator for the enemy-spawn scheduled task
    pub spawn_clock: f32,
    /// Countdown to the game-end callback once a terminal phase is reached
    pub end_delay: Option<f32>,
    /// Whether the game-end report has been emitted
    pub end_reported: bool,
    next_id: EntityId,
}

impl GameState {
    /// Create a fresh run: player centered on the play field, draggable.
    pub fn new(seed: u64, config: &GameConfig) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            entities: Vec::new(),
            player_id: 0,
            score: 0,
            level: 1,
            next_level_score: config.level_step,
            player_hp: config.starting_hp,
            phase: GamePhase::NotStarted,
            time: 0.0,
            background_offset: 0.0,
            last_hit_time: None,
            last_bullet_time: None,
            spawn_clock: 0.0,
            end_delay: None,
            end_reported: false,
            next_id: 1,
        };

        let id = state.next_entity_id();
        let mut player = Entity::new(id, EntityKind::Player, config.player_size);
        player.pos = Vec2::new(config.screen_width / 2.0, config.screen_height / 2.0);
        player.scale = config.player_scale;
        player.draggable = true;
        state.entities.push(player);
        state.player_id = id;

        state
    }

    /// Allocate a new entity id
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn find(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn find_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Remove an entity by id. Returns the removed entity, or `None` if a
    /// stale collision event already consumed it.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    pub fn enemy_count(&self) -> usize {
        self.entities.iter().filter(|e| e.kind.is_enemy()).count()
    }

    /// Random horizontal placement for an enemy of the given width:
    /// center x such that the box stays within `[0, screen_width]`.
    pub fn random_enemy_x(&mut self, config: &GameConfig, width: f32) -> f32 {
        let span = (config.screen_width - width).max(0.0);
        self.rng.random_range(0.0..=span) + width / 2.0
    }

    /// Spawn a level-weighted random enemy above the visible area.
    /// Roll `uniform[1, level]`: 2 → Blue, 3 → Green, anything else → Red.
    pub fn spawn_enemy(&mut self, config: &GameConfig) {
        let class = match self.rng.random_range(1..=self.level.max(1)) {
            2 => EnemyClass::Blue,
            3 => EnemyClass::Green,
            _ => EnemyClass::Red,
        };
        let id = self.next_entity_id();
        let mut enemy = Entity::new(id, EntityKind::Enemy(class), config.enemy_size);
        let x = self.random_enemy_x(config, config.enemy_size.x);
        enemy.pos = Vec2::new(x, -config.enemy_size.y);
        enemy.vel = Vec2::new(0.0, class.base_speed() * self.level as f32);
        log::debug!("spawn enemy {} ({:?}) at x={:.0}", id, class, x);
        self.entities.push(enemy);
    }

    /// Spawn a bullet one player-height above the player's center, moving up.
    pub fn spawn_bullet(&mut self, config: &GameConfig) {
        let Some(player) = self.find(self.player_id) else {
            return;
        };
        let origin = Vec2::new(player.pos.x, player.pos.y - player.bounds().height());
        let id = self.next_entity_id();
        let mut bullet = Entity::new(id, EntityKind::Bullet, config.bullet_size);
        bullet.pos = origin;
        bullet.vel = Vec2::new(0.0, -config.bullet_speed);
        self.entities.push(bullet);
    }

    /// Spawn a stationary explosion at `pos`, expiring after the configured
    /// lifetime.
    pub fn spawn_explosion(&mut self, config: &GameConfig, pos: Vec2) {
        let id = self.next_entity_id();
        let mut explosion = Entity::new(id, EntityKind::Explosion, config.explosion_size);
        explosion.pos = pos;
        explosion.ttl = Some(config.explosion_ttl);
        self.entities.push(explosion);
    }

    /// Copy-on-write snapshot of the entity set for the evaluator and the
    /// render sink.
    pub fn snapshot(&self) -> Arc<Vec<Entity>> {
        Arc::new(self.entities.clone())
    }
}
