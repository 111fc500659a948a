//! Collision detection over the spatial grid
//!
//! One scan cycle rebuilds the grid from an entity snapshot, then tests
//! every entity against its 3×3 neighborhood with axis-aligned rectangle
//! intersection on the scaled bounds. Only two ordered type pairs produce
//! events - (Player, Enemy) and (Bullet, Enemy) - everything else is inert.
//!
//! The evaluator never mutates game state: hits are reported through a
//! [`CollisionListener`], and the stock listener just forwards them over a
//! channel for the simulation step to resolve on its next tick. Events are
//! not deduplicated across cycles; the resolution logic is responsible for
//! idempotence (invincibility window, one-shot bullet consumption).

use crossbeam_channel::Sender;

use super::entity::{Entity, EntityId, EntityKind};
use super::grid::SpatialGrid;

/// A candidate collision reported by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEvent {
    PlayerEnemy { player: EntityId, enemy: EntityId },
    BulletEnemy { bullet: EntityId, enemy: EntityId },
}

/// Receiver of collision reports, invoked synchronously from the
/// evaluator's execution context.
pub trait CollisionListener: Send {
    fn on_player_enemy(&mut self, player: EntityId, enemy: EntityId);
    fn on_bullet_enemy(&mut self, bullet: EntityId, enemy: EntityId);
}

/// Listener that funnels events over a channel to the simulation step.
pub struct ChannelListener {
    tx: Sender<CollisionEvent>,
}

impl ChannelListener {
    pub fn new(tx: Sender<CollisionEvent>) -> Self {
        Self { tx }
    }
}

impl CollisionListener for ChannelListener {
    fn on_player_enemy(&mut self, player: EntityId, enemy: EntityId) {
        // Ignore send errors on shutdown
        let _ = self.tx.send(CollisionEvent::PlayerEnemy { player, enemy });
    }

    fn on_bullet_enemy(&mut self, bullet: EntityId, enemy: EntityId) {
        let _ = self.tx.send(CollisionEvent::BulletEnemy { bullet, enemy });
    }
}

/// Run one scan cycle: rebuild the grid from `entities` and report every
/// intersecting pair of interest exactly once.
pub fn scan(entities: &[Entity], grid: &mut SpatialGrid, listener: &mut dyn CollisionListener) {
    grid.rebuild(entities);
    for (i, a) in entities.iter().enumerate() {
        for j in grid.neighbors(a.pos) {
            // Each unordered pair once per cycle; also excludes self
            if j <= i {
                continue;
            }
            let b = &entities[j];
            if a.bounds().intersects(&b.bounds()) {
                classify(a, b, listener);
            }
        }
    }
}

/// Map an intersecting pair onto listener calls by ordered type pair.
fn classify(a: &Entity, b: &Entity, listener: &mut dyn CollisionListener) {
    match (a.kind, b.kind) {
        (EntityKind::Player, EntityKind::Enemy(_)) => listener.on_player_enemy(a.id, b.id),
        (EntityKind::Enemy(_), EntityKind::Player) => listener.on_player_enemy(b.id, a.id),
        (EntityKind::Bullet, EntityKind::Enemy(_)) => listener.on_bullet_enemy(a.id, b.id),
        (EntityKind::Enemy(_), EntityKind::Bullet) => listener.on_bullet_enemy(b.id, a.id),
        // Explosions and same-type pairs are inert
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EnemyClass;
    use glam::Vec2;

    struct Recorder(Vec<CollisionEvent>);

    impl CollisionListener for Recorder {
        fn on_player_enemy(&mut self, player: EntityId, enemy: EntityId) {
            self.0.push(CollisionEvent::PlayerEnemy { player, enemy });
        }
        fn on_bullet_enemy(&mut self, bullet: EntityId, enemy: EntityId) {
            self.0.push(CollisionEvent::BulletEnemy { bullet, enemy });
        }
    }

    fn entity(id: u32, kind: EntityKind, x: f32, y: f32) -> Entity {
        let mut e = Entity::new(id, kind, Vec2::new(40.0, 40.0));
        e.pos = Vec2::new(x, y);
        e
    }

    fn scan_events(entities: &[Entity]) -> Vec<CollisionEvent> {
        let mut grid = SpatialGrid::new(100.0, 1000.0, 1000.0);
        let mut recorder = Recorder(Vec::new());
        scan(entities, &mut grid, &mut recorder);
        recorder.0
    }

    #[test]
    fn test_player_enemy_overlap_reported_once() {
        let entities = vec![
            entity(1, EntityKind::Player, 100.0, 100.0),
            entity(2, EntityKind::Enemy(EnemyClass::Red), 110.0, 100.0),
        ];
        let events = scan_events(&entities);
        assert_eq!(
            events,
            vec![CollisionEvent::PlayerEnemy { player: 1, enemy: 2 }]
        );
    }

    #[test]
    fn test_roles_fixed_regardless_of_order() {
        // Enemy listed before player: roles in the event must not swap
        let entities = vec![
            entity(2, EntityKind::Enemy(EnemyClass::Red), 110.0, 100.0),
            entity(1, EntityKind::Player, 100.0, 100.0),
        ];
        let events = scan_events(&entities);
        assert_eq!(
            events,
            vec![CollisionEvent::PlayerEnemy { player: 1, enemy: 2 }]
        );
    }

    #[test]
    fn test_bullet_enemy_reported() {
        let entities = vec![
            entity(5, EntityKind::Bullet, 300.0, 300.0),
            entity(6, EntityKind::Enemy(EnemyClass::Green), 310.0, 310.0),
        ];
        let events = scan_events(&entities);
        assert_eq!(
            events,
            vec![CollisionEvent::BulletEnemy { bullet: 5, enemy: 6 }]
        );
    }

    #[test]
    fn test_inert_pairs_produce_no_events() {
        let entities = vec![
            entity(1, EntityKind::Enemy(EnemyClass::Red), 100.0, 100.0),
            entity(2, EntityKind::Enemy(EnemyClass::Blue), 105.0, 100.0),
            entity(3, EntityKind::Explosion, 102.0, 100.0),
            entity(4, EntityKind::Player, 104.0, 102.0),
            entity(5, EntityKind::Bullet, 101.0, 101.0),
        ];
        let events = scan_events(&entities);
        // Player-enemy ×2 and bullet-enemy ×2; player-bullet, enemy-enemy
        // and everything touching the explosion stay silent
        assert_eq!(events.len(), 4);
        assert!(events.iter().all(|e| matches!(
            e,
            CollisionEvent::PlayerEnemy { .. } | CollisionEvent::BulletEnemy { .. }
        )));
    }

    #[test]
    fn test_neighboring_cells_detected() {
        // Pair straddling a cell border: grid must still pair them up
        let entities = vec![
            entity(1, EntityKind::Bullet, 95.0, 50.0),
            entity(2, EntityKind::Enemy(EnemyClass::Red), 105.0, 50.0),
        ];
        let events = scan_events(&entities);
        assert_eq!(
            events,
            vec![CollisionEvent::BulletEnemy { bullet: 1, enemy: 2 }]
        );
    }

    #[test]
    fn test_separated_pair_not_reported() {
        let entities = vec![
            entity(1, EntityKind::Player, 100.0, 100.0),
            entity(2, EntityKind::Enemy(EnemyClass::Red), 100.0, 160.0),
        ];
        assert!(scan_events(&entities).is_empty());
    }
}
