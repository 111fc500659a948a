//! Spatial grid index for near-neighbor collision queries
//!
//! Buckets entities by cell so the evaluator tests O(k) local candidates
//! instead of all O(n²) pairs. The grid covers a fixed play-field extent
//! and is rebuilt from scratch every scan cycle; cells hold only indices
//! into the snapshot that was passed to [`SpatialGrid::rebuild`], valid
//! for that one cycle.
//!
//! ## Cell Size Choice
//!
//! The cell size must be at least as large as the biggest scaled sprite
//! box, so a 3×3 neighborhood is guaranteed to cover every rectangle pair
//! that can actually overlap. The default of 100 units comfortably exceeds
//! the stock sprite sizes.

use glam::Vec2;

use super::entity::Entity;

/// Fixed-extent bucket grid over the play field.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    /// Row-major `cols × rows` buckets of snapshot indices
    cells: Vec<Vec<usize>>,
}

impl SpatialGrid {
    /// Build a grid covering `width × height` with the given cell size.
    pub fn new(cell_size: f32, width: f32, height: f32) -> Self {
        let cols = (width / cell_size) as usize + 1;
        let rows = (height / cell_size) as usize + 1;
        Self {
            cell_size,
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
        }
    }

    /// Cell coordinates for a position, or `None` outside the extent.
    fn cell_of(&self, pos: Vec2) -> Option<(usize, usize)> {
        let cx = (pos.x / self.cell_size).floor();
        let cy = (pos.y / self.cell_size).floor();
        if cx < 0.0 || cy < 0.0 {
            return None;
        }
        let (cx, cy) = (cx as usize, cy as usize);
        if cx >= self.cols || cy >= self.rows {
            return None;
        }
        Some((cx, cy))
    }

    #[inline]
    fn bucket(&self, cx: usize, cy: usize) -> usize {
        cy * self.cols + cx
    }

    /// Clear all cells and reinsert every entity. Entities whose cell falls
    /// outside the extent are silently dropped from indexing for this cycle
    /// (never removed from the entity set). Allocations are retained across
    /// rebuilds.
    pub fn rebuild(&mut self, entities: &[Entity]) {
        for cell in &mut self.cells {
            cell.clear();
        }
        for (index, entity) in entities.iter().enumerate() {
            match self.cell_of(entity.pos) {
                Some((cx, cy)) => {
                    let bucket = self.bucket(cx, cy);
                    self.cells[bucket].push(index);
                }
                None => {
                    log::trace!(
                        "entity {} at ({:.1}, {:.1}) outside grid extent, not indexed",
                        entity.id,
                        entity.pos.x,
                        entity.pos.y
                    );
                }
            }
        }
    }

    /// Snapshot indices in the 3×3 block of cells centered on `pos`,
    /// clamped to the grid bounds. Results are a conservative
    /// over-approximation - callers do the exact bounds test themselves.
    pub fn neighbors(&self, pos: Vec2) -> Vec<usize> {
        let Some((cx, cy)) = self.cell_of(pos) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        for x in cx.saturating_sub(1)..=(cx + 1).min(self.cols - 1) {
            for y in cy.saturating_sub(1)..=(cy + 1).min(self.rows - 1) {
                found.extend_from_slice(&self.cells[self.bucket(x, y)]);
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Entity, EntityKind};

    fn entity_at(id: u32, x: f32, y: f32) -> Entity {
        let mut e = Entity::new(id, EntityKind::Bullet, Vec2::new(10.0, 10.0));
        e.pos = Vec2::new(x, y);
        e
    }

    #[test]
    fn test_rebuild_places_every_in_extent_entity() {
        let entities = vec![
            entity_at(1, 50.0, 50.0),
            entity_at(2, 150.0, 50.0),
            entity_at(3, 550.0, 550.0),
        ];
        let mut grid = SpatialGrid::new(100.0, 600.0, 600.0);
        grid.rebuild(&entities);

        let near_first = grid.neighbors(Vec2::new(50.0, 50.0));
        assert!(near_first.contains(&0));
        assert!(near_first.contains(&1)); // adjacent cell
        assert!(!near_first.contains(&2)); // far away
    }

    #[test]
    fn test_out_of_extent_entity_dropped_from_index() {
        let entities = vec![entity_at(1, -10.0, 50.0), entity_at(2, 5000.0, 50.0)];
        let mut grid = SpatialGrid::new(100.0, 600.0, 600.0);
        grid.rebuild(&entities);

        assert!(grid.neighbors(Vec2::new(50.0, 50.0)).is_empty());
    }

    #[test]
    fn test_neighbors_clamped_at_corner() {
        let entities = vec![entity_at(1, 10.0, 10.0), entity_at(2, 590.0, 590.0)];
        let mut grid = SpatialGrid::new(100.0, 600.0, 600.0);
        grid.rebuild(&entities);

        // Corner queries must not wrap or panic
        let origin = grid.neighbors(Vec2::new(0.0, 0.0));
        assert_eq!(origin, vec![0]);
        let far = grid.neighbors(Vec2::new(599.0, 599.0));
        assert_eq!(far, vec![1]);
    }

    #[test]
    fn test_rebuild_idempotent_for_unchanged_snapshot() {
        let entities: Vec<Entity> = (0..20)
            .map(|i| entity_at(i, (i as f32 * 37.0) % 600.0, (i as f32 * 91.0) % 600.0))
            .collect();
        let mut grid = SpatialGrid::new(100.0, 600.0, 600.0);

        grid.rebuild(&entities);
        let first: Vec<Vec<usize>> = entities.iter().map(|e| grid.neighbors(e.pos)).collect();
        grid.rebuild(&entities);
        let second: Vec<Vec<usize>> = entities.iter().map(|e| grid.neighbors(e.pos)).collect();

        assert_eq!(first, second);
    }
}
