//! Assertion helpers for `TestGarden` integration tests.

use bevy::prelude::*;

use crate::grid_frame::CellCoord;
use crate::inventory::PlaceableType;

use super::TestGarden;

impl TestGarden {
    // -----------------------------------------------------------------------
    // Assertions
    // -----------------------------------------------------------------------

    pub fn assert_height(&self, cell: CellCoord, expected: usize) {
        let height = self.height_at(cell);
        assert_eq!(
            height, expected,
            "Expected stack height {expected} at {cell}, got {height}"
        );
    }

    pub fn assert_stock(&self, kind: PlaceableType, expected: u32) {
        let count = self.stock(kind);
        assert_eq!(count, expected, "Expected {expected} {kind:?} in stock, got {count}");
    }

    /// Assert that `tile` is tracked at `cell` on `level` and that its
    /// transform sits at the matching world position.
    pub fn assert_tile_at(&self, tile: Entity, cell: CellCoord, level: usize) {
        let grid = self.grid();
        assert_eq!(
            grid.cell_of(tile),
            Some(cell),
            "Expected {tile:?} tracked at {cell}"
        );
        assert_eq!(
            grid.level_of(tile),
            Some(level),
            "Expected {tile:?} on level {level}"
        );
        let Some(frame) = self.frame() else {
            panic!("garden has no grid frame");
        };
        let expected = frame.cell_center_world(cell, level).translation;
        let actual = self
            .transform_of(tile)
            .unwrap_or_else(|| panic!("{tile:?} has no transform"))
            .translation;
        assert!(
            (actual - expected).length() < 1e-3,
            "Expected {tile:?} at {expected}, found {actual}"
        );
    }

    pub fn assert_top(&self, tile: Entity) {
        assert!(self.grid().is_top(tile), "Expected {tile:?} on top");
    }

    pub fn assert_not_top(&self, tile: Entity) {
        assert!(!self.grid().is_top(tile), "Expected {tile:?} to be covered");
    }

    pub fn assert_despawned(&self, entity: Entity) {
        assert!(!self.exists(entity), "Expected {entity:?} to be despawned");
        assert!(
            !self.grid().is_tracked(entity),
            "Despawned {entity:?} is still tracked"
        );
    }

    /// Runs one tick so the PostSim validators see the current state.
    pub fn assert_no_violations(&mut self) {
        self.tick(1);
        let violations = self.violations();
        assert_eq!(
            violations.total, 0,
            "Expected no invariant violations, got {violations:?}"
        );
    }
}
