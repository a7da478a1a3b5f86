//! Integration tests for the tile grid using the `TestGarden` harness.
//!
//! These tests spin up a headless Bevy App with `SimulationPlugin`, feed it
//! pointer and rotation events, and verify the resulting occupancy, stock and
//! outcome log across all systems working together.

mod spawner_tests;

use crate::game_params::GridParams;
use crate::grid_frame::CellCoord;
use crate::inventory::PlaceableType;
use crate::test_harness::TestGarden;
use crate::tiles::TerrainKind;

// ===========================================================================
// 1. Harness bootstrap tests
// ===========================================================================

#[test]
fn empty_garden_has_no_tiles() {
    let mut garden = TestGarden::new();
    assert_eq!(garden.tile_count(), 0);
    assert_eq!(garden.grid().tracked_count(), 0);
    assert!(garden.frame().is_some());
}

#[test]
fn default_stock_is_seeded_from_params() {
    let garden = TestGarden::new();
    garden.assert_stock(PlaceableType::Land, 20);
    garden.assert_stock(PlaceableType::River, 10);
    garden.assert_stock(PlaceableType::Sand, 10);
    garden.assert_stock(PlaceableType::Corn, 5);
    garden.assert_stock(PlaceableType::Wheat, 5);
}

#[test]
fn tick_advances_counter() {
    let mut garden = TestGarden::new();
    let before = garden.tick_count();
    garden.tick(5);
    assert_eq!(garden.tick_count(), before + 5);
}

#[test]
fn degenerate_footprint_disables_placement() {
    let mut garden = TestGarden::with_params(GridParams {
        tile_footprint: [0.0, 0.5, 1.0],
        ..GridParams::default()
    });
    assert!(garden.frame().is_none());

    // Pointer input is not processed without a frame; nothing is consumed.
    garden.drag_from_spawner(PlaceableType::Land, CellCoord::new(0, 0));
    assert_eq!(garden.tile_count(), 0);
    garden.assert_stock(PlaceableType::Land, 20);
}

// ===========================================================================
// 2. Builder sanity
// ===========================================================================

#[test]
fn with_stack_builds_levels_bottom_up() {
    let cell = CellCoord::new(2, -1);
    let garden = TestGarden::new().with_stack(TerrainKind::Sand, cell, 3);
    garden.assert_height(cell, 3);
    let stack = garden.stack_at(cell);
    for (level, tile) in stack.iter().enumerate() {
        garden.assert_tile_at(*tile, cell, level);
    }
    garden.assert_top(stack[2]);
    garden.assert_not_top(stack[0]);
}

#[test]
fn builder_layout_passes_invariant_checks() {
    let mut garden = TestGarden::new()
        .with_stack(TerrainKind::Land, CellCoord::new(0, 0), 4)
        .with_stack(TerrainKind::River, CellCoord::new(1, 0), 2);
    garden.assert_no_violations();
}
