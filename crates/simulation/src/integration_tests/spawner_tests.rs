//! Dragging new tiles out of the inventory.

use bevy::prelude::*;

use crate::config::DRAG_PREVIEW_HEIGHT;
use crate::grid_frame::CellCoord;
use crate::interaction::{DragState, PointerEvent, PointerTarget};
use crate::inventory::{ItemCountChanged, PlaceableType};
use crate::outcome_log::Outcome;
use crate::test_harness::TestGarden;
use crate::tiles::TerrainKind;

fn begin_spawn(garden: &mut TestGarden, kind: PlaceableType, over: Vec3) -> Entity {
    garden.send_pointer(PointerEvent::Down {
        target: PointerTarget::Spawner(kind),
        pos: Vec3::ZERO,
        time: 0.0,
    });
    garden.send_pointer(PointerEvent::Move { pos: over });
    garden.tick(1);
    match garden.drag_state() {
        DragState::Spawning { preview, .. } => preview,
        other => panic!("expected a spawning drag, got {other:?}"),
    }
}

#[test]
fn spawned_tile_is_placed_and_charged() {
    let cell = CellCoord::new(1, 2);
    let mut garden = TestGarden::new();

    garden.drag_from_spawner(PlaceableType::Land, cell);

    assert_eq!(garden.tile_count(), 1);
    let tile = garden.top_of(cell).expect("tile placed");
    garden.assert_tile_at(tile, cell, 0);
    assert_eq!(garden.tile(tile).map(|t| t.terrain), Some(TerrainKind::Land));
    garden.assert_stock(PlaceableType::Land, 19);
    assert_eq!(
        garden.item_changes(),
        vec![ItemCountChanged {
            kind: PlaceableType::Land,
            count: 19
        }]
    );
    garden.assert_no_violations();
}

#[test]
fn spawned_tile_stacks_on_existing_tiles() {
    let cell = CellCoord::new(0, 0);
    let mut garden = TestGarden::new().with_stack(TerrainKind::Land, cell, 2);

    garden.drag_from_spawner(PlaceableType::River, cell);

    garden.assert_height(cell, 3);
    let top = garden.top_of(cell).unwrap();
    garden.assert_tile_at(top, cell, 2);
    garden.assert_stock(PlaceableType::River, 9);
}

#[test]
fn spawn_onto_full_stack_consumes_nothing() {
    let cell = CellCoord::new(0, 0);
    let mut garden = TestGarden::new().with_stack(TerrainKind::Land, cell, 10);

    garden.drag_from_spawner(PlaceableType::Sand, cell);
    garden.tick(1);

    garden.assert_height(cell, 10);
    assert_eq!(garden.tile_count(), 10);
    garden.assert_stock(PlaceableType::Sand, 10);
    assert!(matches!(
        garden.last_outcome(),
        Some(Outcome::Discarded {
            refunded: false,
            ..
        })
    ));
    assert!(garden.item_changes().is_empty());
}

#[test]
fn empty_stock_spawns_nothing() {
    let mut garden = TestGarden::new().with_stock(PlaceableType::Sand, 0);

    garden.drag_from_spawner(PlaceableType::Sand, CellCoord::new(0, 0));

    assert_eq!(garden.tile_count(), 0);
    assert!(garden.drag_state().is_idle());
    garden.assert_stock(PlaceableType::Sand, 0);
}

#[test]
fn preview_hovers_above_the_cell_while_dragging() {
    let mut garden = TestGarden::new();
    let preview = begin_spawn(&mut garden, PlaceableType::Land, Vec3::new(1.2, 0.0, 0.4));

    let translation = garden.transform_of(preview).unwrap().translation;
    assert!((translation - Vec3::new(1.5, DRAG_PREVIEW_HEIGHT, 0.5)).length() < 1e-5);
    // Not tracked and not paid for until released.
    assert!(!garden.grid().is_tracked(preview));
    garden.assert_stock(PlaceableType::Land, 20);
}

#[test]
fn cancelled_spawn_leaves_no_trace() {
    let mut garden = TestGarden::new();
    let preview = begin_spawn(&mut garden, PlaceableType::River, Vec3::new(0.5, 0.0, 0.5));

    garden.send_pointer(PointerEvent::Cancel);
    garden.tick(1);

    garden.assert_despawned(preview);
    assert_eq!(garden.tile_count(), 0);
    garden.assert_stock(PlaceableType::River, 10);
    assert_eq!(garden.last_outcome(), Some(&Outcome::Cancelled));
}

#[test]
fn preview_mode_blocks_spawning() {
    let mut garden = TestGarden::new();
    garden.set_preview(true);

    garden.drag_from_spawner(PlaceableType::Land, CellCoord::new(0, 0));

    assert_eq!(garden.tile_count(), 0);
    garden.assert_stock(PlaceableType::Land, 20);
}

#[test]
fn spawning_until_empty_stops_at_zero() {
    let mut garden = TestGarden::new().with_stock(PlaceableType::River, 2);

    for col in 0..4 {
        garden.drag_from_spawner(PlaceableType::River, CellCoord::new(col, 0));
    }

    assert_eq!(garden.tile_count(), 2);
    garden.assert_stock(PlaceableType::River, 0);
    garden.assert_height(CellCoord::new(2, 0), 0);
}
