//! Criterion benchmarks for occupancy operations.
//!
//! Benchmarks:
//!   - world_to_cell / cell_center_world conversions on a rotated frame
//!   - try_place of a tile into a half-full grid
//!   - replay_all over grids of 100, 1K and 10K tracked tiles
//!
//! Run with: cargo bench -p simulation --bench grid_bench

use std::collections::HashMap;

use bevy::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use simulation::grid_frame::{CellCoord, GridFrame};
use simulation::placement::{replay_all, try_place};
use simulation::tile_grid::TileGrid;

fn rotated_frame() -> GridFrame {
    GridFrame::from_footprint(
        Vec3::new(3.0, 0.0, -2.0),
        Quat::from_rotation_y(0.7),
        Vec3::new(1.0, 0.5, 1.0),
    )
    .expect("valid footprint")
}

/// A square of `side * side` cells, each holding `per_cell` tiles.
fn filled_grid(frame: &GridFrame, side: i32, per_cell: usize) -> (TileGrid, HashMap<Entity, Vec3>) {
    let mut grid = TileGrid::new(10);
    let mut positions = HashMap::new();
    let mut next = 1;
    for col in 0..side {
        for row in 0..side {
            for _ in 0..per_cell {
                let tile = Entity::from_raw(next);
                next += 1;
                let mut transform = frame.cell_center_world(CellCoord::new(col, row), 0);
                if try_place(&mut grid, frame, tile, &mut transform).is_ok() {
                    positions.insert(tile, transform.translation);
                }
            }
        }
    }
    (grid, positions)
}

// ---------------------------------------------------------------------------
// Benchmark: frame conversions
// ---------------------------------------------------------------------------

fn bench_frame_conversions(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_conversion");
    group.sample_size(1000);
    let frame = rotated_frame();

    group.bench_function("world_to_cell", |b| {
        b.iter(|| black_box(frame.world_to_cell(black_box(Vec3::new(12.3, 0.0, -7.9)))));
    });

    group.bench_function("cell_center_world", |b| {
        b.iter(|| black_box(frame.cell_center_world(black_box(CellCoord::new(5, -3)), 4)));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: try_place
// ---------------------------------------------------------------------------

fn bench_try_place(c: &mut Criterion) {
    let mut group = c.benchmark_group("try_place");
    let frame = rotated_frame();
    let (mut grid, _) = filled_grid(&frame, 32, 5);
    let tile = Entity::from_raw(u32::MAX - 1);

    // Re-placing the same tile is idempotent, so the grid stays at 6 high.
    group.bench_function("onto_stack_of_5", |b| {
        b.iter(|| {
            let mut transform = frame.cell_center_world(CellCoord::new(16, 16), 0);
            black_box(try_place(&mut grid, &frame, tile, &mut transform))
        });
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: replay_all
// ---------------------------------------------------------------------------

fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay_all");
    let frame = rotated_frame();

    for &(side, per_cell) in &[(10, 1), (10, 10), (50, 4)] {
        let (mut grid, positions) = filled_grid(&frame, side, per_cell);
        let tiles = grid.tracked_count();
        group.bench_with_input(BenchmarkId::new("tiles", tiles), &tiles, |b, _| {
            b.iter(|| {
                black_box(replay_all(&mut grid, &frame, |tile| {
                    positions.get(&tile).copied()
                }))
            });
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Register benchmark group
// ---------------------------------------------------------------------------

criterion_group!(benches, bench_frame_conversions, bench_try_place, bench_replay);
criterion_main!(benches);
