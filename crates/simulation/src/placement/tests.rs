#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bevy::prelude::*;

    use crate::errors::{GridError, RecycleRefusal};
    use crate::grid_frame::{CellCoord, GridFrame};
    use crate::inventory::{ItemStock, PlaceableType};
    use crate::placement::{recycle, replay_all, try_place};
    use crate::tile_grid::TileGrid;
    use crate::tiles::{PlantSlot, TerrainKind};

    /// Records calls instead of keeping real counts.
    #[derive(Default)]
    struct CountingStock {
        returned: Vec<PlaceableType>,
    }

    impl ItemStock for CountingStock {
        fn can_create(&self, _kind: PlaceableType) -> bool {
            true
        }
        fn use_item(&mut self, _kind: PlaceableType) -> bool {
            true
        }
        fn return_item(&mut self, kind: PlaceableType) -> bool {
            self.returned.push(kind);
            true
        }
        fn count(&self, _kind: PlaceableType) -> u32 {
            0
        }
    }

    fn frame(planar: f32) -> GridFrame {
        GridFrame::from_footprint(Vec3::ZERO, Quat::IDENTITY, Vec3::new(planar, 0.5, planar))
            .unwrap()
    }

    // -------------------------------------------------------------------------
    // try_place
    // -------------------------------------------------------------------------

    #[test]
    fn try_place_uses_current_position() {
        let f = frame(2.0);
        let mut grid = TileGrid::default();
        let tile = Entity::from_raw(1);
        let mut transform = Transform::from_xyz(3.5, 0.0, -1.2);

        let placed = try_place(&mut grid, &f, tile, &mut transform).unwrap();
        assert_eq!(placed.cell, CellCoord::new(1, -1));
        assert_eq!(placed.level, 0);
        assert!((transform.translation - Vec3::new(3.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn try_place_twice_keeps_level_and_count() {
        let f = frame(1.0);
        let mut grid = TileGrid::default();
        let (a, b) = (Entity::from_raw(1), Entity::from_raw(2));
        let mut ta = Transform::from_xyz(0.4, 0.0, 0.4);
        let mut tb = Transform::from_xyz(0.6, 0.0, 0.6);
        try_place(&mut grid, &f, a, &mut ta).unwrap();
        let first = try_place(&mut grid, &f, b, &mut tb).unwrap();
        let second = try_place(&mut grid, &f, b, &mut tb).unwrap();

        assert_eq!(first, second);
        assert_eq!(grid.tracked_count(), 2);
    }

    #[test]
    fn eleventh_tile_overflows_default_cap() {
        let f = frame(1.0);
        let mut grid = TileGrid::default();
        for i in 0..10 {
            let mut t = Transform::from_xyz(0.5, 0.0, 0.5);
            try_place(&mut grid, &f, Entity::from_raw(i + 1), &mut t).unwrap();
        }
        let extra = Entity::from_raw(99);
        let mut t = Transform::from_xyz(0.5, 0.0, 0.5);
        let err = try_place(&mut grid, &f, extra, &mut t).unwrap_err();
        assert!(matches!(err, GridError::StackOverflow { max: 10, .. }));
        assert!(!grid.is_tracked(extra));
        assert_eq!(grid.height_at(CellCoord::new(0, 0)), 10);
    }

    // -------------------------------------------------------------------------
    // replay_all
    // -------------------------------------------------------------------------

    #[test]
    fn replay_preserves_stacks_after_rotation() {
        let mut f = frame(1.0);
        let mut grid = TileGrid::default();
        let mut transforms: HashMap<Entity, Transform> = HashMap::new();
        let positions = [
            (0.5, 0.5),
            (0.5, 0.5),
            (2.5, 0.5),
            (2.5, 0.5),
            (-1.5, 3.5),
        ];
        for (i, (x, z)) in positions.iter().enumerate() {
            let tile = Entity::from_raw(i as u32 + 1);
            let mut t = Transform::from_xyz(*x, 0.0, *z);
            try_place(&mut grid, &f, tile, &mut t).unwrap();
            transforms.insert(tile, t);
        }
        let before = grid.snapshot();

        // Rotate frame and tiles rigidly about the origin.
        let delta = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        f.rotate(delta);
        for t in transforms.values_mut() {
            t.rotate_around(Vec3::ZERO, delta);
        }

        let report = replay_all(&mut grid, &f, |e| transforms.get(&e).map(|t| t.translation));
        assert_eq!(report.replaced, 5);
        assert!(report.evicted.is_empty());
        assert_eq!(grid.snapshot(), before);
        assert!(grid.check_invariants().is_empty());
    }

    #[test]
    fn replay_drops_entities_without_position() {
        let f = frame(1.0);
        let mut grid = TileGrid::default();
        let (a, b) = (Entity::from_raw(1), Entity::from_raw(2));
        grid.place(&f, a, CellCoord::new(0, 0), None).unwrap();
        grid.place(&f, b, CellCoord::new(0, 0), None).unwrap();

        let report = replay_all(&mut grid, &f, |e| {
            (e == b).then(|| Vec3::new(0.5, 0.5, 0.5))
        });
        assert_eq!(report.stale, vec![a]);
        assert_eq!(grid.stack(CellCoord::new(0, 0)).unwrap().as_slice(), &[b]);
    }

    #[test]
    fn replay_evicts_when_tiles_collapse_into_full_cell() {
        let f = frame(1.0);
        let mut grid = TileGrid::new(2);
        let tiles: Vec<Entity> = (1..=3).map(Entity::from_raw).collect();
        grid.place(&f, tiles[0], CellCoord::new(0, 0), None).unwrap();
        grid.place(&f, tiles[1], CellCoord::new(0, 0), None).unwrap();
        grid.place(&f, tiles[2], CellCoord::new(1, 0), None).unwrap();

        // Everything now reports a position inside cell (0, 0).
        let report = replay_all(&mut grid, &f, |_| Some(Vec3::new(0.5, 0.0, 0.5)));
        assert_eq!(report.replaced, 2);
        assert_eq!(report.evicted, vec![(tiles[2], CellCoord::new(0, 0))]);
        assert!(grid.check_invariants().is_empty());
    }

    // -------------------------------------------------------------------------
    // recycle
    // -------------------------------------------------------------------------

    #[test]
    fn recycle_refused_while_crop_planted() {
        let f = frame(1.0);
        let mut grid = TileGrid::default();
        let mut stock = CountingStock::default();
        let tile = Entity::from_raw(1);
        grid.place(&f, tile, CellCoord::new(0, 0), None).unwrap();

        let mut slot = PlantSlot::default();
        slot.try_occupy(TerrainKind::Land, Entity::from_raw(50)).unwrap();

        let err = recycle(&mut grid, &mut stock, tile, PlaceableType::Land, &slot).unwrap_err();
        assert_eq!(err, GridError::RecycleRefused(RecycleRefusal::CropPlanted));
        assert!(grid.is_tracked(tile));
        assert!(stock.returned.is_empty());

        slot.clear();
        let cell = recycle(&mut grid, &mut stock, tile, PlaceableType::Land, &slot).unwrap();
        assert_eq!(cell, Some(CellCoord::new(0, 0)));
        assert!(!grid.is_tracked(tile));
        assert_eq!(stock.returned, vec![PlaceableType::Land]);
    }

    #[test]
    fn recycle_refused_below_top() {
        let f = frame(1.0);
        let mut grid = TileGrid::default();
        let mut stock = CountingStock::default();
        let (a, b) = (Entity::from_raw(1), Entity::from_raw(2));
        grid.place(&f, a, CellCoord::new(0, 0), None).unwrap();
        grid.place(&f, b, CellCoord::new(0, 0), None).unwrap();

        let err = recycle(&mut grid, &mut stock, a, PlaceableType::Sand, &PlantSlot::default())
            .unwrap_err();
        assert_eq!(err, GridError::RecycleRefused(RecycleRefusal::NotTopTile));
        assert_eq!(grid.height_at(CellCoord::new(0, 0)), 2);
        assert!(stock.returned.is_empty());
    }

    #[test]
    fn recycle_untracked_tile_still_returns_item() {
        let mut grid = TileGrid::default();
        let mut stock = CountingStock::default();
        let cell = recycle(
            &mut grid,
            &mut stock,
            Entity::from_raw(3),
            PlaceableType::River,
            &PlantSlot::default(),
        )
        .unwrap();
        assert_eq!(cell, None);
        assert_eq!(stock.returned, vec![PlaceableType::River]);
    }
}
