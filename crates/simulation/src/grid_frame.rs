//! The grid frame: a rotatable, movable local coordinate system that all
//! cell math is relative to.
//!
//! Cells live in the frame's local XZ plane. A world position maps to a cell
//! by moving it into local space and floor-dividing by the planar cell size,
//! so negative coordinates land in negative cells.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::FRAME_EPSILON;
use crate::errors::GridError;

// ---------------------------------------------------------------------------
// CellCoord
// ---------------------------------------------------------------------------

/// Integer (column, row) of one cell in the frame's local XZ plane.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct CellCoord {
    pub col: i32,
    pub row: i32,
}

impl CellCoord {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

// ---------------------------------------------------------------------------
// GridFrame
// ---------------------------------------------------------------------------

/// Origin, rotation and cell dimensions of the grid.
///
/// Only [`GridFrame::from_footprint`] builds one, and it rejects degenerate
/// dimensions, so every method here can divide by `planar_size` freely.
/// The rotation is the only thing that changes after construction.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GridFrame {
    origin: Vec3,
    rotation: Quat,
    planar_size: f32,
    stack_height: f32,
}

impl GridFrame {
    /// Build a frame from a tile footprint: `footprint.x` is the planar cell
    /// size, `footprint.y` the height of one stack level.
    pub fn from_footprint(origin: Vec3, rotation: Quat, footprint: Vec3) -> Result<Self, GridError> {
        let planar_size = footprint.x;
        let stack_height = footprint.y;
        // Written so NaN fails too.
        if !(planar_size > FRAME_EPSILON && stack_height > FRAME_EPSILON) {
            return Err(GridError::DegenerateFrame {
                planar_size,
                stack_height,
            });
        }
        Ok(Self {
            origin,
            rotation: rotation.normalize(),
            planar_size,
            stack_height,
        })
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn planar_size(&self) -> f32 {
        self.planar_size
    }

    pub fn stack_height(&self) -> f32 {
        self.stack_height
    }

    /// The frame's local +Y axis in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Rotate the frame about its origin. Callers must replay placement
    /// afterwards so occupancy follows the new orientation.
    pub fn rotate(&mut self, delta: Quat) {
        self.rotation = (delta * self.rotation).normalize();
    }

    pub fn to_local(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * (world - self.origin)
    }

    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.origin + self.rotation * local
    }

    /// Cell containing `world`.
    pub fn world_to_cell(&self, world: Vec3) -> CellCoord {
        let local = self.to_local(world);
        CellCoord {
            col: (local.x / self.planar_size).floor() as i32,
            row: (local.z / self.planar_size).floor() as i32,
        }
    }

    fn cell_center_local(&self, cell: CellCoord, local_y: f32) -> Vec3 {
        let half = self.planar_size / 2.0;
        Vec3::new(
            cell.col as f32 * self.planar_size + half,
            local_y,
            cell.row as f32 * self.planar_size + half,
        )
    }

    /// Center of the cell under `world`, keeping its local height.
    pub fn snap(&self, world: Vec3) -> Vec3 {
        let local_y = self.to_local(world).y;
        self.snap_with_height(world, local_y)
    }

    /// Center of the cell under `world` at an explicit local height.
    pub fn snap_with_height(&self, world: Vec3, local_y: f32) -> Vec3 {
        let cell = self.world_to_cell(world);
        self.to_world(self.cell_center_local(cell, local_y))
    }

    /// Authoritative resting transform of the tile at `level` in `cell`.
    /// The rotation always matches the frame.
    pub fn cell_center_world(&self, cell: CellCoord, level: usize) -> Transform {
        let local = self.cell_center_local(cell, level as f32 * self.stack_height);
        Transform::from_translation(self.to_world(local)).with_rotation(self.rotation)
    }

    /// Point where `ray` hits the plane through the origin spanned by the
    /// frame's local X and Z axes.
    pub fn drag_plane_hit(&self, ray: Ray3d) -> Option<Vec3> {
        let normal = Dir3::new(self.up()).ok()?;
        let distance = ray.intersect_plane(self.origin, InfinitePlane3d { normal })?;
        Some(ray.get_point(distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn frame(planar: f32) -> GridFrame {
        GridFrame::from_footprint(Vec3::ZERO, Quat::IDENTITY, Vec3::new(planar, 0.5, planar))
            .unwrap()
    }

    #[test]
    fn maps_positive_and_negative_coordinates() {
        let f = frame(2.0);
        assert_eq!(f.world_to_cell(Vec3::new(3.5, 0.0, -1.2)), CellCoord::new(1, -1));
        assert_eq!(f.world_to_cell(Vec3::new(0.0, 7.0, 0.0)), CellCoord::new(0, 0));
        assert_eq!(f.world_to_cell(Vec3::new(-0.01, 0.0, 1.99)), CellCoord::new(-1, 0));
    }

    #[test]
    fn snap_keeps_height_and_centers_cell() {
        let f = frame(2.0);
        let snapped = f.snap(Vec3::new(3.5, 0.7, -1.2));
        assert!((snapped - Vec3::new(3.0, 0.7, -1.0)).length() < 1e-5);
    }

    #[test]
    fn snap_with_height_overrides_local_y() {
        let f = frame(1.0);
        let snapped = f.snap_with_height(Vec3::new(0.2, 5.0, 0.9), 0.1);
        assert!((snapped - Vec3::new(0.5, 0.1, 0.5)).length() < 1e-5);
    }

    #[test]
    fn cell_center_world_stacks_by_level() {
        let f = frame(1.0);
        let t = f.cell_center_world(CellCoord::new(2, 3), 4);
        assert!((t.translation - Vec3::new(2.5, 2.0, 3.5)).length() < 1e-5);
        assert_eq!(t.rotation, Quat::IDENTITY);
    }

    #[test]
    fn rotated_and_translated_frame_round_trips_cells() {
        let f = GridFrame::from_footprint(
            Vec3::new(10.0, 0.0, -4.0),
            Quat::from_rotation_y(FRAC_PI_2),
            Vec3::new(1.0, 0.5, 1.0),
        )
        .unwrap();
        let cell = CellCoord::new(-3, 5);
        let center = f.cell_center_world(cell, 2);
        assert_eq!(f.world_to_cell(center.translation), cell);
        assert!((f.to_local(center.translation).y - 1.0).abs() < 1e-5);
        assert_eq!(center.rotation, f.rotation());
    }

    #[test]
    fn rotate_moves_cells_with_the_frame() {
        let mut f = frame(1.0);
        let before = f.cell_center_world(CellCoord::new(1, 0), 0).translation;
        f.rotate(Quat::from_rotation_y(FRAC_PI_2));
        // A point rotated rigidly with the frame stays in its cell.
        let moved = Quat::from_rotation_y(FRAC_PI_2) * before;
        assert_eq!(f.world_to_cell(moved), CellCoord::new(1, 0));
    }

    #[test]
    fn degenerate_footprints_are_rejected() {
        for footprint in [
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(1.0, 0.0005, 1.0),
            Vec3::new(-2.0, 1.0, 1.0),
            Vec3::new(f32::NAN, 1.0, 1.0),
        ] {
            let err = GridFrame::from_footprint(Vec3::ZERO, Quat::IDENTITY, footprint).unwrap_err();
            assert!(matches!(err, GridError::DegenerateFrame { .. }));
        }
    }

    #[test]
    fn drag_plane_hit_projects_ray_onto_grid_plane() {
        let f = frame(1.0);
        let ray = Ray3d {
            origin: Vec3::new(2.0, 10.0, 3.0),
            direction: Dir3::NEG_Y,
        };
        let hit = f.drag_plane_hit(ray).unwrap();
        assert!((hit - Vec3::new(2.0, 0.0, 3.0)).length() < 1e-5);

        let parallel = Ray3d {
            origin: Vec3::new(0.0, 1.0, 0.0),
            direction: Dir3::X,
        };
        assert!(f.drag_plane_hit(parallel).is_none());
    }
}
