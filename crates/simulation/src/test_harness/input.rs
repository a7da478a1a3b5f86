//! Pointer and rotation input helpers. Each gesture helper sends its events
//! and runs one tick so the result is visible immediately.

use bevy::prelude::*;

use crate::grid_frame::CellCoord;
use crate::grid_rotation::{RotationDirection, RotationInput};
use crate::interaction::{PointerEvent, PointerTarget};
use crate::interaction_mode::InteractionMode;
use crate::inventory::PlaceableType;

use super::TestGarden;

impl TestGarden {
    // -----------------------------------------------------------------------
    // Raw events
    // -----------------------------------------------------------------------

    pub fn send_pointer(&mut self, event: PointerEvent) {
        self.world_mut().send_event(event);
    }

    pub fn send_rotation(&mut self, input: RotationInput) {
        self.world_mut().send_event(input);
    }

    pub fn set_preview(&mut self, preview: bool) {
        self.world_mut()
            .resource_mut::<InteractionMode>()
            .set_preview(preview);
    }

    // -----------------------------------------------------------------------
    // Gestures
    // -----------------------------------------------------------------------

    /// Press on `tile` at `time` without releasing.
    pub fn press_tile(&mut self, tile: Entity, time: f32) {
        let pos = self.transform_of(tile).map_or(Vec3::ZERO, |t| t.translation);
        self.send_pointer(PointerEvent::Down {
            target: PointerTarget::Tile(tile),
            pos,
            time,
        });
        self.tick(1);
    }

    /// Press and release on `tile` without moving.
    pub fn click_tile(&mut self, tile: Entity, time: f32) {
        let pos = self.transform_of(tile).map_or(Vec3::ZERO, |t| t.translation);
        self.send_pointer(PointerEvent::Down {
            target: PointerTarget::Tile(tile),
            pos,
            time,
        });
        self.send_pointer(PointerEvent::Up { pos });
        self.tick(1);
    }

    /// Two clicks on `tile` `gap` seconds apart.
    pub fn double_click_tile(&mut self, tile: Entity, time: f32, gap: f32) {
        self.click_tile(tile, time);
        self.click_tile(tile, time + gap);
    }

    /// Drag `tile` over the center of `cell` and release it there.
    pub fn drag_tile_to(&mut self, tile: Entity, cell: CellCoord, time: f32) {
        let to = self.cell_center(cell);
        self.press_tile(tile, time);
        self.send_pointer(PointerEvent::Move { pos: to });
        self.send_pointer(PointerEvent::Up { pos: to });
        self.tick(1);
    }

    /// Drag `kind` out of the inventory and release it over `cell`.
    pub fn drag_from_spawner(&mut self, kind: PlaceableType, cell: CellCoord) {
        let to = self.cell_center(cell);
        self.send_pointer(PointerEvent::Down {
            target: PointerTarget::Spawner(kind),
            pos: Vec3::ZERO,
            time: 0.0,
        });
        self.send_pointer(PointerEvent::Move { pos: to });
        self.send_pointer(PointerEvent::Up { pos: to });
        self.tick(1);
    }

    pub fn click_crop(&mut self, crop: Entity) {
        self.send_pointer(PointerEvent::Down {
            target: PointerTarget::Crop(crop),
            pos: Vec3::ZERO,
            time: 0.0,
        });
        self.send_pointer(PointerEvent::Up { pos: Vec3::ZERO });
        self.tick(1);
    }

    /// Rotate by a fixed angle and let the replay run.
    pub fn rotate_step(&mut self, degrees: f32) {
        self.send_rotation(RotationInput::Step { degrees });
        self.tick(1);
    }

    /// Hold a rotate input for `ticks` ticks, then release it.
    pub fn hold_rotation(&mut self, direction: RotationDirection, ticks: u32) {
        self.send_rotation(RotationInput::Begin { direction });
        self.tick(ticks);
        self.send_rotation(RotationInput::End);
        self.tick(1);
    }
}
