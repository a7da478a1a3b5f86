use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::config::DRAG_PREVIEW_HEIGHT;
use crate::crops::{self, Crop, CropHarvested, HarvestTally};
use crate::errors::{GridError, RecycleRefusal};
use crate::grid_frame::GridFrame;
use crate::interaction_mode::InteractionMode;
use crate::inventory::{ItemStock, PlaceableType};
use crate::outcome_log::Outcome;
use crate::placement::PlacementEngine;
use crate::simulation_sets::SimulationSet;
use crate::spawner::{spawn_crop_preview, spawn_tile, SpawnTemplate, SpawnTemplates};
use crate::tiles::{PlantSlot, Tile};

use super::types::{DragState, PointerEvent, PointerTarget};

// =============================================================================
// Context
// =============================================================================

/// Everything the drag state machine reads or writes.
#[derive(SystemParam)]
pub struct InteractionContext<'w, 's> {
    engine: PlacementEngine<'w, 's>,
    mode: Res<'w, InteractionMode>,
    templates: Res<'w, SpawnTemplates>,
    drag: ResMut<'w, DragState>,
    tally: ResMut<'w, HarvestTally>,
    tiles: Query<
        'w,
        's,
        (
            &'static mut Tile,
            &'static mut Transform,
            &'static mut PlantSlot,
        ),
    >,
    crops: Query<'w, 's, &'static mut Crop, Without<Tile>>,
    harvested: EventWriter<'w, CropHarvested>,
}

impl InteractionContext<'_, '_> {
    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { target, pos, time } => {
                if !self.drag.is_idle() {
                    debug!("Ignoring pointer-down during {} drag", self.drag.label());
                    return;
                }
                match target {
                    PointerTarget::Tile(tile) => self.tile_down(tile, time),
                    PointerTarget::Crop(crop) => self.crop_down(crop),
                    PointerTarget::Spawner(kind) => self.spawner_down(kind, pos),
                    PointerTarget::Nothing => {}
                }
            }
            PointerEvent::Move { pos } => self.pointer_move(pos),
            PointerEvent::Up { .. } => self.pointer_up(),
            PointerEvent::Cancel => self.cancel(),
        }
    }

    // -------------------------------------------------------------------------
    // Pointer down
    // -------------------------------------------------------------------------

    fn tile_down(&mut self, entity: Entity, time: f32) {
        if self.mode.is_preview() {
            debug!("Preview mode: ignoring click on {:?}", entity);
            return;
        }
        let threshold = self.engine.params().double_click_threshold;
        let Ok((mut tile, transform, slot)) = self.tiles.get_mut(entity) else {
            self.engine
                .log_mut()
                .refuse(GridError::UnknownEntity(entity.to_bits()));
            return;
        };

        if slot.is_occupied() {
            info!("Tile {:?} carries a crop and cannot be moved", entity);
            self.engine
                .log_mut()
                .refuse(GridError::RecycleRefused(RecycleRefusal::CropPlanted));
            return;
        }
        if !self.engine.grid().is_top(entity) {
            self.engine
                .log_mut()
                .refuse(GridError::RecycleRefused(RecycleRefusal::NotTopTile));
            return;
        }

        if tile.is_double_click(time, threshold) {
            tile.last_click_time = None;
            let item = tile.item;
            // Refusal is already logged by the engine.
            let _ = self.engine.recycle(entity, item, &slot);
            return;
        }

        tile.last_click_time = Some(time);
        tile.selected = true;
        *self.drag = DragState::Selected {
            tile: entity,
            origin: *transform,
        };
        self.engine.log_mut().push(Outcome::Selected { tile: entity });
    }

    fn crop_down(&mut self, entity: Entity) {
        let Ok(mut crop) = self.crops.get_mut(entity) else {
            self.engine
                .log_mut()
                .refuse(GridError::UnknownEntity(entity.to_bits()));
            return;
        };

        let mut parent = crop.parent_tile.and_then(|tile| self.tiles.get_mut(tile).ok());
        let slot = parent.as_mut().map(|(_, _, slot)| &mut **slot);
        match crops::harvest(&mut crop, slot, &mut self.tally) {
            Ok(value) => {
                info!("Harvested {:?} worth {}", crop.kind, value);
                self.engine.commands().entity(entity).despawn();
                self.harvested.send(CropHarvested {
                    crop: entity,
                    kind: crop.kind,
                    value,
                });
                self.engine.log_mut().push(Outcome::Harvested {
                    crop: entity,
                    kind: crop.kind,
                    value,
                });
            }
            Err(err) => {
                info!("Cannot harvest {:?}: {}", entity, err);
                self.engine.log_mut().refuse(err);
            }
        }
    }

    fn spawner_down(&mut self, kind: PlaceableType, pos: Vec3) {
        if self.mode.is_preview() {
            debug!("Preview mode: ignoring drag from {:?} spawner", kind);
            return;
        }
        if !self.engine.inventory().can_create(kind) {
            info!("No {:?} left to place", kind);
            return;
        }
        let Some(template) = self.templates.get(kind).copied() else {
            warn!("No spawn template for {:?}", kind);
            return;
        };

        let frame = self.engine.frame();
        let transform =
            Transform::from_translation(frame.snap_with_height(pos, DRAG_PREVIEW_HEIGHT))
                .with_rotation(frame.rotation());
        let preview = match template {
            SpawnTemplate::Tile { terrain } => spawn_tile(self.engine.commands(), terrain, transform),
            SpawnTemplate::Crop(_) => spawn_crop_preview(self.engine.commands(), kind, transform),
        };
        *self.drag = DragState::Spawning {
            preview,
            kind,
            transform,
        };
    }

    // -------------------------------------------------------------------------
    // Move / up / cancel
    // -------------------------------------------------------------------------

    fn pointer_move(&mut self, pos: Vec3) {
        let state = *self.drag;
        match state {
            DragState::Idle => {}
            DragState::Selected { tile, origin } | DragState::Dragging { tile, origin } => {
                let frame = self.engine.frame();
                let (snapped, rotation) = (frame.snap(pos), frame.rotation());
                if let Ok((_, mut transform, _)) = self.tiles.get_mut(tile) {
                    transform.translation = snapped;
                    transform.rotation = rotation;
                }
                *self.drag = DragState::Dragging { tile, origin };
            }
            DragState::Spawning {
                preview,
                kind,
                mut transform,
            } => {
                let frame = self.engine.frame();
                transform.translation = frame.snap_with_height(pos, DRAG_PREVIEW_HEIGHT);
                transform.rotation = frame.rotation();
                self.engine.commands().entity(preview).insert(transform);
                *self.drag = DragState::Spawning {
                    preview,
                    kind,
                    transform,
                };
            }
        }
    }

    fn pointer_up(&mut self) {
        let state = std::mem::take(&mut *self.drag);
        match state {
            DragState::Idle => {}
            DragState::Selected { tile, .. } | DragState::Dragging { tile, .. } => {
                let Ok((mut data, mut transform, _)) = self.tiles.get_mut(tile) else {
                    return;
                };
                data.selected = false;
                let item = data.item;
                // Overflow already despawned the tile and logged it.
                let _ = self.engine.try_place(tile, &mut transform, Some(item));
            }
            DragState::Spawning {
                preview,
                kind,
                mut transform,
            } => {
                if kind.is_crop() {
                    self.drop_crop(preview, kind, &transform);
                } else if self
                    .engine
                    .place_spawned(preview, kind, &mut transform)
                    .is_ok()
                {
                    self.engine.commands().entity(preview).insert(transform);
                }
            }
        }
    }

    /// Plant `kind` on the top tile of the cell under the preview, then drop
    /// the preview either way.
    fn drop_crop(&mut self, preview: Entity, kind: PlaceableType, transform: &Transform) {
        self.engine.commands().entity(preview).despawn();

        let Some(SpawnTemplate::Crop(entry)) = self.templates.get(kind).copied() else {
            warn!("No crop template for {:?}", kind);
            return;
        };
        let cell = self.engine.frame().world_to_cell(transform.translation);
        let Some(target) = self.engine.grid().top_of(cell) else {
            debug!("No tile under {:?} drop at {}", kind, cell);
            self.engine.log_mut().push(Outcome::Cancelled);
            return;
        };
        let Ok((tile, tile_transform, mut slot)) = self.tiles.get_mut(target) else {
            self.engine
                .log_mut()
                .refuse(GridError::UnknownEntity(target.to_bits()));
            return;
        };

        match crops::try_plant_crop(
            self.engine.commands(),
            target,
            &tile,
            &mut slot,
            &tile_transform,
            &entry,
        ) {
            Ok(crop) => {
                self.engine.inventory_mut().use_item(kind);
                info!("Planted {:?} on {:?}", kind, target);
                self.engine.log_mut().push(Outcome::Planted {
                    crop,
                    tile: target,
                    kind,
                });
            }
            Err(err) => {
                info!("Cannot plant {:?} on {:?}: {}", kind, target, err);
                self.engine.log_mut().refuse(err);
            }
        }
    }

    fn cancel(&mut self) {
        let state = std::mem::take(&mut *self.drag);
        match state {
            DragState::Idle => return,
            DragState::Selected { tile, origin } | DragState::Dragging { tile, origin } => {
                if let Ok((mut data, mut transform, _)) = self.tiles.get_mut(tile) {
                    data.selected = false;
                    *transform = origin;
                }
            }
            DragState::Spawning { preview, .. } => {
                self.engine.commands().entity(preview).despawn();
            }
        }
        self.engine.log_mut().push(Outcome::Cancelled);
    }
}

// =============================================================================
// Systems
// =============================================================================

pub fn handle_pointer_events(mut events: EventReader<PointerEvent>, mut ctx: InteractionContext) {
    for event in events.read() {
        ctx.handle(*event);
    }
}

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DragState>()
            .init_resource::<InteractionMode>()
            .add_event::<PointerEvent>()
            .add_systems(
                FixedUpdate,
                handle_pointer_events
                    .in_set(SimulationSet::PreSim)
                    .run_if(resource_exists::<GridFrame>),
            );
    }
}
