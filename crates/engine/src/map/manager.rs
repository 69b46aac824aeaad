use std::collections::{BTreeMap, HashMap};

use thiserror::Error;
use tracing::{debug, info};

use crate::app::{Camera2D, EntityId};
use crate::geometry::Vec2;

use super::definition::Map;
use super::layer::MapLayer;
use super::map_type::MapType;

/// Identifies the active map at a point in time.
///
/// Every `load_map` bumps the generation, so a handle taken before a
/// transition no longer compares equal to [`MapManager::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapHandle {
    pub map_type: MapType,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map {0} is not registered")]
    NotRegistered(MapType),
}

#[derive(Debug)]
pub struct MapManager {
    maps: BTreeMap<MapType, Map>,
    current: Option<MapType>,
    generation: u64,
    camera: Camera2D,
    unit_scale: f32,
    player_start: Vec2,
    closest_start_positions: HashMap<MapType, Vec2>,
    entities_by_map: HashMap<MapType, Vec<EntityId>>,
    player: Option<EntityId>,
}

impl MapManager {
    pub fn new(unit_scale: f32, camera: Camera2D) -> Self {
        Self {
            maps: BTreeMap::new(),
            current: None,
            generation: 0,
            camera,
            unit_scale,
            player_start: Vec2::ZERO,
            closest_start_positions: HashMap::new(),
            entities_by_map: HashMap::new(),
            player: None,
        }
    }

    pub fn register_map(&mut self, map: Map) {
        self.maps.insert(map.map_type(), map);
    }

    pub fn is_registered(&self, map_type: MapType) -> bool {
        self.maps.contains_key(&map_type)
    }

    pub fn registered_maps(&self) -> impl Iterator<Item = &Map> {
        self.maps.values()
    }

    /// Switches the active map and resolves its player start.
    ///
    /// Anything read from the previous map (layers, entity registry, camera
    /// placement) is stale once this returns.
    pub fn load_map(&mut self, map_type: MapType) -> Result<MapHandle, MapError> {
        let map = self
            .maps
            .get(&map_type)
            .ok_or(MapError::NotRegistered(map_type))?;

        if map.collision_layer().is_none() {
            debug!(map = %map_type, "collision_layer_missing");
        }
        if map.portal_layer().is_none() {
            debug!(map = %map_type, "portal_layer_missing");
        }

        let anchor = self
            .closest_start_positions
            .get(&map_type)
            .map(|position| self.to_map_space(*position));
        self.player_start = match map.closest_player_start(anchor.unwrap_or(Vec2::ZERO)) {
            Some(start) => start,
            None => {
                debug!(map = %map_type, "spawns_layer_has_no_player_start");
                anchor.unwrap_or(Vec2::ZERO)
            }
        };

        self.current = Some(map_type);
        self.generation = self.generation.saturating_add(1);
        info!(
            map = %map_type,
            generation = self.generation,
            start_x = self.player_start.x,
            start_y = self.player_start.y,
            "map_loaded"
        );
        Ok(self.handle_for(map_type))
    }

    pub fn handle(&self) -> Option<MapHandle> {
        self.current.map(|map_type| self.handle_for(map_type))
    }

    pub fn is_current(&self, handle: MapHandle) -> bool {
        self.handle() == Some(handle)
    }

    pub fn current_map_type(&self) -> Option<MapType> {
        self.current
    }

    pub fn current_map(&self) -> Option<&Map> {
        self.current.and_then(|map_type| self.maps.get(&map_type))
    }

    pub fn collision_layer(&self) -> Option<&MapLayer> {
        self.current_map().and_then(Map::collision_layer)
    }

    pub fn portal_layer(&self) -> Option<&MapLayer> {
        self.current_map().and_then(Map::portal_layer)
    }

    /// Non-owning registry of the entities that live on the current map.
    pub fn current_entities(&self) -> &[EntityId] {
        self.current
            .and_then(|map_type| self.entities_by_map.get(&map_type))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn set_map_entities(&mut self, map_type: MapType, entities: Vec<EntityId>) {
        self.entities_by_map.insert(map_type, entities);
    }

    pub fn set_player(&mut self, player: EntityId) {
        self.player = Some(player);
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera2D {
        &mut self.camera
    }

    pub fn unit_scale(&self) -> f32 {
        self.unit_scale
    }

    /// Records `position` (unit scale) as the return point on the current map.
    pub fn set_closest_start_position(&mut self, position: Vec2) {
        if self.unit_scale <= 0.0 {
            return;
        }
        if let Some(map_type) = self.current {
            self.closest_start_positions.insert(map_type, position);
        }
    }

    pub fn closest_start_position(&self, map_type: MapType) -> Option<Vec2> {
        self.closest_start_positions.get(&map_type).copied()
    }

    pub fn player_start_unit_scaled(&self) -> Vec2 {
        self.player_start.scaled(self.unit_scale)
    }

    fn to_map_space(&self, position: Vec2) -> Vec2 {
        position.scaled(self.unit_scale.recip())
    }

    fn handle_for(&self, map_type: MapType) -> MapHandle {
        MapHandle {
            map_type,
            generation: self.generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::map::layer::{MapObject, PLAYER_START, SPAWNS_LAYER};

    const UNIT_SCALE: f32 = 1.0 / 16.0;

    fn map_with_starts(map_type: MapType, starts: &[(f32, f32)]) -> Map {
        let objects = starts
            .iter()
            .map(|(x, y)| MapObject::named(PLAYER_START, Rect::new(*x, *y, 16.0, 16.0)))
            .collect();
        Map::new(map_type, 640.0, 640.0)
            .with_spawns_layer(MapLayer::with_objects(SPAWNS_LAYER, objects))
    }

    fn manager() -> MapManager {
        let mut maps = MapManager::new(UNIT_SCALE, Camera2D::default());
        maps.register_map(map_with_starts(
            MapType::TopWorld,
            &[(32.0, 32.0), (480.0, 480.0)],
        ));
        maps.register_map(map_with_starts(MapType::Town, &[(160.0, 64.0)]));
        maps
    }

    #[test]
    fn load_unregistered_map_fails_and_keeps_state() {
        let mut maps = MapManager::new(UNIT_SCALE, Camera2D::default());
        assert_eq!(
            maps.load_map(MapType::CastleOfDoom),
            Err(MapError::NotRegistered(MapType::CastleOfDoom))
        );
        assert_eq!(maps.handle(), None);
        assert!(maps.current_entities().is_empty());
    }

    #[test]
    fn first_load_uses_spawn_closest_to_origin() {
        let mut maps = manager();
        maps.load_map(MapType::TopWorld).expect("load");
        assert_eq!(maps.player_start_unit_scaled(), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn returning_uses_spawn_closest_to_recorded_position() {
        let mut maps = manager();
        maps.load_map(MapType::TopWorld).expect("load");
        maps.set_closest_start_position(Vec2::new(29.0, 29.5));
        maps.load_map(MapType::Town).expect("load town");
        assert_eq!(maps.player_start_unit_scaled(), Vec2::new(10.0, 4.0));

        maps.load_map(MapType::TopWorld).expect("load back");
        assert_eq!(maps.player_start_unit_scaled(), Vec2::new(30.0, 30.0));
        assert_eq!(
            maps.closest_start_position(MapType::TopWorld),
            Some(Vec2::new(29.0, 29.5))
        );
    }

    #[test]
    fn map_without_spawns_falls_back_to_recorded_position() {
        let mut maps = MapManager::new(UNIT_SCALE, Camera2D::default());
        maps.register_map(Map::new(MapType::CastleOfDoom, 64.0, 64.0));
        maps.load_map(MapType::CastleOfDoom).expect("load");
        assert_eq!(maps.player_start_unit_scaled(), Vec2::ZERO);

        maps.set_closest_start_position(Vec2::new(1.5, 2.5));
        maps.load_map(MapType::CastleOfDoom).expect("reload");
        assert_eq!(maps.player_start_unit_scaled(), Vec2::new(1.5, 2.5));
    }

    #[test]
    fn handles_go_stale_after_each_load() {
        let mut maps = manager();
        let first = maps.load_map(MapType::TopWorld).expect("load");
        assert!(maps.is_current(first));

        let second = maps.load_map(MapType::Town).expect("load town");
        assert!(!maps.is_current(first));
        assert!(maps.is_current(second));
        assert_eq!(second.generation, first.generation + 1);
    }

    #[test]
    fn entity_registry_follows_current_map() {
        let mut maps = manager();
        maps.set_map_entities(MapType::TopWorld, vec![EntityId(1), EntityId(2)]);
        maps.set_map_entities(MapType::Town, vec![EntityId(3)]);

        maps.load_map(MapType::TopWorld).expect("load");
        assert_eq!(maps.current_entities(), &[EntityId(1), EntityId(2)]);
        maps.load_map(MapType::Town).expect("load town");
        assert_eq!(maps.current_entities(), &[EntityId(3)]);
    }
}
