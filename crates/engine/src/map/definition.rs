use crate::geometry::Vec2;

use super::layer::{MapLayer, PLAYER_START};
use super::map_type::MapType;

/// Object layers of one map. Everything is in map space (pixels, y-up).
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    map_type: MapType,
    pixel_width: f32,
    pixel_height: f32,
    collision_layer: Option<MapLayer>,
    portal_layer: Option<MapLayer>,
    spawns_layer: Option<MapLayer>,
}

/// Spawn point for a non-player entity, named by its entity id.
#[derive(Debug, Clone, PartialEq)]
pub struct NpcSpawn {
    pub entity_id: String,
    pub position: Vec2,
}

impl Map {
    pub fn new(map_type: MapType, pixel_width: f32, pixel_height: f32) -> Self {
        Self {
            map_type,
            pixel_width,
            pixel_height,
            collision_layer: None,
            portal_layer: None,
            spawns_layer: None,
        }
    }

    pub fn with_collision_layer(mut self, layer: MapLayer) -> Self {
        self.collision_layer = Some(layer);
        self
    }

    pub fn with_portal_layer(mut self, layer: MapLayer) -> Self {
        self.portal_layer = Some(layer);
        self
    }

    pub fn with_spawns_layer(mut self, layer: MapLayer) -> Self {
        self.spawns_layer = Some(layer);
        self
    }

    pub fn map_type(&self) -> MapType {
        self.map_type
    }

    pub fn pixel_size(&self) -> (f32, f32) {
        (self.pixel_width, self.pixel_height)
    }

    pub fn collision_layer(&self) -> Option<&MapLayer> {
        self.collision_layer.as_ref()
    }

    pub fn portal_layer(&self) -> Option<&MapLayer> {
        self.portal_layer.as_ref()
    }

    pub fn spawns_layer(&self) -> Option<&MapLayer> {
        self.spawns_layer.as_ref()
    }

    /// `PLAYER_START` spawn nearest to `position`; ties keep the earlier one.
    pub fn closest_player_start(&self, position: Vec2) -> Option<Vec2> {
        let spawns = self.spawns_layer.as_ref()?;
        let mut best: Option<(f32, Vec2)> = None;
        for start in spawns.positions_named(PLAYER_START) {
            let distance_sq = position.distance_sq(start);
            match best {
                Some((shortest, _)) if shortest <= distance_sq => {}
                _ => best = Some((distance_sq, start)),
            }
        }
        best.map(|(_, start)| start)
    }

    pub fn npc_spawns(&self) -> Vec<NpcSpawn> {
        let Some(spawns) = self.spawns_layer.as_ref() else {
            return Vec::new();
        };
        spawns
            .objects()
            .iter()
            .filter(|object| !object.is_named(PLAYER_START))
            .filter_map(|object| {
                object.name().map(|name| NpcSpawn {
                    entity_id: name.to_string(),
                    position: object.rect.origin(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::map::layer::{MapObject, SPAWNS_LAYER};

    fn town_with_spawns() -> Map {
        Map::new(MapType::Town, 640.0, 480.0).with_spawns_layer(MapLayer::with_objects(
            SPAWNS_LAYER,
            vec![
                MapObject::named(PLAYER_START, Rect::new(16.0, 16.0, 16.0, 16.0)),
                MapObject::named("TOWN_GUARD", Rect::new(80.0, 80.0, 16.0, 16.0)),
                MapObject::named(PLAYER_START, Rect::new(320.0, 240.0, 16.0, 16.0)),
                MapObject::unnamed(Rect::new(0.0, 0.0, 4.0, 4.0)),
            ],
        ))
    }

    #[test]
    fn closest_player_start_picks_nearest_spawn() {
        let town = town_with_spawns();
        assert_eq!(
            town.closest_player_start(Vec2::ZERO),
            Some(Vec2::new(16.0, 16.0))
        );
        assert_eq!(
            town.closest_player_start(Vec2::new(300.0, 250.0)),
            Some(Vec2::new(320.0, 240.0))
        );
    }

    #[test]
    fn closest_player_start_is_none_without_spawns_layer() {
        let bare = Map::new(MapType::TopWorld, 10.0, 10.0);
        assert_eq!(bare.closest_player_start(Vec2::ZERO), None);
    }

    #[test]
    fn npc_spawns_skip_player_start_and_unnamed_objects() {
        let spawns = town_with_spawns().npc_spawns();
        assert_eq!(
            spawns,
            vec![NpcSpawn {
                entity_id: "TOWN_GUARD".to_string(),
                position: Vec2::new(80.0, 80.0),
            }]
        );
    }
}
