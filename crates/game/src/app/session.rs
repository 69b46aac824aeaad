use engine::{
    Camera2D, EntityConfig, EntityId, InputSnapshot, Map, MapError, MapManager, MapType, Message,
    NpcPhysics, PhysicsComponent, PhysicsConfig, PlayerController, PlayerPhysics, Vec2, World,
};
use tracing::{debug, info};

pub(crate) const PLAYER_ENTITY_ID: &str = "PLAYER";
const START_MAP: MapType = MapType::TopWorld;

/// Maps, entities and the player controller for one headless run.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    maps: MapManager,
    controller: PlayerController,
    player: EntityId,
}

impl Session {
    /// Registers `maps`, spawns the player on the start map and every NPC
    /// listed in the spawn layers.
    pub(crate) fn new(config: &PhysicsConfig, maps: Vec<Map>) -> Result<Self, MapError> {
        let mut manager = MapManager::new(config.unit_scale, Camera2D::default());
        let mut world = World::default();

        for map in maps {
            let map_type = map.map_type();
            let mut residents = Vec::new();
            for spawn in map.npc_spawns() {
                let id = world.spawn(
                    EntityConfig::new(spawn.entity_id.as_str()),
                    Some(PhysicsComponent::Npc(NpcPhysics::new(config))),
                );
                world.send_message(
                    id,
                    Message::SetStartPosition(spawn.position.scaled(config.unit_scale)),
                );
                debug!(map = %map_type, entity = %spawn.entity_id, id = id.0, "npc_spawned");
                residents.push(id);
            }
            manager.set_map_entities(map_type, residents);
            manager.register_map(map);
        }

        let start_map = if manager.is_registered(START_MAP) {
            START_MAP
        } else {
            manager
                .registered_maps()
                .next()
                .map(Map::map_type)
                .ok_or(MapError::NotRegistered(START_MAP))?
        };
        manager.load_map(start_map)?;

        let player = world.spawn(
            EntityConfig::new(PLAYER_ENTITY_ID),
            Some(PhysicsComponent::Player(PlayerPhysics::new(config))),
        );
        let start = manager.player_start_unit_scaled();
        world.send_message(player, Message::SetStartPosition(start));
        manager.set_player(player);
        manager.camera_mut().center_on(start);
        world.apply_pending();

        info!(
            map = %start_map,
            entity_count = world.entity_count(),
            "session_started"
        );
        Ok(Self {
            world,
            maps: manager,
            controller: PlayerController::default(),
            player,
        })
    }

    /// Applies one tick of input, then steps every active entity.
    pub(crate) fn tick(&mut self, input: &InputSnapshot, dt_seconds: f32) {
        if input.zoom_delta_steps() != 0 {
            let camera = self.maps.camera_mut();
            camera.apply_zoom_steps(input.zoom_delta_steps());
            camera.update();
        }
        for message in self.controller.messages_for(input) {
            self.world.send_message(self.player, message);
        }

        for transition in self.world.update_active(dt_seconds, &mut self.maps) {
            info!(
                from = %transition.from,
                to = %transition.to,
                active_entities = self.maps.current_entities().len(),
                "map_switched"
            );
        }
        self.world.apply_pending();
    }

    pub(crate) fn current_map(&self) -> Option<MapType> {
        self.maps.current_map_type()
    }

    pub(crate) fn player_position(&self) -> Vec2 {
        self.world
            .find_entity(self.player)
            .and_then(|entity| entity.physics())
            .map(|physics| physics.body().current_position())
            .unwrap_or(Vec2::ZERO)
    }

    pub(crate) fn selected_entities(&self) -> Vec<&str> {
        self.world
            .entities()
            .iter()
            .filter(|entity| entity.is_selected())
            .map(|entity| entity.config.entity_id.as_str())
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn maps(&self) -> &MapManager {
        &self.maps
    }
}
