use tracing::{debug, trace};

use crate::geometry::Rect;
use crate::map::MapManager;
use crate::physics::{BoxLookup, FrameContext, MapTransition, Message, PhysicsComponent, PhysicsStep};

use super::entity::{Entity, EntityConfig, EntityId};

#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Owns every entity. Which of them are active is decided by the
/// [`MapManager`] registry of the current map.
#[derive(Debug, Default)]
pub struct World {
    allocator: EntityIdAllocator,
    entities: Vec<Entity>,
    pending_spawns: Vec<Entity>,
    pending_despawns: Vec<EntityId>,
}

impl World {
    pub fn spawn(&mut self, config: EntityConfig, physics: Option<PhysicsComponent>) -> EntityId {
        let id = self.allocator.allocate();
        self.pending_spawns.push(Entity::new(id, config, physics));
        id
    }

    pub fn despawn(&mut self, id: EntityId) -> bool {
        let exists_now = self.entities.iter().any(|entity| entity.id == id);
        let pending_spawn = self.pending_spawns.iter().any(|entity| entity.id == id);
        if !exists_now && !pending_spawn {
            return false;
        }
        self.pending_despawns.push(id);
        true
    }

    pub fn apply_pending(&mut self) {
        if !self.pending_despawns.is_empty() {
            self.pending_despawns.sort_by_key(|id| id.0);
            self.pending_despawns.dedup();
            let pending = &self.pending_despawns;
            self.entities
                .retain(|entity| pending.binary_search(&entity.id).is_err());
            self.pending_spawns
                .retain(|entity| pending.binary_search(&entity.id).is_err());
            self.pending_despawns.clear();
        }
        self.entities.append(&mut self.pending_spawns);
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn find_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn find_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    /// Delivers `message` right away. Entities still pending spawn can
    /// receive setup messages too.
    pub fn send_message(&mut self, target: EntityId, message: Message) -> bool {
        let entity = self
            .entities
            .iter_mut()
            .chain(self.pending_spawns.iter_mut())
            .find(|entity| entity.id == target);
        match entity {
            Some(entity) => {
                entity.send_message(message);
                true
            }
            None => {
                debug!(target = target.0, tag = ?message.tag(), "message_target_missing");
                false
            }
        }
    }

    /// Text-form delivery; panics on a malformed payload.
    pub fn send_encoded(&mut self, target: EntityId, raw: &str) -> bool {
        match self
            .entities
            .iter_mut()
            .chain(self.pending_spawns.iter_mut())
            .find(|entity| entity.id == target)
        {
            Some(entity) => {
                entity.receive_encoded(raw);
                true
            }
            None => {
                debug!(target = target.0, "message_target_missing");
                false
            }
        }
    }

    /// Runs one physics step for `id`.
    ///
    /// The component is moved out of the entity for the step so it can read
    /// every other entity's box. Messages it posts are delivered once it is
    /// back in place.
    pub fn update_entity(
        &mut self,
        id: EntityId,
        dt_seconds: f32,
        maps: &mut MapManager,
    ) -> Option<PhysicsStep> {
        let index = self.entities.iter().position(|entity| entity.id == id)?;
        let mut physics = self.entities[index].physics.take()?;

        let (step, outbox) = {
            let boxes = CommittedBoxes(&self.entities);
            let mut context = FrameContext::new(maps, &boxes);
            let step = physics.update(id, dt_seconds, &mut context);
            (step, context.into_outbox())
        };
        self.entities[index].physics = Some(physics);

        for (target, message) in outbox {
            self.send_message(target, message);
        }
        Some(step)
    }

    /// Updates the player, then the current map's entities in registry
    /// order. The registry is read after the player's step, so a map switch
    /// takes effect within the same frame.
    pub fn update_active(&mut self, dt_seconds: f32, maps: &mut MapManager) -> Vec<MapTransition> {
        let mut transitions = Vec::new();
        let player = maps.player();
        if let Some(player) = player {
            if let Some(step) = self.update_entity(player, dt_seconds, maps) {
                transitions.extend(step.transition);
            }
        }

        let registry = maps.current_entities().to_vec();
        for id in registry.into_iter().filter(|id| Some(*id) != player) {
            if let Some(step) = self.update_entity(id, dt_seconds, maps) {
                transitions.extend(step.transition);
            }
        }
        trace!(transitions = transitions.len(), "world_updated");
        transitions
    }
}

struct CommittedBoxes<'a>(&'a [Entity]);

impl BoxLookup for CommittedBoxes<'_> {
    fn current_box(&self, id: EntityId) -> Option<Rect> {
        self.0
            .iter()
            .find(|entity| entity.id == id)
            .and_then(Entity::physics)
            .map(|physics| physics.body().bounds())
    }
}
