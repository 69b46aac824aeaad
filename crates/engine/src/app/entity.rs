use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::physics::{Message, PhysicsComponent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    #[default]
    Idle,
    Walking,
    Immobile,
}

impl State {
    pub const ALL: [State; 3] = [State::Idle, State::Walking, State::Immobile];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Up,
    Right,
    #[default]
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityConfig {
    pub entity_id: String,
}

impl EntityConfig {
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
        }
    }
}

#[derive(Debug)]
pub struct Entity {
    pub id: EntityId,
    pub config: EntityConfig,
    state: State,
    direction: Direction,
    selected: bool,
    pub(crate) physics: Option<PhysicsComponent>,
}

impl Entity {
    pub(crate) fn new(id: EntityId, config: EntityConfig, physics: Option<PhysicsComponent>) -> Self {
        Self {
            id,
            config,
            state: State::default(),
            direction: Direction::default(),
            selected: false,
            physics,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn physics(&self) -> Option<&PhysicsComponent> {
        self.physics.as_ref()
    }

    /// Synchronous delivery to the entity and each of its components.
    pub fn send_message(&mut self, message: Message) {
        trace!(entity = self.id.0, tag = ?message.tag(), "message_received");
        match message {
            Message::SetState(state) => self.state = state,
            Message::SetDirection(direction) => self.direction = direction,
            Message::EntitySelected => self.selected = true,
            Message::EntityDeselected => self.selected = false,
            Message::SetStartPosition(_) | Message::BeginSelection(_) => {}
        }
        if let Some(physics) = self.physics.as_mut() {
            physics.receive_message(message);
        }
    }

    /// Decodes a text-encoded message and delivers it.
    ///
    /// Unknown tags are ignored. A known tag carrying a payload of the wrong
    /// shape is a broken sender and panics.
    pub fn receive_encoded(&mut self, raw: &str) {
        match Message::decode(raw) {
            Ok(Some(message)) => self.send_message(message),
            Ok(None) => trace!(entity = self.id.0, raw, "message_ignored"),
            Err(error) => panic!("malformed message for entity {}: {error}", self.id.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec2;
    use crate::physics::{NpcPhysics, PhysicsConfig};

    fn npc_entity() -> Entity {
        let config = PhysicsConfig::default();
        Entity::new(
            EntityId(4),
            EntityConfig::new("TOWN_GUARD"),
            Some(PhysicsComponent::Npc(NpcPhysics::new(&config))),
        )
    }

    #[test]
    fn state_and_direction_messages_update_entity_and_physics() {
        let mut entity = npc_entity();
        entity.send_message(Message::SetState(State::Walking));
        entity.send_message(Message::SetDirection(Direction::Left));

        assert_eq!(entity.state(), State::Walking);
        assert_eq!(entity.direction(), Direction::Left);
        let body = entity.physics().expect("physics").body();
        assert_eq!(body.state(), State::Walking);
        assert_eq!(body.direction(), Some(Direction::Left));
    }

    #[test]
    fn selection_messages_toggle_flag() {
        let mut entity = npc_entity();
        entity.send_message(Message::EntitySelected);
        assert!(entity.is_selected());
        entity.send_message(Message::EntityDeselected);
        assert!(!entity.is_selected());
    }

    #[test]
    fn encoded_start_position_reaches_physics() {
        let mut entity = npc_entity();
        let raw = Message::SetStartPosition(Vec2::new(3.0, 4.5)).encode();
        entity.receive_encoded(&raw);

        let body = entity.physics().expect("physics").body();
        assert_eq!(body.current_position(), Vec2::new(3.0, 4.5));
        assert_eq!(body.next_position(), Vec2::new(3.0, 4.5));
    }

    #[test]
    fn unknown_encoded_tag_is_ignored() {
        let mut entity = npc_entity();
        entity.receive_encoded("PLAY_ANIMATION:::{\"frame\":2}");
        assert_eq!(entity.state(), State::Idle);
    }

    #[test]
    #[should_panic(expected = "malformed message")]
    fn malformed_encoded_payload_panics() {
        let mut entity = npc_entity();
        entity.receive_encoded("CURRENT_STATE:::\"FLYING\"");
    }
}
