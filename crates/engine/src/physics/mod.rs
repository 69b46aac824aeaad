mod bounds;
mod collision;
mod component;
mod config;
mod message;
mod portal;
mod selection;

pub use bounds::{Anchor, BoundingBoxTracker, BoxSpec};
pub use collision::{collides_with_entities, collides_with_map_layer, BoxLookup, EntityBox};
pub use component::{
    FrameContext, NpcPhysics, PhysicsBody, PhysicsComponent, PhysicsStep, PlayerPhysics,
};
pub use config::{ConfigError, PhysicsConfig};
pub use message::{Message, MessageError, MessageTag, MESSAGE_TOKEN};
pub use portal::{MapTransition, PortalTrigger};
pub use selection::{resolve_selection, SelectionOutcome, SelectionRequest};
