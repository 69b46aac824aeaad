mod camera;
mod clock;
mod controller;
mod entity;
mod input;
mod world;

pub use camera::{
    Camera2D, Viewport, CAMERA_ZOOM_DEFAULT, CAMERA_ZOOM_MAX, CAMERA_ZOOM_MIN, CAMERA_ZOOM_STEP,
    PIXELS_PER_UNIT,
};
pub use clock::{ClockConfig, FixedStepClock, StepPlan};
pub use controller::PlayerController;
pub use entity::{Direction, Entity, EntityConfig, EntityId, State};
pub use input::{InputAction, InputSnapshot};
pub use world::{EntityIdAllocator, World};
