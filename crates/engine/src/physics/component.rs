//! Per-frame physics for the player and for map NPCs.
//!
//! Each update works on the *next* box first, lets the portal trigger and the
//! selection resolver run against it, and then decides whether the move is
//! committed. Once `update` returns the tracked box always sits at the current
//! position.

use tracing::trace;

use crate::app::{Direction, EntityId, State};
use crate::geometry::{Rect, Vec2};
use crate::map::MapManager;

use super::bounds::{BoundingBoxTracker, BoxSpec};
use super::collision::{collides_with_entities, collides_with_map_layer, BoxLookup, EntityBox};
use super::config::PhysicsConfig;
use super::message::Message;
use super::portal::{MapTransition, PortalTrigger};
use super::selection::{resolve_selection, SelectionRequest};

#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsBody {
    current_position: Vec2,
    next_position: Vec2,
    direction: Option<Direction>,
    velocity: Vec2,
    state: State,
    tracker: BoundingBoxTracker,
    max_step_seconds: f32,
}

impl PhysicsBody {
    pub fn new(box_spec: &BoxSpec, config: &PhysicsConfig) -> Self {
        Self {
            current_position: Vec2::ZERO,
            next_position: Vec2::ZERO,
            direction: None,
            velocity: config.walk_velocity,
            state: State::default(),
            tracker: BoundingBoxTracker::init_box(box_spec, config.unit_scale),
            max_step_seconds: config.max_step_seconds,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn current_position(&self) -> Vec2 {
        self.current_position
    }

    pub fn next_position(&self) -> Vec2 {
        self.next_position
    }

    /// Map-space box last computed by the tracker.
    pub fn bounds(&self) -> Rect {
        self.tracker.bounds()
    }

    pub fn receive(&mut self, message: &Message) {
        match *message {
            Message::SetStartPosition(position) => self.reset_to(position),
            Message::SetState(state) => self.state = state,
            Message::SetDirection(direction) => self.direction = Some(direction),
            Message::BeginSelection(_) | Message::EntitySelected | Message::EntityDeselected => {}
        }
    }

    /// Advances `next` from `current` along the facing axis.
    ///
    /// Long frames (a stall, a debugger pause) are skipped outright rather
    /// than turned into a single large jump.
    pub fn calculate_next_position(&mut self, dt_seconds: f32) {
        let Some(direction) = self.direction else {
            return;
        };
        if !(dt_seconds <= self.max_step_seconds) {
            trace!(dt_seconds, "next_position_step_skipped");
            return;
        }

        let mut next = self.current_position;
        match direction {
            Direction::Up => next.y += self.velocity.y * dt_seconds,
            Direction::Down => next.y -= self.velocity.y * dt_seconds,
            Direction::Right => next.x += self.velocity.x * dt_seconds,
            Direction::Left => next.x -= self.velocity.x * dt_seconds,
        }
        self.next_position = next;
    }

    fn reset_to(&mut self, position: Vec2) {
        self.current_position = position;
        self.next_position = position;
        self.tracker.update_box_at(position);
    }

    fn box_at_next(&mut self) {
        self.tracker.update_box_at(self.next_position);
    }

    fn box_at_current(&mut self) {
        self.tracker.update_box_at(self.current_position);
    }

    /// Commits `next` when nothing blocks it, otherwise falls back to the
    /// current box. Returns whether the move was committed.
    fn resolve_move(&mut self, self_id: EntityId, context: &FrameContext<'_>) -> bool {
        let bounds = self.tracker.bounds();
        let blocked = collides_with_map_layer(&bounds, context.maps.collision_layer())
            || collides_with_entities(&bounds, &context.candidate_boxes(self_id), self_id);
        if !blocked && self.state == State::Walking {
            self.current_position = self.next_position;
            true
        } else {
            if blocked {
                trace!(entity = self_id.0, "move_blocked");
            }
            self.box_at_current();
            false
        }
    }
}

/// Everything an entity update may read or touch outside its own component.
pub struct FrameContext<'a> {
    pub maps: &'a mut MapManager,
    boxes: &'a dyn BoxLookup,
    outbox: Vec<(EntityId, Message)>,
}

impl<'a> FrameContext<'a> {
    pub fn new(maps: &'a mut MapManager, boxes: &'a dyn BoxLookup) -> Self {
        Self {
            maps,
            boxes,
            outbox: Vec::new(),
        }
    }

    /// Current map's registered entities plus the player, minus `self_id`.
    /// Read from the map registry at call time.
    pub fn active_entities(&self, self_id: EntityId) -> Vec<EntityId> {
        let registry = self.maps.current_entities();
        let player = self
            .maps
            .player()
            .filter(|player| !registry.contains(player));
        registry
            .iter()
            .copied()
            .chain(player)
            .filter(|id| *id != self_id)
            .collect()
    }

    /// Committed boxes of [`Self::active_entities`]; entities without a box
    /// are left out.
    pub fn candidate_boxes(&self, self_id: EntityId) -> Vec<EntityBox> {
        self.active_entities(self_id)
            .into_iter()
            .filter_map(|id| {
                self.boxes
                    .current_box(id)
                    .map(|bounds| EntityBox { id, bounds })
            })
            .collect()
    }

    pub fn post(&mut self, target: EntityId, message: Message) {
        self.outbox.push((target, message));
    }

    pub fn into_outbox(self) -> Vec<(EntityId, Message)> {
        self.outbox
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhysicsStep {
    pub committed: bool,
    pub transition: Option<MapTransition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerPhysics {
    body: PhysicsBody,
    portal: PortalTrigger,
    selection: SelectionRequest,
    selection_max_distance: f32,
}

impl PlayerPhysics {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            body: PhysicsBody::new(&config.player_box, config),
            portal: PortalTrigger::default(),
            selection: SelectionRequest::default(),
            selection_max_distance: config.selection_max_distance,
        }
    }

    pub fn body(&self) -> &PhysicsBody {
        &self.body
    }

    pub fn selection_pending(&self) -> bool {
        self.selection.is_pending()
    }

    pub fn receive_message(&mut self, message: Message) {
        match message {
            Message::BeginSelection(screen_px) => self.selection.request(screen_px),
            other => self.body.receive(&other),
        }
    }

    pub fn update(
        &mut self,
        self_id: EntityId,
        dt_seconds: f32,
        context: &mut FrameContext<'_>,
    ) -> PhysicsStep {
        self.body.box_at_next();

        let bounds = self.body.bounds();
        let transition =
            self.portal
                .check_portals(&bounds, self.body.current_position, context.maps);
        if let Some(transition) = &transition {
            self.body.reset_to(transition.start_position);
            context.maps.camera_mut().center_on(transition.start_position);
        }

        if let Some(screen_px) = self.selection.take() {
            let outcome = resolve_selection(
                screen_px,
                context.maps.camera(),
                context.maps.unit_scale(),
                &self.body.bounds(),
                &context.active_entities(self_id),
                &context.candidate_boxes(self_id),
                self.selection_max_distance,
            );
            for (target, message) in outcome.into_messages() {
                context.post(target, message);
            }
        }

        let committed = self.body.resolve_move(self_id, context);
        if committed {
            context
                .maps
                .camera_mut()
                .center_on(self.body.current_position);
        }

        self.body.calculate_next_position(dt_seconds);
        PhysicsStep {
            committed,
            transition,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NpcPhysics {
    body: PhysicsBody,
}

impl NpcPhysics {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            body: PhysicsBody::new(&config.npc_box, config),
        }
    }

    pub fn body(&self) -> &PhysicsBody {
        &self.body
    }

    pub fn receive_message(&mut self, message: Message) {
        self.body.receive(&message);
    }

    pub fn update(
        &mut self,
        self_id: EntityId,
        dt_seconds: f32,
        context: &mut FrameContext<'_>,
    ) -> PhysicsStep {
        if self.body.state == State::Immobile {
            self.body.box_at_current();
            return PhysicsStep::default();
        }

        self.body.box_at_next();
        let committed = self.body.resolve_move(self_id, context);
        self.body.calculate_next_position(dt_seconds);
        PhysicsStep {
            committed,
            transition: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsComponent {
    Player(PlayerPhysics),
    Npc(NpcPhysics),
}

impl PhysicsComponent {
    pub fn body(&self) -> &PhysicsBody {
        match self {
            PhysicsComponent::Player(player) => player.body(),
            PhysicsComponent::Npc(npc) => npc.body(),
        }
    }

    pub fn receive_message(&mut self, message: Message) {
        match self {
            PhysicsComponent::Player(player) => player.receive_message(message),
            PhysicsComponent::Npc(npc) => npc.receive_message(message),
        }
    }

    pub fn update(
        &mut self,
        self_id: EntityId,
        dt_seconds: f32,
        context: &mut FrameContext<'_>,
    ) -> PhysicsStep {
        match self {
            PhysicsComponent::Player(player) => player.update(self_id, dt_seconds, context),
            PhysicsComponent::Npc(npc) => npc.update(self_id, dt_seconds, context),
        }
    }
}
