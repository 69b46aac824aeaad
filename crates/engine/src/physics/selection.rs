use tracing::debug;

use crate::app::{Camera2D, EntityId};
use crate::geometry::{Rect, Vec2};

use super::collision::EntityBox;
use super::message::Message;

/// One-shot latch for a pending click, in screen pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SelectionRequest {
    pending: Option<Vec2>,
}

impl SelectionRequest {
    /// A newer click replaces one that has not been resolved yet.
    pub fn request(&mut self, screen_px: Vec2) {
        self.pending = Some(screen_px);
    }

    pub fn take(&mut self) -> Option<Vec2> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOutcome {
    /// Click position in map space.
    pub map_point: Vec2,
    pub deselected: Vec<EntityId>,
    pub selected: Vec<EntityId>,
}

impl SelectionOutcome {
    /// Every deselection is ordered before any selection.
    pub fn into_messages(self) -> Vec<(EntityId, Message)> {
        let deselections = self
            .deselected
            .into_iter()
            .map(|id| (id, Message::EntityDeselected));
        let selections = self
            .selected
            .into_iter()
            .map(|id| (id, Message::EntitySelected));
        deselections.chain(selections).collect()
    }
}

/// Every id in `active` is deselected, whether or not it has a box. Only
/// `candidates` with a box containing the click can be selected.
pub fn resolve_selection(
    screen_px: Vec2,
    camera: &Camera2D,
    unit_scale: f32,
    source_bounds: &Rect,
    active: &[EntityId],
    candidates: &[EntityBox],
    max_distance: f32,
) -> SelectionOutcome {
    let world = camera.unproject(screen_px);
    let map_point = if unit_scale > 0.0 {
        world.scaled(unit_scale.recip())
    } else {
        world
    };

    let deselected = active.to_vec();
    let source_origin = source_bounds.origin();
    let selected: Vec<EntityId> = candidates
        .iter()
        .filter(|candidate| candidate.bounds.contains(map_point))
        .filter(|candidate| candidate.bounds.origin().distance(source_origin) <= max_distance)
        .map(|candidate| candidate.id)
        .collect();

    debug!(
        map_x = map_point.x,
        map_y = map_point.y,
        active = active.len(),
        candidates = candidates.len(),
        selected = selected.len(),
        "selection_resolved"
    );
    SelectionOutcome {
        map_point,
        deselected,
        selected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER_PX: Vec2 = Vec2 { x: 640.0, y: 360.0 };

    fn camera_at(position: Vec2) -> Camera2D {
        let mut camera = Camera2D::default();
        camera.center_on(position);
        camera
    }

    fn candidate(id: u64, x: f32, y: f32) -> EntityBox {
        EntityBox {
            id: EntityId(id),
            bounds: Rect::new(x, y, 16.0, 16.0),
        }
    }

    fn ids(candidates: &[EntityBox]) -> Vec<EntityId> {
        candidates.iter().map(|candidate| candidate.id).collect()
    }

    #[test]
    fn request_is_consumed_once() {
        let mut request = SelectionRequest::default();
        request.request(Vec2::new(1.0, 1.0));
        request.request(Vec2::new(2.0, 2.0));
        assert_eq!(request.take(), Some(Vec2::new(2.0, 2.0)));
        assert_eq!(request.take(), None);
        assert!(!request.is_pending());
    }

    #[test]
    fn single_qualifying_entity_is_selected_and_everyone_deselected() {
        let camera = camera_at(Vec2::new(10.0, 10.0));
        let source = Rect::new(300.0, 300.0, 8.0, 8.0);
        let candidates = [
            candidate(1, 310.0, 310.0),
            candidate(2, 600.0, 600.0),
            candidate(3, 0.0, 0.0),
        ];

        let outcome = resolve_selection(
            CENTER_PX,
            &camera,
            1.0 / 32.0,
            &source,
            &ids(&candidates),
            &candidates,
            32.0,
        );

        assert_eq!(outcome.map_point, Vec2::new(320.0, 320.0));
        assert_eq!(outcome.deselected, vec![EntityId(1), EntityId(2), EntityId(3)]);
        assert_eq!(outcome.selected, vec![EntityId(1)]);
    }

    #[test]
    fn near_candidate_not_containing_point_is_not_selected() {
        let camera = camera_at(Vec2::new(10.0, 10.0));
        let source = Rect::new(300.0, 300.0, 8.0, 8.0);
        let candidates = [candidate(7, 280.0, 280.0)];

        let outcome = resolve_selection(
            CENTER_PX,
            &camera,
            1.0 / 32.0,
            &source,
            &ids(&candidates),
            &candidates,
            32.0,
        );

        assert!(outcome.selected.is_empty());
        assert_eq!(outcome.deselected, vec![EntityId(7)]);
    }

    #[test]
    fn distant_candidate_containing_point_is_not_selected() {
        let camera = camera_at(Vec2::new(10.0, 10.0));
        let source = Rect::new(0.0, 0.0, 8.0, 8.0);
        let candidates = [candidate(1, 310.0, 310.0)];

        let outcome = resolve_selection(
            CENTER_PX,
            &camera,
            1.0 / 32.0,
            &source,
            &ids(&candidates),
            &candidates,
            32.0,
        );
        assert!(outcome.selected.is_empty());
    }

    #[test]
    fn overlapping_candidates_may_both_be_selected() {
        let camera = camera_at(Vec2::new(10.0, 10.0));
        let source = Rect::new(310.0, 310.0, 8.0, 8.0);
        let candidates = [candidate(1, 310.0, 310.0), candidate(2, 312.0, 312.0)];

        let outcome = resolve_selection(
            CENTER_PX,
            &camera,
            1.0 / 32.0,
            &source,
            &ids(&candidates),
            &candidates,
            32.0,
        );
        assert_eq!(outcome.selected, vec![EntityId(1), EntityId(2)]);
    }

    #[test]
    fn active_entity_without_box_is_still_deselected() {
        let camera = camera_at(Vec2::new(10.0, 10.0));
        let source = Rect::new(300.0, 300.0, 8.0, 8.0);
        let candidates = [candidate(1, 310.0, 310.0)];
        let active = [EntityId(1), EntityId(9)];

        let outcome = resolve_selection(
            CENTER_PX,
            &camera,
            1.0 / 32.0,
            &source,
            &active,
            &candidates,
            32.0,
        );

        assert_eq!(outcome.deselected, vec![EntityId(1), EntityId(9)]);
        assert_eq!(outcome.selected, vec![EntityId(1)]);
    }

    #[test]
    fn messages_list_deselections_before_selections() {
        let outcome = SelectionOutcome {
            map_point: Vec2::ZERO,
            deselected: vec![EntityId(1), EntityId(2)],
            selected: vec![EntityId(2)],
        };
        assert_eq!(
            outcome.into_messages(),
            vec![
                (EntityId(1), Message::EntityDeselected),
                (EntityId(2), Message::EntityDeselected),
                (EntityId(2), Message::EntitySelected),
            ]
        );
    }
}
