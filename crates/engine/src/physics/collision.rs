use crate::app::EntityId;
use crate::geometry::Rect;
use crate::map::MapLayer;

/// Committed box of another active entity, captured for one check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityBox {
    pub id: EntityId,
    pub bounds: Rect,
}

/// Source of committed boxes for entities outside the one being updated.
pub trait BoxLookup {
    fn current_box(&self, id: EntityId) -> Option<Rect>;
}

impl BoxLookup for Vec<EntityBox> {
    fn current_box(&self, id: EntityId) -> Option<Rect> {
        self.iter()
            .find(|entity| entity.id == id)
            .map(|entity| entity.bounds)
    }
}

pub fn collides_with_map_layer(bounds: &Rect, layer: Option<&MapLayer>) -> bool {
    layer.is_some_and(|layer| layer.overlapping(bounds).next().is_some())
}

pub fn collides_with_entities(bounds: &Rect, others: &[EntityBox], self_id: EntityId) -> bool {
    others
        .iter()
        .filter(|other| other.id != self_id)
        .any(|other| bounds.overlaps(&other.bounds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{MapObject, COLLISION_LAYER};

    fn wall_layer() -> MapLayer {
        MapLayer::with_objects(
            COLLISION_LAYER,
            vec![MapObject::unnamed(Rect::new(0.0, 0.0, 16.0, 64.0))],
        )
    }

    #[test]
    fn box_touching_wall_edge_does_not_collide() {
        let probe = Rect::new(16.0, 10.0, 8.0, 8.0);
        assert!(!collides_with_map_layer(&probe, Some(&wall_layer())));
    }

    #[test]
    fn box_inside_wall_collides() {
        let probe = Rect::new(12.0, 10.0, 8.0, 8.0);
        assert!(collides_with_map_layer(&probe, Some(&wall_layer())));
    }

    #[test]
    fn missing_or_empty_layer_never_collides() {
        let probe = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(!collides_with_map_layer(&probe, None));
        assert!(!collides_with_map_layer(&probe, Some(&MapLayer::new(COLLISION_LAYER))));
    }

    #[test]
    fn entity_check_excludes_self() {
        let bounds = Rect::new(0.0, 0.0, 8.0, 8.0);
        let others = [EntityBox {
            id: EntityId(1),
            bounds,
        }];
        assert!(!collides_with_entities(&bounds, &others, EntityId(1)));
        assert!(collides_with_entities(&bounds, &others, EntityId(2)));
        assert!(!collides_with_entities(&bounds, &[], EntityId(2)));
    }

    #[test]
    fn box_lookup_finds_by_id() {
        let others = vec![
            EntityBox {
                id: EntityId(3),
                bounds: Rect::new(1.0, 1.0, 1.0, 1.0),
            },
            EntityBox {
                id: EntityId(5),
                bounds: Rect::new(2.0, 2.0, 1.0, 1.0),
            },
        ];
        assert_eq!(
            others.current_box(EntityId(5)),
            Some(Rect::new(2.0, 2.0, 1.0, 1.0))
        );
        assert_eq!(others.current_box(EntityId(9)), None);
    }
}
