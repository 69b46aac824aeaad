use tracing::{debug, info, warn};

use crate::geometry::{Rect, Vec2};
use crate::map::{MapLayer, MapManager, MapType};

#[derive(Debug, Clone, PartialEq)]
pub struct MapTransition {
    pub from: MapType,
    pub to: MapType,
    /// Position on the source map when the zone was entered.
    pub departed_from: Vec2,
    /// Destination start position; both current and next are reset to it.
    pub start_position: Vec2,
}

/// Detects portal zones and switches maps.
///
/// After a transition the trigger stays disarmed until the entity's box is
/// clear of every portal zone on the current map, so spawning inside a zone
/// never bounces the entity straight back. Zones leading to the map already
/// loaded are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalTrigger {
    armed: bool,
}

impl Default for PortalTrigger {
    fn default() -> Self {
        Self { armed: true }
    }
}

impl PortalTrigger {
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn check_portals(
        &mut self,
        bounds: &Rect,
        current_position: Vec2,
        maps: &mut MapManager,
    ) -> Option<MapTransition> {
        let from = maps.current_map_type()?;
        let Some(layer) = maps.portal_layer() else {
            debug!(map = %from, "portal_layer_missing");
            self.armed = true;
            return None;
        };

        if !self.armed {
            if layer.overlapping(bounds).next().is_none() {
                debug!(map = %from, "portal_trigger_rearmed");
                self.armed = true;
            }
            return None;
        }

        let to = first_resolvable_zone(layer, bounds, from, maps)?;

        maps.set_closest_start_position(current_position);
        if let Err(error) = maps.load_map(to) {
            warn!(from = %from, to = %to, error = %error, "portal_load_failed");
            return None;
        }
        self.armed = false;

        let start_position = maps.player_start_unit_scaled();
        info!(
            from = %from,
            to = %to,
            start_x = start_position.x,
            start_y = start_position.y,
            "portal_activated"
        );
        Some(MapTransition {
            from,
            to,
            departed_from: current_position,
            start_position,
        })
    }
}

fn first_resolvable_zone(
    layer: &MapLayer,
    bounds: &Rect,
    current: MapType,
    maps: &MapManager,
) -> Option<MapType> {
    for zone in layer.overlapping(bounds) {
        let Some(name) = zone.name() else {
            continue;
        };
        let Some(target) = MapType::from_token(name) else {
            debug!(zone = name, "portal_zone_unresolved");
            continue;
        };
        if target == current {
            continue;
        }
        if !maps.is_registered(target) {
            warn!(zone = name, "portal_target_not_registered");
            continue;
        }
        return Some(target);
    }
    None
}
