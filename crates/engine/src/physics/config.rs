use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Vec2;

use super::bounds::{Anchor, BoxSpec};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhysicsConfig {
    /// Unit-scale length of one map pixel (1 / tile size in pixels).
    pub unit_scale: f32,
    /// Walking speed in units per second, per axis.
    pub walk_velocity: Vec2,
    /// Frames with a longer delta do not advance the next position.
    pub max_step_seconds: f32,
    /// Map-space distance between box origins allowed for a selection.
    pub selection_max_distance: f32,
    pub player_box: BoxSpec,
    pub npc_box: BoxSpec,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            unit_scale: 1.0 / 16.0,
            walk_velocity: Vec2::new(2.0, 2.0),
            max_step_seconds: 0.7,
            selection_max_distance: 32.0,
            player_box: BoxSpec {
                frame_width: 16.0,
                frame_height: 16.0,
                width_reduction: 0.3,
                height_reduction: 0.5,
                anchor: Anchor::BottomCenter,
            },
            npc_box: BoxSpec {
                frame_width: 16.0,
                frame_height: 16.0,
                width_reduction: 0.4,
                height_reduction: 0.15,
                anchor: Anchor::Center,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must be a non-negative finite number, got {value}")]
    Negative { field: &'static str, value: f32 },
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("unit_scale", self.unit_scale)?;
        require_positive("walk_velocity.x", self.walk_velocity.x)?;
        require_positive("walk_velocity.y", self.walk_velocity.y)?;
        require_positive("max_step_seconds", self.max_step_seconds)?;
        require_non_negative("selection_max_distance", self.selection_max_distance)?;
        require_positive("player_box.frame_width", self.player_box.frame_width)?;
        require_positive("player_box.frame_height", self.player_box.frame_height)?;
        require_positive("npc_box.frame_width", self.npc_box.frame_width)?;
        require_positive("npc_box.frame_height", self.npc_box.frame_height)?;
        Ok(())
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(PhysicsConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: PhysicsConfig =
            serde_json::from_str(r#"{ "unit_scale": 0.03125, "player_box": { "anchor": "center" } }"#)
                .expect("parse");
        assert_eq!(config.unit_scale, 0.03125);
        assert_eq!(config.player_box.anchor, Anchor::Center);
        assert_eq!(config.player_box.frame_width, 16.0);
        assert_eq!(config.selection_max_distance, 32.0);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_str::<PhysicsConfig>(r#"{ "gravity": 9.8 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn zero_unit_scale_is_invalid() {
        let config = PhysicsConfig {
            unit_scale: 0.0,
            ..PhysicsConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "unit_scale",
                value: 0.0
            })
        );
    }

    #[test]
    fn npc_frame_is_validated() {
        let mut config = PhysicsConfig::default();
        config.npc_box.frame_height = -1.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "npc_box.frame_height",
                value: -1.0
            })
        );
    }
}
