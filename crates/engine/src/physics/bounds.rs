use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{Rect, Vec2};

/// Point on the sprite frame the collision box is aligned to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    BottomLeft,
    #[default]
    BottomCenter,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoxSpec {
    pub frame_width: f32,
    pub frame_height: f32,
    /// Fraction of the frame width removed from the box, in `(0, 1)`.
    pub width_reduction: f32,
    pub height_reduction: f32,
    pub anchor: Anchor,
}

impl Default for BoxSpec {
    fn default() -> Self {
        Self {
            frame_width: 16.0,
            frame_height: 16.0,
            width_reduction: 0.0,
            height_reduction: 0.0,
            anchor: Anchor::BottomCenter,
        }
    }
}

impl BoxSpec {
    pub fn box_size(&self) -> (f32, f32) {
        (
            reduced(self.frame_width, self.width_reduction),
            reduced(self.frame_height, self.height_reduction),
        )
    }
}

fn reduced(frame: f32, reduction: f32) -> f32 {
    let keep = 1.0 - reduction;
    if keep > 0.0 && keep < 1.0 {
        frame * keep
    } else {
        frame
    }
}

/// Map-space collision box that follows a unit-scaled position.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBoxTracker {
    frame_width: f32,
    frame_height: f32,
    anchor: Anchor,
    unit_scale: f32,
    bounds: Rect,
}

impl BoundingBoxTracker {
    pub fn init_box(spec: &BoxSpec, unit_scale: f32) -> Self {
        let (width, height) = spec.box_size();
        Self::init_box_sized(
            width,
            height,
            spec.anchor,
            (spec.frame_width, spec.frame_height),
            unit_scale,
        )
    }

    pub fn init_box_sized(
        width: f32,
        height: f32,
        anchor: Anchor,
        frame: (f32, f32),
        unit_scale: f32,
    ) -> Self {
        if width == 0.0 || height == 0.0 {
            debug!(width, height, "bounding_box_has_zero_extent");
        }
        let mut tracker = Self {
            frame_width: frame.0,
            frame_height: frame.1,
            anchor,
            unit_scale,
            bounds: Rect::new(0.0, 0.0, width, height),
        };
        tracker.update_box_at(Vec2::ZERO);
        tracker
    }

    pub fn update_box_at(&mut self, position: Vec2) {
        let min = self.to_map_space(position);
        match self.anchor {
            Anchor::BottomLeft => {
                self.bounds.x = min.x;
                self.bounds.y = min.y;
            }
            Anchor::BottomCenter => self.bounds.set_center(
                min.x + self.frame_width / 2.0,
                min.y + self.frame_height / 4.0,
            ),
            Anchor::Center => self.bounds.set_center(
                min.x + self.frame_width / 2.0,
                min.y + self.frame_height / 2.0,
            ),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    fn to_map_space(&self, position: Vec2) -> Vec2 {
        if self.unit_scale > 0.0 {
            position.scaled(self.unit_scale.recip())
        } else {
            position
        }
    }
}
