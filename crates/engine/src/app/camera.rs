use crate::geometry::Vec2;

pub const PIXELS_PER_UNIT: f32 = 32.0;
pub const CAMERA_ZOOM_DEFAULT: f32 = 1.0;
pub const CAMERA_ZOOM_MIN: f32 = 0.5;
pub const CAMERA_ZOOM_MAX: f32 = 2.0;
pub const CAMERA_ZOOM_STEP: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Projection inputs captured by the last [`Camera2D::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
struct Projection {
    center: Vec2,
    pixels_per_unit: f32,
    viewport: Viewport,
}

/// Orthographic camera in unit-scale world space.
///
/// `position`, `zoom` and `viewport` take effect on the next `update()`;
/// `project`/`unproject` use the projection captured then.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    pub position: Vec2,
    pub zoom: f32,
    pub viewport: Viewport,
    pixels_per_unit: f32,
    projection: Projection,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::new(Viewport::default(), PIXELS_PER_UNIT)
    }
}

impl Camera2D {
    pub fn new(viewport: Viewport, pixels_per_unit: f32) -> Self {
        let mut camera = Self {
            position: Vec2::ZERO,
            zoom: CAMERA_ZOOM_DEFAULT,
            viewport,
            pixels_per_unit,
            projection: Projection {
                center: Vec2::ZERO,
                pixels_per_unit,
                viewport,
            },
        };
        camera.update();
        camera
    }

    pub fn update(&mut self) {
        let scale = self.pixels_per_unit * self.effective_zoom();
        self.projection = Projection {
            center: self.position,
            pixels_per_unit: if scale > 0.0 && scale.is_finite() {
                scale
            } else {
                PIXELS_PER_UNIT
            },
            viewport: self.viewport,
        };
    }

    pub fn effective_zoom(&self) -> f32 {
        clamp_camera_zoom(self.zoom)
    }

    pub fn set_zoom_clamped(&mut self, zoom: f32) {
        self.zoom = clamp_camera_zoom(zoom);
    }

    pub fn apply_zoom_steps(&mut self, steps: i32) {
        if steps == 0 {
            return;
        }
        let target_zoom = self.zoom + steps as f32 * CAMERA_ZOOM_STEP;
        self.set_zoom_clamped(target_zoom);
    }

    pub fn center_on(&mut self, position: Vec2) {
        self.position = position;
        self.update();
    }

    /// Screen pixels (origin top-left, y-down) to world units (y-up).
    pub fn unproject(&self, screen_px: Vec2) -> Vec2 {
        let projection = &self.projection;
        let half_w = projection.viewport.width as f32 * 0.5;
        let half_h = projection.viewport.height as f32 * 0.5;
        Vec2 {
            x: projection.center.x + (screen_px.x - half_w) / projection.pixels_per_unit,
            y: projection.center.y + (half_h - screen_px.y) / projection.pixels_per_unit,
        }
    }

    pub fn project(&self, world: Vec2) -> Vec2 {
        let projection = &self.projection;
        let half_w = projection.viewport.width as f32 * 0.5;
        let half_h = projection.viewport.height as f32 * 0.5;
        Vec2 {
            x: (world.x - projection.center.x) * projection.pixels_per_unit + half_w,
            y: half_h - (world.y - projection.center.y) * projection.pixels_per_unit,
        }
    }
}

fn clamp_camera_zoom(zoom: f32) -> f32 {
    if !zoom.is_finite() {
        return CAMERA_ZOOM_DEFAULT;
    }
    zoom.clamp(CAMERA_ZOOM_MIN, CAMERA_ZOOM_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_800x600(ppu: f32) -> Camera2D {
        Camera2D::new(
            Viewport {
                width: 800,
                height: 600,
            },
            ppu,
        )
    }

    #[test]
    fn viewport_center_unprojects_to_camera_position() {
        let mut camera = camera_800x600(32.0);
        camera.center_on(Vec2::new(10.0, 10.0));
        assert_eq!(camera.unproject(Vec2::new(400.0, 300.0)), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn origin_projects_to_viewport_center() {
        let camera = camera_800x600(32.0);
        assert_eq!(camera.project(Vec2::ZERO), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn camera_offset_shifts_screen_position() {
        let mut camera = camera_800x600(10.0);
        camera.center_on(Vec2::new(10.0, -5.0));
        assert_eq!(camera.project(Vec2::new(12.0, -4.0)), Vec2::new(420.0, 290.0));
        assert_eq!(camera.unproject(Vec2::new(420.0, 290.0)), Vec2::new(12.0, -4.0));
    }

    #[test]
    fn position_change_needs_update_before_unproject_sees_it() {
        let mut camera = camera_800x600(32.0);
        camera.position = Vec2::new(5.0, 5.0);
        assert_eq!(camera.unproject(Vec2::new(400.0, 300.0)), Vec2::ZERO);
        camera.update();
        assert_eq!(camera.unproject(Vec2::new(400.0, 300.0)), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn apply_zoom_steps_clamps_at_bounds() {
        let mut camera = Camera2D::default();
        camera.apply_zoom_steps(50);
        assert_eq!(camera.effective_zoom(), CAMERA_ZOOM_MAX);
        camera.apply_zoom_steps(-100);
        assert_eq!(camera.effective_zoom(), CAMERA_ZOOM_MIN);
    }
}
