use glam::Mat4;
use meshview_common::Viewport;

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            aspect: viewport.aspect().unwrap_or(1.0),
            ..Self::default()
        }
    }

    /// Recompute the aspect ratio for a resized framebuffer. A degenerate
    /// (minimised) viewport keeps the previous aspect.
    pub fn resize(&mut self, viewport: Viewport) {
        if let Some(aspect) = viewport.aspect() {
            self.aspect = aspect;
        }
    }

    /// Right-handed perspective matrix with a [0, 1] depth range.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y: 45.0,
            aspect: 800.0 / 600.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn default_parameters() {
        let p = Projection::new(Viewport::new(800, 600));
        assert_eq!(p.fov_y, 45.0);
        assert_eq!(p.near, 0.1);
        assert_eq!(p.far, 100.0);
        assert!((p.aspect - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut p = Projection::new(Viewport::new(800, 600));
        p.resize(Viewport::new(1920, 1080));
        assert!((p.aspect - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn minimised_window_keeps_aspect() {
        let mut p = Projection::new(Viewport::new(800, 600));
        p.resize(Viewport::new(0, 0));
        assert!((p.aspect - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn near_and_far_planes_map_to_depth_range() {
        let m = Projection::default().matrix();
        let near = m.project_point3(Vec3::new(0.0, 0.0, -0.1));
        let far = m.project_point3(Vec3::new(0.0, 0.0, -100.0));
        assert!(near.z.abs() < 1e-4);
        assert!((far.z - 1.0).abs() < 1e-4);
    }
}
