use glam::{Mat4, Vec3};
use meshview_common::MoveDirection;

/// Pitch is kept strictly inside ±90° to avoid the look-at singularity.
pub const PITCH_LIMIT: f32 = 89.0;
/// Movement speed in world units per second.
pub const DEFAULT_MOVE_SPEED: f32 = 2.5;
/// Degrees of rotation per unit of cursor movement.
pub const DEFAULT_SENSITIVITY: f32 = 0.1;

/// Free-fly camera with yaw/pitch orientation in degrees.
///
/// `front` is derived from yaw and pitch and only recomputed by
/// [`rotate`](Self::rotate). Yaw is unbounded; it wraps through the
/// trigonometric functions.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    front: Vec3,
    up: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            yaw: -90.0,
            pitch: 0.0,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
        }
    }
}

impl Camera {
    /// Camera at `position` looking along the direction given by `yaw` and
    /// `pitch` (degrees). Pitch is clamped.
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        let pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        Self {
            position,
            yaw,
            pitch,
            front: front_from_angles(yaw, pitch),
            up: Vec3::Y,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Fixed world-up reference.
    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.front.cross(self.up).normalize()
    }

    /// Apply a look offset. `yoffset` is positive for "look up".
    pub fn rotate(&mut self, xoffset: f32, yoffset: f32, sensitivity: f32) {
        self.yaw += xoffset * sensitivity;
        self.pitch = (self.pitch + yoffset * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.front = front_from_angles(self.yaw, self.pitch);
    }

    /// Move `speed * delta_time` units along the axis for `direction`.
    pub fn translate(&mut self, direction: MoveDirection, speed: f32, delta_time: f32) {
        let velocity = speed * delta_time;
        let axis = match direction {
            MoveDirection::Forward | MoveDirection::Backward => self.front,
            MoveDirection::Left | MoveDirection::Right => self.right(),
            MoveDirection::Up | MoveDirection::Down => self.up,
        };
        self.position += axis * (direction.sign() * velocity);
    }

    /// Right-handed look-at from the camera position along `front`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }
}

fn front_from_angles(yaw: f32, pitch: f32) -> Vec3 {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    Vec3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn default_camera() {
        let cam = Camera::default();
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(cam.front(), Vec3::NEG_Z);
        let view = cam.view_matrix();
        assert!(!view.col(0).x.is_nan());
    }

    #[test]
    fn new_derives_front_from_angles() {
        let cam = Camera::new(Vec3::ZERO, -90.0, 0.0);
        assert!(cam.front().abs_diff_eq(Vec3::NEG_Z, EPS));
        assert!(cam.right().abs_diff_eq(Vec3::X, EPS));
    }

    #[test]
    fn mouse_offset_turns_yaw() {
        let mut cam = Camera::default();
        cam.rotate(100.0, 0.0, 0.1);
        assert!((cam.yaw() - -80.0).abs() < EPS);
        assert_eq!(cam.pitch(), 0.0);

        let expected = Vec3::new((-80.0f32).to_radians().cos(), 0.0, (-80.0f32).to_radians().sin());
        assert!(cam.front().abs_diff_eq(expected.normalize(), EPS));
    }

    #[test]
    fn pitch_saturates() {
        let mut cam = Camera::default();
        for _ in 0..200 {
            cam.rotate(0.0, 1000.0, 0.1);
            assert!(cam.pitch() <= PITCH_LIMIT);
        }
        assert_eq!(cam.pitch(), 89.0);
        cam.rotate(0.0, 5.0, 0.1);
        assert_eq!(cam.pitch(), 89.0);

        for _ in 0..200 {
            cam.rotate(0.0, -1000.0, 0.1);
        }
        assert_eq!(cam.pitch(), -89.0);
    }

    #[test]
    fn front_stays_unit_length() {
        let mut cam = Camera::default();
        let offsets = [(3.0, 7.0), (-1200.0, 40.0), (0.5, -900.0), (72000.0, 13.0)];
        for (dx, dy) in offsets {
            cam.rotate(dx, dy, 0.1);
            assert!((cam.front().length() - 1.0).abs() < EPS);
            assert!((-PITCH_LIMIT..=PITCH_LIMIT).contains(&cam.pitch()));
        }
    }

    #[test]
    fn yaw_wraps_without_clamping() {
        let mut cam = Camera::default();
        let before = cam.front();
        cam.rotate(3600.0, 0.0, 0.1);
        assert!((cam.yaw() - 270.0).abs() < 1e-3);
        assert!(cam.front().abs_diff_eq(before, 1e-4));
    }

    #[test]
    fn zero_delta_time_does_not_move() {
        let mut cam = Camera::default();
        cam.rotate(37.0, 12.0, 0.1);
        let start = cam.position();
        for dir in MoveDirection::ALL {
            cam.translate(dir, DEFAULT_MOVE_SPEED, 0.0);
            assert_eq!(cam.position(), start);
        }
    }

    #[test]
    fn forward_then_backward_returns_home() {
        let mut cam = Camera::default();
        cam.rotate(25.0, -14.0, 0.1);
        let start = cam.position();
        cam.translate(MoveDirection::Forward, DEFAULT_MOVE_SPEED, 0.016);
        assert!(!cam.position().abs_diff_eq(start, EPS));
        cam.translate(MoveDirection::Backward, DEFAULT_MOVE_SPEED, 0.016);
        assert!(cam.position().abs_diff_eq(start, EPS));
    }

    #[test]
    fn strafe_and_vertical_axes() {
        let mut cam = Camera::default();
        cam.translate(MoveDirection::Right, 2.0, 0.5);
        assert!(cam.position().abs_diff_eq(Vec3::new(1.0, 0.0, 5.0), EPS));
        cam.translate(MoveDirection::Up, 2.0, 0.5);
        assert!(cam.position().abs_diff_eq(Vec3::new(1.0, 1.0, 5.0), EPS));
        cam.translate(MoveDirection::Left, 2.0, 0.5);
        cam.translate(MoveDirection::Down, 2.0, 0.5);
        assert!(cam.position().abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), EPS));
    }

    #[test]
    fn view_matrix_maps_target_onto_negative_z() {
        let cam = Camera::default();
        let target = cam.position() + cam.front();
        let in_view = cam.view_matrix().transform_point3(target);
        assert!(in_view.abs_diff_eq(Vec3::NEG_Z, EPS));
    }
}
