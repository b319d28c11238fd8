/// Head rotation applied before projection
use nalgebra::{Point3, Rotation3, Vector3};

/// Yaw and pitch of the head, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub yaw: f32,
    pub pitch: f32,
}

impl RotationState {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    pub fn zero() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Yaw about the vertical axis (mixes x and y), then pitch about the
    /// horizontal axis (mixes the yawed y and z).
    pub fn rotation_matrix(&self) -> Rotation3<f32> {
        let yaw = Rotation3::from_axis_angle(&Vector3::z_axis(), self.yaw.to_radians());
        let pitch = Rotation3::from_axis_angle(&Vector3::x_axis(), self.pitch.to_radians());
        pitch * yaw
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Rotate every point by the same yaw and pitch
pub fn rotate_points(points: &[Point3<f32>], yaw_deg: f32, pitch_deg: f32) -> Vec<Point3<f32>> {
    let rotation = RotationState::new(yaw_deg, pitch_deg).rotation_matrix();
    points.iter().map(|p| rotation * p).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotation_state() {
        let state = RotationState::zero();
        assert_eq!(state, RotationState::default());
        assert_eq!(state, RotationState::new(0.0, 0.0));
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = RotationState::zero().rotation_matrix();
        assert_relative_eq!(matrix, Rotation3::identity(), epsilon = 1e-6);

        let points = [Point3::new(0.3, -0.2, 0.9), Point3::new(-1.0, 4.0, 0.0)];
        for (rotated, point) in rotate_points(&points, 0.0, 0.0).iter().zip(&points) {
            assert_relative_eq!(rotated, point, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_yaw_turns_x_into_depth() {
        let rotated = rotate_points(&[Point3::new(1.0, 0.0, 0.5)], 90.0, 0.0);
        assert_relative_eq!(rotated[0], Point3::new(0.0, 1.0, 0.5), epsilon = 1e-6);
    }

    #[test]
    fn test_pitch_applies_after_yaw() {
        let rotated = rotate_points(&[Point3::new(1.0, 0.0, 0.0)], 90.0, 90.0);
        // yaw moves x onto depth, pitch then lifts depth onto vertical
        assert_relative_eq!(rotated[0], Point3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_batch_matches_single_points() {
        let points = [
            Point3::new(0.3, 0.1, 0.2),
            Point3::new(-0.5, 0.0, -0.7),
            Point3::new(0.0, 0.9, 0.4),
        ];
        let batch = rotate_points(&points, 33.0, -12.0);
        for (i, p) in points.iter().enumerate() {
            let single = rotate_points(std::slice::from_ref(p), 33.0, -12.0);
            assert_eq!(single[0], batch[i]);
        }
    }
}
