/// Pinhole camera and perspective projection
use log::warn;
use nalgebra::{Point2, Point3};

use crate::geometry::{Curve2, EyeRing2, ProjectedWireframe, Wireframe};
use crate::params::FaceParams;
use crate::transform::RotationState;

/// Substituted for a depth of exactly zero
const DEPTH_EPSILON: f32 = 1e-6;

/// Camera on the positive depth axis looking back at the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub rotation: RotationState,
    pub distance: f32,
    /// Scale applied after the perspective divide; larger zooms in
    pub fov: f32,
}

impl Camera {
    pub fn new(rotation: RotationState, distance: f32, fov: f32) -> Self {
        Self {
            rotation,
            distance,
            fov,
        }
    }

    pub fn from_params(params: &FaceParams) -> Self {
        Self::new(
            RotationState::new(params.yaw, params.pitch),
            params.camera_distance,
            params.fov,
        )
    }

    /// Rotate then project a single point
    pub fn project_point(&self, point: &Point3<f32>) -> Point2<f32> {
        let rotated = self.rotation.rotation_matrix() * point;
        perspective(&rotated, self.distance, self.fov)
    }

    /// Rotate and project every curve and eye centre of a wireframe.
    /// Eye radii stay in model units; the rasterizer scales them.
    pub fn project_wireframe(&self, wireframe: &Wireframe) -> ProjectedWireframe {
        let rotation = self.rotation.rotation_matrix();
        let project = |p: &Point3<f32>| perspective(&(rotation * p), self.distance, self.fov);

        ProjectedWireframe {
            curves: wireframe
                .curves
                .iter()
                .map(|curve| Curve2 {
                    name: curve.name.clone(),
                    points: curve.points.iter().map(project).collect(),
                })
                .collect(),
            eyes: wireframe
                .eyes
                .iter()
                .map(|eye| EyeRing2 {
                    side: eye.side,
                    center: project(&eye.center),
                    radius: eye.radius,
                })
                .collect(),
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_params(&FaceParams::default())
    }
}

/// Project already-rotated points to normalized camera units
pub fn project_points(points: &[Point3<f32>], camera_distance: f32, fov: f32) -> Vec<Point2<f32>> {
    points
        .iter()
        .map(|p| perspective(p, camera_distance, fov))
        .collect()
}

fn perspective(point: &Point3<f32>, camera_distance: f32, fov: f32) -> Point2<f32> {
    let mut relative_depth = camera_distance - point.y;
    if relative_depth == 0.0 {
        warn!("point at the camera plane, substituting depth {DEPTH_EPSILON}");
        relative_depth = DEPTH_EPSILON;
    }
    Point2::new(
        point.x / relative_depth * fov,
        point.z / relative_depth * fov,
    )
}
