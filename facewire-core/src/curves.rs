/// Analytic face curves built from ellipse and line samples
use log::trace;
use nalgebra::Point3;
use std::f32::consts::TAU;
use std::str::FromStr;

use crate::error::{FaceError, Result};
use crate::geometry::{Curve, Wireframe};
use crate::params::{FaceParams, Spans};

const JAW_SAMPLES: usize = 50;
const EYE_SAMPLES: usize = 32;
const MOUTH_SAMPLES: usize = 40;
const NOSE_LINE_SAMPLES: usize = 20;
const NOSE_TIP_SAMPLES: usize = 10;

/// Coordinate plane an ellipse is drawn in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Constant height
    Xy,
    /// Constant depth, facing the camera
    Xz,
    /// Constant horizontal offset, a side profile
    Yz,
}

impl FromStr for Plane {
    type Err = FaceError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "xy" => Ok(Plane::Xy),
            "xz" => Ok(Plane::Xz),
            "yz" => Ok(Plane::Yz),
            _ => Err(FaceError::UnknownPlane(s.to_string())),
        }
    }
}

/// `n + 1` samples around a full ellipse; the last sample repeats the first
pub fn ellipse_points(
    center: Point3<f32>,
    radii: (f32, f32),
    plane: Plane,
    n: usize,
) -> Vec<Point3<f32>> {
    let n = n.max(1);
    (0..=n)
        .map(|i| {
            // wrap the final sample onto the first so the loop closes exactly
            let theta = TAU * (i % n) as f32 / n as f32;
            let u = theta.cos() * radii.0;
            let v = theta.sin() * radii.1;
            match plane {
                Plane::Xy => Point3::new(center.x + u, center.y + v, center.z),
                Plane::Xz => Point3::new(center.x + u, center.y, center.z + v),
                Plane::Yz => Point3::new(center.x, center.y + u, center.z + v),
            }
        })
        .collect()
}

/// `n + 1` evenly spaced samples from `start` to `end` inclusive
pub fn line_points(start: Point3<f32>, end: Point3<f32>, n: usize) -> Vec<Point3<f32>> {
    let n = n.max(1);
    (0..=n)
        .map(|i| {
            let t = i as f32 / n as f32;
            start + (end - start) * t
        })
        .collect()
}

/// Vertical and depth placement of the facial features
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchors {
    pub eye_z: f32,
    pub nose_top_z: f32,
    pub nose_base_z: f32,
    pub mouth_z: f32,
    pub chin_z: f32,
    pub nose_tip_y: f32,
    pub cheek_y: f32,
    pub chin_y: f32,
}

impl Anchors {
    pub fn from_params(params: &FaceParams) -> Self {
        let height = params.face_height;
        let depth = params.face_depth;

        let eye_z = 0.2 * height;
        let nose_height = params.nose_height.min(0.5 * height);
        let nose_base_z = eye_z - nose_height;
        let mouth_z = nose_base_z - 0.2 * height;

        Self {
            eye_z,
            nose_top_z: eye_z + 0.1 * height,
            nose_base_z,
            mouth_z,
            chin_z: mouth_z - 0.25 * height,
            nose_tip_y: depth,
            cheek_y: 0.1 * depth,
            chin_y: 0.05 * depth,
        }
    }
}

/// Generate every named face curve for the given sliders.
///
/// `spans` are offsets from the midline, as returned by
/// [`FaceParams::half_spans`]: the eye centres sit at `±eye_distance`,
/// the nose base and jaw reach `±nose_width` and `±jaw_width`.
pub fn generate_curves(params: &FaceParams, spans: &Spans) -> Wireframe {
    let anchors = Anchors::from_params(params);
    let mut wireframe = Wireframe::new();

    // Jaw: half an ellipse from the right cheek round the chin. The
    // negative vertical radius puts the first half of the sweep below the
    // centre line.
    let jaw_center_z = (anchors.nose_base_z + anchors.chin_z) / 2.0;
    let jaw_radius_z = (anchors.nose_base_z - anchors.chin_z).abs() / 2.0;
    let mut jaw = ellipse_points(
        Point3::new(0.0, anchors.chin_y, jaw_center_z),
        (spans.jaw_width, -jaw_radius_z),
        Plane::Xz,
        JAW_SAMPLES,
    );
    jaw.truncate(JAW_SAMPLES / 2 + 1);
    wireframe.add_curve(Curve::new("jaw", jaw));

    wireframe.add_curve(Curve::new(
        "nose_bridge",
        line_points(
            Point3::new(0.0, 0.0, anchors.nose_top_z),
            Point3::new(0.0, 0.0, anchors.nose_base_z),
            NOSE_LINE_SAMPLES,
        ),
    ));

    wireframe.add_curve(Curve::new(
        "nose_base",
        line_points(
            Point3::new(-spans.nose_width, 0.0, anchors.nose_base_z),
            Point3::new(spans.nose_width, 0.0, anchors.nose_base_z),
            NOSE_LINE_SAMPLES,
        ),
    ));

    wireframe.add_curve(Curve::new(
        "nose_tip",
        line_points(
            Point3::new(0.0, 0.0, anchors.nose_base_z),
            Point3::new(0.0, anchors.nose_tip_y, anchors.nose_base_z),
            NOSE_TIP_SAMPLES,
        ),
    ));

    let eye_radii = (params.eye_size, params.eye_size * 0.6);
    for (name, x) in [("left_eye", -spans.eye_distance), ("right_eye", spans.eye_distance)] {
        wireframe.add_curve(Curve::new(
            name,
            ellipse_points(
                Point3::new(x, 0.0, anchors.eye_z),
                eye_radii,
                Plane::Xz,
                EYE_SAMPLES,
            ),
        ));
    }

    wireframe.add_curve(Curve::new(
        "mouth",
        ellipse_points(
            Point3::new(0.0, 0.0, anchors.mouth_z),
            (spans.jaw_width * 0.4, 0.05 * params.face_height),
            Plane::Xz,
            MOUTH_SAMPLES,
        ),
    ));

    for curve in &wireframe.curves {
        trace!("curve {}: {} samples", curve.name, curve.points.len());
    }
    wireframe
}
