/// Slider-driven edits of a landmark topology
use log::trace;

use crate::geometry::EyeRing;
use crate::params::{FaceParams, Spans};
use crate::topology::{LandmarkSet, Topology};

const EYE_CENTERS: (&str, &str) = ("eye_c_l", "eye_c_r");
const NOSTRILS: [&str; 2] = ["nostril_l", "nostril_r"];
const NOSE_RIDGE: (&str, &str, &str) = ("nose_top", "nose_mid", "nose_base");
const NOSE_MID_FRACTION: f32 = 0.6;

/// Landmarks whose horizontal position follows the jaw width slider
pub const JAW_GROUP: [&str; 6] = [
    "temple_l", "cheek_l", "jaw_l", "temple_r", "cheek_r", "jaw_r",
];

/// Apply the slider rules to a fresh copy of the topology's landmarks.
///
/// Rules run in a fixed order: height/depth scaling, eye centres, nostrils,
/// nose ridge, jaw group. A rule whose landmarks are absent is skipped.
/// Jaw scaling is relative to the preset's default jaw width.
pub fn deform(topology: &Topology, params: &FaceParams, spans: &Spans) -> LandmarkSet {
    let base = &topology.points;
    let baseline = FaceParams::preset_defaults(topology.preset);

    let mut points: LandmarkSet = base
        .iter()
        .map(|(&name, p)| {
            let mut q = *p;
            q.z = p.z * params.face_height;
            q.y = p.y * params.face_depth;
            (name, q)
        })
        .collect();

    let (left, right) = EYE_CENTERS;
    if points.contains_key(left) && points.contains_key(right) {
        let half = spans.eye_distance.abs();
        set_x(&mut points, left, -half);
        set_x(&mut points, right, half);
    }

    for name in NOSTRILS {
        if let Some(base_point) = base.get(name) {
            set_x(&mut points, name, signum(base_point.x) * spans.nose_width.abs());
        }
    }

    let (top, mid, bottom) = NOSE_RIDGE;
    if let (Some(top_z), true, true) = (
        points.get(top).map(|p| p.z),
        points.contains_key(mid),
        points.contains_key(bottom),
    ) {
        set_z(&mut points, mid, top_z - params.nose_height * NOSE_MID_FRACTION);
        set_z(&mut points, bottom, top_z - params.nose_height);
    }

    let jaw_scale = spans.jaw_width / baseline.jaw_width;
    for name in JAW_GROUP {
        if let Some(base_point) = base.get(name) {
            set_x(&mut points, name, signum(base_point.x) * base_point.x.abs() * jaw_scale);
        }
    }

    trace!(
        "deformed {} landmarks for {} (jaw scale {jaw_scale:.3})",
        points.len(),
        topology.preset
    );
    points
}

/// Eye circles centred on the deformed landmarks, with radii scaled by
/// `eye_size` against the preset's default eye size.
pub fn eye_rings(topology: &Topology, points: &LandmarkSet, params: &FaceParams) -> Vec<EyeRing> {
    let baseline = FaceParams::preset_defaults(topology.preset);
    let scale = params.eye_size / baseline.eye_size;
    topology
        .eyes
        .iter()
        .filter_map(|eye| {
            points.get(eye.center_key).map(|&center| EyeRing {
                side: eye.side,
                center,
                radius: eye.radius * scale,
            })
        })
        .collect()
}

// Zero maps to zero, unlike f32::signum
fn signum(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

fn set_x(points: &mut LandmarkSet, name: &str, x: f32) {
    if let Some(p) = points.get_mut(name) {
        p.x = x;
    }
}

fn set_z(points: &mut LandmarkSet, name: &str, z: f32) {
    if let Some(p) = points.get_mut(name) {
        p.z = z;
    }
}
