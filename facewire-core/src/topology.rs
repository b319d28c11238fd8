/// Static landmark topologies for the male and female face presets
use log::debug;
use nalgebra::Point3;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::{FaceError, Result};
use crate::geometry::Side;

/// Face preset selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Preset {
    #[default]
    Male,
    Female,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Male, Preset::Female];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Male => "male",
            Preset::Female => "female",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = FaceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Preset::Male),
            "female" => Ok(Preset::Female),
            _ => Err(FaceError::UnknownPreset(s.to_string())),
        }
    }
}

/// Landmark names mapped to coordinates (x horizontal, y depth, z vertical)
pub type LandmarkSet = BTreeMap<&'static str, Point3<f32>>;

/// An eye circle anchored on a landmark
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeDescriptor {
    pub side: Side,
    pub center_key: &'static str,
    pub radius: f32,
}

/// Landmarks, edges and eye circles for one preset
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    pub preset: Preset,
    pub points: LandmarkSet,
    pub edges: Vec<(&'static str, &'static str)>,
    pub eyes: [EyeDescriptor; 2],
}

impl Topology {
    /// Build a topology from raw tables and check that every edge and eye
    /// refers to a declared landmark.
    pub fn from_tables(
        preset: Preset,
        points: &[(&'static str, [f32; 3])],
        edges: &[(&'static str, &'static str)],
        eyes: [EyeDescriptor; 2],
    ) -> Result<Self> {
        let topology = Self {
            preset,
            points: points
                .iter()
                .map(|&(name, [x, y, z])| (name, Point3::new(x, y, z)))
                .collect(),
            edges: edges.to_vec(),
            eyes,
        };
        topology.validate()?;
        Ok(topology)
    }

    pub fn validate(&self) -> Result<()> {
        for &(a, b) in &self.edges {
            for landmark in [a, b] {
                if !self.points.contains_key(landmark) {
                    return Err(self.missing(landmark, format!("edge {a}-{b}")));
                }
            }
        }
        for eye in &self.eyes {
            if !self.points.contains_key(eye.center_key) {
                return Err(self.missing(eye.center_key, format!("{} eye", eye.side)));
            }
        }
        Ok(())
    }

    pub fn landmark_names(&self) -> BTreeSet<&'static str> {
        self.points.keys().copied().collect()
    }

    fn missing(&self, landmark: &str, context: String) -> FaceError {
        FaceError::MissingLandmark {
            preset: self.preset.to_string(),
            landmark: landmark.to_string(),
            context,
        }
    }
}

/// Both presets must declare the same landmark names so the deformation
/// rules and edge lists work unmodified against either.
pub fn check_parity(a: &Topology, b: &Topology) -> Result<()> {
    let names_a = a.landmark_names();
    let names_b = b.landmark_names();
    match names_a.symmetric_difference(&names_b).next() {
        Some(landmark) => Err(FaceError::PresetMismatch {
            landmark: landmark.to_string(),
        }),
        None => Ok(()),
    }
}

struct Registry {
    male: Topology,
    female: Topology,
}

fn load_registry() -> Result<Registry> {
    let male = Topology::from_tables(Preset::Male, MALE_POINTS, FACE_EDGES, MALE_EYES)?;
    let female = Topology::from_tables(Preset::Female, FEMALE_POINTS, FACE_EDGES, FEMALE_EYES)?;
    check_parity(&male, &female)?;
    debug!(
        "loaded face topologies: {} landmarks, {} edges",
        male.points.len(),
        male.edges.len()
    );
    Ok(Registry { male, female })
}

/// Look up the validated topology for a preset. Tables are loaded and
/// checked once per process; a broken table fails every lookup.
pub fn get_topology(preset: Preset) -> Result<&'static Topology> {
    static REGISTRY: OnceLock<Result<Registry>> = OnceLock::new();
    match REGISTRY.get_or_init(load_registry) {
        Ok(registry) => Ok(match preset {
            Preset::Male => &registry.male,
            Preset::Female => &registry.female,
        }),
        Err(err) => Err(err.clone()),
    }
}

// Symmetric landmark pairs, left first
pub const MIRROR_PAIRS: &[(&str, &str)] = &[
    ("temple_l", "temple_r"),
    ("cheek_l", "cheek_r"),
    ("jaw_l", "jaw_r"),
    ("nostril_l", "nostril_r"),
    ("mouth_l", "mouth_r"),
    ("brow_l", "brow_r"),
    ("eye_c_l", "eye_c_r"),
];

const FACE_EDGES: &[(&str, &str)] = &[
    // Head outline
    ("top", "temple_l"),
    ("temple_l", "cheek_l"),
    ("cheek_l", "jaw_l"),
    ("jaw_l", "chin"),
    ("chin", "jaw_r"),
    ("jaw_r", "cheek_r"),
    ("cheek_r", "temple_r"),
    ("temple_r", "top"),
    // Nose
    ("nose_top", "nose_mid"),
    ("nose_mid", "nose_base"),
    ("nostril_l", "nose_base"),
    ("nostril_r", "nose_base"),
    // Mouth
    ("mouth_l", "mouth_top"),
    ("mouth_top", "mouth_r"),
    ("mouth_l", "mouth_bot"),
    ("mouth_bot", "mouth_r"),
    // Brows
    ("brow_l", "nose_top"),
    ("brow_r", "nose_top"),
];

// Depth starts at zero everywhere; face_depth scales it.
const MALE_POINTS: &[(&str, [f32; 3])] = &[
    ("top", [0.0, 0.0, 0.95]),
    ("temple_l", [-0.65, 0.0, 0.75]),
    ("cheek_l", [-0.78, 0.0, 0.10]),
    ("jaw_l", [-0.55, 0.0, -0.55]),
    ("chin", [0.0, 0.0, -0.78]),
    ("jaw_r", [0.55, 0.0, -0.55]),
    ("cheek_r", [0.78, 0.0, 0.10]),
    ("temple_r", [0.65, 0.0, 0.75]),
    ("nose_top", [0.0, 0.0, 0.55]),
    ("nose_mid", [0.0, 0.0, 0.25]),
    ("nose_base", [0.0, 0.0, 0.05]),
    ("nostril_l", [-0.12, 0.0, 0.02]),
    ("nostril_r", [0.12, 0.0, 0.02]),
    ("mouth_l", [-0.28, 0.0, -0.25]),
    ("mouth_r", [0.28, 0.0, -0.25]),
    ("mouth_top", [0.0, 0.0, -0.20]),
    ("mouth_bot", [0.0, 0.0, -0.33]),
    ("brow_l", [-0.35, 0.0, 0.45]),
    ("brow_r", [0.35, 0.0, 0.45]),
    ("eye_c_l", [-0.28, 0.0, 0.35]),
    ("eye_c_r", [0.28, 0.0, 0.35]),
];

const MALE_EYES: [EyeDescriptor; 2] = [
    EyeDescriptor {
        side: Side::Left,
        center_key: "eye_c_l",
        radius: 0.11,
    },
    EyeDescriptor {
        side: Side::Right,
        center_key: "eye_c_r",
        radius: 0.11,
    },
];

// Softer proportions: narrower jaw, smaller nose, slightly larger eyes
const FEMALE_POINTS: &[(&str, [f32; 3])] = &[
    ("top", [0.0, 0.0, 0.98]),
    ("temple_l", [-0.60, 0.0, 0.78]),
    ("cheek_l", [-0.72, 0.0, 0.12]),
    ("jaw_l", [-0.50, 0.0, -0.55]),
    ("chin", [0.0, 0.0, -0.75]),
    ("jaw_r", [0.50, 0.0, -0.55]),
    ("cheek_r", [0.72, 0.0, 0.12]),
    ("temple_r", [0.60, 0.0, 0.78]),
    ("nose_top", [0.0, 0.0, 0.58]),
    ("nose_mid", [0.0, 0.0, 0.28]),
    ("nose_base", [0.0, 0.0, 0.06]),
    ("nostril_l", [-0.10, 0.0, 0.03]),
    ("nostril_r", [0.10, 0.0, 0.03]),
    ("mouth_l", [-0.26, 0.0, -0.23]),
    ("mouth_r", [0.26, 0.0, -0.23]),
    ("mouth_top", [0.0, 0.0, -0.19]),
    ("mouth_bot", [0.0, 0.0, -0.31]),
    ("brow_l", [-0.33, 0.0, 0.47]),
    ("brow_r", [0.33, 0.0, 0.47]),
    ("eye_c_l", [-0.27, 0.0, 0.36]),
    ("eye_c_r", [0.27, 0.0, 0.36]),
];

const FEMALE_EYES: [EyeDescriptor; 2] = [
    EyeDescriptor {
        side: Side::Left,
        center_key: "eye_c_l",
        radius: 0.12,
    },
    EyeDescriptor {
        side: Side::Right,
        center_key: "eye_c_r",
        radius: 0.12,
    },
];
