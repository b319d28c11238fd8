/// Face and camera sliders, preset defaults and parameter-list parsing
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::all_consuming,
    multi::{separated_list0, separated_list1},
    number::complete::float,
    sequence::{delimited, preceded},
    IResult,
};
use std::collections::BTreeMap;

use crate::error::{FaceError, Result};
use crate::topology::Preset;

/// Declared range and default of one slider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
    pub step: f32,
}

impl ParamSpec {
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }
}

pub const PARAM_SPECS: &[ParamSpec] = &[
    spec("eye_distance", 0.10, 1.00, 0.30, 0.01),
    spec("eye_size", 0.02, 0.30, 0.12, 0.01),
    spec("nose_width", 0.02, 0.40, 0.10, 0.01),
    spec("nose_height", 0.05, 0.80, 0.30, 0.01),
    spec("jaw_width", 0.30, 1.80, 0.80, 0.01),
    spec("face_height", 0.50, 2.00, 1.00, 0.01),
    spec("face_depth", 0.00, 1.50, 0.30, 0.01),
    spec("yaw", -90.0, 90.0, 0.0, 0.5),
    spec("pitch", -60.0, 60.0, 0.0, 0.5),
    spec("camera_distance", 0.5, 10.0, 2.5, 0.1),
    spec("fov", 0.2, 5.0, 1.0, 0.1),
];

const fn spec(name: &'static str, min: f32, max: f32, default: f32, step: f32) -> ParamSpec {
    ParamSpec {
        name,
        min,
        max,
        default,
        step,
    }
}

pub fn param_spec(name: &str) -> Option<&'static ParamSpec> {
    PARAM_SPECS.iter().find(|s| s.name == name)
}

/// Key that resets every slider in a [`ResetFlags`] map
pub const RESET_ALL: &str = "all";

/// Parameter name to reset toggle
pub type ResetFlags = BTreeMap<String, bool>;

/// The eleven face and camera sliders for one render call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceParams {
    pub eye_distance: f32,
    pub eye_size: f32,
    pub nose_width: f32,
    pub nose_height: f32,
    pub jaw_width: f32,
    pub face_height: f32,
    pub face_depth: f32,
    /// Degrees
    pub yaw: f32,
    /// Degrees
    pub pitch: f32,
    pub camera_distance: f32,
    pub fov: f32,
}

impl FaceParams {
    pub fn preset_defaults(preset: Preset) -> Self {
        match preset {
            Preset::Male => Self {
                eye_distance: 0.30,
                eye_size: 0.12,
                nose_width: 0.10,
                nose_height: 0.30,
                jaw_width: 0.80,
                face_height: 1.00,
                face_depth: 0.30,
                yaw: 0.0,
                pitch: 0.0,
                camera_distance: 2.5,
                fov: 1.0,
            },
            Preset::Female => Self {
                eye_distance: 0.28,
                eye_size: 0.13,
                nose_width: 0.09,
                nose_height: 0.28,
                jaw_width: 0.75,
                face_height: 1.00,
                face_depth: 0.25,
                yaw: 0.0,
                pitch: 0.0,
                camera_distance: 2.5,
                fov: 1.0,
            },
        }
    }

    pub fn get(&self, name: &str) -> Result<f32> {
        Ok(match name {
            "eye_distance" => self.eye_distance,
            "eye_size" => self.eye_size,
            "nose_width" => self.nose_width,
            "nose_height" => self.nose_height,
            "jaw_width" => self.jaw_width,
            "face_height" => self.face_height,
            "face_depth" => self.face_depth,
            "yaw" => self.yaw,
            "pitch" => self.pitch,
            "camera_distance" => self.camera_distance,
            "fov" => self.fov,
            _ => return Err(FaceError::UnknownParameter(name.to_string())),
        })
    }

    pub fn set(&mut self, name: &str, value: f32) -> Result<()> {
        let slot = self
            .slot_mut(name)
            .ok_or_else(|| FaceError::UnknownParameter(name.to_string()))?;
        *slot = value;
        Ok(())
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut f32> {
        Some(match name {
            "eye_distance" => &mut self.eye_distance,
            "eye_size" => &mut self.eye_size,
            "nose_width" => &mut self.nose_width,
            "nose_height" => &mut self.nose_height,
            "jaw_width" => &mut self.jaw_width,
            "face_height" => &mut self.face_height,
            "face_depth" => &mut self.face_depth,
            "yaw" => &mut self.yaw,
            "pitch" => &mut self.pitch,
            "camera_distance" => &mut self.camera_distance,
            "fov" => &mut self.fov,
            _ => return None,
        })
    }

    /// Copy with every toggled slider replaced by the preset default
    pub fn with_resets(&self, resets: &ResetFlags, preset: Preset) -> Result<Self> {
        let defaults = Self::preset_defaults(preset);
        let mut params = *self;
        for (name, &reset) in resets {
            if !reset {
                continue;
            }
            if name == RESET_ALL {
                params = defaults;
                continue;
            }
            params.set(name, defaults.get(name)?)?;
        }
        Ok(params)
    }

    /// Copy with each named value overwritten
    pub fn with_assignments(&self, assignments: &[(String, f32)]) -> Result<Self> {
        let mut params = *self;
        for (name, value) in assignments {
            params.set(name, *value)?;
        }
        Ok(params)
    }

    /// Copy with every slider forced into its declared range
    pub fn clamped(&self) -> Self {
        let mut params = *self;
        for spec in PARAM_SPECS {
            if let Some(slot) = params.slot_mut(spec.name) {
                *slot = spec.clamp(*slot);
            }
        }
        params
    }

    /// Horizontal measurements after applying the symmetry toggles
    pub fn resolve_spans(&self, symmetry: &Symmetry) -> Spans {
        let span = |value: f32, half_span: bool| if half_span { value } else { value * 2.0 };
        Spans {
            eye_distance: span(self.eye_distance, symmetry.eye_distance),
            nose_width: span(self.nose_width, symmetry.nose_width),
            jaw_width: span(self.jaw_width, symmetry.jaw_width),
        }
    }

    /// Offsets from the midline. A half-span slider is already one; a
    /// full-span slider is halved.
    pub fn half_spans(&self, symmetry: &Symmetry) -> Spans {
        let half = |value: f32, half_span: bool| if half_span { value } else { value / 2.0 };
        Spans {
            eye_distance: half(self.eye_distance, symmetry.eye_distance),
            nose_width: half(self.nose_width, symmetry.nose_width),
            jaw_width: half(self.jaw_width, symmetry.jaw_width),
        }
    }
}

impl Default for FaceParams {
    fn default() -> Self {
        Self::preset_defaults(Preset::default())
    }
}

/// Whether each horizontal measurement is a half span (symmetric, the
/// default) or a full span that is doubled before deformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symmetry {
    pub eye_distance: bool,
    pub nose_width: bool,
    pub jaw_width: bool,
}

impl Symmetry {
    pub fn set(&mut self, name: &str, half_span: bool) -> Result<()> {
        match name {
            "eye_distance" => self.eye_distance = half_span,
            "nose_width" => self.nose_width = half_span,
            "jaw_width" => self.jaw_width = half_span,
            _ => return Err(FaceError::UnknownParameter(name.to_string())),
        }
        Ok(())
    }
}

impl Default for Symmetry {
    fn default() -> Self {
        Self {
            eye_distance: true,
            nose_width: true,
            jaw_width: true,
        }
    }
}

/// Horizontal measurements as the deformation rules consume them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spans {
    pub eye_distance: f32,
    pub nose_width: f32,
    pub jaw_width: f32,
}

/// Parse `name=value` pairs separated by commas or whitespace,
/// e.g. `"eye_distance=0.35, jaw_width=0.9"`.
pub fn parse_assignments(input: &str) -> Result<Vec<(String, f32)>> {
    match all_consuming(delimited(
        multispace0,
        separated_list0(separator, assignment),
        multispace0,
    ))(input)
    {
        Ok((_, pairs)) => Ok(pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()),
        Err(e) => Err(FaceError::InvalidAssignment(format!("{input:?}: {e:?}"))),
    }
}

/// Parse a comma separated list of names, e.g. `"eye_size,jaw_width"`
pub fn parse_name_list(input: &str) -> Result<Vec<String>> {
    match all_consuming(delimited(
        multispace0,
        separated_list1(delimited(multispace0, char(','), multispace0), identifier),
        multispace0,
    ))(input)
    {
        Ok((_, names)) => Ok(names.into_iter().map(str::to_string).collect()),
        Err(e) => Err(FaceError::InvalidAssignment(format!("{input:?}: {e:?}"))),
    }
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

fn assignment(input: &str) -> IResult<&str, (&str, f32)> {
    let (input, name) = identifier(input)?;
    let (input, _) = preceded(multispace0, char('='))(input)?;
    let (input, value) = preceded(multispace0, float)(input)?;
    Ok((input, (name, value)))
}

fn separator(input: &str) -> IResult<&str, &str> {
    alt((delimited(multispace0, tag(","), multispace0), multispace1))(input)
}
