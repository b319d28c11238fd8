/// Face models and the render pipeline that ties the stages together
use log::debug;
use std::fmt;
use std::str::FromStr;

use crate::curves::generate_curves;
use crate::deform::{deform, eye_rings};
use crate::error::{FaceError, Result};
use crate::geometry::{Curve, Wireframe};
use crate::params::{FaceParams, ResetFlags, Symmetry};
use crate::projection::Camera;
use crate::raster::{rasterize, Canvas, FitPolicy, RenderOptions, RenderStyle};
use crate::topology::{get_topology, Preset, Topology};

/// Anything that turns sliders into a named polyline set
pub trait FaceModel {
    fn build(&self, params: &FaceParams, symmetry: &Symmetry) -> Result<Wireframe>;
}

/// Landmark graph: deformed topology edges plus circular eyes
#[derive(Debug, Clone, Copy)]
pub struct LandmarkModel {
    topology: &'static Topology,
}

impl LandmarkModel {
    pub fn new(preset: Preset) -> Result<Self> {
        Ok(Self {
            topology: get_topology(preset)?,
        })
    }

    pub fn topology(&self) -> &'static Topology {
        self.topology
    }
}

impl FaceModel for LandmarkModel {
    fn build(&self, params: &FaceParams, symmetry: &Symmetry) -> Result<Wireframe> {
        let spans = params.resolve_spans(symmetry);
        let points = deform(self.topology, params, &spans);

        let mut wireframe = Wireframe::new();
        for &(a, b) in &self.topology.edges {
            let (Some(&pa), Some(&pb)) = (points.get(a), points.get(b)) else {
                return Err(FaceError::MissingLandmark {
                    preset: self.topology.preset.to_string(),
                    landmark: (if points.contains_key(a) { b } else { a }).to_string(),
                    context: format!("edge {a}-{b}"),
                });
            };
            wireframe.add_curve(Curve::segment(format!("{a}-{b}"), pa, pb));
        }
        for eye in eye_rings(self.topology, &points, params) {
            wireframe.add_eye(eye);
        }
        Ok(wireframe)
    }
}

/// Analytic ellipse and line curves with no stored topology
#[derive(Debug, Clone, Copy, Default)]
pub struct CurveModel;

impl FaceModel for CurveModel {
    fn build(&self, params: &FaceParams, symmetry: &Symmetry) -> Result<Wireframe> {
        Ok(generate_curves(params, &params.half_spans(symmetry)))
    }
}

/// Which face model a render request uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelKind {
    #[default]
    Landmarks,
    Curves,
}

impl ModelKind {
    /// Landmark graphs autofit on white; curves use the fixed mapping on black
    pub fn default_fit(&self) -> FitPolicy {
        match self {
            ModelKind::Landmarks => FitPolicy::autofit(),
            ModelKind::Curves => FitPolicy::Fixed,
        }
    }

    pub fn default_style(&self) -> RenderStyle {
        match self {
            ModelKind::Landmarks => RenderStyle::light(),
            ModelKind::Curves => RenderStyle::dark(),
        }
    }

    pub fn default_options(&self) -> RenderOptions {
        RenderOptions {
            fit: self.default_fit(),
            style: self.default_style(),
            ..RenderOptions::default()
        }
    }

    pub fn instantiate(&self, preset: Preset) -> Result<Box<dyn FaceModel>> {
        Ok(match self {
            ModelKind::Landmarks => Box::new(LandmarkModel::new(preset)?),
            ModelKind::Curves => Box::new(CurveModel),
        })
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Landmarks => write!(f, "landmarks"),
            ModelKind::Curves => write!(f, "curves"),
        }
    }
}

impl FromStr for ModelKind {
    type Err = FaceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "landmarks" | "graph" => Ok(ModelKind::Landmarks),
            "curves" | "analytic" => Ok(ModelKind::Curves),
            _ => Err(FaceError::UnknownModel(s.to_string())),
        }
    }
}

/// Everything one render call needs
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub preset: Preset,
    pub model: ModelKind,
    pub params: FaceParams,
    pub symmetry: Symmetry,
    pub resets: ResetFlags,
    pub options: RenderOptions,
}

impl RenderRequest {
    /// Preset defaults with the model's default fit and style
    pub fn new(preset: Preset, model: ModelKind) -> Self {
        Self {
            preset,
            model,
            params: FaceParams::preset_defaults(preset),
            symmetry: Symmetry::default(),
            resets: ResetFlags::new(),
            options: model.default_options(),
        }
    }

    /// Sliders after reset toggles
    pub fn effective_params(&self) -> Result<FaceParams> {
        self.params.with_resets(&self.resets, self.preset)
    }
}

/// Run resets, model, camera and rasterizer. A configuration error aborts
/// before any canvas is produced.
pub fn render(request: &RenderRequest) -> Result<Canvas> {
    let params = request.effective_params()?;
    let model = request.model.instantiate(request.preset)?;
    let wireframe = model.build(&params, &request.symmetry)?;
    debug!(
        "{} {} face: {} curves, {} points",
        request.preset,
        request.model,
        wireframe.curves.len(),
        wireframe.point_count()
    );

    let projected = Camera::from_params(&params).project_wireframe(&wireframe);
    Ok(rasterize(&projected, &request.options))
}
