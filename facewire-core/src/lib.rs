/// Facewire Core Library - Parametric face wireframes
///
/// This library provides the stateless pipeline for drawing a face from a
/// handful of sliders: landmark topologies, analytic curves, deformation,
/// head rotation, perspective projection and rasterization.

pub mod curves;
pub mod deform;
pub mod error;
pub mod geometry;
pub mod params;
pub mod pipeline;
pub mod projection;
pub mod raster;
pub mod topology;
pub mod transform;

// Re-export commonly used types
pub use error::{FaceError, Result};
pub use geometry::{Curve, ProjectedWireframe, Side, Wireframe};
pub use params::{parse_assignments, parse_name_list, FaceParams, Symmetry};
pub use pipeline::{render, FaceModel, ModelKind, RenderRequest};
pub use projection::Camera;
pub use raster::{Canvas, FitPolicy, RenderOptions, RenderStyle, Rgb, Viewport};
pub use topology::{get_topology, Preset, Topology};
pub use transform::RotationState;
