/// Geometry primitives shared by both face models
use nalgebra::{Point2, Point3};
use std::fmt;

/// Which side of the face an eye sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// A named, ordered run of 3D samples drawn as connected segments
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub name: String,
    pub points: Vec<Point3<f32>>,
}

impl Curve {
    pub fn new(name: impl Into<String>, points: Vec<Point3<f32>>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    /// A two-point curve for a straight topology edge
    pub fn segment(name: impl Into<String>, a: Point3<f32>, b: Point3<f32>) -> Self {
        Self::new(name, vec![a, b])
    }
}

/// An eye drawn as a circle outline rather than a polyline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeRing {
    pub side: Side,
    pub center: Point3<f32>,
    pub radius: f32,
}

/// The set of named polylines and eye circles produced by a face model.
///
/// Both the landmark graph and the analytic curve generator emit this, so
/// the camera and rasterizer never need to know which model built it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wireframe {
    pub curves: Vec<Curve>,
    pub eyes: Vec<EyeRing>,
}

impl Wireframe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_curve(&mut self, curve: Curve) {
        self.curves.push(curve);
    }

    pub fn add_eye(&mut self, eye: EyeRing) {
        self.eyes.push(eye);
    }

    pub fn curve(&self, name: &str) -> Option<&Curve> {
        self.curves.iter().find(|c| c.name == name)
    }

    pub fn point_count(&self) -> usize {
        self.curves.iter().map(|c| c.points.len()).sum::<usize>() + self.eyes.len()
    }
}

/// A curve after perspective projection, in normalized camera units
#[derive(Debug, Clone, PartialEq)]
pub struct Curve2 {
    pub name: String,
    pub points: Vec<Point2<f32>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeRing2 {
    pub side: Side,
    pub center: Point2<f32>,
    pub radius: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedWireframe {
    pub curves: Vec<Curve2>,
    pub eyes: Vec<EyeRing2>,
}

impl ProjectedWireframe {
    pub fn curve(&self, name: &str) -> Option<&Curve2> {
        self.curves.iter().find(|c| c.name == name)
    }

    pub fn eye(&self, side: Side) -> Option<&EyeRing2> {
        self.eyes.iter().find(|e| e.side == side)
    }

    /// Bounding box of every curve sample and eye centre. Non-finite
    /// samples are ignored.
    pub fn bounds(&self) -> Option<Bounds2> {
        let mut bounds = Bounds2::empty();
        for point in self.curves.iter().flat_map(|c| c.points.iter()) {
            bounds.include(point);
        }
        for eye in &self.eyes {
            bounds.include(&eye.center);
        }
        if bounds.is_empty() {
            None
        } else {
            Some(bounds)
        }
    }
}

/// Axis-aligned 2D bounding box accumulator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2 {
    pub min: Point2<f32>,
    pub max: Point2<f32>,
}

impl Bounds2 {
    pub fn empty() -> Self {
        Self {
            min: Point2::new(f32::INFINITY, f32::INFINITY),
            max: Point2::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn include(&mut self, point: &Point2<f32>) {
        if !point.x.is_finite() || !point.y.is_finite() {
            return;
        }
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point2<f32> {
        Point2::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }
}
