//! Software rasterizer for projected wireframes.
//!
//! Pixel `(0, 0)` is the top-left corner and pixel `(i, j)` covers the
//! square `[i, i + 1) x [j, j + 1)`, so its centre sits at
//! `(i + 0.5, j + 0.5)`. Positive normalized z maps to the upper half of
//! the canvas.

use log::{debug, warn};
use nalgebra::Point2;
use std::f32::consts::FRAC_1_SQRT_2;

use crate::geometry::{Bounds2, ProjectedWireframe};

pub const DEFAULT_FIT_MARGIN: f32 = 0.85;

/// Floor for bounding box extents so a flat or single-point face still
/// produces a finite scale
const EXTENT_EPSILON: f32 = 1e-6;

/// An 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Perceived brightness in `0.0..=1.0`
    pub fn luminance(&self) -> f32 {
        (0.299 * self.0 as f32 + 0.587 * self.1 as f32 + 0.114 * self.2 as f32) / 255.0
    }
}

/// Flat background and ink colours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStyle {
    pub background: Rgb,
    pub foreground: Rgb,
}

impl RenderStyle {
    /// Black lines on white
    pub fn light() -> Self {
        Self {
            background: Rgb::WHITE,
            foreground: Rgb::BLACK,
        }
    }

    /// White lines on black
    pub fn dark() -> Self {
        Self {
            background: Rgb::BLACK,
            foreground: Rgb::WHITE,
        }
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::light()
    }
}

/// How projected coordinates are placed on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitPolicy {
    /// Treat projected coordinates as lying in `[-1, 1]` on both axes
    Fixed,
    /// Scale the bounding box of the geometry to fill the canvas, leaving
    /// `1 - margin` of the smaller dimension as border
    Autofit { margin: f32 },
}

impl FitPolicy {
    pub fn autofit() -> Self {
        FitPolicy::Autofit {
            margin: DEFAULT_FIT_MARGIN,
        }
    }
}

impl Default for FitPolicy {
    fn default() -> Self {
        Self::autofit()
    }
}

/// Canvas size, stroke width and placement for one render call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub line_thickness: u32,
    pub fit: FitPolicy,
    pub style: RenderStyle,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            line_thickness: 4,
            fit: FitPolicy::default(),
            style: RenderStyle::default(),
        }
    }
}

/// Mapping from normalized camera units to pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Canvas point that `center` lands on
    pub origin: Point2<f32>,
    /// Projected point placed at `origin`
    pub center: Point2<f32>,
    pub scale_x: f32,
    pub scale_y: f32,
    pub radius_scale: f32,
}

impl Viewport {
    pub fn fixed(width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        Self {
            origin: Point2::new(w / 2.0, h / 2.0),
            center: Point2::origin(),
            scale_x: w / 2.0,
            scale_y: h / 2.0,
            radius_scale: w.min(h) / 2.0,
        }
    }

    pub fn autofit(bounds: &Bounds2, width: u32, height: u32, margin: f32) -> Self {
        let (w, h) = (width as f32, height as f32);
        if bounds.width() < EXTENT_EPSILON || bounds.height() < EXTENT_EPSILON {
            warn!(
                "degenerate bounding box {:.3e} x {:.3e}, flooring extents",
                bounds.width(),
                bounds.height()
            );
        }
        let box_w = bounds.width().max(EXTENT_EPSILON);
        let box_h = bounds.height().max(EXTENT_EPSILON);
        let scale = margin * (w / box_w).min(h / box_h);
        Self {
            origin: Point2::new(w / 2.0, h / 2.0),
            center: bounds.center(),
            scale_x: scale,
            scale_y: scale,
            radius_scale: scale,
        }
    }

    /// Viewport for a fit policy. Autofit on empty geometry falls back to
    /// the fixed mapping.
    pub fn for_policy(
        policy: FitPolicy,
        projected: &ProjectedWireframe,
        width: u32,
        height: u32,
    ) -> Self {
        match (policy, projected.bounds()) {
            (FitPolicy::Autofit { margin }, Some(bounds)) => {
                Self::autofit(&bounds, width, height, margin)
            }
            _ => Self::fixed(width, height),
        }
    }

    pub fn map(&self, point: &Point2<f32>) -> Point2<f32> {
        Point2::new(
            self.origin.x + (point.x - self.center.x) * self.scale_x,
            self.origin.y - (point.y - self.center.y) * self.scale_y,
        )
    }

    pub fn scale_radius(&self, radius: f32) -> f32 {
        radius * self.radius_scale
    }
}

/// Row-major RGB8 pixel buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * 3);
        for _ in 0..count {
            pixels.extend_from_slice(&[background.0, background.1, background.2]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw `R, G, B` bytes, row by row from the top
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        Some(Rgb(
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
        ))
    }

    pub fn count_pixels(&self, color: Rgb) -> usize {
        self.pixels
            .chunks_exact(3)
            .filter(|px| px[0] == color.0 && px[1] == color.1 && px[2] == color.2)
            .count()
    }

    fn put_pixel(&mut self, x: i64, y: i64, color: Rgb) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        self.pixels[idx] = color.0;
        self.pixels[idx + 1] = color.1;
        self.pixels[idx + 2] = color.2;
    }

    /// Clamp a span of continuous coordinates to valid pixel indices
    fn pixel_span(lo: f32, hi: f32, size: u32) -> Option<(i64, i64)> {
        if size == 0 {
            return None;
        }
        let lo = lo.floor().max(0.0);
        let hi = hi.ceil().min(size as f32 - 1.0);
        if lo > hi {
            None
        } else {
            Some((lo as i64, hi as i64))
        }
    }

    /// Fill every pixel whose centre lies within `radius` of `center`,
    /// plus the pixel containing `center` itself.
    pub fn fill_disc(&mut self, center: Point2<f32>, radius: f32, color: Rgb) {
        if !is_finite(&center) || !radius.is_finite() {
            return;
        }
        let radius = radius.max(0.0);
        let (Some((x0, x1)), Some((y0, y1))) = (
            Self::pixel_span(center.x - radius, center.x + radius, self.width),
            Self::pixel_span(center.y - radius, center.y + radius, self.height),
        ) else {
            return;
        };
        let r2 = radius * radius;
        for y in y0..=y1 {
            let dy = y as f32 + 0.5 - center.y;
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - center.x;
                if dx * dx + dy * dy <= r2 {
                    self.put_pixel(x, y, color);
                }
            }
        }
        self.put_pixel(center.x.floor() as i64, center.y.floor() as i64, color);
    }

    /// Straight segment with round caps, `thickness` pixels wide
    pub fn draw_line(&mut self, a: Point2<f32>, b: Point2<f32>, thickness: f32, color: Rgb) {
        if !is_finite(&a) || !is_finite(&b) {
            warn!("skipping segment with non-finite endpoint");
            return;
        }
        let radius = (thickness / 2.0).max(0.0);
        let pad = radius + 1.0;
        let clip_min = Point2::new(-pad, -pad);
        let clip_max = Point2::new(self.width as f32 + pad, self.height as f32 + pad);
        let Some((a, b)) = clip_segment(a, b, clip_min, clip_max) else {
            return;
        };

        let delta = b - a;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as u32;
        for i in 0..=steps {
            let p = a + delta * (i as f32 / steps as f32);
            if radius <= 0.5 {
                self.put_pixel(p.x.floor() as i64, p.y.floor() as i64, color);
            } else {
                self.fill_disc(p, radius, color);
            }
        }
    }

    /// Circle outline `thickness` pixels wide, centred on the radius. The
    /// band is never narrower than a pixel diagonal so thin rings stay
    /// connected.
    pub fn stroke_circle(&mut self, center: Point2<f32>, radius: f32, thickness: f32, color: Rgb) {
        if !is_finite(&center) || !radius.is_finite() {
            warn!("skipping circle with non-finite centre or radius");
            return;
        }
        let half = (thickness / 2.0).max(FRAC_1_SQRT_2);
        let radius = radius.abs();
        let outer = radius + half;
        let (Some((x0, x1)), Some((y0, y1))) = (
            Self::pixel_span(center.x - outer, center.x + outer, self.width),
            Self::pixel_span(center.y - outer, center.y + outer, self.height),
        ) else {
            return;
        };
        for y in y0..=y1 {
            let dy = y as f32 + 0.5 - center.y;
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - center.x;
                let d = (dx * dx + dy * dy).sqrt();
                if (d - radius).abs() <= half {
                    self.put_pixel(x, y, color);
                }
            }
        }
    }
}

fn is_finite(p: &Point2<f32>) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Liang-Barsky clip of segment `a`-`b` against an axis-aligned box.
/// Returns `None` when the segment lies entirely outside.
pub fn clip_segment(
    a: Point2<f32>,
    b: Point2<f32>,
    min: Point2<f32>,
    max: Point2<f32>,
) -> Option<(Point2<f32>, Point2<f32>)> {
    let d = b - a;
    let mut t0 = 0.0_f32;
    let mut t1 = 1.0_f32;
    let edges = [
        (-d.x, a.x - min.x),
        (d.x, max.x - a.x),
        (-d.y, a.y - min.y),
        (d.y, max.y - a.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            // parallel to this edge
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    // rounding on huge inputs can leave the ends slightly outside the box
    let clamp = |p: Point2<f32>| Point2::new(p.x.clamp(min.x, max.x), p.y.clamp(min.y, max.y));
    Some((clamp(a + d * t0), clamp(a + d * t1)))
}

/// Draw a projected wireframe onto a fresh canvas.
///
/// Curves become connected segments, single-sample curves become dots of
/// radius `line_thickness`, and eyes become stroked circles whose radius is
/// scaled by the same factor as the geometry.
pub fn rasterize(projected: &ProjectedWireframe, options: &RenderOptions) -> Canvas {
    let mut canvas = Canvas::new(options.width, options.height, options.style.background);
    let viewport = Viewport::for_policy(options.fit, projected, options.width, options.height);
    let ink = options.style.foreground;
    let thickness = options.line_thickness as f32;

    debug!(
        "rasterizing {} curves and {} eyes at {}x{} (scale {:.2})",
        projected.curves.len(),
        projected.eyes.len(),
        options.width,
        options.height,
        viewport.scale_x
    );

    for curve in &projected.curves {
        let pixels: Vec<Point2<f32>> = curve.points.iter().map(|p| viewport.map(p)).collect();
        match pixels.as_slice() {
            [] => {}
            [dot] => canvas.fill_disc(*dot, thickness, ink),
            _ => {
                for pair in pixels.windows(2) {
                    canvas.draw_line(pair[0], pair[1], thickness, ink);
                }
            }
        }
    }

    for eye in &projected.eyes {
        canvas.stroke_circle(
            viewport.map(&eye.center),
            viewport.scale_radius(eye.radius),
            thickness,
            ink,
        );
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Curve2, EyeRing2, Side};
    use approx::assert_relative_eq;

    fn segment(a: (f32, f32), b: (f32, f32)) -> ProjectedWireframe {
        ProjectedWireframe {
            curves: vec![Curve2 {
                name: "segment".into(),
                points: vec![Point2::new(a.0, a.1), Point2::new(b.0, b.1)],
            }],
            eyes: Vec::new(),
        }
    }

    fn options(width: u32, height: u32, fit: FitPolicy) -> RenderOptions {
        RenderOptions {
            width,
            height,
            line_thickness: 1,
            fit,
            style: RenderStyle::dark(),
        }
    }

    #[test]
    fn test_canvas_background() {
        let canvas = Canvas::new(4, 3, Rgb(10, 20, 30));
        assert_eq!(canvas.pixels().len(), 36);
        assert_eq!(canvas.get_pixel(3, 2), Some(Rgb(10, 20, 30)));
        assert_eq!(canvas.get_pixel(4, 0), None);
        assert_eq!(canvas.count_pixels(Rgb(10, 20, 30)), 12);
    }

    #[test]
    fn test_fixed_mapping_flips_vertical() {
        let viewport = Viewport::fixed(200, 100);
        assert_eq!(viewport.map(&Point2::new(0.0, 0.0)), Point2::new(100.0, 50.0));
        assert_eq!(viewport.map(&Point2::new(1.0, 1.0)), Point2::new(200.0, 0.0));
        assert_eq!(viewport.map(&Point2::new(-1.0, -1.0)), Point2::new(0.0, 100.0));
        assert_eq!(viewport.scale_radius(0.5), 25.0);
    }

    #[test]
    fn test_autofit_centres_and_scales() {
        let mut bounds = Bounds2::empty();
        bounds.include(&Point2::new(1.0, 2.0));
        bounds.include(&Point2::new(3.0, 3.0));
        let viewport = Viewport::autofit(&bounds, 100, 100, 0.8);

        // the wider side governs: 0.8 * 100 / 2
        assert_relative_eq!(viewport.scale_x, 40.0);
        assert_eq!(viewport.map(&Point2::new(2.0, 2.5)), Point2::new(50.0, 50.0));
        assert_relative_eq!(viewport.map(&Point2::new(3.0, 3.0)), Point2::new(90.0, 30.0));
    }

    #[test]
    fn test_autofit_degenerate_box_is_finite() {
        let mut bounds = Bounds2::empty();
        bounds.include(&Point2::new(0.5, 0.5));
        let viewport = Viewport::autofit(&bounds, 64, 64, DEFAULT_FIT_MARGIN);
        assert!(viewport.scale_x.is_finite());
        assert_eq!(viewport.map(&Point2::new(0.5, 0.5)), Point2::new(32.0, 32.0));
    }

    #[test]
    fn test_horizontal_line_pixels() {
        let canvas = rasterize(&segment((-0.5, 0.0), (0.5, 0.0)), &options(20, 20, FitPolicy::Fixed));
        // maps to x 5..15 on row 10
        for x in 5..15 {
            assert_eq!(canvas.get_pixel(x, 10), Some(Rgb::WHITE), "x={x}");
        }
        assert_eq!(canvas.get_pixel(2, 10), Some(Rgb::BLACK));
        assert_eq!(canvas.get_pixel(10, 5), Some(Rgb::BLACK));
    }

    #[test]
    fn test_thick_line_is_wider() {
        let thin = rasterize(&segment((-0.5, 0.2), (0.5, -0.3)), &options(64, 64, FitPolicy::Fixed));
        let mut thick_options = options(64, 64, FitPolicy::Fixed);
        thick_options.line_thickness = 6;
        let thick = rasterize(&segment((-0.5, 0.2), (0.5, -0.3)), &thick_options);
        assert!(thick.count_pixels(Rgb::WHITE) > 3 * thin.count_pixels(Rgb::WHITE));
    }

    #[test]
    fn test_single_point_curve_draws_dot() {
        let projected = ProjectedWireframe {
            curves: vec![Curve2 {
                name: "dot".into(),
                points: vec![Point2::new(0.0, 0.0)],
            }],
            eyes: Vec::new(),
        };
        let mut opts = options(40, 40, FitPolicy::Fixed);
        opts.line_thickness = 3;
        let canvas = rasterize(&projected, &opts);
        assert_eq!(canvas.get_pixel(20, 20), Some(Rgb::WHITE));
        assert_eq!(canvas.get_pixel(22, 20), Some(Rgb::WHITE));
        assert_eq!(canvas.get_pixel(25, 20), Some(Rgb::BLACK));
    }

    #[test]
    fn test_eye_circle_is_outline_only() {
        let projected = ProjectedWireframe {
            curves: Vec::new(),
            eyes: vec![EyeRing2 {
                side: Side::Left,
                center: Point2::new(0.0, 0.0),
                radius: 0.5,
            }],
        };
        let canvas = rasterize(&projected, &options(100, 100, FitPolicy::Fixed));
        // radius 0.5 * 50 = 25 pixels
        assert_eq!(canvas.get_pixel(50, 50), Some(Rgb::BLACK));
        assert_eq!(canvas.get_pixel(74, 50), Some(Rgb::WHITE));
        assert_eq!(canvas.get_pixel(50, 25), Some(Rgb::WHITE));
        assert_eq!(canvas.get_pixel(90, 50), Some(Rgb::BLACK));
    }

    #[test]
    fn test_offscreen_and_extreme_geometry() {
        let canvas = rasterize(
            &segment((-1.0e30, 1.0e30), (1.0e30, -1.0e30)),
            &options(32, 32, FitPolicy::Fixed),
        );
        // the diagonal still crosses the canvas
        assert!(canvas.count_pixels(Rgb::WHITE) > 0);

        let canvas = rasterize(&segment((5.0, 5.0), (6.0, 7.0)), &options(32, 32, FitPolicy::Fixed));
        assert_eq!(canvas.count_pixels(Rgb::WHITE), 0);

        let canvas = rasterize(
            &segment((f32::NAN, 0.0), (0.5, 0.5)),
            &options(32, 32, FitPolicy::Fixed),
        );
        assert_eq!(canvas.count_pixels(Rgb::WHITE), 0);
    }

    #[test]
    fn test_clip_segment() {
        let min = Point2::new(0.0, 0.0);
        let max = Point2::new(10.0, 10.0);
        let (a, b) = clip_segment(Point2::new(-5.0, 5.0), Point2::new(15.0, 5.0), min, max).unwrap();
        assert_relative_eq!(a, Point2::new(0.0, 5.0));
        assert_relative_eq!(b, Point2::new(10.0, 5.0));
        assert!(clip_segment(Point2::new(-5.0, -1.0), Point2::new(15.0, -1.0), min, max).is_none());
    }

    #[test]
    fn test_zero_sized_canvas() {
        let canvas = rasterize(&segment((-0.5, 0.0), (0.5, 0.0)), &options(0, 0, FitPolicy::autofit()));
        assert!(canvas.pixels().is_empty());
    }
}
