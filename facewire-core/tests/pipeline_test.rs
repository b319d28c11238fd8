use approx::assert_relative_eq;
use facewire_core::curves::{ellipse_points, Anchors, Plane};
use facewire_core::pipeline::LandmarkModel;
use facewire_core::transform::rotate_points;
use facewire_core::{
    render, Camera, FaceModel, FaceParams, FitPolicy, ModelKind, Preset, ProjectedWireframe,
    RenderRequest, Rgb, Side, Symmetry, Viewport,
};
use nalgebra::{Point2, Point3};

const CANVAS: u32 = 512;

fn scenario_params(eye_distance: f32) -> FaceParams {
    FaceParams {
        eye_distance,
        jaw_width: 0.80,
        face_height: 1.00,
        face_depth: 0.30,
        yaw: 0.0,
        pitch: 0.0,
        camera_distance: 2.5,
        fov: 1.0,
        ..FaceParams::default()
    }
}

fn project(params: &FaceParams) -> ProjectedWireframe {
    let model = LandmarkModel::new(Preset::Male).unwrap();
    let wireframe = model.build(params, &Symmetry::default()).unwrap();
    Camera::from_params(params).project_wireframe(&wireframe)
}

/// Pixel x of both eye centres under the given fit policy
fn eye_pixels(params: &FaceParams, fit: FitPolicy) -> (f32, f32) {
    let projected = project(params);
    let viewport = Viewport::for_policy(fit, &projected, CANVAS, CANVAS);
    let left = viewport.map(&projected.eye(Side::Left).unwrap().center);
    let right = viewport.map(&projected.eye(Side::Right).unwrap().center);
    (left.x, right.x)
}

#[test]
fn test_eye_centres_symmetric_about_canvas_centre() {
    for fit in [FitPolicy::Fixed, FitPolicy::autofit()] {
        let (left, right) = eye_pixels(&scenario_params(0.30), fit);
        assert!(right > left, "{fit:?}");
        assert_relative_eq!((left + right) / 2.0, 256.0, epsilon = 1e-3);
    }
}

#[test]
fn test_eye_separation_proportional_to_eye_distance() {
    for fit in [FitPolicy::Fixed, FitPolicy::autofit()] {
        let (l0, r0) = eye_pixels(&scenario_params(0.30), fit);
        let (l1, r1) = eye_pixels(&scenario_params(0.45), fit);
        assert_relative_eq!((r1 - l1) / (r0 - l0), 1.5, epsilon = 1e-4);
    }
}

#[test]
fn test_fixed_mapping_pixel_positions() {
    let (left, right) = eye_pixels(&scenario_params(0.30), FitPolicy::Fixed);
    // 0.30 / 2.5 normalized units, 256 pixels per unit
    assert_relative_eq!(right, 256.0 + 0.12 * 256.0, epsilon = 1e-3);
    assert_relative_eq!(left, 256.0 - 0.12 * 256.0, epsilon = 1e-3);
}

#[test]
fn test_autofit_is_deterministic() {
    for model in [ModelKind::Landmarks, ModelKind::Curves] {
        let mut request = RenderRequest::new(Preset::Female, model);
        request.options.fit = FitPolicy::autofit();
        request.options.width = 200;
        request.options.height = 150;
        request.params.yaw = 25.0;
        request.params.pitch = -10.0;
        assert_eq!(render(&request).unwrap(), render(&request).unwrap());
    }
}

#[test]
fn test_jaw_landmarks_scale_linearly() {
    let model = LandmarkModel::new(Preset::Male).unwrap();
    let base = FaceParams::default();
    let wider = FaceParams {
        jaw_width: base.jaw_width * 1.5,
        ..base
    };
    let a = model.build(&base, &Symmetry::default()).unwrap();
    let b = model.build(&wider, &Symmetry::default()).unwrap();
    let jaw_a = &a.curve("cheek_l-jaw_l").unwrap().points;
    let jaw_b = &b.curve("cheek_l-jaw_l").unwrap().points;
    for (pa, pb) in jaw_a.iter().zip(jaw_b) {
        assert_relative_eq!(pb.x, pa.x * 1.5, epsilon = 1e-6);
        assert_eq!(pa.z, pb.z);
    }
}

#[test]
fn test_zero_rotation_is_identity() {
    let points = [Point3::new(0.2, 0.3, -0.4), Point3::new(-0.9, 0.0, 0.1)];
    let rotated = rotate_points(&points, 0.0, 0.0);
    for (r, p) in rotated.iter().zip(&points) {
        assert_relative_eq!(r, p, epsilon = 1e-6);
    }
}

#[test]
fn test_projection_shrinks_with_distance() {
    let point = Point3::new(0.5, 0.0, 0.5);
    let near = Camera::from_params(&FaceParams {
        camera_distance: 2.0,
        ..FaceParams::default()
    })
    .project_point(&point);
    let far = Camera::from_params(&FaceParams {
        camera_distance: 4.0,
        ..FaceParams::default()
    })
    .project_point(&point);
    assert!(far.x.abs() < near.x.abs());
    assert_relative_eq!(near, Point2::new(0.25, 0.25), epsilon = 1e-6);
}

#[test]
fn test_analytic_ellipse_closes() {
    let points = ellipse_points(Point3::new(0.0, 0.0, 0.2), (0.12, 0.07), Plane::Xz, 32);
    assert_eq!(points.first(), points.last());
}

#[test]
fn test_nose_height_clamp() {
    let params = FaceParams {
        face_height: 0.6,
        nose_height: 0.8,
        ..FaceParams::default()
    };
    let anchors = Anchors::from_params(&params);
    assert_relative_eq!(anchors.eye_z - anchors.nose_base_z, 0.3, epsilon = 1e-6);
}

#[test]
fn test_render_both_presets_and_models() {
    for preset in Preset::ALL {
        for model in [ModelKind::Landmarks, ModelKind::Curves] {
            let mut request = RenderRequest::new(preset, model);
            request.options.width = 96;
            request.options.height = 96;
            let canvas = render(&request).unwrap();
            let ink = request.options.style.foreground;
            assert!(canvas.count_pixels(ink) > 0, "{preset} {model}");
            assert_ne!(ink, request.options.style.background);
        }
    }
    assert_eq!(RenderRequest::new(Preset::Male, ModelKind::Curves).options.style.background, Rgb::BLACK);
}
