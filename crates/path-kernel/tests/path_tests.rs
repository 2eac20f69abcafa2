use approx::assert_abs_diff_eq;

use path_kernel::{ClosestPoint, PathConfig, PathEvent, Point3d, Vec3, VesselPath};
use vessel_types::VesselUid;

fn uid() -> VesselUid {
    VesselUid::new("aorta")
}

fn straight_path() -> VesselPath {
    let mut path = VesselPath::new(uid());
    path.add_control_point(Point3d::new(0.0, 0.0, 0.0)).unwrap();
    path.add_control_point(Point3d::new(5.0, 0.0, 0.0)).unwrap();
    path.add_control_point(Point3d::new(10.0, 0.0, 0.0)).unwrap();
    path
}

fn helix_points(turns: usize) -> Vec<Point3d> {
    (0..=turns * 8)
        .map(|i| {
            let a = i as f64 * std::f64::consts::FRAC_PI_4;
            Point3d::new(10.0 * a.cos(), 10.0 * a.sin(), 2.0 * a)
        })
        .collect()
}

// ── Arc length ─────────────────────────────────────────────────────────────

#[test]
fn straight_path_length_and_midpoint() {
    let path = straight_path();
    assert_abs_diff_eq!(path.parametric_length(), 10.0, epsilon = 1e-3);
    let mid = path.position(5.0);
    assert_abs_diff_eq!(mid.x, 5.0, epsilon = 1e-3);
    assert_abs_diff_eq!(mid.y, 0.0, epsilon = 1e-9);
}

#[test]
fn helix_length_close_to_analytic() {
    let path = VesselPath::from_points(uid(), helix_points(2), 0.0).unwrap();
    // Analytic helix length over 4π: sqrt(r² + c²) · θ.
    let analytic = (100.0f64 + 4.0).sqrt() * 4.0 * std::f64::consts::PI;
    let length = path.parametric_length();
    assert!((length - analytic).abs() / analytic < 0.02, "length {length}");
}

#[test]
fn preview_config_is_coarser() {
    let fine = VesselPath::from_points(uid(), helix_points(1), 0.0).unwrap();
    let mut coarse = VesselPath::with_config(uid(), PathConfig::preview());
    coarse.set_control_points(helix_points(1)).unwrap();
    assert!(coarse.sample_count() <= fine.sample_count());
    assert_abs_diff_eq!(
        coarse.parametric_length(),
        fine.parametric_length(),
        epsilon = 1e-2 * fine.parametric_length()
    );
}

#[test]
fn duplicate_control_points_terminate() {
    let p = Point3d::new(3.0, 3.0, 3.0);
    let path = VesselPath::from_points(uid(), vec![p, p, p, p], 0.0).unwrap();
    assert_abs_diff_eq!(path.parametric_length(), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(path.position(1.0).distance_to(&p), 0.0, epsilon = 1e-12);
    assert!(path.tangent(0.0).length() <= 1.0 + 1e-12);
}

// ── Frames ─────────────────────────────────────────────────────────────────

#[test]
fn straight_path_normal_never_flips() {
    let path = straight_path();
    let reference = path.normal(0.0);
    for i in 0..=50 {
        let n = path.normal(i as f64 * 0.2);
        assert_abs_diff_eq!(n.dot(&reference), 1.0, epsilon = 1e-9);
    }
}

#[test]
fn helix_normals_change_smoothly() {
    let path = VesselPath::from_points(uid(), helix_points(2), 0.0).unwrap();
    let length = path.parametric_length();
    let steps = 400;
    let mut previous = path.normal(0.0);
    for i in 1..=steps {
        let n = path.normal(length * i as f64 / steps as f64);
        // No abrupt flips between neighbouring queries.
        assert!(n.dot(&previous) > 0.9, "flip at step {i}");
        previous = n;
    }
}

#[test]
fn zero_length_path_frame_is_degenerate() {
    let p = Point3d::new(1.0, 2.0, 3.0);
    let path = VesselPath::from_points(uid(), vec![p, p, p], 0.0).unwrap();
    assert_eq!(path.tangent(0.0), Vec3::ZERO);
    assert_eq!(path.normal(0.0), Vec3::ZERO);
    let frame = path.frame(0.0);
    assert_eq!(frame.normal, Vec3::ZERO);
    assert_eq!(frame.binormal, Vec3::ZERO);
}

#[test]
fn edits_reset_frame_propagation() {
    let mut path = straight_path();
    let _ = path.normal(10.0);
    assert!(path.propagated_frame_count() > 0);
    path.set_control_point(2, Point3d::new(10.0, 5.0, 0.0)).unwrap();
    assert_eq!(path.propagated_frame_count(), 0);
    let n = path.normal(path.parametric_length());
    assert_abs_diff_eq!(n.length(), 1.0, epsilon = 1e-9);
}

// ── Closest point ──────────────────────────────────────────────────────────

#[test]
fn closest_point_classification() {
    let path = straight_path();

    match path.closest_point(&Point3d::new(-2.0, 1.0, 0.0)) {
        ClosestPoint::Endpoint { control_point, distance, .. } => {
            assert_eq!(control_point, 0);
            assert_abs_diff_eq!(distance, 5.0f64.sqrt(), epsilon = 1e-9);
        }
        other => panic!("expected start endpoint, got {other:?}"),
    }

    match path.closest_point(&Point3d::new(12.0, 0.0, 0.0)) {
        ClosestPoint::Endpoint { control_point, .. } => assert_eq!(control_point, 2),
        other => panic!("expected end endpoint, got {other:?}"),
    }

    match path.closest_point(&Point3d::new(7.5, 2.0, 0.0)) {
        ClosestPoint::Curve { t, segment, distance, .. } => {
            assert_abs_diff_eq!(t, 7.5, epsilon = 1e-6);
            assert_eq!(segment, 1);
            assert_abs_diff_eq!(distance, 2.0, epsilon = 1e-9);
        }
        other => panic!("expected curve hit, got {other:?}"),
    }
}

#[test]
fn endpoint_hit_reports_the_control_point() {
    let path = straight_path();
    let query = Point3d::new(9.999_999_9, 0.0, 0.0);
    match path.closest_point(&query) {
        ClosestPoint::Endpoint { control_point, t, point, distance } => {
            assert_eq!(control_point, 2);
            assert_abs_diff_eq!(t, path.parametric_length(), epsilon = 1e-12);
            assert_eq!(point, Point3d::new(10.0, 0.0, 0.0));
            assert_abs_diff_eq!(distance, point.distance_to(&query), epsilon = 1e-15);
        }
        other => panic!("expected end endpoint, got {other:?}"),
    }
}

// ── Notifications ──────────────────────────────────────────────────────────

#[test]
fn mutations_emit_events_in_order() {
    let mut path = straight_path();
    path.remove_control_point(1).unwrap();
    path.set_control_point(0, Point3d::new(-1.0, 0.0, 0.0)).unwrap();
    path.set_control_points(vec![Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0)])
        .unwrap();
    path.set_tension(-0.25).unwrap();

    let events = path.drain_events();
    assert_eq!(
        events,
        vec![
            PathEvent::ControlPointInserted { uid: uid(), index: 0 },
            PathEvent::ControlPointInserted { uid: uid(), index: 1 },
            PathEvent::ControlPointInserted { uid: uid(), index: 2 },
            PathEvent::ControlPointRemoved { uid: uid(), index: 1 },
            PathEvent::ControlPointModified { uid: uid(), index: 0 },
            PathEvent::AllPointsReplaced { uid: uid() },
            PathEvent::TensionChanged { uid: uid(), tension: -0.25 },
        ]
    );
    assert!(events.iter().all(|e| e.uid() == &uid()));
    assert!(path.drain_events().is_empty());
}

// ── Rendering output ───────────────────────────────────────────────────────

#[test]
fn polyline_and_bounds_cover_the_curve() {
    let path = straight_path();
    let poly = path.polyline().unwrap();
    assert_eq!(poly.len(), path.sample_count());
    assert_eq!(poly.lines.len(), poly.len() - 1);

    let bounds = path.bounds().unwrap();
    assert_abs_diff_eq!(bounds.min.x, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(bounds.max.x, 10.0, epsilon = 1e-12);
    assert_abs_diff_eq!(bounds.diagonal(), 10.0, epsilon = 1e-12);
}
