//! Property-based tests for vessel-path invariants using the `proptest` crate.

use proptest::prelude::*;

use path_kernel::{ClosestPoint, Point3d, VesselPath};
use vessel_types::VesselUid;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Arbitrary 3D coordinate in a clinically plausible range (millimetres).
fn arb_point() -> impl Strategy<Value = Point3d> {
    (-200.0f64..200.0, -200.0f64..200.0, -200.0f64..200.0)
        .prop_map(|(x, y, z)| Point3d::new(x, y, z))
}

/// Control polygons with well-separated consecutive points.
fn arb_polygon() -> impl Strategy<Value = Vec<Point3d>> {
    prop::collection::vec(arb_point(), 2..8).prop_filter(
        "consecutive points must be distinct",
        |pts| pts.windows(2).all(|w| w[0].distance_to(&w[1]) > 1.0),
    )
}

fn arb_tension() -> impl Strategy<Value = f64> {
    -0.9f64..0.9
}

fn make_path(points: Vec<Point3d>, tension: f64) -> VesselPath {
    VesselPath::from_points(VesselUid::new("prop"), points, tension).unwrap()
}

const TOL: f64 = 1e-6;

// ---------------------------------------------------------------------------
// 1. set_control_points round trip
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn set_control_points_round_trip(points in prop::collection::vec(arb_point(), 0..12)) {
        let mut path = VesselPath::new(VesselUid::new("rt"));
        path.set_control_points(points.clone()).unwrap();
        prop_assert_eq!(path.control_point_count(), points.len());
        for (i, p) in points.iter().enumerate() {
            prop_assert_eq!(path.control_point(i), Some(*p));
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Length is idempotent absent mutation; arc table is monotonic
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn length_is_idempotent(points in arb_polygon(), tension in arb_tension()) {
        let path = make_path(points, tension);
        let first = path.parametric_length();
        let second = path.parametric_length();
        prop_assert_eq!(first, second);
        prop_assert!(first > 0.0);
    }
}

proptest! {
    #[test]
    fn polyline_length_matches_parametric_length(points in arb_polygon(), tension in arb_tension()) {
        let path = make_path(points, tension);
        let poly = path.polyline().unwrap();
        let summed: f64 = poly.points.windows(2).map(|w| w[0].distance_to(&w[1])).sum();
        prop_assert!((summed - path.parametric_length()).abs() < TOL * summed.max(1.0));
    }
}

// ---------------------------------------------------------------------------
// 3. End positions coincide with first/last control points
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn ends_match_control_points(points in arb_polygon(), tension in arb_tension()) {
        let first = points[0];
        let last = *points.last().unwrap();
        let path = make_path(points, tension);
        let length = path.parametric_length();
        prop_assert!(path.position(0.0).distance_to(&first) < TOL);
        prop_assert!(path.position(length).distance_to(&last) < TOL);
        // Out-of-range parameters clamp.
        prop_assert!(path.position(-10.0).distance_to(&first) < TOL);
        prop_assert!(path.position(length + 10.0).distance_to(&last) < TOL);
    }
}

// ---------------------------------------------------------------------------
// 4. Closest point on own samples has near-zero residual
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn closest_point_on_samples(points in arb_polygon(), tension in arb_tension(), pick in 0usize..1000) {
        let path = make_path(points, tension);
        let poly = path.polyline().unwrap();
        let query = poly.points[pick % poly.points.len()];
        let result = path.closest_point(&query);
        match result {
            ClosestPoint::Endpoint { distance, .. } | ClosestPoint::Curve { distance, .. } => {
                prop_assert!(distance < TOL, "residual {}", distance);
            }
            ClosestPoint::None => prop_assert!(false, "non-empty path classified as None"),
        }
    }
}

// ---------------------------------------------------------------------------
// 5. Propagated normals stay unit length and perpendicular to the tangent
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn normals_are_orthonormal(points in arb_polygon(), tension in arb_tension(), s in 0.0f64..1.0) {
        let path = make_path(points, tension);
        let t = s * path.parametric_length();
        let tangent = path.tangent(t);
        let normal = path.normal(t);
        prop_assert!((tangent.length() - 1.0).abs() < TOL);
        prop_assert!((normal.length() - 1.0).abs() < TOL);
        prop_assert!(normal.dot(&tangent).abs() < TOL);
    }
}

// ---------------------------------------------------------------------------
// 6. Control-point parameter values are ordered and land on the points
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn control_point_parameters_are_ordered(points in arb_polygon(), tension in arb_tension()) {
        let path = make_path(points.clone(), tension);
        let mut previous = -1.0;
        for (id, cp) in points.iter().enumerate() {
            let t = path.control_point_parameter_value(id).unwrap();
            prop_assert!(t >= previous);
            prop_assert!(path.position(t).distance_to(cp) < 1e-3 * path.parametric_length().max(1.0));
            previous = t;
        }
    }
}
