//! Editable vessel path with arc-length parametrized queries.

use std::cell::{Ref, RefCell, RefMut};

use tracing::{debug, warn};
use vessel_types::{EventQueue, VesselUid};

use crate::cache::InvalidateCache;
use crate::closest::{nearest_on_samples, ClosestPoint};
use crate::config::PathConfig;
use crate::error::PathError;
use crate::events::PathEvent;
use crate::frames::{initial_normal, Frame, FrameTable};
use crate::geometry::{BoundingBox, Point3d, Vec3};
use crate::polyline::PolylineRepresentation;
use crate::spline::KochanekSpline;
use crate::tessellation::SampleTable;

/// Derived data recomputed lazily after edits.
#[derive(Debug, Clone, Default)]
struct Derived {
    samples: SampleTable,
    frames: FrameTable,
}

impl InvalidateCache for Derived {
    fn invalidate_cache(&mut self) {
        self.samples.invalidate_cache();
        self.frames.invalidate_cache();
    }
}

/// The centerline of one vessel: an ordered control polygon interpolated by
/// a Kochanek spline and queried by arc length `t ∈ [0, length]`.
///
/// Queries take `&self`; the tessellation and frame tables live behind a
/// `RefCell` and are rebuilt on first use after any edit.
#[derive(Debug, Clone)]
pub struct VesselPath {
    uid: VesselUid,
    control_points: Vec<Point3d>,
    spline: KochanekSpline,
    config: PathConfig,
    derived: RefCell<Derived>,
    events: EventQueue<PathEvent>,
}

fn check_finite(p: &Point3d) -> Result<(), PathError> {
    if p.is_finite() {
        Ok(())
    } else {
        Err(PathError::NonFiniteCoordinate(p.to_array()))
    }
}

impl VesselPath {
    pub fn new(uid: VesselUid) -> Self {
        Self::with_config(uid, PathConfig::default())
    }

    pub fn with_config(uid: VesselUid, config: PathConfig) -> Self {
        Self {
            uid,
            control_points: Vec::new(),
            spline: KochanekSpline::default(),
            config,
            derived: RefCell::new(Derived::default()),
            events: EventQueue::new(),
        }
    }

    /// Build a path from existing control points without emitting events.
    pub fn from_points(
        uid: VesselUid,
        points: Vec<Point3d>,
        tension: f64,
    ) -> Result<Self, PathError> {
        let mut path = Self::new(uid);
        points.iter().try_for_each(check_finite)?;
        path.check_tension(tension)?;
        path.control_points = points;
        path.spline.tension = tension;
        Ok(path)
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn uid(&self) -> &VesselUid {
        &self.uid
    }

    pub fn config(&self) -> &PathConfig {
        &self.config
    }

    pub fn control_points(&self) -> &[Point3d] {
        &self.control_points
    }

    pub fn control_point(&self, index: usize) -> Option<Point3d> {
        self.control_points.get(index).copied()
    }

    pub fn control_point_count(&self) -> usize {
        self.control_points.len()
    }

    pub fn tension(&self) -> f64 {
        self.spline.tension
    }

    /// Take every pending change notification, oldest first.
    pub fn drain_events(&mut self) -> Vec<PathEvent> {
        self.events.drain()
    }

    // ── Editing ────────────────────────────────────────────────────────────

    fn invalidate(&mut self) {
        self.derived.get_mut().invalidate_cache();
    }

    /// Append a control point. Returns its index.
    pub fn add_control_point(&mut self, position: Point3d) -> Result<usize, PathError> {
        self.insert_control_point(self.control_points.len(), position)
    }

    /// Insert before `index`; an index past the end appends.
    pub fn insert_control_point(
        &mut self,
        index: usize,
        position: Point3d,
    ) -> Result<usize, PathError> {
        check_finite(&position)?;
        let index = index.min(self.control_points.len());
        self.control_points.insert(index, position);
        self.invalidate();
        debug!(uid = %self.uid, index, "control point inserted");
        self.events.push(PathEvent::ControlPointInserted {
            uid: self.uid.clone(),
            index,
        });
        Ok(index)
    }

    pub fn remove_control_point(&mut self, index: usize) -> Result<Point3d, PathError> {
        if index >= self.control_points.len() {
            return Err(PathError::IndexOutOfRange {
                index,
                count: self.control_points.len(),
            });
        }
        let removed = self.control_points.remove(index);
        self.invalidate();
        debug!(uid = %self.uid, index, "control point removed");
        self.events.push(PathEvent::ControlPointRemoved {
            uid: self.uid.clone(),
            index,
        });
        Ok(removed)
    }

    pub fn set_control_point(&mut self, index: usize, position: Point3d) -> Result<(), PathError> {
        check_finite(&position)?;
        let count = self.control_points.len();
        let slot = self
            .control_points
            .get_mut(index)
            .ok_or(PathError::IndexOutOfRange { index, count })?;
        *slot = position;
        self.invalidate();
        self.events.push(PathEvent::ControlPointModified {
            uid: self.uid.clone(),
            index,
        });
        Ok(())
    }

    /// Replace the whole control polygon.
    pub fn set_control_points(&mut self, points: Vec<Point3d>) -> Result<(), PathError> {
        points.iter().try_for_each(check_finite)?;
        self.control_points = points;
        self.invalidate();
        debug!(uid = %self.uid, count = self.control_points.len(), "control points replaced");
        self.events.push(PathEvent::AllPointsReplaced {
            uid: self.uid.clone(),
        });
        Ok(())
    }

    fn check_tension(&self, tension: f64) -> Result<(), PathError> {
        if tension.is_finite() && (-1.0..=1.0).contains(&tension) {
            Ok(())
        } else {
            Err(PathError::InvalidTension(tension))
        }
    }

    /// Set spline tension in `[-1, 1]`. Setting the current value is a no-op.
    pub fn set_tension(&mut self, tension: f64) -> Result<(), PathError> {
        self.check_tension(tension)?;
        if tension == self.spline.tension {
            return Ok(());
        }
        self.spline.tension = tension;
        self.invalidate();
        self.events.push(PathEvent::TensionChanged {
            uid: self.uid.clone(),
            tension,
        });
        Ok(())
    }

    /// Insert a control point at the curve position for arc length `t`.
    ///
    /// Returns the index of the new point, or of the existing control point
    /// the position coincides with.
    pub fn split_at(&mut self, t: f64) -> Result<usize, PathError> {
        if self.control_points.len() < 2 {
            return Err(PathError::DegeneratePath {
                count: self.control_points.len(),
            });
        }
        let position = self.position(t);
        let segment = self.segment_at(t).unwrap_or(0);
        for index in [segment, segment + 1] {
            if self.control_points[index].distance_to(&position) <= self.config.endpoint_tolerance {
                return Ok(index);
            }
        }
        self.insert_control_point(segment + 1, position)
    }

    // ── Derived data ───────────────────────────────────────────────────────

    fn refreshed_mut(&self) -> RefMut<'_, Derived> {
        let mut derived = self.derived.borrow_mut();
        if derived.samples.is_dirty() {
            derived
                .samples
                .refine(&self.spline, &self.control_points, &self.config);
            derived.frames.invalidate_cache();
        }
        derived
    }

    fn refreshed(&self) -> Ref<'_, Derived> {
        drop(self.refreshed_mut());
        self.derived.borrow()
    }

    fn is_degenerate(&self, query: &str) -> bool {
        let count = self.control_points.len();
        if count < 2 {
            warn!(uid = %self.uid, count, query, "path query on fewer than 2 control points");
            true
        } else {
            false
        }
    }

    /// Total arc length of the path.
    pub fn parametric_length(&self) -> f64 {
        self.refreshed().samples.length
    }

    /// Number of tessellation samples currently backing the path.
    pub fn sample_count(&self) -> usize {
        self.refreshed().samples.samples.len()
    }

    /// Number of samples whose normal has been propagated so far.
    pub fn propagated_frame_count(&self) -> usize {
        self.derived.borrow().frames.propagated()
    }

    /// Position at arc length `t` (clamped). A single-point path returns that
    /// point; an empty path returns the origin.
    pub fn position(&self, t: f64) -> Point3d {
        if self.is_degenerate("position") {
            return self.control_points.first().copied().unwrap_or(Point3d::ORIGIN);
        }
        let derived = self.refreshed();
        let u = derived.samples.native_parameter(t);
        self.spline.evaluate(&self.control_points, u)
    }

    fn exact_tangent(&self, samples: &SampleTable, t: f64) -> Vec3 {
        let Some((k, _)) = samples.bracket(t) else {
            return Vec3::ZERO;
        };
        let u = samples.native_parameter(t);
        let derivative = self.spline.derivative(&self.control_points, u);
        if let Some(tangent) = derivative.normalized_eps(self.config.frame_epsilon) {
            return tangent;
        }
        let (a, b) = (&samples.samples[k], &samples.samples[k + 1]);
        (b.position - a.position)
            .normalized_eps(self.config.frame_epsilon)
            .unwrap_or(a.tangent)
    }

    /// Unit tangent at arc length `t`.
    pub fn tangent(&self, t: f64) -> Vec3 {
        if self.is_degenerate("tangent") {
            return Vec3::ZERO;
        }
        let derived = self.refreshed();
        self.exact_tangent(&derived.samples, t)
    }

    /// Unit normal at arc length `t` from the propagated frame table.
    pub fn normal(&self, t: f64) -> Vec3 {
        if self.is_degenerate("normal") {
            return Vec3::ZERO;
        }
        let mut derived = self.refreshed_mut();
        let Derived { samples, frames } = &mut *derived;
        let Some((k, f)) = samples.bracket(t) else {
            return Vec3::ZERO;
        };
        // Zero-length paths have no direction to frame.
        let tangent = self.exact_tangent(samples, t);
        if tangent == Vec3::ZERO {
            return Vec3::ZERO;
        }
        frames.advance_to(&samples.samples, k + 1, self.config.frame_epsilon);
        let (Some(n0), Some(n1)) = (frames.normal(k), frames.normal(k + 1)) else {
            return Vec3::ZERO;
        };

        let blended = n0 * (1.0 - f) + n1 * f;
        tangent
            .cross(&blended)
            .cross(&tangent)
            .normalized_eps(self.config.frame_epsilon)
            .unwrap_or_else(|| initial_normal(&tangent))
    }

    /// Full frame at arc length `t`.
    pub fn frame(&self, t: f64) -> Frame {
        let origin = self.position(t);
        if self.control_points.len() < 2 {
            return Frame::degenerate(origin);
        }
        let tangent = self.tangent(t);
        let normal = self.normal(t);
        Frame {
            origin,
            tangent,
            normal,
            binormal: tangent.cross(&normal),
        }
    }

    /// Control-point segment owning arc length `t`.
    pub fn segment_at(&self, t: f64) -> Option<usize> {
        if self.control_points.len() < 2 {
            return None;
        }
        let u = self.refreshed().samples.native_parameter(t);
        KochanekSpline::segment_of(&self.control_points, u)
    }

    /// Closest point of the path to `query`.
    pub fn closest_point(&self, query: &Point3d) -> ClosestPoint {
        match self.control_points.as_slice() {
            [] => return ClosestPoint::None,
            [only] => {
                return ClosestPoint::Endpoint {
                    control_point: 0,
                    t: 0.0,
                    point: *only,
                    distance: only.distance_to(query),
                }
            }
            _ => {}
        }

        let derived = self.refreshed();
        let length = derived.samples.length;
        let Some(hit) = nearest_on_samples(&derived.samples.samples, query) else {
            return ClosestPoint::None;
        };

        let tolerance = self.config.endpoint_tolerance;
        let endpoint = |control_point: usize, t: f64| {
            let point = self.control_points[control_point];
            ClosestPoint::Endpoint {
                control_point,
                t,
                point,
                distance: point.distance_to(query),
            }
        };
        if hit.t <= tolerance {
            endpoint(0, 0.0)
        } else if length - hit.t <= tolerance {
            endpoint(self.control_points.len() - 1, length)
        } else {
            ClosestPoint::Curve {
                t: hit.t,
                segment: KochanekSpline::segment_of(&self.control_points, hit.u).unwrap_or(0),
                point: hit.point,
                distance: hit.distance,
            }
        }
    }

    /// Arc length at which control point `id` lies.
    ///
    /// The sample table is bisected on the native parameter to bracket the
    /// control point, then arc length inside the bracket is bisected toward
    /// the control point's position.
    pub fn control_point_parameter_value(&self, id: usize) -> Option<f64> {
        let count = self.control_points.len();
        if id >= count {
            return None;
        }
        if count < 2 || id == 0 {
            return Some(0.0);
        }
        let derived = self.refreshed();
        let table = &derived.samples;
        if id == count - 1 {
            return Some(table.length);
        }

        let target = id as f64;
        let samples = &table.samples;
        let upper = samples
            .partition_point(|s| s.u < target)
            .clamp(1, samples.len() - 1);
        if samples[upper].u == target {
            return Some(samples[upper].arc_length);
        }
        let (mut lo, mut hi) = (samples[upper - 1].arc_length, samples[upper].arc_length);
        let control_point = self.control_points[id];

        for _ in 0..self.config.closest_point_bisections {
            let mid = 0.5 * (lo + hi);
            let u = table.native_parameter(mid);
            let position = self.spline.evaluate(&self.control_points, u);
            let direction = self.spline.derivative(&self.control_points, u);
            let ahead = if direction.length() > self.config.frame_epsilon {
                direction.dot(&(control_point - position)) > 0.0
            } else {
                u < target
            };
            if ahead {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Some(0.5 * (lo + hi))
    }

    /// Tessellated polyline for rendering, `None` below two control points.
    pub fn polyline(&self) -> Option<PolylineRepresentation> {
        if self.control_points.len() < 2 {
            return None;
        }
        PolylineRepresentation::from_samples(&self.refreshed().samples.samples)
    }

    /// Bounding volume of the tessellated path.
    pub fn bounds(&self) -> Option<BoundingBox> {
        match self.control_points.len() {
            0 => None,
            1 => BoundingBox::from_points(&self.control_points),
            _ => self.refreshed().samples.bounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn straight() -> VesselPath {
        VesselPath::from_points(
            VesselUid::new("v1"),
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(5.0, 0.0, 0.0),
                Point3d::new(10.0, 0.0, 0.0),
            ],
            0.0,
        )
        .unwrap()
    }

    #[test]
    fn straight_line_length_and_midpoint() {
        let path = straight();
        assert_abs_diff_eq!(path.parametric_length(), 10.0, epsilon = 1e-3);
        let mid = path.position(5.0);
        assert_abs_diff_eq!(mid.distance_to(&Point3d::new(5.0, 0.0, 0.0)), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn edits_invalidate_cached_length() {
        let mut path = straight();
        assert_abs_diff_eq!(path.parametric_length(), 10.0, epsilon = 1e-3);
        path.add_control_point(Point3d::new(15.0, 0.0, 0.0)).unwrap();
        assert_abs_diff_eq!(path.parametric_length(), 15.0, epsilon = 1e-3);
        path.remove_control_point(0).unwrap();
        assert_abs_diff_eq!(path.parametric_length(), 10.0, epsilon = 1e-3);
    }

    #[test]
    fn insert_out_of_range_appends() {
        let mut path = straight();
        let idx = path.insert_control_point(99, Point3d::new(20.0, 0.0, 0.0)).unwrap();
        assert_eq!(idx, 3);
        let idx = path.insert_control_point(1, Point3d::new(2.0, 0.0, 0.0)).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(path.control_point(2), Some(Point3d::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn remove_out_of_range_fails() {
        let mut path = straight();
        let err = path.remove_control_point(3).unwrap_err();
        assert_eq!(err, PathError::IndexOutOfRange { index: 3, count: 3 });
        assert_eq!(path.control_point_count(), 3);
    }

    #[test]
    fn non_finite_point_rejected_without_change() {
        let mut path = straight();
        path.drain_events();
        let bad = Point3d::new(f64::NAN, 0.0, 0.0);
        assert!(path.add_control_point(bad).is_err());
        assert!(path.set_control_point(0, bad).is_err());
        assert!(path.set_control_points(vec![Point3d::ORIGIN, bad]).is_err());
        assert_eq!(path.control_point_count(), 3);
        assert!(path.drain_events().is_empty());
    }

    #[test]
    fn tension_validation_and_event() {
        let mut path = straight();
        path.drain_events();
        assert_eq!(path.set_tension(1.5), Err(PathError::InvalidTension(1.5)));
        path.set_tension(0.0).unwrap();
        assert!(path.drain_events().is_empty());
        path.set_tension(0.5).unwrap();
        assert_eq!(
            path.drain_events(),
            vec![PathEvent::TensionChanged {
                uid: VesselUid::new("v1"),
                tension: 0.5
            }]
        );
    }

    #[test]
    fn degenerate_queries_are_defined() {
        let mut path = VesselPath::new(VesselUid::new("empty"));
        assert_eq!(path.position(1.0), Point3d::ORIGIN);
        assert_eq!(path.tangent(1.0), Vec3::ZERO);
        assert_eq!(path.normal(1.0), Vec3::ZERO);
        assert_eq!(path.parametric_length(), 0.0);
        assert!(path.polyline().is_none());
        assert!(path.bounds().is_none());
        assert_eq!(path.closest_point(&Point3d::ORIGIN), ClosestPoint::None);

        path.add_control_point(Point3d::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(path.position(0.0), Point3d::new(1.0, 2.0, 3.0));
        assert!(matches!(
            path.closest_point(&Point3d::ORIGIN),
            ClosestPoint::Endpoint { control_point: 0, .. }
        ));
        assert_eq!(path.split_at(0.0), Err(PathError::DegeneratePath { count: 1 }));
    }

    #[test]
    fn normal_is_perpendicular_on_a_bend() {
        let path = VesselPath::from_points(
            VesselUid::new("bend"),
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(4.0, 0.0, 0.0),
                Point3d::new(6.0, 3.0, 1.0),
                Point3d::new(6.0, 8.0, 2.0),
            ],
            0.0,
        )
        .unwrap();
        let length = path.parametric_length();
        for i in 0..=20 {
            let t = length * i as f64 / 20.0;
            let frame = path.frame(t);
            assert_abs_diff_eq!(frame.normal.length(), 1.0, epsilon = 1e-9);
            assert_abs_diff_eq!(frame.normal.dot(&frame.tangent), 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(frame.binormal.length(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn frame_memo_advances_lazily() {
        let path = straight();
        let _ = path.parametric_length();
        assert_eq!(path.propagated_frame_count(), 0);
        let _ = path.normal(1.0);
        let partial = path.propagated_frame_count();
        assert!(partial > 0 && partial < path.sample_count());
        let _ = path.normal(10.0);
        assert_eq!(path.propagated_frame_count(), path.sample_count());
    }

    #[test]
    fn split_inserts_point_on_curve() {
        let mut path = straight();
        let index = path.split_at(2.5).unwrap();
        assert_eq!(index, 1);
        assert_abs_diff_eq!(path.control_point(1).unwrap().x, 2.5, epsilon = 1e-6);
        assert_eq!(path.split_at(0.0).unwrap(), 0);
    }

    #[test]
    fn control_point_parameter_values() {
        let path = straight();
        assert_eq!(path.control_point_parameter_value(0), Some(0.0));
        assert_abs_diff_eq!(
            path.control_point_parameter_value(1).unwrap(),
            5.0,
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(
            path.control_point_parameter_value(2).unwrap(),
            path.parametric_length()
        );
        assert_eq!(path.control_point_parameter_value(3), None);
    }
}
