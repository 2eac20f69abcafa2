//! Interpolating Kochanek–Bartels spline through an ordered control polygon.
//!
//! Control point `i` sits at native parameter `u = i`, so the native domain
//! of `n` points is `[0, n - 1]`. Bias and continuity are fixed at zero; only
//! tension is exposed.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point3d, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KochanekSpline {
    /// `0` gives a Catmull-Rom curve, `1` collapses knot tangents to zero,
    /// `-1` doubles them.
    pub tension: f64,
}

impl KochanekSpline {
    pub fn new(tension: f64) -> Self {
        Self { tension }
    }

    /// Upper end of the native parameter domain.
    pub fn domain_end(points: &[Point3d]) -> f64 {
        points.len().saturating_sub(1) as f64
    }

    /// Tangent at knot `i` (derivative with respect to `u`).
    fn knot_tangent(&self, points: &[Point3d], i: usize) -> Vec3 {
        let n = points.len();
        let scale = 1.0 - self.tension;
        if i == 0 {
            (points[1] - points[0]) * scale
        } else if i == n - 1 {
            (points[n - 1] - points[n - 2]) * scale
        } else {
            (points[i + 1] - points[i - 1]) * (0.5 * scale)
        }
    }

    /// Segment index and local parameter in `[0, 1]` for native `u`.
    fn locate(points: &[Point3d], u: f64) -> (usize, f64) {
        let last_segment = points.len() - 2;
        let u = u.clamp(0.0, Self::domain_end(points));
        let segment = (u.floor() as usize).min(last_segment);
        (segment, u - segment as f64)
    }

    /// Position at native parameter `u`. Needs at least two points; fewer
    /// yields the lone point or the origin.
    pub fn evaluate(&self, points: &[Point3d], u: f64) -> Point3d {
        match points.len() {
            0 => return Point3d::ORIGIN,
            1 => return points[0],
            _ => {}
        }
        let (seg, s) = Self::locate(points, u);
        let (s2, s3) = (s * s, s * s * s);
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;

        let p0 = points[seg].to_vec3();
        let p1 = points[seg + 1].to_vec3();
        let d0 = self.knot_tangent(points, seg);
        let d1 = self.knot_tangent(points, seg + 1);
        let v = p0 * h00 + d0 * h10 + p1 * h01 + d1 * h11;
        Point3d::new(v.x, v.y, v.z)
    }

    /// First derivative with respect to native `u`.
    pub fn derivative(&self, points: &[Point3d], u: f64) -> Vec3 {
        if points.len() < 2 {
            return Vec3::ZERO;
        }
        let (seg, s) = Self::locate(points, u);
        let s2 = s * s;
        let dh00 = 6.0 * s2 - 6.0 * s;
        let dh10 = 3.0 * s2 - 4.0 * s + 1.0;
        let dh01 = -6.0 * s2 + 6.0 * s;
        let dh11 = 3.0 * s2 - 2.0 * s;

        let p0 = points[seg].to_vec3();
        let p1 = points[seg + 1].to_vec3();
        let d0 = self.knot_tangent(points, seg);
        let d1 = self.knot_tangent(points, seg + 1);
        p0 * dh00 + d0 * dh10 + p1 * dh01 + d1 * dh11
    }

    /// Control-point segment owning native parameter `u`.
    pub fn segment_of(points: &[Point3d], u: f64) -> Option<usize> {
        if points.len() < 2 {
            return None;
        }
        Some(Self::locate(points, u).0)
    }
}

impl Default for KochanekSpline {
    fn default() -> Self {
        Self::new(0.0)
    }
}
