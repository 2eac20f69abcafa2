//! Closest-point search against the tessellated path.

use crate::geometry::Point3d;
use crate::tessellation::PathSample;

/// Classification of a closest-point query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClosestPoint {
    /// The path has no control points.
    None,
    /// The match lies at the start or end of the path.
    Endpoint {
        control_point: usize,
        t: f64,
        point: Point3d,
        distance: f64,
    },
    /// The match lies strictly inside the path.
    Curve {
        t: f64,
        /// Control-point segment owning the match.
        segment: usize,
        point: Point3d,
        distance: f64,
    },
}

impl ClosestPoint {
    pub fn t(&self) -> Option<f64> {
        match self {
            ClosestPoint::None => None,
            ClosestPoint::Endpoint { t, .. } | ClosestPoint::Curve { t, .. } => Some(*t),
        }
    }

    pub fn point(&self) -> Option<Point3d> {
        match self {
            ClosestPoint::None => None,
            ClosestPoint::Endpoint { point, .. } | ClosestPoint::Curve { point, .. } => {
                Some(*point)
            }
        }
    }

    /// Residual distance between the query and the matched point.
    pub fn distance(&self) -> Option<f64> {
        match self {
            ClosestPoint::None => None,
            ClosestPoint::Endpoint { distance, .. } | ClosestPoint::Curve { distance, .. } => {
                Some(*distance)
            }
        }
    }
}

/// Raw hit on the sample polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SampleHit {
    pub t: f64,
    pub u: f64,
    pub point: Point3d,
    pub distance: f64,
}

/// Nearest sample, refined by projecting onto the two polyline segments that
/// bracket it.
pub(crate) fn nearest_on_samples(samples: &[PathSample], query: &Point3d) -> Option<SampleHit> {
    let (nearest, _) = samples
        .iter()
        .enumerate()
        .map(|(k, s)| (k, s.position.distance_squared_to(query)))
        .min_by(|a, b| a.1.total_cmp(&b.1))?;

    let first = samples[nearest];
    let mut best = SampleHit {
        t: first.arc_length,
        u: first.u,
        point: first.position,
        distance: first.position.distance_to(query),
    };

    let last = samples.len() - 1;
    let neighbours = [
        nearest.checked_sub(1).map(|k| (k, nearest)),
        (nearest < last).then_some((nearest, nearest + 1)),
    ];
    for (a, b) in neighbours.into_iter().flatten() {
        let hit = project_onto_segment(&samples[a], &samples[b], query);
        if hit.distance < best.distance {
            best = hit;
        }
    }
    Some(best)
}

fn project_onto_segment(a: &PathSample, b: &PathSample, query: &Point3d) -> SampleHit {
    let ab = b.position - a.position;
    let len2 = ab.length_squared();
    let f = if len2 > 0.0 {
        ((*query - a.position).dot(&ab) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let point = a.position.lerp(&b.position, f);
    SampleHit {
        t: a.arc_length + (b.arc_length - a.arc_length) * f,
        u: a.u + (b.u - a.u) * f,
        point,
        distance: point.distance_to(query),
    }
}
