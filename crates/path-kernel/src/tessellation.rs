//! Adaptive tessellation and the cumulative arc-length table.

use tracing::{debug, instrument, warn};

use crate::cache::{CacheState, InvalidateCache};
use crate::config::PathConfig;
use crate::geometry::{BoundingBox, Point3d, Vec3};
use crate::spline::KochanekSpline;

/// One tessellation sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    /// Native spline parameter.
    pub u: f64,
    pub position: Point3d,
    /// Cumulative polyline length from the first sample.
    pub arc_length: f64,
    /// Unit tangent, or zero where the curve has no direction.
    pub tangent: Vec3,
}

/// Index-addressed sample arena. Storage is reused across rebuilds.
#[derive(Debug, Clone, Default)]
pub struct SampleTable {
    pub samples: Vec<PathSample>,
    pub length: f64,
    pub bounds: Option<BoundingBox>,
    pub state: CacheState,
    /// Number of refinement rounds the last rebuild ran.
    pub rounds: usize,
}

impl SampleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dirty(&self) -> bool {
        self.state == CacheState::Dirty
    }

    /// Rebuild samples and arc lengths.
    ///
    /// Starts at `initial_resolution_factor * n` segments and multiplies the
    /// resolution by `refinement_growth` until the relative length change
    /// falls under `relative_tolerance`, the length is zero, or
    /// `max_refinements` rounds have run.
    #[instrument(skip_all, fields(points = points.len()))]
    pub fn refine(&mut self, spline: &KochanekSpline, points: &[Point3d], config: &PathConfig) {
        self.samples.clear();
        self.length = 0.0;
        self.bounds = None;
        self.rounds = 0;
        self.state = CacheState::Clean;
        if points.len() < 2 {
            return;
        }

        let growth = config.refinement_growth.max(2);
        let mut resolution = (config.initial_resolution_factor * points.len()).max(1);
        let mut length = self.fill(spline, points, resolution);
        let mut converged = false;

        while self.rounds < config.max_refinements {
            if config.is_zero_length(length) {
                converged = true;
                break;
            }
            resolution *= growth;
            self.rounds += 1;
            let refined = self.fill(spline, points, resolution);
            let change = (refined - length).abs() / refined;
            length = refined;
            if change < config.relative_tolerance {
                converged = true;
                break;
            }
        }

        if !converged {
            warn!(
                rounds = self.rounds,
                length, "arc-length refinement hit the round cap"
            );
        }
        debug!(samples = self.samples.len(), length, "path tessellated");

        self.length = length;
        self.bounds = BoundingBox::from_points(self.samples.iter().map(|s| &s.position));
    }

    /// Sample `resolution + 1` points uniformly in `u` and return the
    /// polyline length.
    fn fill(&mut self, spline: &KochanekSpline, points: &[Point3d], resolution: usize) -> f64 {
        self.samples.clear();
        self.samples.reserve(resolution + 1);
        let end = KochanekSpline::domain_end(points);
        let mut arc_length = 0.0;
        let mut previous: Option<Point3d> = None;

        for i in 0..=resolution {
            let u = end * i as f64 / resolution as f64;
            let position = spline.evaluate(points, u);
            if let Some(prev) = previous {
                arc_length += prev.distance_to(&position);
            }
            previous = Some(position);
            self.samples.push(PathSample {
                u,
                position,
                arc_length,
                tangent: spline.derivative(points, u).normalize_or_zero(),
            });
        }

        self.repair_tangents();
        arc_length
    }

    /// Fill zero tangents (stationary knots, duplicate points) from the
    /// neighbouring chord, then from the previous sample.
    fn repair_tangents(&mut self) {
        let last = self.samples.len() - 1;
        for k in 0..=last {
            if self.samples[k].tangent != Vec3::ZERO {
                continue;
            }
            let before = self.samples[k.saturating_sub(1)].position;
            let after = self.samples[(k + 1).min(last)].position;
            let chord = (after - before).normalize_or_zero();
            self.samples[k].tangent = if chord != Vec3::ZERO || k == 0 {
                chord
            } else {
                self.samples[k - 1].tangent
            };
        }
    }

    /// Lower sample index and fraction toward the next sample for arc
    /// length `t`, clamped to the curve.
    pub fn bracket(&self, t: f64) -> Option<(usize, f64)> {
        if self.samples.len() < 2 {
            return None;
        }
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, self.length) };
        let upper = self.samples.partition_point(|s| s.arc_length <= t);
        let k = upper.saturating_sub(1).min(self.samples.len() - 2);
        let (a, b) = (self.samples[k].arc_length, self.samples[k + 1].arc_length);
        let span = b - a;
        let fraction = if span > 0.0 {
            ((t - a) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Some((k, fraction))
    }

    /// Native spline parameter at arc length `t`.
    pub fn native_parameter(&self, t: f64) -> f64 {
        match self.bracket(t) {
            Some((k, f)) => {
                let (a, b) = (self.samples[k].u, self.samples[k + 1].u);
                a + (b - a) * f
            }
            None => 0.0,
        }
    }
}

impl InvalidateCache for SampleTable {
    fn invalidate_cache(&mut self) {
        self.state = CacheState::Dirty;
    }
}
