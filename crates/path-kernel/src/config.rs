//! Tunable constants for path tessellation and geometric queries.

use serde::{Deserialize, Serialize};

/// Numeric settings shared by every query on a [`crate::VesselPath`].
///
/// The refinement constants are empirical: growth `x4` per round and a
/// `1e-4` relative stopping tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathConfig {
    /// First tessellation resolution, as a multiple of the control-point count.
    pub initial_resolution_factor: usize,
    /// Resolution multiplier applied each refinement round.
    pub refinement_growth: usize,
    /// Refinement stops once the relative length change drops below this.
    pub relative_tolerance: f64,
    /// Hard cap on refinement rounds after the first tessellation.
    pub max_refinements: usize,
    /// Lengths below this are treated as zero.
    pub zero_length: f64,
    /// Tangent cross products shorter than this count as collinear.
    pub frame_epsilon: f64,
    /// Arc-length distance from either end that classifies as an endpoint hit.
    pub endpoint_tolerance: f64,
    /// Bisection steps used when locating a control point's arc length.
    pub closest_point_bisections: usize,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            initial_resolution_factor: 2,
            refinement_growth: 4,
            relative_tolerance: 1e-4,
            max_refinements: 6,
            zero_length: 1e-12,
            frame_epsilon: 1e-10,
            endpoint_tolerance: 1e-6,
            closest_point_bisections: 60,
        }
    }
}

impl PathConfig {
    /// Coarser settings for interactive previews.
    pub fn preview() -> Self {
        Self {
            relative_tolerance: 1e-3,
            max_refinements: 3,
            ..Self::default()
        }
    }

    pub fn is_zero_length(&self, length: f64) -> bool {
        length.abs() < self.zero_length
    }
}
