use serde::{Deserialize, Serialize};

use crate::geometry::Point3d;
use crate::tessellation::PathSample;

/// Tessellated point and segment buffers handed to rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylineRepresentation {
    pub points: Vec<Point3d>,
    /// Index pairs into `points`, one per line segment.
    pub lines: Vec<[usize; 2]>,
}

impl PolylineRepresentation {
    pub fn from_samples(samples: &[PathSample]) -> Option<Self> {
        if samples.len() < 2 {
            return None;
        }
        let points: Vec<Point3d> = samples.iter().map(|s| s.position).collect();
        let lines = (0..points.len() - 1).map(|i| [i, i + 1]).collect();
        Some(Self { points, lines })
    }

    /// Interleaved `x, y, z` coordinates.
    pub fn flat_coordinates(&self) -> Vec<f64> {
        self.points.iter().flat_map(|p| p.to_array()).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
