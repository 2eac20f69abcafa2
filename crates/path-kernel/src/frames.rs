//! Stable normal-frame propagation along the tessellated path.
//!
//! Normals are carried from sample to sample by the minimal rotation that
//! takes one tangent to the next, so near-straight and torsion-free stretches
//! never flip. Propagation is incremental: only samples past the last
//! propagated index are advanced.

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

use crate::cache::{CacheState, InvalidateCache};
use crate::geometry::{Point3d, Vec3};
use crate::tessellation::PathSample;

/// Orthonormal frame at one point of a path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub origin: Point3d,
    pub tangent: Vec3,
    pub normal: Vec3,
    pub binormal: Vec3,
}

impl Frame {
    pub fn degenerate(origin: Point3d) -> Self {
        Self {
            origin,
            tangent: Vec3::ZERO,
            normal: Vec3::ZERO,
            binormal: Vec3::ZERO,
        }
    }
}

/// Normal perpendicular to `tangent`, built from the coordinate axis least
/// aligned with it.
pub fn initial_normal(tangent: &Vec3) -> Vec3 {
    let reference = tangent.least_aligned_axis();
    (reference - *tangent * tangent.dot(&reference)).normalize_or_zero()
}

/// Rodrigues rotation about unit `axis` by the angle whose cosine is `cos_angle`.
pub fn rodrigues(axis: &Vec3, cos_angle: f64) -> Matrix3<f64> {
    let angle = cos_angle.clamp(-1.0, 1.0).acos();
    let (sin, cos) = angle.sin_cos();
    #[rustfmt::skip]
    let k = Matrix3::new(
        0.0,     -axis.z, axis.y,
        axis.z,  0.0,     -axis.x,
        -axis.y, axis.x,  0.0,
    );
    Matrix3::identity() + k * sin + k * k * (1.0 - cos)
}

/// Carry `prev_normal` from `prev_tangent` to `tangent`.
///
/// Collinear tangents (cross product shorter than `eps`) keep the normal
/// unchanged.
pub fn transport(prev_tangent: &Vec3, tangent: &Vec3, prev_normal: &Vec3, eps: f64) -> Vec3 {
    let axis = prev_tangent.cross(tangent);
    let Some(axis) = axis.normalized_eps(eps) else {
        return *prev_normal;
    };
    let rotation = rodrigues(&axis, tangent.dot(prev_tangent));
    Vec3::from_na(&(rotation * prev_normal.to_na()))
}

/// Memoized per-sample normals. `normals.len()` is the number of samples
/// propagated so far.
#[derive(Debug, Clone, Default)]
pub struct FrameTable {
    normals: Vec<Vec3>,
    state: CacheState,
}

impl FrameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn propagated(&self) -> usize {
        self.normals.len()
    }

    /// True until the first sample has been propagated after a reset.
    pub fn is_dirty(&self) -> bool {
        self.state == CacheState::Dirty
    }

    /// Propagate normals up to and including sample `index`.
    pub fn advance_to(&mut self, samples: &[PathSample], index: usize, eps: f64) {
        if samples.is_empty() {
            return;
        }
        let index = index.min(samples.len() - 1);
        if self.normals.is_empty() {
            self.normals.reserve(samples.len());
            self.normals.push(initial_normal(&samples[0].tangent));
            self.state = CacheState::Clean;
        }
        for k in self.normals.len()..=index {
            let prev = self.normals[k - 1];
            let next = transport(&samples[k - 1].tangent, &samples[k].tangent, &prev, eps);
            self.normals.push(next);
        }
    }

    pub fn normal(&self, index: usize) -> Option<Vec3> {
        self.normals.get(index).copied()
    }
}

impl InvalidateCache for FrameTable {
    fn invalidate_cache(&mut self) {
        self.normals.clear();
        self.state = CacheState::Dirty;
    }
}
