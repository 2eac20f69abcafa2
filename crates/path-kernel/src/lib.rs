//! Parametric vessel-path curves.
//!
//! A [`VesselPath`] owns an editable control polygon and answers geometric
//! queries by arc length: position, tangent, a stably propagated normal
//! frame, closest point, and a tessellated polyline for rendering.
//!
//! Derived data (arc-length table, frame table, bounds) is cached and
//! recomputed lazily after any edit.

pub mod cache;
pub mod closest;
pub mod config;
pub mod error;
pub mod events;
pub mod frames;
pub mod geometry;
pub mod path;
pub mod polyline;
pub mod spline;
pub mod tessellation;

pub use closest::ClosestPoint;
pub use config::PathConfig;
pub use error::PathError;
pub use events::PathEvent;
pub use frames::Frame;
pub use geometry::{BoundingBox, Point3d, Vec3};
pub use path::VesselPath;
pub use polyline::PolylineRepresentation;
pub use spline::KochanekSpline;
