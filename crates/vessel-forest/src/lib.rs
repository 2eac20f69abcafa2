//! Vessel topology: which vessels exist, how they combine, and which of
//! them feed the solid model.
//!
//! [`TopologyGraph`] holds the validated Boolean plan and fillet annotations.
//! [`ForestOperation`] values are the undoable commands applied to it, and
//! [`VesselScene`] pairs the graph with the curve of each vessel.

pub mod active;
pub mod components;
pub mod graph;
pub mod operations;
pub mod scene;
pub mod types;
pub mod undo;

pub use graph::TopologyGraph;
pub use operations::{BooleanInfoChange, FilletChange, ForestOperation};
pub use scene::VesselScene;
pub use types::{ForestError, ForestEvent};
pub use undo::ReversibleOperation;
