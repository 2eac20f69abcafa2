//! Versioned JSON persistence for a [`vessel_forest::VesselScene`].
//!
//! Documents are produced and consumed as in-memory strings; reading and
//! writing files is left to the host.

pub mod errors;
pub mod load;
pub mod metadata;
pub mod migrate;
pub mod save;

pub use errors::{LoadError, SaveError};
pub use load::load_scene;
pub use metadata::ProjectMetadata;
pub use save::{save_scene, FORMAT_ID, FORMAT_VERSION};
