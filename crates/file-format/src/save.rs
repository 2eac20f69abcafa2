use std::collections::BTreeMap;

use path_kernel::{Point3d, VesselPath};
use serde::{Deserialize, Serialize};
use vessel_forest::{TopologyGraph, VesselScene};
use vessel_types::{BooleanOperationInfo, UidPair, VesselUid};

use crate::errors::SaveError;
use crate::metadata::ProjectMetadata;

/// Format identifier written into every document.
pub const FORMAT_ID: &str = "vessel-forest";

/// Current file format version.
///
/// Version 2 added `removed_face_owner` to Boolean operations.
pub const FORMAT_VERSION: u32 = 2;

/// One vessel curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRecord {
    pub uid: VesselUid,
    pub tension: f64,
    pub control_points: Vec<Point3d>,
}

impl From<&VesselPath> for PathRecord {
    fn from(path: &VesselPath) -> Self {
        Self {
            uid: path.uid().clone(),
            tension: path.tension(),
            control_points: path.control_points().to_vec(),
        }
    }
}

/// One fillet annotation. Pairs cannot be JSON object keys, so fillets are
/// stored as a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilletRecord {
    pub pair: UidPair,
    pub size: f64,
}

/// The topology graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestRecord {
    pub vessels: Vec<VesselUid>,
    /// In application order.
    pub boolean_operations: Vec<BooleanOperationInfo>,
    pub blending: BTreeMap<VesselUid, bool>,
    pub fillets: Vec<FilletRecord>,
}

impl From<&TopologyGraph> for ForestRecord {
    fn from(graph: &TopologyGraph) -> Self {
        Self {
            vessels: graph.vessels().cloned().collect(),
            boolean_operations: graph.boolean_operations().to_vec(),
            blending: graph
                .vessels()
                .map(|uid| (uid.clone(), graph.is_vessel_used_in_blending(uid)))
                .collect(),
            fillets: graph
                .fillet_sizes()
                .map(|(pair, size)| FilletRecord {
                    pair: pair.clone(),
                    size,
                })
                .collect(),
        }
    }
}

/// The top-level file structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselFile {
    pub format: String,
    pub version: u32,
    pub project: ProjectMetadata,
    pub forest: ForestRecord,
    pub paths: Vec<PathRecord>,
}

impl VesselFile {
    pub fn from_scene(scene: &VesselScene, metadata: &ProjectMetadata) -> Self {
        Self {
            format: FORMAT_ID.to_string(),
            version: FORMAT_VERSION,
            project: metadata.clone(),
            forest: ForestRecord::from(scene.graph()),
            paths: scene.paths().map(PathRecord::from).collect(),
        }
    }
}

/// Serialize a scene to a pretty-printed JSON string.
pub fn save_scene(scene: &VesselScene, metadata: &ProjectMetadata) -> Result<String, SaveError> {
    let file = VesselFile::from_scene(scene, metadata);
    serde_json::to_string_pretty(&file).map_err(|e| SaveError::Serialize(e.to_string()))
}
