use path_kernel::VesselPath;
use serde_json::Value;
use tracing::debug;
use vessel_forest::VesselScene;

use crate::errors::LoadError;
use crate::metadata::ProjectMetadata;
use crate::save::{ForestRecord, PathRecord, VesselFile, FORMAT_ID, FORMAT_VERSION};

/// Deserialize a scene from a JSON string.
///
/// Validates the format identifier and version, migrates older documents,
/// then rebuilds the scene through the graph's validating mutators so a
/// dangling reference is reported instead of loaded.
pub fn load_scene(json: &str) -> Result<(VesselScene, ProjectMetadata), LoadError> {
    let doc: Value = serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    let format = doc
        .get("format")
        .and_then(Value::as_str)
        .ok_or_else(|| LoadError::ParseError("missing format identifier".to_string()))?;
    if format != FORMAT_ID {
        return Err(LoadError::UnknownFormat(format.to_string()));
    }

    let version = doc
        .get("version")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| LoadError::ParseError("missing or invalid version".to_string()))?;
    if version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: version,
            supported_version: FORMAT_VERSION,
        });
    }

    let doc = crate::migrate::migrate(doc, version, FORMAT_VERSION)?;
    let file: VesselFile =
        serde_json::from_value(doc).map_err(|e| LoadError::ParseError(e.to_string()))?;

    let scene = rebuild_scene(file.forest, file.paths)?;
    Ok((scene, file.project))
}

fn rebuild_scene(forest: ForestRecord, paths: Vec<PathRecord>) -> Result<VesselScene, LoadError> {
    let invalid = |e: vessel_forest::ForestError| LoadError::InvalidReference(e.to_string());
    let mut scene = VesselScene::new();
    scene.graph_mut().set_events_muted(true);

    for uid in forest.vessels {
        scene
            .add_vessel(VesselPath::new(uid))
            .map_err(invalid)?;
    }
    for record in paths {
        if !scene.graph().contains_vessel(&record.uid) {
            return Err(LoadError::InvalidReference(format!(
                "path {} has no vessel entry",
                record.uid
            )));
        }
        let path = VesselPath::from_points(record.uid.clone(), record.control_points, record.tension)
            .map_err(|e| LoadError::InvalidPath {
                uid: record.uid.to_string(),
                reason: e.to_string(),
            })?;
        scene.add_vessel(path).map_err(invalid)?;
    }

    let graph = scene.graph_mut();
    for info in forest.boolean_operations {
        graph.add_boolean_operation(info, None).map_err(invalid)?;
    }
    for (uid, used) in &forest.blending {
        graph
            .set_vessel_used_in_blending(uid, *used)
            .map_err(invalid)?;
    }
    for fillet in forest.fillets {
        graph
            .set_fillet_size(fillet.pair, fillet.size)
            .map_err(invalid)?;
    }
    graph.set_events_muted(false);

    debug!(
        vessels = graph.vessel_count(),
        operations = graph.boolean_operations().len(),
        "scene loaded"
    );
    Ok(scene)
}
