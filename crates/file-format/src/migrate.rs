use serde_json::Value;
use tracing::info;

use crate::errors::LoadError;

/// Apply format migrations from `from_version` to `to_version`.
///
/// Migrations run on the raw JSON document, one version step at a time.
pub fn migrate(mut doc: Value, from_version: u32, to_version: u32) -> Result<Value, LoadError> {
    let mut version = from_version;
    while version < to_version {
        doc = match version {
            1 => migrate_v1_to_v2(doc)?,
            _ => {
                return Err(LoadError::MigrationFailed {
                    from: version,
                    to: to_version,
                    reason: format!("no migration path from v{version}"),
                })
            }
        };
        version += 1;
    }
    if from_version != to_version {
        info!(from = from_version, to = to_version, "project file migrated");
    }
    Ok(doc)
}

/// v1 Boolean operations have no `removed_face_owner`.
fn migrate_v1_to_v2(mut doc: Value) -> Result<Value, LoadError> {
    let failed = |reason: &str| LoadError::MigrationFailed {
        from: 1,
        to: 2,
        reason: reason.to_string(),
    };
    let operations = doc
        .pointer_mut("/forest/boolean_operations")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| failed("missing forest.boolean_operations"))?;
    for op in operations {
        op.as_object_mut()
            .ok_or_else(|| failed("boolean operation is not an object"))?
            .entry("removed_face_owner")
            .or_insert(Value::Null);
    }
    doc["version"] = Value::from(2);
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn v1_operations_gain_removed_face_owner() {
        let doc = json!({
            "version": 1,
            "forest": {
                "boolean_operations": [
                    {"vessels": {"first": "a", "second": "b"}, "operation": {"type": "Fuse"}, "removes_face": false}
                ]
            }
        });
        let migrated = migrate(doc, 1, 2).unwrap();
        assert_eq!(migrated["version"], 2);
        let op = &migrated["forest"]["boolean_operations"][0];
        assert!(op.as_object().unwrap().contains_key("removed_face_owner"));
        assert!(op["removed_face_owner"].is_null());
    }

    #[test]
    fn same_version_is_untouched() {
        let doc = json!({"version": 2});
        assert_eq!(migrate(doc.clone(), 2, 2).unwrap(), doc);
    }

    #[test]
    fn unknown_source_version_fails() {
        let result = migrate(json!({}), 0, 2);
        assert!(matches!(
            result,
            Err(LoadError::MigrationFailed { from: 0, to: 2, .. })
        ));
    }

    #[test]
    fn malformed_v1_document_fails() {
        let result = migrate(json!({"version": 1, "forest": {}}), 1, 2);
        assert!(matches!(result, Err(LoadError::MigrationFailed { .. })));
    }
}
