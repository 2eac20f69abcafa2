/// Errors during project file loading.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("failed to parse file: {0}")]
    ParseError(String),

    #[error("unknown file format: {0}")]
    UnknownFormat(String),

    #[error("file version {file_version} is newer than supported version {supported_version}")]
    FutureVersion {
        file_version: u32,
        supported_version: u32,
    },

    #[error("migration failed from version {from} to {to}: {reason}")]
    MigrationFailed { from: u32, to: u32, reason: String },

    #[error("invalid reference in vessel forest: {0}")]
    InvalidReference(String),

    #[error("invalid path for vessel {uid}: {reason}")]
    InvalidPath { uid: String, reason: String },
}

/// Errors during project file saving.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SaveError {
    #[error("failed to serialize scene: {0}")]
    Serialize(String),
}
