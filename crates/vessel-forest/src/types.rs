use serde::{Deserialize, Serialize};
use vessel_types::{BooleanOperationInfo, Endpoint, UidPair, VesselUid};

/// Change notification recorded by a [`crate::TopologyGraph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ForestEvent {
    VesselInserted {
        uid: VesselUid,
    },
    VesselRemoved {
        uid: VesselUid,
    },
    BooleanOperationAdded {
        info: BooleanOperationInfo,
        index: usize,
    },
    BooleanOperationRemoved {
        info: BooleanOperationInfo,
        index: usize,
    },
    BooleanOperationChanged {
        info: BooleanOperationInfo,
        index: usize,
    },
    BooleanOperationsSwapped {
        first: usize,
        second: usize,
    },
    BooleanOperationsReordered {
        from: usize,
        to: usize,
    },
    FilletChanged {
        pair: UidPair,
        size: f64,
    },
    FilletRemoved {
        pair: UidPair,
    },
    BlendingChanged {
        uid: VesselUid,
        used: bool,
    },
    /// Pushed after every adapter dispatch, successful or not.
    OperationExecuted {
        succeeded: bool,
    },
}

/// Errors from topology mutations and adapter dispatch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForestError {
    #[error("vessel not registered: {endpoint}")]
    UnregisteredVessel { endpoint: Endpoint },

    #[error("first member of {pair} must be a registered vessel")]
    InvalidFirstEndpoint { pair: UidPair },

    #[error("pair {pair} references the same endpoint twice")]
    SelfPair { pair: UidPair },

    #[error("identifier {uid} is reserved for a sentinel endpoint")]
    ReservedIdentifier { uid: VesselUid },

    #[error("fillet size must be finite and non-negative, got {size}")]
    InvalidFilletSize { size: f64 },

    #[error("a boolean operation for {pair} already exists")]
    DuplicateOperation { pair: UidPair },

    #[error("boolean operation not found: {pair}")]
    OperationNotFound { pair: UidPair },

    #[error("fillet not found: {pair}")]
    FilletNotFound { pair: UidPair },

    #[error("unknown vessel: {uid}")]
    UnknownVessel { uid: VesselUid },
}
