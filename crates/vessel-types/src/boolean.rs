use serde::{Deserialize, Serialize};

use crate::pair::UidPair;
use crate::uid::VesselUid;

/// Boolean operation applied between two vessel solids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BooleanOperationType {
    Fuse,
    Cut,
    Common,
}

/// One step of the ordered Boolean-combination plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanOperationInfo {
    /// The two operands. The second may be a sentinel endpoint.
    pub vessels: UidPair,
    pub operation: BooleanOperationType,
    /// Whether the operation removes a face of one of the operands.
    pub removes_face: bool,
    /// Vessel owning the removed face. Absent in files written before the
    /// field existed.
    #[serde(default)]
    pub removed_face_owner: Option<VesselUid>,
}

impl BooleanOperationInfo {
    pub fn new(vessels: UidPair, operation: BooleanOperationType) -> Self {
        Self {
            vessels,
            operation,
            removes_face: false,
            removed_face_owner: None,
        }
    }

    pub fn fuse(vessels: UidPair) -> Self {
        Self::new(vessels, BooleanOperationType::Fuse)
    }

    pub fn with_removed_face(mut self, owner: VesselUid) -> Self {
        self.removes_face = true;
        self.removed_face_owner = Some(owner);
        self
    }
}
