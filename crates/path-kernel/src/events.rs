use vessel_types::VesselUid;

/// Change notification emitted by [`crate::VesselPath`] mutators.
#[derive(Debug, Clone, PartialEq)]
pub enum PathEvent {
    ControlPointInserted { uid: VesselUid, index: usize },
    ControlPointRemoved { uid: VesselUid, index: usize },
    ControlPointModified { uid: VesselUid, index: usize },
    AllPointsReplaced { uid: VesselUid },
    TensionChanged { uid: VesselUid, tension: f64 },
}

impl PathEvent {
    pub fn uid(&self) -> &VesselUid {
        match self {
            PathEvent::ControlPointInserted { uid, .. }
            | PathEvent::ControlPointRemoved { uid, .. }
            | PathEvent::ControlPointModified { uid, .. }
            | PathEvent::AllPointsReplaced { uid }
            | PathEvent::TensionChanged { uid, .. } => uid,
        }
    }
}
