use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reserved name of the inflow sentinel endpoint.
pub const INFLOW_UID: &str = "Inflow";
/// Reserved name of the outflow sentinel endpoint.
pub const OUTFLOW_UID: &str = "Outflow";

/// Stable identity of one vessel path, independent of any list position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VesselUid(String);

impl VesselUid {
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if this identifier collides with a sentinel endpoint name.
    pub fn is_reserved(&self) -> bool {
        self.0 == INFLOW_UID || self.0 == OUTFLOW_UID
    }
}

impl fmt::Display for VesselUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VesselUid {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for VesselUid {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One member of a Boolean-operation or fillet pair: either a registered
/// vessel or one of the two logical sentinel endpoints.
///
/// Variant order matters: vessels sort before sentinels, so a canonicalized
/// pair always carries its sentinel in the second slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Endpoint {
    Vessel(VesselUid),
    Inflow,
    Outflow,
}

impl Endpoint {
    pub fn is_sentinel(&self) -> bool {
        !matches!(self, Endpoint::Vessel(_))
    }

    pub fn vessel(&self) -> Option<&VesselUid> {
        match self {
            Endpoint::Vessel(uid) => Some(uid),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Endpoint::Vessel(uid) => uid.as_str(),
            Endpoint::Inflow => INFLOW_UID,
            Endpoint::Outflow => OUTFLOW_UID,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Endpoint {
    fn from(value: String) -> Self {
        match value.as_str() {
            INFLOW_UID => Endpoint::Inflow,
            OUTFLOW_UID => Endpoint::Outflow,
            _ => Endpoint::Vessel(VesselUid(value)),
        }
    }
}

impl From<&str> for Endpoint {
    fn from(value: &str) -> Self {
        Endpoint::from(value.to_string())
    }
}

impl From<Endpoint> for String {
    fn from(value: Endpoint) -> Self {
        match value {
            Endpoint::Vessel(uid) => uid.0,
            other => other.as_str().to_string(),
        }
    }
}

impl From<VesselUid> for Endpoint {
    fn from(value: VesselUid) -> Self {
        Endpoint::Vessel(value)
    }
}

impl From<&VesselUid> for Endpoint {
    fn from(value: &VesselUid) -> Self {
        Endpoint::Vessel(value.clone())
    }
}
