//! Live "active" views of a [`TopologyGraph`].
//!
//! A vessel is active while its blending flag is set. Sentinel endpoints are
//! always active. Operations and fillets are active when both members are.
//! The views filter on every call; nothing is materialized.

use vessel_types::{BooleanOperationInfo, Endpoint, UidPair, VesselUid};

use crate::graph::TopologyGraph;

impl TopologyGraph {
    pub fn is_endpoint_active(&self, endpoint: &Endpoint) -> bool {
        match endpoint {
            Endpoint::Vessel(uid) => self.is_vessel_used_in_blending(uid),
            Endpoint::Inflow | Endpoint::Outflow => true,
        }
    }

    pub fn is_pair_active(&self, pair: &UidPair) -> bool {
        self.is_endpoint_active(&pair.first) && self.is_endpoint_active(&pair.second)
    }

    pub fn active_vessels(&self) -> impl Iterator<Item = &VesselUid> + '_ {
        self.vessels()
            .filter(move |uid| self.is_vessel_used_in_blending(uid))
    }

    /// Active operations, still in application order.
    pub fn active_boolean_operations(&self) -> impl Iterator<Item = &BooleanOperationInfo> + '_ {
        self.boolean_operations()
            .iter()
            .filter(move |info| self.is_pair_active(&info.vessels))
    }

    pub fn active_fillet_sizes(&self) -> impl Iterator<Item = (&UidPair, f64)> + '_ {
        self.fillet_sizes()
            .filter(move |(pair, _)| self.is_pair_active(pair))
    }
}
