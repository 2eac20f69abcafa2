use std::collections::BTreeMap;

use path_kernel::{PathEvent, VesselPath};
use tracing::debug;
use vessel_types::VesselUid;

use crate::graph::TopologyGraph;
use crate::types::ForestError;

/// Owns the topology graph together with one curve per registered vessel.
///
/// Vessel registration and removal should go through the scene so the
/// graph and the curve map stay in step.
#[derive(Debug, Clone, Default)]
pub struct VesselScene {
    graph: TopologyGraph,
    paths: BTreeMap<VesselUid, VesselPath>,
}

impl VesselScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` under its own UID. An existing curve with the same UID
    /// is replaced. Returns whether the vessel was newly registered.
    pub fn add_vessel(&mut self, path: VesselPath) -> Result<bool, ForestError> {
        let uid = path.uid().clone();
        let inserted = self.graph.insert_vessel(uid.clone())?;
        self.paths.insert(uid, path);
        Ok(inserted)
    }

    /// Register a new empty vessel under a generated UID.
    pub fn create_vessel(&mut self) -> Result<VesselUid, ForestError> {
        let uid = VesselUid::generate();
        debug!(%uid, "creating vessel");
        self.add_vessel(VesselPath::new(uid.clone()))?;
        Ok(uid)
    }

    /// Remove a vessel, its curve, and everything in the graph that
    /// references it.
    pub fn remove_vessel(&mut self, uid: &VesselUid) -> Result<Option<VesselPath>, ForestError> {
        self.graph.remove_vessel(uid)?;
        Ok(self.paths.remove(uid))
    }

    pub fn graph(&self) -> &TopologyGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut TopologyGraph {
        &mut self.graph
    }

    pub fn path(&self, uid: &VesselUid) -> Option<&VesselPath> {
        self.paths.get(uid)
    }

    pub fn path_mut(&mut self, uid: &VesselUid) -> Option<&mut VesselPath> {
        self.paths.get_mut(uid)
    }

    /// All curves in UID order.
    pub fn paths(&self) -> impl Iterator<Item = &VesselPath> {
        self.paths.values()
    }

    /// Curves of the active vessels, the input to solid modeling.
    pub fn active_paths(&self) -> impl Iterator<Item = &VesselPath> + '_ {
        self.graph
            .active_vessels()
            .filter_map(move |uid| self.paths.get(uid))
    }

    /// Pending curve notifications from every path, grouped by UID.
    pub fn drain_path_events(&mut self) -> Vec<PathEvent> {
        self.paths
            .values_mut()
            .flat_map(VesselPath::drain_events)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_kernel::Point3d;

    #[test]
    fn create_and_remove_keep_graph_in_step() {
        let mut scene = VesselScene::new();
        let uid = scene.create_vessel().unwrap();
        assert!(scene.graph().contains_vessel(&uid));
        assert!(scene.path(&uid).is_some());

        scene
            .path_mut(&uid)
            .unwrap()
            .add_control_point(Point3d::new(1.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(scene.drain_path_events().len(), 1);

        let removed = scene.remove_vessel(&uid).unwrap().unwrap();
        assert_eq!(removed.control_point_count(), 1);
        assert!(!scene.graph().contains_vessel(&uid));
        assert!(matches!(
            scene.remove_vessel(&uid),
            Err(ForestError::UnknownVessel { .. })
        ));
    }

    #[test]
    fn reserved_uid_is_rejected() {
        let mut scene = VesselScene::new();
        let result = scene.add_vessel(VesselPath::new(VesselUid::new("Outflow")));
        assert!(matches!(result, Err(ForestError::ReservedIdentifier { .. })));
        assert_eq!(scene.paths().count(), 0);
    }
}
