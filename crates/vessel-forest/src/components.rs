//! Connected components of the active subgraph.

use std::collections::BTreeMap;

use vessel_types::VesselUid;

use crate::graph::TopologyGraph;

/// Union-find over dense indices with path compression and union by rank.
#[derive(Debug, Clone)]
struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl DisjointSets {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    fn find(&mut self, mut idx: usize) -> usize {
        let mut root = idx;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[idx] != root {
            let next = self.parent[idx];
            self.parent[idx] = root;
            idx = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

impl TopologyGraph {
    /// Map every active vessel to a component id.
    ///
    /// Edges are the active Boolean operations between two vessels; sentinel
    /// endpoints never join components. Ids are dense and assigned in sorted
    /// UID order, so the result does not depend on the plan's order.
    pub fn active_connected_components(&self) -> BTreeMap<VesselUid, usize> {
        let active: Vec<&VesselUid> = self.active_vessels().collect();
        let position: BTreeMap<&VesselUid, usize> =
            active.iter().enumerate().map(|(i, uid)| (*uid, i)).collect();

        let mut sets = DisjointSets::new(active.len());
        for info in self.active_boolean_operations() {
            let (Some(a), Some(b)) = (info.vessels.first.vessel(), info.vessels.second.vessel())
            else {
                continue;
            };
            if let (Some(&ia), Some(&ib)) = (position.get(a), position.get(b)) {
                sets.union(ia, ib);
            }
        }

        let mut ids: BTreeMap<usize, usize> = BTreeMap::new();
        let mut components = BTreeMap::new();
        for (i, uid) in active.iter().enumerate() {
            let root = sets.find(i);
            let next = ids.len();
            let id = *ids.entry(root).or_insert(next);
            components.insert((*uid).clone(), id);
        }
        components
    }

    /// Number of distinct active components.
    pub fn active_component_count(&self) -> usize {
        let components = self.active_connected_components();
        components
            .values()
            .copied()
            .max()
            .map_or(0, |max| max + 1)
    }
}
