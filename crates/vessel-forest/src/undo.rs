use crate::graph::TopologyGraph;
use crate::operations::ForestOperation;
use crate::types::ForestError;

/// A do/undo command pair recorded around one user mutation.
///
/// The pair is built from the graph state *before* the forward operation
/// runs. Storing and ordering pairs is the undo manager's job.
#[derive(Debug, Clone, PartialEq)]
pub struct ReversibleOperation {
    pub forward: ForestOperation,
    pub backward: ForestOperation,
}

impl ReversibleOperation {
    /// Pair `forward` with its inverse against the current `graph`.
    /// Returns `None` when `forward` would fail.
    pub fn record(forward: ForestOperation, graph: &TopologyGraph) -> Option<Self> {
        let backward = forward.inverse(graph)?;
        Some(Self { forward, backward })
    }

    pub fn redo(&self, graph: &mut TopologyGraph) -> Result<(), ForestError> {
        self.forward.execute(graph)
    }

    pub fn undo(&self, graph: &mut TopologyGraph) -> Result<(), ForestError> {
        self.backward.execute(graph)
    }
}
