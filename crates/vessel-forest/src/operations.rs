//! Command objects that an undo manager stores and replays against a
//! [`TopologyGraph`].

use serde::{Deserialize, Serialize};
use tracing::warn;
use vessel_types::{BooleanOperationInfo, UidPair};

use crate::graph::TopologyGraph;
use crate::types::{ForestError, ForestEvent};

/// Fillet annotation edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum FilletChange {
    Change { pair: UidPair, size: f64 },
    Remove { pair: UidPair },
}

/// Edit of the Boolean-combination plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum BooleanInfoChange {
    /// Insert at `index`, or append when `None`.
    Add {
        info: BooleanOperationInfo,
        index: Option<usize>,
    },
    Remove {
        info: BooleanOperationInfo,
    },
    /// Overwrite in place; adds when the pair is absent.
    Change {
        info: BooleanOperationInfo,
    },
    Swap {
        first: BooleanOperationInfo,
        second: BooleanOperationInfo,
    },
}

/// A single graph mutation, dispatched by [`ForestOperation::execute`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target", content = "change")]
pub enum ForestOperation {
    Fillet(FilletChange),
    Boolean(BooleanInfoChange),
}

impl From<FilletChange> for ForestOperation {
    fn from(change: FilletChange) -> Self {
        ForestOperation::Fillet(change)
    }
}

impl From<BooleanInfoChange> for ForestOperation {
    fn from(change: BooleanInfoChange) -> Self {
        ForestOperation::Boolean(change)
    }
}

impl ForestOperation {
    /// Apply the operation to `graph`.
    ///
    /// A failed dispatch leaves the graph untouched. Either way an
    /// [`ForestEvent::OperationExecuted`] event is queued so listeners can
    /// resynchronize.
    pub fn execute(&self, graph: &mut TopologyGraph) -> Result<(), ForestError> {
        let result = self.dispatch(graph);
        if let Err(err) = &result {
            warn!(operation = ?self, %err, "forest operation failed");
        }
        graph.push_event(ForestEvent::OperationExecuted {
            succeeded: result.is_ok(),
        });
        result
    }

    fn dispatch(&self, graph: &mut TopologyGraph) -> Result<(), ForestError> {
        match self {
            ForestOperation::Fillet(FilletChange::Change { pair, size }) => {
                graph.set_fillet_size(pair.clone(), *size).map(|_| ())
            }
            ForestOperation::Fillet(FilletChange::Remove { pair }) => {
                graph.remove_fillet_size(pair).map(|_| ())
            }
            ForestOperation::Boolean(BooleanInfoChange::Add { info, index }) => graph
                .add_boolean_operation(info.clone(), *index)
                .map(|_| ()),
            ForestOperation::Boolean(BooleanInfoChange::Remove { info }) => graph
                .remove_boolean_operation(&info.vessels)
                .map(|_| ()),
            ForestOperation::Boolean(BooleanInfoChange::Change { info }) => graph
                .replace_boolean_operation(info.clone())
                .map(|_| ()),
            ForestOperation::Boolean(BooleanInfoChange::Swap { first, second }) => {
                graph.swap_boolean_operations(&first.vessels, &second.vessels)
            }
        }
    }

    /// The operation that undoes `self`, computed from `graph` before `self`
    /// runs. `None` when `self` would fail against `graph`.
    pub fn inverse(&self, graph: &TopologyGraph) -> Option<ForestOperation> {
        let inverse = match self {
            ForestOperation::Fillet(FilletChange::Change { pair, size }) => {
                if !size.is_finite() || *size < 0.0 || graph.validate_pair(pair).is_err() {
                    return None;
                }
                match graph.fillet_entry(pair) {
                    Some((key, previous)) => FilletChange::Change {
                        pair: key.clone(),
                        size: previous,
                    }
                    .into(),
                    None => FilletChange::Remove { pair: pair.clone() }.into(),
                }
            }
            ForestOperation::Fillet(FilletChange::Remove { pair }) => {
                graph.validate_pair(&pair.normalized()).ok()?;
                let (key, size) = graph.fillet_entry(pair)?;
                FilletChange::Change {
                    pair: key.clone(),
                    size,
                }
                .into()
            }
            ForestOperation::Boolean(BooleanInfoChange::Add { info, .. }) => {
                Self::added_inverse(graph, info)?
            }
            ForestOperation::Boolean(BooleanInfoChange::Remove { info }) => {
                let index = graph.boolean_operation_index(&info.vessels)?;
                BooleanInfoChange::Add {
                    info: graph.boolean_operations()[index].clone(),
                    index: Some(index),
                }
                .into()
            }
            ForestOperation::Boolean(BooleanInfoChange::Change { info }) => {
                match graph.boolean_operation(&info.vessels) {
                    Some(stored) => BooleanInfoChange::Change {
                        info: stored.clone(),
                    }
                    .into(),
                    None => Self::added_inverse(graph, info)?,
                }
            }
            ForestOperation::Boolean(BooleanInfoChange::Swap { first, second }) => {
                graph.boolean_operation_index(&first.vessels)?;
                graph.boolean_operation_index(&second.vessels)?;
                self.clone()
            }
        };
        Some(inverse)
    }

    fn added_inverse(graph: &TopologyGraph, info: &BooleanOperationInfo) -> Option<ForestOperation> {
        graph.validate_pair(&info.vessels).ok()?;
        if graph.boolean_operation_index(&info.vessels).is_some() {
            return None;
        }
        Some(BooleanInfoChange::Remove { info: info.clone() }.into())
    }
}
