use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;
use vessel_types::{BooleanOperationInfo, Endpoint, EventQueue, UidPair, VesselUid};

use crate::types::{ForestError, ForestEvent};

/// Registry of vessels plus the ordered Boolean-combination plan, fillet
/// annotations and per-vessel blending flags.
///
/// Every mutator validates the identifiers it references before touching
/// any state; a failed call leaves the graph exactly as it was.
#[derive(Debug, Clone, Default)]
pub struct TopologyGraph {
    vessels: BTreeSet<VesselUid>,
    /// Application order of the Boolean plan.
    boolean_operations: Vec<BooleanOperationInfo>,
    fillet_sizes: BTreeMap<UidPair, f64>,
    blending: BTreeMap<VesselUid, bool>,
    topology_modified: u64,
    events: EventQueue<ForestEvent>,
}

impl TopologyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Validation ─────────────────────────────────────────────────────────

    /// A pair is valid when its first member is a registered vessel and its
    /// second is a registered vessel or a sentinel.
    pub fn validate_pair(&self, pair: &UidPair) -> Result<(), ForestError> {
        if pair.is_self_pair() {
            return Err(ForestError::SelfPair { pair: pair.clone() });
        }
        match &pair.first {
            Endpoint::Vessel(uid) if !self.vessels.contains(uid) => {
                return Err(ForestError::UnregisteredVessel {
                    endpoint: pair.first.clone(),
                })
            }
            Endpoint::Vessel(_) => {}
            _ => return Err(ForestError::InvalidFirstEndpoint { pair: pair.clone() }),
        }
        match &pair.second {
            Endpoint::Vessel(uid) if !self.vessels.contains(uid) => {
                Err(ForestError::UnregisteredVessel {
                    endpoint: pair.second.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    fn bump(&mut self) {
        self.topology_modified += 1;
    }

    // ── Vessels ────────────────────────────────────────────────────────────

    /// Register a vessel. Returns `Ok(false)` if it was already present.
    pub fn insert_vessel(&mut self, uid: VesselUid) -> Result<bool, ForestError> {
        if uid.is_reserved() {
            return Err(ForestError::ReservedIdentifier { uid });
        }
        if self.vessels.contains(&uid) {
            return Ok(false);
        }
        debug!(%uid, "vessel inserted");
        self.vessels.insert(uid.clone());
        self.blending.insert(uid.clone(), true);
        self.events.push(ForestEvent::VesselInserted { uid });
        Ok(true)
    }

    /// Unregister a vessel, dropping every Boolean operation and fillet that
    /// mentions it.
    pub fn remove_vessel(&mut self, uid: &VesselUid) -> Result<(), ForestError> {
        if !self.vessels.remove(uid) {
            return Err(ForestError::UnknownVessel { uid: uid.clone() });
        }
        self.blending.remove(uid);

        let mut removed_operations = 0;
        let mut index = 0;
        while index < self.boolean_operations.len() {
            if self.boolean_operations[index].vessels.contains(uid) {
                let info = self.boolean_operations.remove(index);
                self.events
                    .push(ForestEvent::BooleanOperationRemoved { info, index });
                removed_operations += 1;
            } else {
                index += 1;
            }
        }

        let doomed: Vec<UidPair> = self
            .fillet_sizes
            .keys()
            .filter(|pair| pair.contains(uid))
            .cloned()
            .collect();
        for pair in doomed {
            self.fillet_sizes.remove(&pair);
            self.events.push(ForestEvent::FilletRemoved { pair });
        }

        if removed_operations > 0 {
            self.bump();
        }
        debug!(%uid, removed_operations, "vessel removed");
        self.events
            .push(ForestEvent::VesselRemoved { uid: uid.clone() });
        Ok(())
    }

    pub fn contains_vessel(&self, uid: &VesselUid) -> bool {
        self.vessels.contains(uid)
    }

    /// Registered vessels in sorted order.
    pub fn vessels(&self) -> impl Iterator<Item = &VesselUid> {
        self.vessels.iter()
    }

    pub fn vessel_count(&self) -> usize {
        self.vessels.len()
    }

    // ── Boolean operations ────────────────────────────────────────────────

    /// Insert `info` at `index`, appending when `index` is `None` or past
    /// the end. Returns the final position.
    pub fn add_boolean_operation(
        &mut self,
        info: BooleanOperationInfo,
        index: Option<usize>,
    ) -> Result<usize, ForestError> {
        self.validate_pair(&info.vessels)?;
        if self.boolean_operation_index(&info.vessels).is_some() {
            return Err(ForestError::DuplicateOperation {
                pair: info.vessels.clone(),
            });
        }
        let len = self.boolean_operations.len();
        let index = index.filter(|&i| i <= len).unwrap_or(len);
        debug!(pair = %info.vessels, index, "boolean operation added");
        self.boolean_operations.insert(index, info.clone());
        self.bump();
        self.events
            .push(ForestEvent::BooleanOperationAdded { info, index });
        Ok(index)
    }

    /// Remove the operation for `pair`, in either member order.
    pub fn remove_boolean_operation(
        &mut self,
        pair: &UidPair,
    ) -> Result<BooleanOperationInfo, ForestError> {
        let index = self
            .boolean_operation_index(pair)
            .ok_or_else(|| ForestError::OperationNotFound { pair: pair.clone() })?;
        let info = self.boolean_operations.remove(index);
        debug!(%pair, index, "boolean operation removed");
        self.bump();
        self.events.push(ForestEvent::BooleanOperationRemoved {
            info: info.clone(),
            index,
        });
        Ok(info)
    }

    /// Overwrite the operation for `info.vessels` in place, or add it when
    /// absent. Overwriting does not bump the modification counter.
    pub fn replace_boolean_operation(
        &mut self,
        info: BooleanOperationInfo,
    ) -> Result<usize, ForestError> {
        let Some(index) = self.boolean_operation_index(&info.vessels) else {
            return self.add_boolean_operation(info, None);
        };
        self.validate_pair(&info.vessels)?;
        self.boolean_operations[index] = info.clone();
        self.events
            .push(ForestEvent::BooleanOperationChanged { info, index });
        Ok(index)
    }

    /// Exchange the list positions of two operations.
    pub fn swap_boolean_operations(
        &mut self,
        first: &UidPair,
        second: &UidPair,
    ) -> Result<(), ForestError> {
        let a = self
            .boolean_operation_index(first)
            .ok_or_else(|| ForestError::OperationNotFound { pair: first.clone() })?;
        let b = self
            .boolean_operation_index(second)
            .ok_or_else(|| ForestError::OperationNotFound {
                pair: second.clone(),
            })?;
        self.boolean_operations.swap(a, b);
        self.events.push(ForestEvent::BooleanOperationsSwapped {
            first: a,
            second: b,
        });
        Ok(())
    }

    /// Move one operation to `new_index` (clamped). Returns the final position.
    pub fn reorder_boolean_operation(
        &mut self,
        pair: &UidPair,
        new_index: usize,
    ) -> Result<usize, ForestError> {
        let from = self
            .boolean_operation_index(pair)
            .ok_or_else(|| ForestError::OperationNotFound { pair: pair.clone() })?;
        let info = self.boolean_operations.remove(from);
        let to = new_index.min(self.boolean_operations.len());
        self.boolean_operations.insert(to, info);
        self.events
            .push(ForestEvent::BooleanOperationsReordered { from, to });
        Ok(to)
    }

    /// The Boolean plan in application order.
    pub fn boolean_operations(&self) -> &[BooleanOperationInfo] {
        &self.boolean_operations
    }

    pub fn boolean_operation(&self, pair: &UidPair) -> Option<&BooleanOperationInfo> {
        self.boolean_operations.iter().find(|op| &op.vessels == pair)
    }

    pub fn boolean_operation_index(&self, pair: &UidPair) -> Option<usize> {
        self.boolean_operations
            .iter()
            .position(|op| &op.vessels == pair)
    }

    // ── Fillets ───────────────────────────────────────────────────────────

    /// Set the fillet size for `pair`. Returns the previous size, if any.
    pub fn set_fillet_size(&mut self, pair: UidPair, size: f64) -> Result<Option<f64>, ForestError> {
        if !size.is_finite() || size < 0.0 {
            return Err(ForestError::InvalidFilletSize { size });
        }
        self.validate_pair(&pair)?;
        // Re-key so the stored member order follows the latest call.
        let previous = self.fillet_sizes.remove(&pair);
        self.fillet_sizes.insert(pair.clone(), size);
        self.events.push(ForestEvent::FilletChanged { pair, size });
        Ok(previous)
    }

    /// Remove the fillet for `pair` in either member order.
    pub fn remove_fillet_size(&mut self, pair: &UidPair) -> Result<f64, ForestError> {
        self.validate_pair(&pair.normalized())?;
        let size = self
            .fillet_sizes
            .remove(pair)
            .ok_or_else(|| ForestError::FilletNotFound { pair: pair.clone() })?;
        self.events
            .push(ForestEvent::FilletRemoved { pair: pair.clone() });
        Ok(size)
    }

    pub fn fillet_size(&self, pair: &UidPair) -> Option<f64> {
        self.fillet_sizes.get(pair).copied()
    }

    /// The stored key for `pair` (with its recorded member order) and size.
    pub fn fillet_entry(&self, pair: &UidPair) -> Option<(&UidPair, f64)> {
        self.fillet_sizes
            .get_key_value(pair)
            .map(|(key, size)| (key, *size))
    }

    /// Every fillet annotation, active or not.
    pub fn fillet_sizes(&self) -> impl Iterator<Item = (&UidPair, f64)> {
        self.fillet_sizes.iter().map(|(pair, size)| (pair, *size))
    }

    // ── Blending ──────────────────────────────────────────────────────────

    /// Returns whether the flag actually changed. Only a change bumps the
    /// modification counter.
    pub fn set_vessel_used_in_blending(
        &mut self,
        uid: &VesselUid,
        used: bool,
    ) -> Result<bool, ForestError> {
        let flag = self
            .blending
            .get_mut(uid)
            .ok_or_else(|| ForestError::UnknownVessel { uid: uid.clone() })?;
        if *flag == used {
            return Ok(false);
        }
        *flag = used;
        self.bump();
        self.events.push(ForestEvent::BlendingChanged {
            uid: uid.clone(),
            used,
        });
        Ok(true)
    }

    /// `false` for unknown vessels.
    pub fn is_vessel_used_in_blending(&self, uid: &VesselUid) -> bool {
        self.blending.get(uid).copied().unwrap_or(false)
    }

    // ── Bookkeeping ───────────────────────────────────────────────────────

    /// Monotonic count of structural changes to the Boolean plan or the
    /// active set. Fillet edits never bump it.
    pub fn topology_modification_count(&self) -> u64 {
        self.topology_modified
    }

    pub(crate) fn push_event(&mut self, event: ForestEvent) {
        self.events.push(event);
    }

    /// Take every pending change notification, oldest first.
    pub fn drain_events(&mut self) -> Vec<ForestEvent> {
        self.events.drain()
    }

    /// Suspend event recording, e.g. while restoring a saved scene.
    pub fn set_events_muted(&mut self, muted: bool) {
        self.events.set_muted(muted);
    }
}
