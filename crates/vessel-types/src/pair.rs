use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::uid::{Endpoint, VesselUid};

/// A pair of endpoints that compares, hashes and orders independently of
/// member order: `(a, b)` and `(b, a)` are the same key.
///
/// The members are stored as given because some operations (`Cut`) read
/// them directionally. All comparisons go through [`UidPair::canonical`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UidPair {
    pub first: Endpoint,
    pub second: Endpoint,
}

impl UidPair {
    pub fn new(first: impl Into<Endpoint>, second: impl Into<Endpoint>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Members ordered (min, max). Sentinels always land in the second slot.
    pub fn canonical(&self) -> (&Endpoint, &Endpoint) {
        if self.first <= self.second {
            (&self.first, &self.second)
        } else {
            (&self.second, &self.first)
        }
    }

    /// The same pair with members in canonical order.
    pub fn normalized(&self) -> Self {
        let (a, b) = self.canonical();
        Self {
            first: a.clone(),
            second: b.clone(),
        }
    }

    pub fn contains(&self, uid: &VesselUid) -> bool {
        self.first.vessel() == Some(uid) || self.second.vessel() == Some(uid)
    }

    /// The member opposite `uid`, if `uid` is part of this pair.
    pub fn other(&self, uid: &VesselUid) -> Option<&Endpoint> {
        if self.first.vessel() == Some(uid) {
            Some(&self.second)
        } else if self.second.vessel() == Some(uid) {
            Some(&self.first)
        } else {
            None
        }
    }

    /// Vessel members only, skipping sentinels.
    pub fn vessels(&self) -> impl Iterator<Item = &VesselUid> {
        [&self.first, &self.second]
            .into_iter()
            .filter_map(Endpoint::vessel)
    }

    pub fn is_self_pair(&self) -> bool {
        self.first == self.second
    }
}

impl PartialEq for UidPair {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for UidPair {}

impl Hash for UidPair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl PartialOrd for UidPair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UidPair {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical().cmp(&other.canonical())
    }
}

impl fmt::Display for UidPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}
