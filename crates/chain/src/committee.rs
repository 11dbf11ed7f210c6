//! # Witness Committee Membership
//!
//! Approval votes may only be cast by members of the top-N active witness
//! committee at the current chain height. Membership changes block to
//! block, so the core asks a [`CommitteeOracle`] on every vote and never
//! caches the answer across operations.
//!
//! ## Thresholds
//!
//! ```text
//! majority (M)       = n * 2 / 3 + 1     → approve
//! super_majority (S) = n * 3 / 4 + 1     → close
//! ```
//!
//! Both are clamped to `1..=max(n, 1)`, and S is raised to M + 1 where
//! the fractions coincide (n = 5, 6, 9). For the 19-seat reference
//! committee this gives M = 13, S = 15.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use wps_common::WorkerConfig;

use crate::types::AccountName;

/// Live view of the witness committee.
pub trait CommitteeOracle: Send + Sync {
    /// Account is registered as a witness at all (ranked or not).
    fn is_witness(&self, account: &AccountName) -> bool;

    /// Account currently holds one of the top-N committee seats.
    fn is_member(&self, account: &AccountName) -> bool;

    /// Number of seats currently filled.
    fn committee_size(&self) -> u32;
}

/// Vote counts needed to approve or close a techspec.
///
/// Both are capped at the committee size and `super_majority` is kept at
/// least one above `majority` where the cap allows it. Committees of three
/// seats or fewer therefore get `majority == super_majority`, in which case
/// approval is checked first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteThresholds {
    pub majority: u32,
    pub super_majority: u32,
}

impl VoteThresholds {
    pub fn for_committee_size(n: u32) -> Self {
        let cap = n.max(1);
        let majority = (n * 2 / 3 + 1).clamp(1, cap);
        VoteThresholds {
            majority,
            super_majority: (n * 3 / 4 + 1).max(majority + 1).clamp(1, cap),
        }
    }

    pub fn from_oracle(oracle: &dyn CommitteeOracle) -> Self {
        Self::for_committee_size(oracle.committee_size())
    }
}

/// Witness ranking held in memory.
///
/// Witnesses are ranked by vote weight (descending), ties broken by name
/// (ascending); the first `seats` entries form the committee. Rankings
/// can be updated at any time to model committee churn between blocks.
#[derive(Debug)]
pub struct StaticCommittee {
    seats: u32,
    votes: RwLock<BTreeMap<AccountName, u64>>,
}

impl StaticCommittee {
    pub fn new(seats: u32) -> Self {
        StaticCommittee { seats, votes: RwLock::new(BTreeMap::new()) }
    }

    pub fn from_config(cfg: &WorkerConfig) -> Self {
        Self::new(cfg.committee_seats)
    }

    /// Register a witness or update its vote weight.
    pub fn set_votes(&self, witness: impl Into<String>, votes: u64) {
        self.votes.write().insert(AccountName::new(witness), votes);
    }

    pub fn remove_witness(&self, witness: &AccountName) {
        self.votes.write().remove(witness);
    }

    /// Current committee in rank order.
    pub fn members(&self) -> Vec<AccountName> {
        let votes = self.votes.read();
        let mut ranked: Vec<(&AccountName, &u64)> = votes.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        ranked
            .into_iter()
            .take(self.seats as usize)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl CommitteeOracle for StaticCommittee {
    fn is_witness(&self, account: &AccountName) -> bool {
        self.votes.read().contains_key(account)
    }

    fn is_member(&self, account: &AccountName) -> bool {
        self.members().iter().any(|m| m == account)
    }

    fn committee_size(&self) -> u32 {
        self.members().len() as u32
    }
}
