//! # Worker Ledger State
//!
//! Module ini adalah **FACADE** for the worker governance ledger. The
//! struct lives here; each component adds its own `impl WorkerState`
//! block in an `internal_*` file.
//!
//! ## Arsitektur
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         mod.rs (FACADE)                         │
//! │  - WorkerState struct definition                                │
//! │  - ApplyContext (injected collaborators)                        │
//! │  - Worker event log (non-consensus)                             │
//! └─────────────────────────────────────────────────────────────────┘
//!                                    │
//!          ┌─────────────────────────┼─────────────────────────┐
//!          ▼                         ▼                         ▼
//!  ┌──────────────┐         ┌──────────────┐         ┌──────────────┐
//!  │   Proposal   │◀────────│   Techspec   │         │  Assignment  │
//!  │   Registry   │  bind   │   Registry   │         │   Manager    │
//!  └──────────────┘         └──────────────┘         └──────────────┘
//!                                    ▲
//!                                    │ threshold crossed
//!                           ┌──────────────┐         ┌──────────────┐
//!                           │   Approval   │────────▶│ Consumption  │
//!                           │    Ledger    │         │    Budget    │
//!                           └──────────────┘         └──────────────┘
//! ```
//!
//! ## Module Structure
//!
//! | Module | Fungsi |
//! |--------|--------|
//! | `internal_model` | Data structures: WorkerProposal, WorkerTechspec, ApprovalVote, GlobalProperties |
//! | `internal_proposal` | Proposal registration, approved-techspec binding |
//! | `internal_techspec` | Techspec create/update/delete |
//! | `internal_approval` | Vote casting, counting, threshold evaluation |
//! | `internal_budget` | `worker_consumption_per_day` accounting |
//! | `internal_assignment` | Worker assignment on approved techspecs |
//! | `internal_state_root` | SHA3-512 state root |
//!
//! ## Consensus Notes
//!
//! All collections are ordered maps, so every iteration (vote counting,
//! state root) is deterministic across nodes. `worker_events` is the only
//! field outside consensus.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::committee::CommitteeOracle;
use crate::content::{AccountDirectory, PostStore};
use crate::types::{AccountName, PostRef, TimePointSec};

mod internal_approval;
mod internal_assignment;
mod internal_budget;
mod internal_model;
mod internal_proposal;
mod internal_state_root;
mod internal_techspec;

pub use internal_budget::daily_commitment;
pub use internal_model::*;

/// Default retention of the in-memory worker event log.
pub const MAX_WORKER_EVENTS: usize = 1000;

/// Collaborators and block context visible to `apply`.
///
/// Built fresh for every operation; nothing from it is cached in state.
#[derive(Clone, Copy)]
pub struct ApplyContext<'a> {
    pub posts: &'a dyn PostStore,
    pub committee: &'a dyn CommitteeOracle,
    pub accounts: &'a dyn AccountDirectory,
    pub head_block_time: TimePointSec,
}

/// The worker governance ledger.
#[derive(Debug, Clone)]
pub struct WorkerState {
    pub proposals: BTreeMap<PostRef, WorkerProposal>,
    pub techspecs: BTreeMap<PostRef, WorkerTechspec>,
    /// Secondary index `(proposal, techspec)` over `techspecs`
    pub techspecs_by_proposal: BTreeSet<(PostRef, PostRef)>,
    /// Keyed `(techspec, approver)`; range scans by techspec give the tally
    pub approves: BTreeMap<(PostRef, AccountName), ApprovalVote>,
    pub global: GlobalProperties,

    // Non-consensus
    pub worker_events: VecDeque<WorkerEvent>,
    pub event_log_capacity: usize,
}

impl Default for WorkerState {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerState {
    pub fn new() -> Self {
        Self::with_event_capacity(MAX_WORKER_EVENTS)
    }

    pub fn with_event_capacity(capacity: usize) -> Self {
        WorkerState {
            proposals: BTreeMap::new(),
            techspecs: BTreeMap::new(),
            techspecs_by_proposal: BTreeSet::new(),
            approves: BTreeMap::new(),
            global: GlobalProperties::default(),
            worker_events: VecDeque::new(),
            event_log_capacity: capacity,
        }
    }

    /// Techspecs bound to `proposal`, in post-reference order.
    pub fn techspecs_of(&self, proposal: &PostRef) -> Vec<&WorkerTechspec> {
        self.techspecs_by_proposal
            .range((proposal.clone(), PostRef::new("", ""))..)
            .take_while(|(p, _)| p == proposal)
            .filter_map(|(_, t)| self.techspecs.get(t))
            .collect()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // WORKER EVENT LOGGING
    // ════════════════════════════════════════════════════════════════════════════

    /// Append to the event log, evicting the oldest entries past capacity.
    ///
    /// - NOT part of the state root
    /// - NOT consensus-relevant
    pub fn log_worker_event(&mut self, event: WorkerEvent) {
        self.worker_events.push_back(event);
        while self.worker_events.len() > self.event_log_capacity {
            self.worker_events.pop_front();
        }
    }

    /// Up to `count` most recent events, oldest first.
    pub fn recent_worker_events(&self, count: usize) -> Vec<WorkerEvent> {
        let skip = self.worker_events.len().saturating_sub(count);
        self.worker_events.iter().skip(skip).cloned().collect()
    }

    pub(crate) fn record(
        &mut self,
        ctx: &ApplyContext<'_>,
        event_type: WorkerEventType,
        post: &PostRef,
        actor: &AccountName,
        details: String,
    ) {
        self.log_worker_event(WorkerEvent {
            event_type,
            post: post.clone(),
            actor: actor.clone(),
            timestamp: ctx.head_block_time,
            details,
        });
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::committee::StaticCommittee;
    use crate::content::InMemoryContent;

    /// Posts, accounts and a 19-seat committee of `w00`..`w18`, plus `outsider`
    /// ranked just below the committee.
    pub struct Fixture {
        pub content: InMemoryContent,
        pub committee: StaticCommittee,
    }

    impl Fixture {
        pub fn new() -> Self {
            let committee = StaticCommittee::new(19);
            for i in 0..19u64 {
                committee.set_votes(format!("w{:02}", i), 1_000 - i);
            }
            committee.set_votes("outsider", 1);
            Fixture { content: InMemoryContent::new(), committee }
        }

        pub fn ctx(&self) -> ApplyContext<'_> {
            ApplyContext {
                posts: &self.content,
                committee: &self.committee,
                accounts: &self.content,
                head_block_time: TimePointSec(1_000),
            }
        }
    }

    pub fn witness(i: usize) -> AccountName {
        AccountName::new(format!("w{:02}", i))
    }
}
