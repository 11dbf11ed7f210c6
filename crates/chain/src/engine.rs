//! # Worker Engine
//!
//! Thread-safe facade over [`WorkerState`]. Writers serialize on the
//! write lock; readers only ever see states at operation boundaries.
//!
//! ## Atomic apply
//!
//! ```text
//! 1. validate()            stateless, lock not taken
//! 2. write lock
//! 3. clone state           working copy, event log moved out first
//! 4. apply on the copy     may touch several components
//! 5. Ok  → swap copy in, append its events to the log
//!    Err → drop copy       shared state untouched, root unchanged
//! ```
//!
//! The clone still copies every ledger map, so one operation costs
//! O(ledger size).

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};
use wps_common::WorkerConfig;

use crate::committee::{CommitteeOracle, VoteThresholds};
use crate::content::{AccountDirectory, PostStore};
use crate::error::{WorkerError, WorkerResult};
use crate::ops::{WorkerOp, WorkerOperation};
use crate::state::{
    ApplyContext, ApprovalVote, ApproveCounts, WorkerEvent, WorkerProposal, WorkerState, WorkerTechspec,
};
use crate::types::{AccountName, Asset, Hash, PostRef, TimePointSec};

/// Outcome of one operation inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    /// Position in the block
    pub index: usize,
    pub operation: &'static str,
    pub result: WorkerResult<()>,
}

impl OperationResult {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

pub struct WorkerEngine {
    state: Arc<RwLock<WorkerState>>,
    posts: Arc<dyn PostStore>,
    committee: Arc<dyn CommitteeOracle>,
    accounts: Arc<dyn AccountDirectory>,
    /// Chain time stamped on events; not consensus-relevant here
    head_block_time: AtomicU32,
}

impl WorkerEngine {
    pub fn new(
        config: &WorkerConfig,
        posts: Arc<dyn PostStore>,
        committee: Arc<dyn CommitteeOracle>,
        accounts: Arc<dyn AccountDirectory>,
    ) -> Self {
        info!(
            committee_seats = config.committee_seats,
            event_log_capacity = config.event_log_capacity,
            "worker engine initialized"
        );
        WorkerEngine {
            state: Arc::new(RwLock::new(WorkerState::with_event_capacity(config.event_log_capacity))),
            posts,
            committee,
            accounts,
            head_block_time: AtomicU32::new(0),
        }
    }

    pub fn set_head_block_time(&self, time: TimePointSec) {
        self.head_block_time.store(time.0, Ordering::SeqCst);
    }

    pub fn head_block_time(&self) -> TimePointSec {
        TimePointSec(self.head_block_time.load(Ordering::SeqCst))
    }

    // ════════════════════════════════════════════════════════════════════════════
    // WRITE PATH
    // ════════════════════════════════════════════════════════════════════════════

    /// Validate and apply one operation, all or nothing.
    pub fn apply_operation(&self, op: &WorkerOperation) -> WorkerResult<()> {
        if let Err(e) = op.validate() {
            warn!(operation = op.name(), error = %e, "worker operation rejected by validation");
            return Err(WorkerError::Validation(e));
        }

        let ctx = ApplyContext {
            posts: self.posts.as_ref(),
            committee: self.committee.as_ref(),
            accounts: self.accounts.as_ref(),
            head_block_time: self.head_block_time(),
        };

        let mut guard = self.state.write();
        let events = std::mem::take(&mut guard.worker_events);
        let mut working = guard.clone();
        match op.apply(&mut working, &ctx) {
            Ok(()) => {
                let emitted = std::mem::take(&mut working.worker_events);
                *guard = working;
                guard.worker_events = events;
                for event in emitted {
                    guard.log_worker_event(event);
                }
                debug!(operation = op.name(), "worker operation applied");
                Ok(())
            }
            Err(e) => {
                guard.worker_events = events;
                warn!(operation = op.name(), error = %e, "worker operation failed, state unchanged");
                Err(e)
            }
        }
    }

    /// Apply operations in block order. Each one commits or fails on its own.
    pub fn apply_block(&self, block_time: TimePointSec, ops: &[WorkerOperation]) -> Vec<OperationResult> {
        self.set_head_block_time(block_time);

        let results: Vec<OperationResult> = ops
            .iter()
            .enumerate()
            .map(|(index, op)| OperationResult {
                index,
                operation: op.name(),
                result: self.apply_operation(op),
            })
            .collect();

        let failed = results.iter().filter(|r| !r.is_ok()).count();
        info!(
            block_time = block_time.0,
            operations = ops.len(),
            failed,
            "worker operations of block processed"
        );
        results
    }

    // ════════════════════════════════════════════════════════════════════════════
    // READ PATH
    // ════════════════════════════════════════════════════════════════════════════

    pub fn get_proposal(&self, post: &PostRef) -> Option<WorkerProposal> {
        self.state.read().get_proposal(post).cloned()
    }

    pub fn get_techspec(&self, post: &PostRef) -> Option<WorkerTechspec> {
        self.state.read().get_techspec(post).cloned()
    }

    pub fn get_vote(&self, techspec: &PostRef, approver: &AccountName) -> Option<ApprovalVote> {
        self.state.read().get_vote(techspec, approver).cloned()
    }

    pub fn count_approves(&self, techspec: &PostRef) -> ApproveCounts {
        self.state.read().count_approves(techspec)
    }

    pub fn consumption_per_day(&self) -> Asset {
        self.state.read().consumption_per_day()
    }

    /// Thresholds for the committee as it stands right now.
    pub fn thresholds(&self) -> VoteThresholds {
        VoteThresholds::from_oracle(self.committee.as_ref())
    }

    /// Consistent copy of the whole ledger.
    pub fn snapshot(&self) -> WorkerState {
        self.state.read().clone()
    }

    pub fn state_root(&self) -> Hash {
        self.state.read().compute_state_root()
    }

    pub fn recent_events(&self, count: usize) -> Vec<WorkerEvent> {
        self.state.read().recent_worker_events(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::committee::StaticCommittee;
    use crate::content::InMemoryContent;
    use crate::error::{LogicError, ValidationError};
    use crate::ops::{RegisterWorkerProposalOperation, WorkerTechspecOperation};
    use crate::state::{ProposalType, WorkerEventType};

    fn engine() -> (WorkerEngine, Arc<InMemoryContent>) {
        let content = Arc::new(InMemoryContent::new());
        let committee = Arc::new(StaticCommittee::new(19));
        committee.set_votes("w00", 10);
        let engine = WorkerEngine::new(
            &WorkerConfig::default(),
            content.clone(),
            committee,
            content.clone(),
        );
        (engine, content)
    }

    fn register(author: &str, permlink: &str) -> WorkerOperation {
        RegisterWorkerProposalOperation {
            author: AccountName::from(author),
            permlink: permlink.to_string(),
            proposal_type: ProposalType::Task,
        }
        .into()
    }

    #[test]
    fn test_apply_operation_commits() {
        let (engine, content) = engine();
        let post = content.create_post("alice", "alice-proposal");

        engine.apply_operation(&register("alice", "alice-proposal")).unwrap();
        assert!(engine.get_proposal(&post).is_some());
    }

    #[test]
    fn test_validation_failure_never_touches_state() {
        let (engine, _) = engine();
        let root = engine.state_root();

        let err = engine.apply_operation(&register("", "p")).unwrap_err();
        assert_eq!(err, WorkerError::Validation(ValidationError::InvalidAccountName { field: "author" }));
        assert_eq!(engine.state_root(), root);
        assert!(engine.recent_events(10).is_empty());
    }

    #[test]
    fn test_apply_failure_rolls_back() {
        let (engine, content) = engine();
        content.create_post("alice", "alice-proposal");
        engine.apply_operation(&register("alice", "alice-proposal")).unwrap();
        let root = engine.state_root();
        let events = engine.recent_events(100).len();

        let err = engine.apply_operation(&register("alice", "alice-proposal")).unwrap_err();
        assert_eq!(err.logic(), Some(&LogicError::ProposalAlreadyRegistered));
        assert_eq!(engine.state_root(), root);
        assert_eq!(engine.recent_events(100).len(), events);
    }

    #[test]
    fn test_apply_block_isolates_failures() {
        let (engine, content) = engine();
        content.create_post("alice", "a");
        content.create_post("bob", "b");
        let techspec_without_proposal: WorkerOperation = WorkerTechspecOperation {
            author: AccountName::from("bob"),
            permlink: "b".to_string(),
            proposal_author: AccountName::from("alice"),
            proposal_permlink: "nope".to_string(),
            specification_cost: Asset::golos(1),
            development_cost: Asset::golos(1),
            payments_interval: 86_400,
            payments_count: 1,
        }
        .into();

        let results = engine.apply_block(
            TimePointSec(500),
            &[register("alice", "a"), techspec_without_proposal, register("bob", "b")],
        );

        assert!(results[0].is_ok());
        assert!(!results[1].is_ok());
        assert_eq!(results[1].operation, "worker_techspec");
        assert!(results[2].is_ok());
        assert_eq!(engine.snapshot().proposals.len(), 2);

        let events = engine.recent_events(10);
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.event_type == WorkerEventType::ProposalRegistered));
        assert!(events.iter().all(|e| e.timestamp == TimePointSec(500)));
    }

    #[test]
    fn test_event_log_survives_commits_and_failures() {
        let content = Arc::new(InMemoryContent::new());
        let config = WorkerConfig { event_log_capacity: 2, ..WorkerConfig::default() };
        let engine = WorkerEngine::new(
            &config,
            content.clone(),
            Arc::new(StaticCommittee::new(19)),
            content.clone(),
        );
        for p in ["p1", "p2", "p3"] {
            content.create_post("alice", p);
        }

        engine.apply_operation(&register("alice", "p1")).unwrap();
        engine.apply_operation(&register("alice", "p1")).unwrap_err();
        assert_eq!(engine.recent_events(10).len(), 1);

        engine.apply_operation(&register("alice", "p2")).unwrap();
        engine.apply_operation(&register("alice", "p3")).unwrap();
        let events = engine.recent_events(10);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].post, PostRef::new("alice", "p2"));
        assert_eq!(events[1].post, PostRef::new("alice", "p3"));
    }

    #[test]
    fn test_thresholds_follow_committee() {
        let (engine, _) = engine();
        assert_eq!(engine.thresholds(), VoteThresholds::for_committee_size(1));
    }
}
