//! # Worker Data Structures
//!
//! Every type stored in the worker ledger.
//!
//! ## Karakteristik
//!
//! - **Data-only**: no execution logic lives here
//! - **Deterministic**: serializable, with a canonical byte encoding for the state root
//! - **Consensus-visible**: everything except `WorkerEvent` enters the state root
//!
//! | Type | Role |
//! |------|------|
//! | `WorkerProposal` | a post registered as requesting work |
//! | `WorkerTechspec` | cost + payment schedule bound to a proposal |
//! | `ApprovalVote` | one committee member's vote on one techspec |
//! | `ApproveCounts` | per-state tally of a techspec's votes |
//! | `GlobalProperties` | chain-wide scalars, incl. `worker_consumption_per_day` |
//! | `WorkerEvent` | in-memory audit entry (NOT consensus) |

use serde::{Deserialize, Serialize};

use crate::types::{AccountName, Asset, PostRef, TimePointSec, PRIMARY_SYMBOL};

// ════════════════════════════════════════════════════════════════════════════
// WORKER PROPOSAL
// ════════════════════════════════════════════════════════════════════════════

/// Kind of work a proposal asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalType {
    /// Work already done; no techspec can be attached
    PremadeWork,
    /// Open task; techspecs compete for approval
    Task,
}

/// Lifecycle of a proposal.
///
/// ```text
/// Created → HasTechspec   (one of its techspecs got approved)
/// ```
///
/// `Closed` is reserved for closing paths outside this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalState {
    Created,
    HasTechspec,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerProposal {
    /// The post this proposal was registered on
    pub post: PostRef,
    pub proposal_type: ProposalType,
    pub state: ProposalState,
    /// Set iff `state == HasTechspec`
    pub approved_techspec: Option<PostRef>,
}

impl WorkerProposal {
    pub fn new(post: PostRef, proposal_type: ProposalType) -> Self {
        WorkerProposal {
            post,
            proposal_type,
            state: ProposalState::Created,
            approved_techspec: None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// WORKER TECHSPEC
// ════════════════════════════════════════════════════════════════════════════

/// Lifecycle of a techspec.
///
/// ```text
/// Created → Approved   (approve votes reached majority)
/// Created → Closed     (disapprove votes reached super-majority)
/// ```
///
/// No transition leaves `Approved` or `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechspecState {
    Created,
    Approved,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerTechspec {
    /// The post carrying the techspec text
    pub post: PostRef,
    /// Proposal this techspec answers; fixed at creation
    pub proposal: PostRef,
    pub specification_cost: Asset,
    pub development_cost: Asset,
    /// Seconds between payments
    pub payments_interval: u32,
    pub payments_count: u16,
    pub state: TechspecState,
    /// `None` = unassigned
    pub worker: Option<AccountName>,
    pub worker_result_post: Option<PostRef>,
    /// `TimePointSec::MAXIMUM` until payouts are scheduled
    pub next_cashout_time: TimePointSec,
    pub finished_payments_count: u16,
}

impl WorkerTechspec {
    pub fn terms(&self) -> TechspecTerms {
        TechspecTerms {
            specification_cost: self.specification_cost,
            development_cost: self.development_cost,
            payments_interval: self.payments_interval,
            payments_count: self.payments_count,
        }
    }
}

/// Cost and payment schedule: the part of a techspec the author may rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechspecTerms {
    pub specification_cost: Asset,
    pub development_cost: Asset,
    pub payments_interval: u32,
    pub payments_count: u16,
}

impl TechspecTerms {
    /// `specification_cost + development_cost`, `None` on overflow.
    pub fn total_cost(&self) -> Option<Asset> {
        self.specification_cost.checked_add(self.development_cost)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// APPROVAL VOTE
// ════════════════════════════════════════════════════════════════════════════

/// Vote state cast by a committee member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApproveState {
    Approve,
    Disapprove,
    Abstain,
}

impl ApproveState {
    pub(crate) fn tag(&self) -> u8 {
        match self {
            ApproveState::Approve => 0,
            ApproveState::Disapprove => 1,
            ApproveState::Abstain => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalVote {
    pub techspec: PostRef,
    pub approver: AccountName,
    pub state: ApproveState,
}

/// Tally of all votes ever recorded for one techspec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveCounts {
    pub approve: u32,
    pub disapprove: u32,
    pub abstain: u32,
}

impl ApproveCounts {
    pub fn get(&self, state: ApproveState) -> u32 {
        match state {
            ApproveState::Approve => self.approve,
            ApproveState::Disapprove => self.disapprove,
            ApproveState::Abstain => self.abstain,
        }
    }

    pub(crate) fn add(&mut self, state: ApproveState) {
        match state {
            ApproveState::Approve => self.approve += 1,
            ApproveState::Disapprove => self.disapprove += 1,
            ApproveState::Abstain => self.abstain += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.approve + self.disapprove + self.abstain
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GLOBAL PROPERTIES
// ════════════════════════════════════════════════════════════════════════════

/// Chain-wide scalars owned by the worker core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalProperties {
    /// Committed primary-token outflow per day across approved techspecs
    pub worker_consumption_per_day: Asset,
}

impl Default for GlobalProperties {
    fn default() -> Self {
        GlobalProperties {
            worker_consumption_per_day: Asset::zero(PRIMARY_SYMBOL),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// WORKER EVENT LOGGING
// ════════════════════════════════════════════════════════════════════════════

/// Kinds of audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerEventType {
    ProposalRegistered,
    TechspecCreated,
    TechspecUpdated,
    TechspecDeleted,
    VoteCast,
    TechspecApproved,
    TechspecClosed,
    WorkerAssigned,
    WorkerUnassigned,
}

/// Audit entry kept in memory only.
///
/// - NOT part of the state root
/// - NOT consensus-relevant
/// - dropped together with the rest of a failed operation's effects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerEvent {
    pub event_type: WorkerEventType,
    pub post: PostRef,
    pub actor: AccountName,
    pub timestamp: TimePointSec,
    pub details: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_proposal_has_no_techspec() {
        let p = WorkerProposal::new(PostRef::new("alice", "p"), ProposalType::Task);
        assert_eq!(p.state, ProposalState::Created);
        assert!(p.approved_techspec.is_none());
    }

    #[test]
    fn test_approve_counts() {
        let mut c = ApproveCounts::default();
        c.add(ApproveState::Approve);
        c.add(ApproveState::Approve);
        c.add(ApproveState::Abstain);
        assert_eq!(c.get(ApproveState::Approve), 2);
        assert_eq!(c.get(ApproveState::Disapprove), 0);
        assert_eq!(c.total(), 3);
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_string(&ProposalType::PremadeWork).unwrap(), "\"premade_work\"");
        assert_eq!(serde_json::to_string(&ProposalState::HasTechspec).unwrap(), "\"has_techspec\"");
        assert_eq!(serde_json::to_string(&ApproveState::Disapprove).unwrap(), "\"disapprove\"");
    }

    #[test]
    fn test_default_consumption_is_zero_primary() {
        let g = GlobalProperties::default();
        assert_eq!(g.worker_consumption_per_day, Asset::golos(0));
    }
}
