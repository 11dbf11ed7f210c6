//! # Worker Operations
//!
//! The five wire-level commands of the worker subsystem.
//!
//! | Operation | Signer (posting) | Component |
//! |-----------|------------------|-----------|
//! | `register_worker_proposal` | `author` | Proposal Registry |
//! | `worker_techspec` | `author` | Techspec Registry |
//! | `worker_techspec_delete` | `author` | Techspec Registry |
//! | `worker_techspec_approve` | `approver` | Approval Ledger |
//! | `worker_assign` | `assigner` | Assignment Manager |
//!
//! Every operation is processed in a fixed order:
//!
//! ```text
//! required_signers()  → external signature verification
//! validate()          → stateless, never reads the ledger
//! apply(state, ctx)   → stateful, may cascade across components
//! ```

use serde::{Deserialize, Serialize};

use crate::authority::RequiredAuthorities;
use crate::error::{ValidationError, WorkerResult};
use crate::state::{ApplyContext, ApproveState, ProposalType, TechspecTerms, WorkerState};
use crate::types::{AccountName, Asset, PostRef, MAX_PERMLINK_LENGTH, PRIMARY_SYMBOL, SECONDS_PER_DAY};

// ════════════════════════════════════════════════════════════════════════════
// OPERATION TRAIT
// ════════════════════════════════════════════════════════════════════════════

pub trait WorkerOp {
    /// Accounts that must have signed the enclosing transaction.
    fn required_signers(&self) -> RequiredAuthorities;

    /// Stateless checks. Must not depend on anything but the operation itself.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Apply to `state`. The caller runs `validate()` first.
    fn apply(&self, state: &mut WorkerState, ctx: &ApplyContext<'_>) -> WorkerResult<()>;
}

fn validate_account(name: &AccountName, field: &'static str) -> Result<(), ValidationError> {
    if !name.is_valid() {
        return Err(ValidationError::InvalidAccountName { field });
    }
    Ok(())
}

fn validate_permlink(permlink: &str, field: &'static str) -> Result<(), ValidationError> {
    if permlink.is_empty() {
        return Err(ValidationError::EmptyPermlink { field });
    }
    if permlink.len() > MAX_PERMLINK_LENGTH {
        return Err(ValidationError::PermlinkTooLong { field, max: MAX_PERMLINK_LENGTH });
    }
    Ok(())
}

fn validate_cost(cost: &Asset, field: &'static str) -> Result<(), ValidationError> {
    if cost.symbol != PRIMARY_SYMBOL {
        return Err(ValidationError::WrongCostAsset { field });
    }
    if cost.amount < 0 {
        return Err(ValidationError::NegativeCost { field });
    }
    Ok(())
}

/// One payment within a day, or several at least a day apart.
fn validate_schedule(payments_interval: u32, payments_count: u16) -> Result<(), ValidationError> {
    if payments_count == 0 {
        return Err(ValidationError::ZeroPaymentsCount);
    }
    let ok = if payments_count == 1 {
        payments_interval <= SECONDS_PER_DAY
    } else {
        payments_interval >= SECONDS_PER_DAY
    };
    if !ok {
        return Err(ValidationError::InvalidPaymentsSchedule { payments_count, payments_interval });
    }
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// REGISTER WORKER PROPOSAL
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterWorkerProposalOperation {
    pub author: AccountName,
    pub permlink: String,
    pub proposal_type: ProposalType,
}

impl RegisterWorkerProposalOperation {
    pub fn post(&self) -> PostRef {
        PostRef { author: self.author.clone(), permlink: self.permlink.clone() }
    }
}

impl WorkerOp for RegisterWorkerProposalOperation {
    fn required_signers(&self) -> RequiredAuthorities {
        RequiredAuthorities::posting(&self.author)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_account(&self.author, "author")?;
        validate_permlink(&self.permlink, "permlink")
    }

    fn apply(&self, state: &mut WorkerState, ctx: &ApplyContext<'_>) -> WorkerResult<()> {
        state.register_proposal(ctx, &self.post(), self.proposal_type)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// WORKER TECHSPEC (create / update)
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerTechspecOperation {
    pub author: AccountName,
    pub permlink: String,
    pub proposal_author: AccountName,
    pub proposal_permlink: String,
    pub specification_cost: Asset,
    pub development_cost: Asset,
    pub payments_interval: u32,
    pub payments_count: u16,
}

impl WorkerTechspecOperation {
    pub fn post(&self) -> PostRef {
        PostRef { author: self.author.clone(), permlink: self.permlink.clone() }
    }

    pub fn proposal(&self) -> PostRef {
        PostRef { author: self.proposal_author.clone(), permlink: self.proposal_permlink.clone() }
    }

    pub fn terms(&self) -> TechspecTerms {
        TechspecTerms {
            specification_cost: self.specification_cost,
            development_cost: self.development_cost,
            payments_interval: self.payments_interval,
            payments_count: self.payments_count,
        }
    }
}

impl WorkerOp for WorkerTechspecOperation {
    fn required_signers(&self) -> RequiredAuthorities {
        RequiredAuthorities::posting(&self.author)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_account(&self.author, "author")?;
        validate_permlink(&self.permlink, "permlink")?;
        validate_account(&self.proposal_author, "proposal_author")?;
        validate_permlink(&self.proposal_permlink, "proposal_permlink")?;
        validate_cost(&self.specification_cost, "specification_cost")?;
        validate_cost(&self.development_cost, "development_cost")?;
        validate_schedule(self.payments_interval, self.payments_count)
    }

    fn apply(&self, state: &mut WorkerState, ctx: &ApplyContext<'_>) -> WorkerResult<()> {
        state.upsert_techspec(ctx, &self.post(), &self.proposal(), self.terms())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// WORKER TECHSPEC DELETE
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerTechspecDeleteOperation {
    pub author: AccountName,
    pub permlink: String,
}

impl WorkerOp for WorkerTechspecDeleteOperation {
    fn required_signers(&self) -> RequiredAuthorities {
        RequiredAuthorities::posting(&self.author)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_account(&self.author, "author")?;
        validate_permlink(&self.permlink, "permlink")
    }

    fn apply(&self, state: &mut WorkerState, ctx: &ApplyContext<'_>) -> WorkerResult<()> {
        let post = PostRef { author: self.author.clone(), permlink: self.permlink.clone() };
        state.delete_techspec(ctx, &post)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// WORKER TECHSPEC APPROVE
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerTechspecApproveOperation {
    pub approver: AccountName,
    pub techspec_author: AccountName,
    pub techspec_permlink: String,
    pub state: ApproveState,
}

impl WorkerTechspecApproveOperation {
    pub fn techspec(&self) -> PostRef {
        PostRef { author: self.techspec_author.clone(), permlink: self.techspec_permlink.clone() }
    }
}

impl WorkerOp for WorkerTechspecApproveOperation {
    fn required_signers(&self) -> RequiredAuthorities {
        RequiredAuthorities::posting(&self.approver)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_account(&self.approver, "approver")?;
        validate_account(&self.techspec_author, "techspec_author")?;
        validate_permlink(&self.techspec_permlink, "techspec_permlink")
    }

    fn apply(&self, state: &mut WorkerState, ctx: &ApplyContext<'_>) -> WorkerResult<()> {
        state
            .cast_vote(ctx, &self.techspec(), &self.approver, self.state)
            .map(|_| ())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// WORKER ASSIGN
// ════════════════════════════════════════════════════════════════════════════

/// Empty `worker` clears the assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerAssignOperation {
    pub assigner: AccountName,
    pub techspec_author: AccountName,
    pub techspec_permlink: String,
    #[serde(default)]
    pub worker: AccountName,
}

impl WorkerOp for WorkerAssignOperation {
    fn required_signers(&self) -> RequiredAuthorities {
        RequiredAuthorities::posting(&self.assigner)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_account(&self.assigner, "assigner")?;
        validate_account(&self.techspec_author, "techspec_author")?;
        validate_permlink(&self.techspec_permlink, "techspec_permlink")?;
        if !self.worker.is_empty() {
            validate_account(&self.worker, "worker")?;
        }
        Ok(())
    }

    fn apply(&self, state: &mut WorkerState, ctx: &ApplyContext<'_>) -> WorkerResult<()> {
        let techspec = PostRef {
            author: self.techspec_author.clone(),
            permlink: self.techspec_permlink.clone(),
        };
        state.assign_worker(ctx, &self.assigner, &techspec, &self.worker)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// OPERATION ENVELOPE
// ════════════════════════════════════════════════════════════════════════════

/// Any worker operation, as carried in a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum WorkerOperation {
    RegisterWorkerProposal(RegisterWorkerProposalOperation),
    WorkerTechspec(WorkerTechspecOperation),
    WorkerTechspecDelete(WorkerTechspecDeleteOperation),
    WorkerTechspecApprove(WorkerTechspecApproveOperation),
    WorkerAssign(WorkerAssignOperation),
}

impl WorkerOperation {
    pub fn name(&self) -> &'static str {
        match self {
            WorkerOperation::RegisterWorkerProposal(_) => "register_worker_proposal",
            WorkerOperation::WorkerTechspec(_) => "worker_techspec",
            WorkerOperation::WorkerTechspecDelete(_) => "worker_techspec_delete",
            WorkerOperation::WorkerTechspecApprove(_) => "worker_techspec_approve",
            WorkerOperation::WorkerAssign(_) => "worker_assign",
        }
    }

    fn inner(&self) -> &dyn WorkerOp {
        match self {
            WorkerOperation::RegisterWorkerProposal(op) => op,
            WorkerOperation::WorkerTechspec(op) => op,
            WorkerOperation::WorkerTechspecDelete(op) => op,
            WorkerOperation::WorkerTechspecApprove(op) => op,
            WorkerOperation::WorkerAssign(op) => op,
        }
    }
}

impl WorkerOp for WorkerOperation {
    fn required_signers(&self) -> RequiredAuthorities {
        self.inner().required_signers()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.inner().validate()
    }

    fn apply(&self, state: &mut WorkerState, ctx: &ApplyContext<'_>) -> WorkerResult<()> {
        self.inner().apply(state, ctx)
    }
}

impl From<RegisterWorkerProposalOperation> for WorkerOperation {
    fn from(op: RegisterWorkerProposalOperation) -> Self {
        WorkerOperation::RegisterWorkerProposal(op)
    }
}

impl From<WorkerTechspecOperation> for WorkerOperation {
    fn from(op: WorkerTechspecOperation) -> Self {
        WorkerOperation::WorkerTechspec(op)
    }
}

impl From<WorkerTechspecDeleteOperation> for WorkerOperation {
    fn from(op: WorkerTechspecDeleteOperation) -> Self {
        WorkerOperation::WorkerTechspecDelete(op)
    }
}

impl From<WorkerTechspecApproveOperation> for WorkerOperation {
    fn from(op: WorkerTechspecApproveOperation) -> Self {
        WorkerOperation::WorkerTechspecApprove(op)
    }
}

impl From<WorkerAssignOperation> for WorkerOperation {
    fn from(op: WorkerAssignOperation) -> Self {
        WorkerOperation::WorkerAssign(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AssetSymbol;

    fn techspec_op() -> WorkerTechspecOperation {
        WorkerTechspecOperation {
            author: AccountName::from("bob"),
            permlink: "bob-techspec".to_string(),
            proposal_author: AccountName::from("alice"),
            proposal_permlink: "alice-proposal".to_string(),
            specification_cost: Asset::golos_whole(6),
            development_cost: Asset::golos_whole(60),
            payments_interval: 60 * 60 * 24 * 2,
            payments_count: 40,
        }
    }

    #[test]
    fn test_techspec_validate_each_field() {
        assert!(techspec_op().validate().is_ok());

        let mut op = techspec_op();
        op.author = AccountName::empty();
        assert_eq!(op.validate(), Err(ValidationError::InvalidAccountName { field: "author" }));

        let mut op = techspec_op();
        op.permlink = String::new();
        assert_eq!(op.validate(), Err(ValidationError::EmptyPermlink { field: "permlink" }));

        let mut op = techspec_op();
        op.permlink = "x".repeat(MAX_PERMLINK_LENGTH + 1);
        assert!(matches!(op.validate(), Err(ValidationError::PermlinkTooLong { .. })));

        let mut op = techspec_op();
        op.proposal_author = AccountName::from("this-name-is-way-too-long");
        assert_eq!(
            op.validate(),
            Err(ValidationError::InvalidAccountName { field: "proposal_author" })
        );

        let mut op = techspec_op();
        op.specification_cost = Asset::new(6_000, AssetSymbol::Gbg);
        assert_eq!(
            op.validate(),
            Err(ValidationError::WrongCostAsset { field: "specification_cost" })
        );

        let mut op = techspec_op();
        op.development_cost = Asset::golos(-1);
        assert_eq!(op.validate(), Err(ValidationError::NegativeCost { field: "development_cost" }));

        let mut op = techspec_op();
        op.payments_count = 0;
        assert_eq!(op.validate(), Err(ValidationError::ZeroPaymentsCount));
    }

    #[test]
    fn test_payment_schedule_bounds() {
        let check = |count: u16, interval: u32| {
            let mut op = techspec_op();
            op.payments_count = count;
            op.payments_interval = interval;
            op.validate()
        };

        assert!(check(1, 86_400).is_ok());
        assert!(check(1, 0).is_ok());
        assert_eq!(
            check(1, 86_401),
            Err(ValidationError::InvalidPaymentsSchedule { payments_count: 1, payments_interval: 86_401 })
        );
        assert!(check(2, 86_400).is_ok());
        assert_eq!(
            check(2, 86_399),
            Err(ValidationError::InvalidPaymentsSchedule { payments_count: 2, payments_interval: 86_399 })
        );
    }

    fn approve_op() -> WorkerTechspecApproveOperation {
        WorkerTechspecApproveOperation {
            approver: AccountName::from("w00"),
            techspec_author: AccountName::from("bob"),
            techspec_permlink: "bob-techspec".to_string(),
            state: ApproveState::Approve,
        }
    }

    fn assign_op() -> WorkerAssignOperation {
        WorkerAssignOperation {
            assigner: AccountName::from("bob"),
            techspec_author: AccountName::from("bob"),
            techspec_permlink: "bob-techspec".to_string(),
            worker: AccountName::from("eve"),
        }
    }

    #[test]
    fn test_approve_validate_each_field() {
        assert!(approve_op().validate().is_ok());

        let mut op = approve_op();
        op.approver = AccountName::empty();
        assert_eq!(op.validate(), Err(ValidationError::InvalidAccountName { field: "approver" }));

        let mut op = approve_op();
        op.techspec_author = AccountName::empty();
        assert_eq!(
            op.validate(),
            Err(ValidationError::InvalidAccountName { field: "techspec_author" })
        );

        let mut op = approve_op();
        op.techspec_permlink = String::new();
        assert_eq!(op.validate(), Err(ValidationError::EmptyPermlink { field: "techspec_permlink" }));

        let mut op = approve_op();
        op.techspec_permlink = "x".repeat(MAX_PERMLINK_LENGTH + 1);
        assert_eq!(
            op.validate(),
            Err(ValidationError::PermlinkTooLong { field: "techspec_permlink", max: MAX_PERMLINK_LENGTH })
        );

        // every vote state is well formed on its own
        for state in [ApproveState::Approve, ApproveState::Disapprove, ApproveState::Abstain] {
            let mut op = approve_op();
            op.state = state;
            assert!(op.validate().is_ok());
        }
    }

    #[test]
    fn test_assign_validate_each_field() {
        assert!(assign_op().validate().is_ok());

        let mut op = assign_op();
        op.assigner = AccountName::empty();
        assert_eq!(op.validate(), Err(ValidationError::InvalidAccountName { field: "assigner" }));

        let mut op = assign_op();
        op.techspec_author = AccountName::from("this-name-is-way-too-long");
        assert_eq!(
            op.validate(),
            Err(ValidationError::InvalidAccountName { field: "techspec_author" })
        );

        let mut op = assign_op();
        op.techspec_permlink = String::new();
        assert_eq!(op.validate(), Err(ValidationError::EmptyPermlink { field: "techspec_permlink" }));

        let mut op = assign_op();
        op.techspec_permlink = "x".repeat(MAX_PERMLINK_LENGTH + 1);
        assert!(matches!(op.validate(), Err(ValidationError::PermlinkTooLong { .. })));

        let mut op = assign_op();
        op.worker = AccountName::from("this-name-is-way-too-long");
        assert_eq!(op.validate(), Err(ValidationError::InvalidAccountName { field: "worker" }));

        // empty worker means unassign
        let mut op = assign_op();
        op.worker = AccountName::empty();
        assert!(op.validate().is_ok());
    }

    #[test]
    fn test_zero_costs_are_valid() {
        let mut op = techspec_op();
        op.specification_cost = Asset::golos(0);
        op.development_cost = Asset::golos(0);
        assert!(op.validate().is_ok());
    }

    #[test]
    fn test_required_signers() {
        let op = WorkerOperation::from(WorkerTechspecApproveOperation {
            approver: AccountName::from("w00"),
            techspec_author: AccountName::from("bob"),
            techspec_permlink: "bob-techspec".to_string(),
            state: ApproveState::Approve,
        });
        let req = op.required_signers();
        assert_eq!(req.posting.len(), 1);
        assert!(req.posting.contains(&AccountName::from("w00")));
        assert!(req.active.is_empty() && req.owner.is_empty());

        let op = WorkerOperation::from(WorkerAssignOperation {
            assigner: AccountName::from("bob"),
            techspec_author: AccountName::from("bob"),
            techspec_permlink: "bob-techspec".to_string(),
            worker: AccountName::empty(),
        });
        assert!(op.validate().is_ok());
        assert!(op.required_signers().posting.contains(&AccountName::from("bob")));
    }

    #[test]
    fn test_operation_json_shape() {
        let op = WorkerOperation::from(RegisterWorkerProposalOperation {
            author: AccountName::from("alice"),
            permlink: "alice-proposal".to_string(),
            proposal_type: ProposalType::Task,
        });
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["type"], "register_worker_proposal");
        assert_eq!(json["value"]["proposal_type"], "task");
        assert_eq!(op.name(), "register_worker_proposal");

        let back: WorkerOperation = serde_json::from_value(json).unwrap();
        assert_eq!(back, op);

        let json = serde_json::to_value(WorkerOperation::from(techspec_op())).unwrap();
        assert_eq!(json["value"]["development_cost"], "60.000 GOLOS");
    }
}
