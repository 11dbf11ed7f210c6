//! # Worker Error Types
//!
//! Closed error taxonomy for every worker operation. Callers branch on the
//! variant (or on [`ErrorClass`]), never on message text.
//!
//! | Class | Meaning | Raised by |
//! |-------|---------|-----------|
//! | `Validation` | operation is malformed regardless of ledger state | `validate()` |
//! | `Missing` | a referenced entity does not exist | `apply()` |
//! | `Logic` | a business rule rejects the operation | `apply()` |
//!
//! `Display` messages are deterministic and contain no debug formatting.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{AccountName, PostRef};

/// Coarse error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    Validation,
    Missing,
    Logic,
}

/// Stateless validation failures. `field` names the offending operation field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: account name is empty or too long")]
    InvalidAccountName { field: &'static str },

    #[error("{field}: permlink is empty")]
    EmptyPermlink { field: &'static str },

    #[error("{field}: permlink longer than {max} bytes")]
    PermlinkTooLong { field: &'static str, max: usize },

    #[error("{field}: cost must be denominated in the primary token")]
    WrongCostAsset { field: &'static str },

    #[error("{field}: cost must not be negative")]
    NegativeCost { field: &'static str },

    #[error("payments_count must be greater than 0")]
    ZeroPaymentsCount,

    #[error("invalid payments schedule: count {payments_count}, interval {payments_interval}s")]
    InvalidPaymentsSchedule { payments_count: u16, payments_interval: u32 },
}

/// Referenced entity that does not exist in ledger state (or in an external collaborator).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum MissingEntity {
    #[error("post {0} not found")]
    Post(PostRef),

    #[error("worker techspec {0} not found")]
    Techspec(PostRef),

    #[error("worker proposal {0} not found")]
    Proposal(PostRef),

    #[error("witness {0} not found")]
    Witness(AccountName),

    #[error("account {0} not found")]
    Account(AccountName),
}

/// Business-rule violations, one variant per named reason.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum LogicError {
    #[error("worker proposal can be created only on a root post")]
    ProposalOnlyFromPost,

    #[error("post is already registered as a worker proposal")]
    ProposalAlreadyRegistered,

    #[error("worker techspec can be created only on a root post")]
    TechspecOnlyOnPost,

    #[error("worker techspec can be created only for an existing worker proposal")]
    TechspecOnlyForExistingProposal,

    #[error("cannot create techspec for premade work proposal")]
    TechspecForbiddenForPremadeWork,

    #[error("this worker proposal already has an approved techspec")]
    ProposalAlreadyHasApprovedTechspec,

    #[error("this worker techspec is already used for another worker proposal")]
    TechspecAlreadyBoundToAnotherProposal,

    #[error("approver of techspec should be in top committee of witnesses")]
    ApproverNotInTopCommittee,

    #[error("you already have voted for this object with this state")]
    DuplicateVote,

    #[error("techspec is already approved or closed")]
    TechspecAlreadyFinalized,

    #[error("approved or closed techspec cannot be deleted")]
    CannotDeleteFinalizedTechspec,

    #[error("worker can be assigned only to an approved techspec")]
    TechspecNotApproved,

    #[error("only techspec author can assign worker")]
    AssignerNotTechspecAuthor,

    #[error("specification and development costs use different assets")]
    MixedCostAssets,

    #[error("worker consumption per day overflow")]
    ConsumptionOverflow,
}

/// Every failure surfaced by worker operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkerError {
    #[error("invalid operation: {0}")]
    Validation(#[from] ValidationError),

    #[error("missing object: {0}")]
    Missing(#[from] MissingEntity),

    #[error("logic error: {0}")]
    Logic(#[from] LogicError),
}

impl WorkerError {
    pub fn class(&self) -> ErrorClass {
        match self {
            WorkerError::Validation(_) => ErrorClass::Validation,
            WorkerError::Missing(_) => ErrorClass::Missing,
            WorkerError::Logic(_) => ErrorClass::Logic,
        }
    }

    /// `Some(reason)` when this is a logic error.
    pub fn logic(&self) -> Option<&LogicError> {
        match self {
            WorkerError::Logic(l) => Some(l),
            _ => None,
        }
    }
}

pub type WorkerResult<T> = std::result::Result<T, WorkerError>;

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_mapping() {
        let v: WorkerError = ValidationError::ZeroPaymentsCount.into();
        let m: WorkerError = MissingEntity::Witness(AccountName::from("alice")).into();
        let l: WorkerError = LogicError::DuplicateVote.into();
        assert_eq!(v.class(), ErrorClass::Validation);
        assert_eq!(m.class(), ErrorClass::Missing);
        assert_eq!(l.class(), ErrorClass::Logic);
        assert_eq!(l.logic(), Some(&LogicError::DuplicateVote));
        assert_eq!(m.logic(), None);
    }

    #[test]
    fn test_display_messages() {
        let e: WorkerError = MissingEntity::Post(PostRef::new("bob", "bob-techspec")).into();
        assert_eq!(e.to_string(), "missing object: post @bob/bob-techspec not found");

        let e: WorkerError = ValidationError::InvalidPaymentsSchedule {
            payments_count: 1,
            payments_interval: 86_401,
        }
        .into();
        assert_eq!(
            e.to_string(),
            "invalid operation: invalid payments schedule: count 1, interval 86401s"
        );

        let e: WorkerError = LogicError::TechspecForbiddenForPremadeWork.into();
        assert_eq!(e.to_string(), "logic error: cannot create techspec for premade work proposal");
    }
}
