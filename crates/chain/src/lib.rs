//! # Worker Proposal Governance Core
//!
//! Deterministic state-transition core for chain-funded worker proposals:
//! posts are registered as proposals, techspecs bid a cost and payment
//! schedule against them, and the top-N witness committee votes each
//! techspec into `approved` or `closed`. Approval binds the techspec to its
//! proposal and grows the chain's daily worker consumption.
//!
//! ## Module Overview
//!
//! | Module | Fungsi |
//! |--------|--------|
//! | `types` | AccountName, PostRef, Asset, TimePointSec, Hash |
//! | `error` | WorkerError taxonomy: Validation / Missing / Logic |
//! | `crypto` | SHA3-512 helpers |
//! | `content` | PostStore / AccountDirectory collaborators |
//! | `committee` | CommitteeOracle, vote thresholds, StaticCommittee |
//! | `authority` | Authority, RequiredAuthorities |
//! | `ops` | The five worker operations and their envelope |
//! | `state` | WorkerState ledger and its components |
//! | `engine` | WorkerEngine: atomic apply, consistent reads |
//!
//! ## Alur Operasi
//!
//! ```text
//! WorkerOperation
//!     │ required_signers()  → node verifies signatures
//!     │ validate()          → stateless
//!     ▼
//! WorkerEngine::apply_operation
//!     │ clone state, apply, swap on success
//!     ▼
//! WorkerState
//!     ├── register_proposal
//!     ├── upsert_techspec / delete_techspec
//!     ├── cast_vote ──▶ bind_approved_techspec ──▶ add_commitment
//!     └── assign_worker
//! ```
//!
//! ## Determinism
//!
//! All ledger collections are ordered maps and all arithmetic is integer,
//! so identical operation sequences yield identical
//! [`WorkerState::compute_state_root`] values on every node.

pub mod authority;
pub mod committee;
pub mod content;
pub mod crypto;
pub mod engine;
pub mod error;
pub mod ops;
pub mod state;
pub mod types;

pub use authority::{Authority, RequiredAuthorities};
pub use committee::{CommitteeOracle, StaticCommittee, VoteThresholds};
pub use content::{AccountDirectory, InMemoryContent, PostInfo, PostStore};
pub use engine::{OperationResult, WorkerEngine};
pub use error::{ErrorClass, LogicError, MissingEntity, ValidationError, WorkerError, WorkerResult};
pub use ops::{
    RegisterWorkerProposalOperation, WorkerAssignOperation, WorkerOp, WorkerOperation,
    WorkerTechspecApproveOperation, WorkerTechspecDeleteOperation, WorkerTechspecOperation,
};
pub use state::{
    daily_commitment, ApplyContext, ApprovalVote, ApproveCounts, ApproveState, ProposalState,
    ProposalType, TechspecState, TechspecTerms, WorkerProposal, WorkerState, WorkerTechspec,
};
pub use types::{AccountName, Asset, AssetSymbol, Hash, PostRef, TimePointSec};
