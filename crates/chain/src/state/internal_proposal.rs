//! # Proposal Registry
//!
//! Registers posts as worker proposals and guards the single
//! approved-techspec slot of each proposal.

use tracing::{debug, info};

use super::{ApplyContext, ProposalState, ProposalType, WorkerEventType, WorkerProposal, WorkerState};
use crate::error::{LogicError, MissingEntity, WorkerResult};
use crate::types::PostRef;

impl WorkerState {
    /// Register `post` as a worker proposal.
    ///
    /// # Errors
    ///
    /// - `Missing(Post)` if the post does not exist
    /// - `ProposalOnlyFromPost` if the post is a comment
    /// - `ProposalAlreadyRegistered` if the post is already a proposal
    pub fn register_proposal(
        &mut self,
        ctx: &ApplyContext<'_>,
        post: &PostRef,
        proposal_type: ProposalType,
    ) -> WorkerResult<()> {
        let info = ctx
            .posts
            .find_post(post)
            .ok_or_else(|| MissingEntity::Post(post.clone()))?;
        if !info.is_root() {
            return Err(LogicError::ProposalOnlyFromPost.into());
        }
        if self.proposals.contains_key(post) {
            return Err(LogicError::ProposalAlreadyRegistered.into());
        }

        self.proposals
            .insert(post.clone(), WorkerProposal::new(post.clone(), proposal_type));

        debug!(proposal = %post, ?proposal_type, "worker proposal registered");
        self.record(
            ctx,
            WorkerEventType::ProposalRegistered,
            post,
            &post.author,
            format!("{:?} proposal registered", proposal_type),
        );
        Ok(())
    }

    pub fn get_proposal(&self, post: &PostRef) -> Option<&WorkerProposal> {
        self.proposals.get(post)
    }

    /// Occupy the proposal's approved-techspec slot.
    ///
    /// Re-checks exclusivity at bind time, so two techspecs racing for the
    /// same proposal can never both hold the slot. Binding the techspec that
    /// already holds it is a no-op.
    pub fn bind_approved_techspec(&mut self, proposal: &PostRef, techspec: &PostRef) -> WorkerResult<()> {
        let wp = self
            .proposals
            .get_mut(proposal)
            .ok_or_else(|| MissingEntity::Proposal(proposal.clone()))?;

        match &wp.approved_techspec {
            Some(current) if current == techspec => return Ok(()),
            Some(_) => return Err(LogicError::ProposalAlreadyHasApprovedTechspec.into()),
            None => {}
        }

        wp.approved_techspec = Some(techspec.clone());
        wp.state = ProposalState::HasTechspec;

        info!(proposal = %proposal, techspec = %techspec, "approved techspec bound to proposal");
        Ok(())
    }
}
