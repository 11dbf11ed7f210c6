//! # Techspec Registry
//!
//! Create, update and delete techspecs. The created → approved / closed
//! transitions are driven by the approval ledger (`internal_approval`).
//!
//! ## Create vs update
//!
//! ```text
//! no record for post     → create (state = created, unassigned, never cashed out)
//! record, same proposal  → overwrite TechspecTerms only
//! record, other proposal → TechspecAlreadyBoundToAnotherProposal, nothing changes
//! ```

use tracing::{debug, info};

use super::{
    ApplyContext, ProposalState, ProposalType, TechspecState, TechspecTerms, WorkerEventType,
    WorkerState, WorkerTechspec,
};
use crate::error::{LogicError, MissingEntity, WorkerResult};
use crate::types::{AccountName, PostRef, TimePointSec};

impl WorkerState {
    /// Create the techspec on `post` or update its terms in place.
    ///
    /// # Langkah
    ///
    /// 1. techspec post exists and is a root post
    /// 2. proposal post exists and is registered as a proposal
    /// 3. proposal is a `task` and has no approved techspec yet
    /// 4. an existing record must be bound to the same proposal and still `created`
    /// 5. insert or overwrite terms
    ///
    /// All checks run before the first write.
    pub fn upsert_techspec(
        &mut self,
        ctx: &ApplyContext<'_>,
        post: &PostRef,
        proposal: &PostRef,
        terms: TechspecTerms,
    ) -> WorkerResult<()> {
        let info = ctx
            .posts
            .find_post(post)
            .ok_or_else(|| MissingEntity::Post(post.clone()))?;
        if !info.is_root() {
            return Err(LogicError::TechspecOnlyOnPost.into());
        }

        if ctx.posts.find_post(proposal).is_none() {
            return Err(MissingEntity::Post(proposal.clone()).into());
        }
        let wp = self
            .proposals
            .get(proposal)
            .ok_or(LogicError::TechspecOnlyForExistingProposal)?;
        if wp.proposal_type == ProposalType::PremadeWork {
            return Err(LogicError::TechspecForbiddenForPremadeWork.into());
        }
        if wp.state == ProposalState::HasTechspec || wp.approved_techspec.is_some() {
            return Err(LogicError::ProposalAlreadyHasApprovedTechspec.into());
        }

        if let Some(existing) = self.techspecs.get_mut(post) {
            if existing.proposal != *proposal {
                return Err(LogicError::TechspecAlreadyBoundToAnotherProposal.into());
            }
            if existing.state != TechspecState::Created {
                return Err(LogicError::TechspecAlreadyFinalized.into());
            }

            existing.specification_cost = terms.specification_cost;
            existing.development_cost = terms.development_cost;
            existing.payments_interval = terms.payments_interval;
            existing.payments_count = terms.payments_count;

            debug!(techspec = %post, "worker techspec terms updated");
            self.record(
                ctx,
                WorkerEventType::TechspecUpdated,
                post,
                &post.author,
                format!(
                    "terms {} + {} over {} x {}s",
                    terms.specification_cost,
                    terms.development_cost,
                    terms.payments_count,
                    terms.payments_interval
                ),
            );
            return Ok(());
        }

        self.techspecs.insert(
            post.clone(),
            WorkerTechspec {
                post: post.clone(),
                proposal: proposal.clone(),
                specification_cost: terms.specification_cost,
                development_cost: terms.development_cost,
                payments_interval: terms.payments_interval,
                payments_count: terms.payments_count,
                state: TechspecState::Created,
                worker: None,
                worker_result_post: None,
                next_cashout_time: TimePointSec::MAXIMUM,
                finished_payments_count: 0,
            },
        );
        self.techspecs_by_proposal.insert((proposal.clone(), post.clone()));

        info!(techspec = %post, proposal = %proposal, "worker techspec created");
        self.record(
            ctx,
            WorkerEventType::TechspecCreated,
            post,
            &post.author,
            format!("techspec for proposal {}", proposal),
        );
        Ok(())
    }

    pub fn get_techspec(&self, post: &PostRef) -> Option<&WorkerTechspec> {
        self.techspecs.get(post)
    }

    /// Remove the techspec on `post`.
    ///
    /// Only a `created` techspec may be deleted. `approved` and `closed`
    /// records are final and keep their votes. Deleting a `created` one also
    /// drops the votes cast on it, so a techspec later created on the same
    /// post starts from an empty tally.
    pub fn delete_techspec(&mut self, ctx: &ApplyContext<'_>, post: &PostRef) -> WorkerResult<()> {
        let ts = self
            .techspecs
            .get(post)
            .ok_or_else(|| MissingEntity::Techspec(post.clone()))?;
        if ts.state != TechspecState::Created {
            return Err(LogicError::CannotDeleteFinalizedTechspec.into());
        }

        let proposal = ts.proposal.clone();
        self.techspecs.remove(post);
        self.techspecs_by_proposal.remove(&(proposal.clone(), post.clone()));
        let dropped = self.purge_votes(post);

        info!(techspec = %post, proposal = %proposal, dropped_votes = dropped, "worker techspec deleted");
        self.record(
            ctx,
            WorkerEventType::TechspecDeleted,
            post,
            &post.author,
            format!("techspec for proposal {} deleted, {} votes dropped", proposal, dropped),
        );
        Ok(())
    }

    /// Remove every `(techspec, *)` vote row; returns how many were removed.
    fn purge_votes(&mut self, techspec: &PostRef) -> usize {
        let keys: Vec<_> = self
            .approves
            .range((techspec.clone(), AccountName::empty())..)
            .take_while(|((t, _), _)| t == techspec)
            .map(|(k, _)| k.clone())
            .collect();
        for key in &keys {
            self.approves.remove(key);
        }
        keys.len()
    }
}
