//! # Approval Ledger
//!
//! One vote per `(techspec, approver)`, re-votable with a different state.
//! Every accepted vote re-tallies the techspec and evaluates thresholds:
//!
//! ```text
//! approve    >= M  → techspec approved, bound to proposal, budget += daily rate
//! disapprove >= S  → techspec closed
//! ```
//!
//! Approval is checked first. Votes are never purged, so tallies of
//! finalized techspecs stay queryable.

use tracing::{debug, info};

use super::{ApplyContext, ApprovalVote, ApproveCounts, ApproveState, TechspecState, WorkerEventType, WorkerState};
use crate::committee::VoteThresholds;
use crate::error::{LogicError, MissingEntity, WorkerResult};
use crate::types::{AccountName, PostRef};

impl WorkerState {
    /// Cast or change `approver`'s vote on `techspec`.
    ///
    /// # Langkah
    ///
    /// 1. approver is a witness, then holds a top-N seat
    /// 2. techspec post and record exist, record is still `created`
    /// 3. the proposal's approved slot is free or already this techspec
    /// 4. the vote differs from the approver's previous one
    /// 5. upsert vote, re-tally, evaluate thresholds
    ///
    /// # Returns
    ///
    /// The techspec state after the vote.
    pub fn cast_vote(
        &mut self,
        ctx: &ApplyContext<'_>,
        techspec: &PostRef,
        approver: &AccountName,
        state: ApproveState,
    ) -> WorkerResult<TechspecState> {
        if !ctx.committee.is_witness(approver) {
            return Err(MissingEntity::Witness(approver.clone()).into());
        }
        if !ctx.committee.is_member(approver) {
            return Err(LogicError::ApproverNotInTopCommittee.into());
        }

        if ctx.posts.find_post(techspec).is_none() {
            return Err(MissingEntity::Post(techspec.clone()).into());
        }
        let ts = self
            .techspecs
            .get(techspec)
            .ok_or_else(|| MissingEntity::Techspec(techspec.clone()))?;
        if ts.state != TechspecState::Created {
            return Err(LogicError::TechspecAlreadyFinalized.into());
        }
        let proposal = ts.proposal.clone();
        if let Some(wp) = self.proposals.get(&proposal) {
            if wp.approved_techspec.as_ref().is_some_and(|bound| bound != techspec) {
                return Err(LogicError::ProposalAlreadyHasApprovedTechspec.into());
            }
        }

        let key = (techspec.clone(), approver.clone());
        if self.approves.get(&key).is_some_and(|v| v.state == state) {
            return Err(LogicError::DuplicateVote.into());
        }

        self.approves.insert(
            key,
            ApprovalVote { techspec: techspec.clone(), approver: approver.clone(), state },
        );
        debug!(techspec = %techspec, approver = %approver, ?state, "techspec vote accepted");
        self.record(
            ctx,
            WorkerEventType::VoteCast,
            techspec,
            approver,
            format!("{:?}", state),
        );

        let counts = self.count_approves(techspec);
        let thresholds = VoteThresholds::from_oracle(ctx.committee);

        if counts.approve >= thresholds.majority {
            self.approve_techspec(ctx, techspec, &proposal, approver)?;
            return Ok(TechspecState::Approved);
        }
        if counts.disapprove >= thresholds.super_majority {
            if let Some(ts) = self.techspecs.get_mut(techspec) {
                ts.state = TechspecState::Closed;
            }
            info!(
                techspec = %techspec,
                disapprove = counts.disapprove,
                threshold = thresholds.super_majority,
                "worker techspec closed"
            );
            self.record(
                ctx,
                WorkerEventType::TechspecClosed,
                techspec,
                approver,
                format!("{} disapprovals", counts.disapprove),
            );
            return Ok(TechspecState::Closed);
        }
        Ok(TechspecState::Created)
    }

    /// Bind to the proposal, then mark approved, then add the daily commitment.
    fn approve_techspec(
        &mut self,
        ctx: &ApplyContext<'_>,
        techspec: &PostRef,
        proposal: &PostRef,
        approver: &AccountName,
    ) -> WorkerResult<()> {
        self.bind_approved_techspec(proposal, techspec)?;

        let terms = match self.techspecs.get_mut(techspec) {
            Some(ts) => {
                ts.state = TechspecState::Approved;
                ts.terms()
            }
            None => return Err(MissingEntity::Techspec(techspec.clone()).into()),
        };
        let commitment = self.add_commitment(&terms)?;

        info!(
            techspec = %techspec,
            proposal = %proposal,
            commitment = %commitment,
            "worker techspec approved"
        );
        self.record(
            ctx,
            WorkerEventType::TechspecApproved,
            techspec,
            approver,
            format!("commitment {} per day", commitment),
        );
        Ok(())
    }

    /// Tally of every vote recorded for `techspec`, by range scan.
    pub fn count_approves(&self, techspec: &PostRef) -> ApproveCounts {
        let mut counts = ApproveCounts::default();
        for vote in self
            .approves
            .range((techspec.clone(), AccountName::empty())..)
            .take_while(|((t, _), _)| t == techspec)
            .map(|(_, v)| v)
        {
            counts.add(vote.state);
        }
        counts
    }

    pub fn get_vote(&self, techspec: &PostRef, approver: &AccountName) -> Option<&ApprovalVote> {
        self.approves.get(&(techspec.clone(), approver.clone()))
    }
}
