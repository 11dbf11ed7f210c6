//! # Assignment Manager
//!
//! The author of an approved techspec names the account doing the work.
//! An empty worker name clears the assignment.

use tracing::info;

use super::{ApplyContext, TechspecState, WorkerEventType, WorkerState};
use crate::error::{LogicError, MissingEntity, WorkerResult};
use crate::types::{AccountName, PostRef};

impl WorkerState {
    pub fn assign_worker(
        &mut self,
        ctx: &ApplyContext<'_>,
        assigner: &AccountName,
        techspec: &PostRef,
        worker: &AccountName,
    ) -> WorkerResult<()> {
        let ts = self
            .techspecs
            .get(techspec)
            .ok_or_else(|| MissingEntity::Techspec(techspec.clone()))?;
        if ts.post.author != *assigner {
            return Err(LogicError::AssignerNotTechspecAuthor.into());
        }
        if ts.state != TechspecState::Approved {
            return Err(LogicError::TechspecNotApproved.into());
        }
        if !worker.is_empty() && !ctx.accounts.account_exists(worker) {
            return Err(MissingEntity::Account(worker.clone()).into());
        }

        let assigned = (!worker.is_empty()).then(|| worker.clone());
        if let Some(ts) = self.techspecs.get_mut(techspec) {
            ts.worker = assigned.clone();
        }

        let (event_type, details) = match &assigned {
            Some(w) => (WorkerEventType::WorkerAssigned, format!("worker {}", w)),
            None => (WorkerEventType::WorkerUnassigned, "worker cleared".to_string()),
        };
        info!(techspec = %techspec, worker = ?assigned, "worker assignment changed");
        self.record(ctx, event_type, techspec, assigner, details);
        Ok(())
    }
}
