use super::{ProposalState, ProposalType, TechspecState, WorkerState};
use crate::crypto::sha3_512;
use crate::types::Hash;

fn proposal_type_tag(t: ProposalType) -> u8 {
    match t {
        ProposalType::PremadeWork => 0,
        ProposalType::Task => 1,
    }
}

fn proposal_state_tag(s: ProposalState) -> u8 {
    match s {
        ProposalState::Created => 0,
        ProposalState::HasTechspec => 1,
        ProposalState::Closed => 2,
    }
}

fn techspec_state_tag(s: TechspecState) -> u8 {
    match s {
        TechspecState::Created => 0,
        TechspecState::Approved => 1,
        TechspecState::Closed => 2,
    }
}

impl WorkerState {
    /// SHA3-512 over proposals, techspecs, votes and global properties.
    ///
    /// Maps are ordered, so no sorting pass is needed. The event log is
    /// not included.
    pub fn compute_state_root(&self) -> Hash {
        let mut accum = Vec::new();

        accum.extend_from_slice(&(self.proposals.len() as u64).to_be_bytes());
        for (post, wp) in &self.proposals {
            post.encode_into(&mut accum);
            accum.push(proposal_type_tag(wp.proposal_type));
            accum.push(proposal_state_tag(wp.state));
            match &wp.approved_techspec {
                Some(ts) => {
                    accum.push(1);
                    ts.encode_into(&mut accum);
                }
                None => accum.push(0),
            }
        }

        accum.extend_from_slice(&(self.techspecs.len() as u64).to_be_bytes());
        for (post, ts) in &self.techspecs {
            post.encode_into(&mut accum);
            ts.proposal.encode_into(&mut accum);
            ts.specification_cost.encode_into(&mut accum);
            ts.development_cost.encode_into(&mut accum);
            accum.extend_from_slice(&ts.payments_interval.to_be_bytes());
            accum.extend_from_slice(&ts.payments_count.to_be_bytes());
            accum.push(techspec_state_tag(ts.state));
            match &ts.worker {
                Some(w) => {
                    accum.push(1);
                    accum.extend_from_slice(&(w.as_str().len() as u32).to_be_bytes());
                    accum.extend_from_slice(w.as_str().as_bytes());
                }
                None => accum.push(0),
            }
            match &ts.worker_result_post {
                Some(p) => {
                    accum.push(1);
                    p.encode_into(&mut accum);
                }
                None => accum.push(0),
            }
            accum.extend_from_slice(&ts.next_cashout_time.0.to_be_bytes());
            accum.extend_from_slice(&ts.finished_payments_count.to_be_bytes());
        }

        accum.extend_from_slice(&(self.approves.len() as u64).to_be_bytes());
        for ((techspec, approver), vote) in &self.approves {
            techspec.encode_into(&mut accum);
            accum.extend_from_slice(&(approver.as_str().len() as u32).to_be_bytes());
            accum.extend_from_slice(approver.as_str().as_bytes());
            accum.push(vote.state.tag());
        }

        self.global.worker_consumption_per_day.encode_into(&mut accum);

        sha3_512(&accum)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::super::{TechspecTerms, WorkerEvent, WorkerEventType};
    use super::*;
    use crate::types::{AccountName, Asset, TimePointSec};

    #[test]
    fn test_empty_root_is_stable() {
        assert_eq!(WorkerState::new().compute_state_root(), WorkerState::new().compute_state_root());
    }

    #[test]
    fn test_root_tracks_consensus_fields_only() {
        let fx = Fixture::new();
        let mut state = WorkerState::new();
        let empty = state.compute_state_root();

        let proposal = fx.content.create_post("alice", "alice-proposal");
        state.register_proposal(&fx.ctx(), &proposal, ProposalType::Task).unwrap();
        let with_proposal = state.compute_state_root();
        assert_ne!(empty, with_proposal);

        state.log_worker_event(WorkerEvent {
            event_type: WorkerEventType::VoteCast,
            post: proposal.clone(),
            actor: AccountName::from("x"),
            timestamp: TimePointSec(9),
            details: String::new(),
        });
        assert_eq!(state.compute_state_root(), with_proposal);

        let ts = fx.content.create_post("bob", "bob-techspec");
        let terms = TechspecTerms {
            specification_cost: Asset::golos(1),
            development_cost: Asset::golos(2),
            payments_interval: 86_400,
            payments_count: 2,
        };
        state.upsert_techspec(&fx.ctx(), &ts, &proposal, terms).unwrap();
        let with_ts = state.compute_state_root();

        let mut changed = terms;
        changed.development_cost = Asset::golos(3);
        state.upsert_techspec(&fx.ctx(), &ts, &proposal, changed).unwrap();
        assert_ne!(state.compute_state_root(), with_ts);
    }

    #[test]
    fn test_same_operations_same_root() {
        let build = || {
            let fx = Fixture::new();
            let mut state = WorkerState::new();
            let p = fx.content.create_post("alice", "p");
            state.register_proposal(&fx.ctx(), &p, ProposalType::Task).unwrap();
            state.compute_state_root()
        };
        assert_eq!(build(), build());
        assert_ne!(build(), WorkerState::new().compute_state_root());
    }
}
