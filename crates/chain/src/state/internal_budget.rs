//! # Consumption Budget Ledger
//!
//! `worker_consumption_per_day` only grows, on techspec approval.
//!
//! ```text
//! total_cost    = specification_cost + development_cost
//! total_seconds = payments_interval * payments_count
//! commitment    = min(total_cost * 86400 / total_seconds, total_cost)
//! ```
//!
//! Integer arithmetic in minimal units, truncating, widened to i128 so the
//! intermediate product cannot overflow. A zero-length schedule commits the
//! whole cost.

use tracing::debug;

use super::{TechspecTerms, WorkerState};
use crate::error::{LogicError, WorkerResult};
use crate::types::{Asset, SECONDS_PER_DAY};

/// Daily commitment implied by `terms`; `None` on overflow or mixed symbols.
/// [`WorkerState::add_commitment`] rejects mixed symbols before calling this.
pub fn daily_commitment(terms: &TechspecTerms) -> Option<Asset> {
    let total = terms.total_cost()?;
    let total_seconds = i128::from(terms.payments_interval) * i128::from(terms.payments_count);
    if total_seconds == 0 {
        return Some(total);
    }

    let rate = i128::from(total.amount) * i128::from(SECONDS_PER_DAY) / total_seconds;
    let capped = rate.min(i128::from(total.amount));
    i64::try_from(capped).ok().map(|amount| Asset::new(amount, total.symbol))
}

impl WorkerState {
    /// Add the daily commitment of `terms` to the budget.
    ///
    /// # Returns
    ///
    /// The amount added.
    pub fn add_commitment(&mut self, terms: &TechspecTerms) -> WorkerResult<Asset> {
        if terms.specification_cost.symbol != terms.development_cost.symbol {
            return Err(LogicError::MixedCostAssets.into());
        }
        let commitment = daily_commitment(terms).ok_or(LogicError::ConsumptionOverflow)?;
        let updated = self
            .global
            .worker_consumption_per_day
            .checked_add(commitment)
            .ok_or(LogicError::ConsumptionOverflow)?;

        self.global.worker_consumption_per_day = updated;
        debug!(commitment = %commitment, total = %updated, "worker consumption per day increased");
        Ok(commitment)
    }

    pub fn consumption_per_day(&self) -> Asset {
        self.global.worker_consumption_per_day
    }
}
