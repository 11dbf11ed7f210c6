//! # Signer Requirements
//!
//! Worker operations only declare *who* must sign; verifying signatures is
//! the node's job. Two shapes are exposed:
//!
//! - `RequiredAuthorities`: account sets per authority level, what the
//!   transaction pipeline hands to its verifier
//! - `Authority`: a weighted principal set with a threshold, built by
//!   folding `(principal, weight)` pairs

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::types::AccountName;

/// Weighted set of accounts; satisfied once signing weight reaches `weight_threshold`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authority {
    pub weight_threshold: u32,
    pub account_auths: BTreeMap<AccountName, u16>,
}

impl Authority {
    /// Fold an ordered `(principal, weight)` sequence into an authority.
    /// A repeated principal keeps its last weight.
    pub fn from_weighted<I>(weight_threshold: u32, pairs: I) -> Self
    where
        I: IntoIterator<Item = (AccountName, u16)>,
    {
        pairs.into_iter().fold(
            Authority { weight_threshold, account_auths: BTreeMap::new() },
            |mut auth, (account, weight)| {
                auth.add_authority(account, weight);
                auth
            },
        )
    }

    pub fn add_authority(&mut self, account: AccountName, weight: u16) {
        self.account_auths.insert(account, weight);
    }

    pub fn num_auths(&self) -> usize {
        self.account_auths.len()
    }

    /// Total weight can never reach the threshold.
    pub fn is_impossible(&self) -> bool {
        let total: u64 = self.account_auths.values().map(|w| u64::from(*w)).sum();
        total < u64::from(self.weight_threshold)
    }

    /// Signing weight of `signers` meets the threshold.
    pub fn is_satisfied_by<'a, I>(&self, signers: I) -> bool
    where
        I: IntoIterator<Item = &'a AccountName>,
    {
        let signed: BTreeSet<&AccountName> = signers.into_iter().collect();
        let weight: u64 = self
            .account_auths
            .iter()
            .filter(|(a, _)| signed.contains(a))
            .map(|(_, w)| u64::from(*w))
            .sum();
        weight >= u64::from(self.weight_threshold)
    }
}

/// Accounts whose signature an operation needs, per authority level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredAuthorities {
    pub owner: BTreeSet<AccountName>,
    pub active: BTreeSet<AccountName>,
    pub posting: BTreeSet<AccountName>,
}

impl RequiredAuthorities {
    pub fn posting(account: &AccountName) -> Self {
        let mut req = RequiredAuthorities::default();
        req.posting.insert(account.clone());
        req
    }

    /// Single-signer posting authority: weight 1, threshold 1.
    pub fn posting_authority(&self) -> Authority {
        Authority::from_weighted(1, self.posting.iter().map(|a| (a.clone(), 1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_weighted_folds_pairs() {
        let auth = Authority::from_weighted(
            3,
            vec![
                (AccountName::from("alice"), 1),
                (AccountName::from("bob"), 2),
                (AccountName::from("alice"), 2),
            ],
        );
        assert_eq!(auth.num_auths(), 2);
        assert_eq!(auth.account_auths[&AccountName::from("alice")], 2);
        assert!(!auth.is_impossible());
        assert!(auth.is_satisfied_by(&[AccountName::from("alice"), AccountName::from("bob")]));
        assert!(!auth.is_satisfied_by(&[AccountName::from("bob")]));
    }

    #[test]
    fn test_impossible_authority() {
        let auth = Authority::from_weighted(5, vec![(AccountName::from("alice"), 1)]);
        assert!(auth.is_impossible());
        assert!(Authority::from_weighted(1, Vec::new()).is_impossible());
    }

    #[test]
    fn test_posting_requirement() {
        let req = RequiredAuthorities::posting(&AccountName::from("bob"));
        assert!(req.owner.is_empty());
        assert!(req.active.is_empty());
        assert!(req.posting.contains(&AccountName::from("bob")));
        assert!(req.posting_authority().is_satisfied_by(&[AccountName::from("bob")]));
    }
}
