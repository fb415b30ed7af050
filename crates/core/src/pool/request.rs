use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::identity::AccountId;
use crate::Amount;

/// A spending request owned by exactly one pool.
///
/// Open while `complete` is false; finalized (terminal) once it flips.
#[derive(Debug, Clone)]
pub(crate) struct Request {
    pub description: String,
    pub value: Amount,
    pub recipient: AccountId,
    pub complete: bool,
    approvals: HashSet<AccountId>,
}

impl Request {
    pub fn new(description: String, value: Amount, recipient: AccountId) -> Self {
        Self {
            description,
            value,
            recipient,
            complete: false,
            approvals: HashSet::new(),
        }
    }

    /// Record a yes vote. Returns `false` if `approver` already voted.
    pub fn approve(&mut self, approver: AccountId) -> bool {
        self.approvals.insert(approver)
    }

    pub fn has_approved(&self, approver: &AccountId) -> bool {
        self.approvals.contains(approver)
    }

    pub fn approval_count(&self) -> usize {
        self.approvals.len()
    }

    /// Strict majority of the contributors counted right now.
    pub fn has_majority(&self, contributor_count: usize) -> bool {
        self.approval_count() > contributor_count / 2
    }

    pub fn view(&self) -> RequestView {
        RequestView {
            description: self.description.clone(),
            value: self.value,
            recipient: self.recipient,
            complete: self.complete,
            approval_count: self.approval_count(),
        }
    }
}

/// Read-only snapshot of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestView {
    pub description: String,
    pub value: Amount,
    pub recipient: AccountId,
    pub complete: bool,
    pub approval_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn account(seed: u8) -> AccountId {
        AccountId::new([seed; 32])
    }

    #[test]
    fn test_new_request_is_open_without_approvals() {
        let request = Request::new("rent".into(), 10, account(9));
        assert!(!request.complete);
        assert_eq!(request.approval_count(), 0);
    }

    #[test]
    fn test_second_vote_is_ignored() {
        let mut request = Request::new("rent".into(), 10, account(9));
        assert!(request.approve(account(1)));
        assert!(!request.approve(account(1)));
        assert_eq!(request.approval_count(), 1);
        assert!(request.has_approved(&account(1)));
        assert!(!request.has_approved(&account(2)));
    }

    #[rstest]
    #[case(0, 0, false)]
    #[case(1, 0, true)]
    #[case(1, 1, true)]
    #[case(1, 2, false)]
    #[case(2, 2, true)]
    #[case(1, 3, false)]
    #[case(2, 3, true)]
    #[case(2, 4, false)]
    #[case(3, 4, true)]
    #[case(3, 5, true)]
    fn test_majority_threshold(
        #[case] approvals: u8,
        #[case] contributors: usize,
        #[case] expected: bool,
    ) {
        let mut request = Request::new("x".into(), 1, account(200));
        for seed in 0..approvals {
            request.approve(account(seed));
        }
        assert_eq!(request.has_majority(contributors), expected);
    }
}
