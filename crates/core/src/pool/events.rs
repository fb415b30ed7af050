use serde::{Deserialize, Serialize};

use super::RequestIndex;
use crate::identity::AccountId;
use crate::Amount;

/// A committed pool state change, recorded in the pool's journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolEvent {
    Contributed {
        contributor: AccountId,
        amount: Amount,
        /// Whether this contribution made `contributor` a new member.
        joined: bool,
    },
    RequestCreated {
        index: RequestIndex,
        value: Amount,
        recipient: AccountId,
    },
    RequestApproved {
        index: RequestIndex,
        approver: AccountId,
        approvals: usize,
    },
    RequestFinalized {
        index: RequestIndex,
        recipient: AccountId,
        value: Amount,
    },
}
