use std::fmt;

use crate::identity::AccountId;
use crate::ledger::LedgerError;
use crate::pool::RequestIndex;
use crate::Amount;

/// Role a caller must hold for a restricted pool operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Manager,
    Contributor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Manager => f.write_str("manager"),
            Role::Contributor => f.write_str("contributor"),
        }
    }
}

/// Errors from pool operations.
///
/// Every failed operation leaves the pool exactly as it was before the call.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("{caller} is not the pool {required}")]
    Unauthorized { caller: AccountId, required: Role },
    #[error("contribution of {amount} is below the pool minimum of {minimum}")]
    InsufficientContribution { amount: Amount, minimum: Amount },
    #[error("request {0} does not exist")]
    NotFound(RequestIndex),
    #[error("{caller} already approved request {index}")]
    AlreadyVoted {
        index: RequestIndex,
        caller: AccountId,
    },
    #[error("request {0} is already finalized")]
    AlreadyFinalized(RequestIndex),
    #[error("request {index} has {approvals} approvals, needs more than half of {contributors} contributors")]
    InsufficientApprovals {
        index: RequestIndex,
        approvals: usize,
        contributors: usize,
    },
    #[error("request needs {requested} but the pool only holds {available}")]
    InsufficientFunds { requested: Amount, available: Amount },
    #[error("contribution would overflow the pool balance")]
    BalanceOverflow,
    #[error("ledger transfer failed: {0}")]
    Ledger(#[from] LedgerError),
}

/// Errors parsing an [`AccountId`] from text.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("account id is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("account id must be 32 bytes, got {0}")]
    InvalidLength(usize),
}
