use soroban_sdk::{contracterror, contracttype, Address, String};

/// Storage keys for the contract.
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Payment token address (instance storage).
    Token,
    /// Number of pools created so far; also the next pool id.
    PoolCount,
    /// Pool record by pool id.
    Pool(u32),
    /// Contributor membership flag by (pool id, account).
    Contributor(u32, Address),
    /// Request record by (pool id, request index).
    Request(u32, u32),
    /// Approval flag by (pool id, request index, approver).
    Approval(u32, u32, Address),
}

/// One funding pool. Returned as-is by `get_summary`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pool {
    pub manager: Address,
    pub min_contribution: i128,
    pub balance: i128,
    pub contributor_count: u32,
    pub request_count: u32,
}

/// A spending request. `approval_count` always equals the number of
/// `Approval` entries stored for it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Request {
    pub description: String,
    pub value: i128,
    pub recipient: Address,
    pub complete: bool,
    pub approval_count: u32,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Caller lacks the manager or contributor role.
    Unauthorized = 1,
    /// Contribution below the pool minimum.
    InsufficientContribution = 2,
    /// Request index out of range.
    NotFound = 3,
    AlreadyVoted = 4,
    AlreadyFinalized = 5,
    /// Approvals do not exceed half of the current contributors.
    InsufficientApprovals = 6,
    /// Request value exceeds the pool balance.
    InsufficientFunds = 7,
    PoolNotFound = 8,
    /// Negative amount, or a balance that would overflow.
    InvalidAmount = 9,
}
