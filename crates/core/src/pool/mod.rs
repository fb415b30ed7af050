//! A single funding pool: contribution accounting, spending requests, and
//! majority-gated fund release.
//!
//! # Request lifecycle
//!
//! ```text
//! create_request ──► Open ──(approvals > contributors / 2, funds available)──► Finalized
//! ```
//!
//! There is no rejected or cancelled state. A request that never gathers a
//! majority stays open forever.
//!
//! # Consistency
//!
//! All state lives behind one mutex per pool, so operations on a pool are
//! totally ordered and each one either commits every change or none. Ledger
//! calls happen while the lock is held and before any bookkeeping changes,
//! which keeps a payout and its `complete` flag a single atomic step.

mod events;
mod request;


use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

pub use events::PoolEvent;
pub use request::RequestView;

use crate::error::{PoolError, Role};
use crate::identity::{AccountId, PoolId};
use crate::ledger::Ledger;
use crate::Amount;
use request::Request;

/// Sequential, never reused, 0-based request index.
pub type RequestIndex = u64;

/// Read-only pool snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSummary {
    pub min_contribution: Amount,
    pub balance: Amount,
    pub request_count: u64,
    pub contributor_count: usize,
    pub manager: AccountId,
}

/// Mutable pool state, only ever touched under [`FundingPool::state`].
#[derive(Debug, Default)]
struct PoolState {
    balance: Amount,
    contributors: HashSet<AccountId>,
    requests: Vec<Request>,
    journal: Vec<PoolEvent>,
}

impl PoolState {
    fn request(&self, index: RequestIndex) -> Result<&Request, PoolError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.requests.get(i))
            .ok_or(PoolError::NotFound(index))
    }

    fn request_mut(&mut self, index: RequestIndex) -> Result<&mut Request, PoolError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.requests.get_mut(i))
            .ok_or(PoolError::NotFound(index))
    }
}

pub struct FundingPool {
    id: PoolId,
    manager: AccountId,
    min_contribution: Amount,
    ledger: Arc<dyn Ledger>,
    state: Mutex<PoolState>,
}

impl fmt::Debug for FundingPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FundingPool")
            .field("id", &self.id)
            .field("manager", &self.manager)
            .field("min_contribution", &self.min_contribution)
            .finish_non_exhaustive()
    }
}

impl FundingPool {
    pub(crate) fn new(
        id: PoolId,
        manager: AccountId,
        min_contribution: Amount,
        ledger: Arc<dyn Ledger>,
    ) -> Self {
        Self {
            id,
            manager,
            min_contribution,
            ledger,
            state: Mutex::new(PoolState::default()),
        }
    }

    pub fn id(&self) -> PoolId {
        self.id
    }

    pub fn manager(&self) -> &AccountId {
        &self.manager
    }

    pub fn min_contribution(&self) -> Amount {
        self.min_contribution
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Contribute `amount` to the pool.
    ///
    /// The first contribution of at least the minimum makes `caller` a
    /// contributor; later ones only add to the balance.
    pub fn contribute(&self, caller: &AccountId, amount: Amount) -> Result<(), PoolError> {
        if amount < self.min_contribution {
            return Err(self.reject(
                "contribute",
                PoolError::InsufficientContribution {
                    amount,
                    minimum: self.min_contribution,
                },
            ));
        }

        let mut state = self.state.lock();
        let balance = state
            .balance
            .checked_add(amount)
            .ok_or_else(|| self.reject("contribute", PoolError::BalanceOverflow))?;
        self.ledger
            .collect(self.id, caller, amount)
            .map_err(|e| self.reject("contribute", e.into()))?;

        state.balance = balance;
        let joined = state.contributors.insert(*caller);
        state.journal.push(PoolEvent::Contributed {
            contributor: *caller,
            amount,
            joined,
        });

        tracing::info!(
            pool = %self.id,
            caller = %caller,
            amount,
            joined,
            balance,
            contributors = state.contributors.len(),
            "Contribution accepted"
        );
        Ok(())
    }

    /// Propose spending `value` on `recipient`. Manager only.
    ///
    /// The value is not checked against the balance here; that happens at
    /// finalization.
    pub fn create_request(
        &self,
        caller: &AccountId,
        description: impl Into<String>,
        value: Amount,
        recipient: AccountId,
    ) -> Result<RequestIndex, PoolError> {
        self.require_manager("create_request", caller)?;

        let mut state = self.state.lock();
        let index = state.requests.len() as RequestIndex;
        state
            .requests
            .push(Request::new(description.into(), value, recipient));
        state.journal.push(PoolEvent::RequestCreated {
            index,
            value,
            recipient,
        });

        tracing::info!(
            pool = %self.id,
            index,
            value,
            recipient = %recipient,
            "Request created"
        );
        Ok(index)
    }

    /// Vote yes on a request. Contributors only, once per request.
    pub fn approve_request(&self, index: RequestIndex, caller: &AccountId) -> Result<(), PoolError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let is_contributor = state.contributors.contains(caller);

        let request = state
            .request_mut(index)
            .map_err(|e| self.reject("approve_request", e))?;
        if !is_contributor {
            return Err(self.reject(
                "approve_request",
                PoolError::Unauthorized {
                    caller: *caller,
                    required: Role::Contributor,
                },
            ));
        }
        if !request.approve(*caller) {
            return Err(self.reject(
                "approve_request",
                PoolError::AlreadyVoted {
                    index,
                    caller: *caller,
                },
            ));
        }

        let approvals = request.approval_count();
        state.journal.push(PoolEvent::RequestApproved {
            index,
            approver: *caller,
            approvals,
        });

        tracing::info!(
            pool = %self.id,
            index,
            caller = %caller,
            approvals,
            contributors = state.contributors.len(),
            "Request approved"
        );
        Ok(())
    }

    /// Pay out an approved request. Manager only.
    ///
    /// Requires strictly more approvals than half of the pool's contributors
    /// at call time, an open request, and a balance covering its value.
    pub fn finalize_request(&self, index: RequestIndex, caller: &AccountId) -> Result<(), PoolError> {
        self.require_manager("finalize_request", caller)?;

        let mut guard = self.state.lock();
        let state = &mut *guard;
        let contributors = state.contributors.len();
        let available = state.balance;

        let request = state
            .request_mut(index)
            .map_err(|e| self.reject("finalize_request", e))?;
        if !request.has_majority(contributors) {
            return Err(self.reject(
                "finalize_request",
                PoolError::InsufficientApprovals {
                    index,
                    approvals: request.approval_count(),
                    contributors,
                },
            ));
        }
        if request.complete {
            return Err(self.reject("finalize_request", PoolError::AlreadyFinalized(index)));
        }
        if request.value > available {
            return Err(self.reject(
                "finalize_request",
                PoolError::InsufficientFunds {
                    requested: request.value,
                    available,
                },
            ));
        }

        self.ledger
            .disburse(self.id, &request.recipient, request.value)
            .map_err(|e| self.reject("finalize_request", e.into()))?;
        request.complete = true;
        let (recipient, value) = (request.recipient, request.value);

        state.balance = available - value;
        state.journal.push(PoolEvent::RequestFinalized {
            index,
            recipient,
            value,
        });

        tracing::info!(
            pool = %self.id,
            index,
            recipient = %recipient,
            value,
            balance = state.balance,
            "Request finalized"
        );
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn summary(&self) -> PoolSummary {
        let state = self.state.lock();
        PoolSummary {
            min_contribution: self.min_contribution,
            balance: state.balance,
            request_count: state.requests.len() as u64,
            contributor_count: state.contributors.len(),
            manager: self.manager,
        }
    }

    pub fn request_count(&self) -> u64 {
        self.state.lock().requests.len() as u64
    }

    pub fn request(&self, index: RequestIndex) -> Option<RequestView> {
        self.state.lock().request(index).ok().map(Request::view)
    }

    pub fn is_contributor(&self, account: &AccountId) -> bool {
        self.state.lock().contributors.contains(account)
    }

    /// Whether `account` approved request `index`.
    pub fn has_approved(&self, index: RequestIndex, account: &AccountId) -> Result<bool, PoolError> {
        let state = self.state.lock();
        Ok(state.request(index)?.has_approved(account))
    }

    /// Journal of committed state changes, oldest first.
    pub fn events(&self) -> Vec<PoolEvent> {
        self.state.lock().journal.clone()
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn require_manager(&self, op: &'static str, caller: &AccountId) -> Result<(), PoolError> {
        if *caller == self.manager {
            return Ok(());
        }
        Err(self.reject(
            op,
            PoolError::Unauthorized {
                caller: *caller,
                required: Role::Manager,
            },
        ))
    }

    fn reject(&self, op: &'static str, error: PoolError) -> PoolError {
        tracing::debug!(pool = %self.id, op, error = %error, "Pool operation rejected");
        error
    }
}
