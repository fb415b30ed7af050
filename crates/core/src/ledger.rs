//! Value-transfer seam between funding pools and the outside world.
//!
//! Pools never move currency themselves. A contribution asks the [`Ledger`] to
//! collect funds from the contributor into the pool's escrow; finalizing a
//! request asks it to disburse escrowed funds to the request's recipient. The
//! pool commits its own bookkeeping only after the ledger call succeeds, and
//! holds its lock across the call, so no caller can observe a transfer without
//! the matching state change.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::identity::{AccountId, PoolId};
use crate::Amount;

// =============================================================================
// Errors
// =============================================================================

/// Errors reported by a ledger implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("account {account} holds {available}, cannot pay {requested}")]
    InsufficientFunds {
        account: AccountId,
        requested: Amount,
        available: Amount,
    },
    #[error("escrow of {pool} holds {available}, cannot pay {requested}")]
    EscrowShortfall {
        pool: PoolId,
        requested: Amount,
        available: Amount,
    },
    #[error("balance overflow")]
    Overflow,
    #[error("transfer rejected: {0}")]
    Rejected(String),
}

// =============================================================================
// Trait: Ledger
// =============================================================================

/// Currency movement capability a pool delegates to.
///
/// Both calls are blocking and must be all-or-nothing: on `Err` no funds may
/// have moved. Pools call these while holding their own lock, so an
/// implementation must never call back into a pool.
pub trait Ledger: Send + Sync + 'static {
    /// Move `amount` from `from` into the escrow of `pool`.
    fn collect(&self, pool: PoolId, from: &AccountId, amount: Amount) -> Result<(), LedgerError>;

    /// Pay `amount` out of the escrow of `pool` to `to`.
    fn disburse(&self, pool: PoolId, to: &AccountId, amount: Amount) -> Result<(), LedgerError>;
}

// =============================================================================
// InMemoryLedger
// =============================================================================

/// Thread-safe in-process account book.
///
/// Accounts start empty and are topped up with [`InMemoryLedger::fund`].
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    book: Mutex<Book>,
}

#[derive(Debug, Default)]
struct Book {
    accounts: HashMap<AccountId, Amount>,
    escrow: HashMap<PoolId, Amount>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `account` from outside the system. Saturates at
    /// `Amount::MAX`.
    pub fn fund(&self, account: AccountId, amount: Amount) {
        let mut book = self.book.lock();
        let balance = book.accounts.entry(account).or_default();
        *balance = balance.saturating_add(amount);
    }

    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.book.lock().accounts.get(account).copied().unwrap_or(0)
    }

    /// Funds currently held in escrow for `pool`.
    pub fn escrow_of(&self, pool: PoolId) -> Amount {
        self.book.lock().escrow.get(&pool).copied().unwrap_or(0)
    }
}

impl Ledger for InMemoryLedger {
    fn collect(&self, pool: PoolId, from: &AccountId, amount: Amount) -> Result<(), LedgerError> {
        let mut book = self.book.lock();
        let available = book.accounts.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                account: *from,
                requested: amount,
                available,
            });
        }
        let escrow = book.escrow.get(&pool).copied().unwrap_or(0);
        let escrow = escrow.checked_add(amount).ok_or(LedgerError::Overflow)?;

        book.accounts.insert(*from, available - amount);
        book.escrow.insert(pool, escrow);
        tracing::trace!(%pool, from = %from, amount, "ledger: collected");
        Ok(())
    }

    fn disburse(&self, pool: PoolId, to: &AccountId, amount: Amount) -> Result<(), LedgerError> {
        let mut book = self.book.lock();
        let available = book.escrow.get(&pool).copied().unwrap_or(0);
        if available < amount {
            return Err(LedgerError::EscrowShortfall {
                pool,
                requested: amount,
                available,
            });
        }
        let recipient = book.accounts.get(to).copied().unwrap_or(0);
        let recipient = recipient.checked_add(amount).ok_or(LedgerError::Overflow)?;

        book.escrow.insert(pool, available - amount);
        book.accounts.insert(*to, recipient);
        tracing::trace!(%pool, to = %to, amount, "ledger: disbursed");
        Ok(())
    }
}

// =============================================================================
// Mock: RejectingLedger (test only)
// =============================================================================

/// Accepts every collection but refuses every payout.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RejectingLedger;

#[cfg(test)]
impl Ledger for RejectingLedger {
    fn collect(&self, _pool: PoolId, _from: &AccountId, _amount: Amount) -> Result<(), LedgerError> {
        Ok(())
    }

    fn disburse(&self, _pool: PoolId, _to: &AccountId, _amount: Amount) -> Result<(), LedgerError> {
        Err(LedgerError::Rejected("payouts disabled".into()))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn account(seed: u8) -> AccountId {
        AccountId::new([seed; 32])
    }

    #[test]
    fn test_unknown_account_has_zero_balance() {
        let ledger = InMemoryLedger::new();
        assert_eq!(ledger.balance_of(&account(1)), 0);
        assert_eq!(ledger.escrow_of(PoolId::new(0)), 0);
    }

    #[test]
    fn test_collect_moves_funds_into_escrow() {
        let ledger = InMemoryLedger::new();
        let pool = PoolId::new(0);
        ledger.fund(account(1), 300);

        ledger.collect(pool, &account(1), 120).unwrap();

        assert_eq!(ledger.balance_of(&account(1)), 180);
        assert_eq!(ledger.escrow_of(pool), 120);
    }

    #[test]
    fn test_collect_short_account_changes_nothing() {
        let ledger = InMemoryLedger::new();
        let pool = PoolId::new(0);
        ledger.fund(account(1), 50);

        let err = ledger.collect(pool, &account(1), 51).unwrap_err();

        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                account: account(1),
                requested: 51,
                available: 50,
            }
        );
        assert_eq!(ledger.balance_of(&account(1)), 50);
        assert_eq!(ledger.escrow_of(pool), 0);
    }

    #[test]
    fn test_disburse_pays_recipient() {
        let ledger = InMemoryLedger::new();
        let pool = PoolId::new(4);
        ledger.fund(account(1), 100);
        ledger.collect(pool, &account(1), 100).unwrap();

        ledger.disburse(pool, &account(9), 70).unwrap();

        assert_eq!(ledger.escrow_of(pool), 30);
        assert_eq!(ledger.balance_of(&account(9)), 70);
    }

    #[test]
    fn test_disburse_is_scoped_to_pool_escrow() {
        let ledger = InMemoryLedger::new();
        ledger.fund(account(1), 100);
        ledger.collect(PoolId::new(0), &account(1), 100).unwrap();

        let err = ledger
            .disburse(PoolId::new(1), &account(9), 1)
            .unwrap_err();

        assert!(matches!(err, LedgerError::EscrowShortfall { available: 0, .. }));
        assert_eq!(ledger.escrow_of(PoolId::new(0)), 100);
        assert_eq!(ledger.balance_of(&account(9)), 0);
    }

    #[test]
    fn test_fund_saturates() {
        let ledger = InMemoryLedger::new();
        ledger.fund(account(1), Amount::MAX);
        ledger.fund(account(1), 1);
        assert_eq!(ledger.balance_of(&account(1)), Amount::MAX);
    }
}
