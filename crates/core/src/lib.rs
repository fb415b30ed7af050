//! Contribution-funded escrow pools with majority-approved spending requests.
//!
//! A [`PoolRegistry`] creates independent [`FundingPool`]s. Each pool collects
//! contributions, lets its manager propose spending requests, and releases a
//! request's funds only once a strict majority of the pool's current
//! contributors approved it.
//!
//! ```rust
//! use std::sync::Arc;
//! use fundpool::{AccountId, InMemoryLedger, PoolRegistry};
//!
//! let ledger = Arc::new(InMemoryLedger::new());
//! let registry = PoolRegistry::new(ledger.clone());
//!
//! let manager = AccountId::new([1; 32]);
//! let alice = AccountId::new([2; 32]);
//! let vendor = AccountId::new([3; 32]);
//! ledger.fund(alice, 500);
//!
//! let pool = registry.create_pool(manager, 100);
//! pool.contribute(&alice, 300).unwrap();
//! let index = pool.create_request(&manager, "buy batteries", 120, vendor).unwrap();
//! pool.approve_request(index, &alice).unwrap();
//! pool.finalize_request(index, &manager).unwrap();
//!
//! assert_eq!(pool.summary().balance, 180);
//! assert_eq!(ledger.balance_of(&vendor), 120);
//! ```

pub mod config;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod pool;
pub mod registry;

pub use error::PoolError;
pub use identity::{AccountId, PoolId};
pub use ledger::{InMemoryLedger, Ledger, LedgerError};
pub use pool::{FundingPool, PoolEvent, PoolSummary, RequestIndex, RequestView};
pub use registry::{PoolHandle, PoolRegistry};

/// Amounts are expressed in the smallest currency unit.
pub type Amount = u128;
