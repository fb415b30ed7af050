//! Factory and append-only directory of funding pools.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::identity::{AccountId, PoolId};
use crate::ledger::Ledger;
use crate::pool::FundingPool;
use crate::Amount;

/// Shared handle to a pool. Pools live as long as any handle or the registry.
pub type PoolHandle = Arc<FundingPool>;

/// Creates pools and remembers every pool it created, in creation order.
///
/// All pools created by one registry settle through the same [`Ledger`] but
/// share no state with each other.
pub struct PoolRegistry {
    ledger: Arc<dyn Ledger>,
    pools: RwLock<Vec<PoolHandle>>,
}

impl PoolRegistry {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self {
            ledger,
            pools: RwLock::new(Vec::new()),
        }
    }

    /// Create a pool managed by `caller`. Any minimum, including zero, is
    /// accepted.
    pub fn create_pool(&self, caller: AccountId, min_contribution: Amount) -> PoolHandle {
        let mut pools = self.pools.write();
        let id = PoolId::new(pools.len() as u64);
        let pool = Arc::new(FundingPool::new(
            id,
            caller,
            min_contribution,
            Arc::clone(&self.ledger),
        ));
        pools.push(Arc::clone(&pool));

        tracing::info!(
            pool = %id,
            manager = %caller,
            min_contribution,
            total_pools = pools.len(),
            "Funding pool created"
        );
        pool
    }

    /// Every pool ever created, oldest first.
    pub fn list_pools(&self) -> Vec<PoolHandle> {
        self.pools.read().clone()
    }

    pub fn get(&self, id: PoolId) -> Option<PoolHandle> {
        let index = usize::try_from(id.get()).ok()?;
        self.pools.read().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.pools.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.read().is_empty()
    }
}
