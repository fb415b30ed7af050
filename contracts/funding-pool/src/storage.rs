use soroban_sdk::{Address, Env};

use crate::types::{DataKey, Pool, Request};

/// Bump amount for persistent storage entries (roughly 30 days in ledgers).
const LEDGER_BUMP: u32 = 518_400;
/// Threshold for bumping (roughly 15 days).
const LEDGER_THRESHOLD: u32 = 259_200;

fn bump(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, LEDGER_THRESHOLD, LEDGER_BUMP);
}

// =============================================================================
// Token
// =============================================================================

pub fn get_token(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .expect("token not set")
}

pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::Token, token);
    env.storage()
        .instance()
        .extend_ttl(LEDGER_THRESHOLD, LEDGER_BUMP);
}

// =============================================================================
// Pools
// =============================================================================

pub fn get_pool_count(env: &Env) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::PoolCount)
        .unwrap_or(0)
}

pub fn set_pool_count(env: &Env, count: u32) {
    let key = DataKey::PoolCount;
    env.storage().persistent().set(&key, &count);
    bump(env, &key);
}

pub fn get_pool(env: &Env, pool_id: u32) -> Option<Pool> {
    env.storage().persistent().get(&DataKey::Pool(pool_id))
}

pub fn set_pool(env: &Env, pool_id: u32, pool: &Pool) {
    let key = DataKey::Pool(pool_id);
    env.storage().persistent().set(&key, pool);
    bump(env, &key);
}

// =============================================================================
// Contributors
// =============================================================================

pub fn is_contributor(env: &Env, pool_id: u32, account: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Contributor(pool_id, account.clone()))
}

pub fn add_contributor(env: &Env, pool_id: u32, account: &Address) {
    let key = DataKey::Contributor(pool_id, account.clone());
    env.storage().persistent().set(&key, &true);
    bump(env, &key);
}

// =============================================================================
// Requests and approvals
// =============================================================================

pub fn get_request(env: &Env, pool_id: u32, index: u32) -> Option<Request> {
    env.storage()
        .persistent()
        .get(&DataKey::Request(pool_id, index))
}

pub fn set_request(env: &Env, pool_id: u32, index: u32, request: &Request) {
    let key = DataKey::Request(pool_id, index);
    env.storage().persistent().set(&key, request);
    bump(env, &key);
}

pub fn has_approved(env: &Env, pool_id: u32, index: u32, account: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Approval(pool_id, index, account.clone()))
}

pub fn set_approved(env: &Env, pool_id: u32, index: u32, account: &Address) {
    let key = DataKey::Approval(pool_id, index, account.clone());
    env.storage().persistent().set(&key, &true);
    bump(env, &key);
}
