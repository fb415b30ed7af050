#![no_std]

//! Funding pools on Soroban: a registry of pools, each collecting token
//! contributions and paying out manager-proposed requests once a strict
//! majority of its contributors approved them.
//!
//! A failed invocation rolls back every storage write and token transfer it
//! made, so each call is all-or-nothing.

mod storage;
mod types;


use soroban_sdk::{contract, contractimpl, symbol_short, token, Address, Env, String, Vec};
pub use types::{Error, Pool, Request};

#[contract]
pub struct FundingPools;

#[contractimpl]
impl FundingPools {
    /// Initialize the contract with the token all pools are funded in.
    pub fn __constructor(env: Env, token: Address) {
        storage::set_token(&env, &token);
    }

    /// Create a pool managed by `caller`. Returns the new pool id.
    pub fn create_pool(env: Env, caller: Address, min_contribution: i128) -> Result<u32, Error> {
        caller.require_auth();
        if min_contribution < 0 {
            return Err(Error::InvalidAmount);
        }

        let pool_id = storage::get_pool_count(&env);
        let pool = Pool {
            manager: caller.clone(),
            min_contribution,
            balance: 0,
            contributor_count: 0,
            request_count: 0,
        };
        storage::set_pool(&env, pool_id, &pool);
        storage::set_pool_count(&env, pool_id + 1);

        env.events()
            .publish((symbol_short!("CREATED"), pool_id), (caller, min_contribution));

        Ok(pool_id)
    }

    /// Ids of every pool created, oldest first.
    pub fn list_pools(env: Env) -> Vec<u32> {
        let mut ids = Vec::new(&env);
        for pool_id in 0..storage::get_pool_count(&env) {
            ids.push_back(pool_id);
        }
        ids
    }

    /// Transfer `amount` of the pool token from `caller` into the pool.
    ///
    /// The first qualifying contribution makes `caller` a contributor.
    pub fn contribute(env: Env, pool_id: u32, caller: Address, amount: i128) -> Result<(), Error> {
        caller.require_auth();
        let mut pool = load_pool(&env, pool_id)?;
        if amount < pool.min_contribution {
            return Err(Error::InsufficientContribution);
        }
        pool.balance = pool
            .balance
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;

        token_client(&env).transfer(&caller, &env.current_contract_address(), &amount);

        if !storage::is_contributor(&env, pool_id, &caller) {
            storage::add_contributor(&env, pool_id, &caller);
            pool.contributor_count += 1;
        }
        storage::set_pool(&env, pool_id, &pool);

        env.events()
            .publish((symbol_short!("CONTRIB"), pool_id), (caller, amount));

        Ok(())
    }

    /// Propose paying `value` to `recipient`. Manager only.
    pub fn create_request(
        env: Env,
        pool_id: u32,
        caller: Address,
        description: String,
        value: i128,
        recipient: Address,
    ) -> Result<u32, Error> {
        caller.require_auth();
        let mut pool = load_pool(&env, pool_id)?;
        if caller != pool.manager {
            return Err(Error::Unauthorized);
        }
        if value < 0 {
            return Err(Error::InvalidAmount);
        }

        let index = pool.request_count;
        let request = Request {
            description,
            value,
            recipient: recipient.clone(),
            complete: false,
            approval_count: 0,
        };
        storage::set_request(&env, pool_id, index, &request);
        pool.request_count += 1;
        storage::set_pool(&env, pool_id, &pool);

        env.events()
            .publish((symbol_short!("REQUEST"), pool_id, index), (recipient, value));

        Ok(index)
    }

    /// Approve a request. Contributors only, once per request.
    pub fn approve_request(env: Env, pool_id: u32, index: u32, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        load_pool(&env, pool_id)?;
        let mut request = storage::get_request(&env, pool_id, index).ok_or(Error::NotFound)?;
        if !storage::is_contributor(&env, pool_id, &caller) {
            return Err(Error::Unauthorized);
        }
        if storage::has_approved(&env, pool_id, index, &caller) {
            return Err(Error::AlreadyVoted);
        }

        storage::set_approved(&env, pool_id, index, &caller);
        request.approval_count += 1;
        storage::set_request(&env, pool_id, index, &request);

        env.events().publish(
            (symbol_short!("APPROVE"), pool_id, index),
            (caller, request.approval_count),
        );

        Ok(())
    }

    /// Pay out a request approved by more than half of the current
    /// contributors. Manager only.
    pub fn finalize_request(env: Env, pool_id: u32, index: u32, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        let mut pool = load_pool(&env, pool_id)?;
        if caller != pool.manager {
            return Err(Error::Unauthorized);
        }
        let mut request = storage::get_request(&env, pool_id, index).ok_or(Error::NotFound)?;
        if request.approval_count <= pool.contributor_count / 2 {
            return Err(Error::InsufficientApprovals);
        }
        if request.complete {
            return Err(Error::AlreadyFinalized);
        }
        if request.value > pool.balance {
            return Err(Error::InsufficientFunds);
        }

        // State first, transfer last.
        request.complete = true;
        pool.balance -= request.value;
        storage::set_request(&env, pool_id, index, &request);
        storage::set_pool(&env, pool_id, &pool);

        token_client(&env).transfer(
            &env.current_contract_address(),
            &request.recipient,
            &request.value,
        );

        env.events().publish(
            (symbol_short!("FINALIZE"), pool_id, index),
            (request.recipient, request.value),
        );

        Ok(())
    }

    pub fn get_summary(env: Env, pool_id: u32) -> Result<Pool, Error> {
        load_pool(&env, pool_id)
    }

    pub fn get_request_count(env: Env, pool_id: u32) -> Result<u32, Error> {
        Ok(load_pool(&env, pool_id)?.request_count)
    }

    pub fn get_request(env: Env, pool_id: u32, index: u32) -> Result<Request, Error> {
        load_pool(&env, pool_id)?;
        storage::get_request(&env, pool_id, index).ok_or(Error::NotFound)
    }

    pub fn is_contributor(env: Env, pool_id: u32, account: Address) -> Result<bool, Error> {
        load_pool(&env, pool_id)?;
        Ok(storage::is_contributor(&env, pool_id, &account))
    }

    pub fn has_approved(env: Env, pool_id: u32, index: u32, account: Address) -> Result<bool, Error> {
        load_pool(&env, pool_id)?;
        if storage::get_request(&env, pool_id, index).is_none() {
            return Err(Error::NotFound);
        }
        Ok(storage::has_approved(&env, pool_id, index, &account))
    }
}

fn load_pool(env: &Env, pool_id: u32) -> Result<Pool, Error> {
    storage::get_pool(env, pool_id).ok_or(Error::PoolNotFound)
}

fn token_client(env: &Env) -> token::Client<'_> {
    token::Client::new(env, &storage::get_token(env))
}
