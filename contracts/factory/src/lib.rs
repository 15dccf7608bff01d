#![no_std]

//! # Tidepool Factory
//!
//! Registry and deployer for concentrated-liquidity pools.
//!
//! ## Responsibilities:
//! 1. Fee tier table (fee → tick spacing)
//! 2. Deterministic pool deployment, one pool per (pair, fee)
//! 3. Ownership; deployed pools defer their admin checks to `owner()`

use soroban_sdk::{
    contract, contractimpl, log, xdr::ToXdr, Address, Bytes, BytesN, Env, Vec,
};

mod error;
mod events;
mod storage;
mod types;

pub use error::FactoryError;
use events::*;
use storage::*;
pub use types::*;

// ============================================================
// CONTRACT
// ============================================================

#[contract]
pub struct PoolFactory;

#[contractimpl]
impl PoolFactory {
    // ========================================================
    // WRITE FUNCTIONS
    // ========================================================

    /// Initialize factory and enable the default fee tiers
    pub fn initialize(
        env: Env,
        owner: Address,
        pool_wasm_hash: BytesN<32>,
    ) -> Result<(), FactoryError> {
        owner.require_auth();

        if is_initialized(&env) {
            return Err(FactoryError::AlreadyInitialized);
        }

        write_config(
            &env,
            &FactoryConfig {
                owner: owner.clone(),
                pool_wasm_hash,
            },
        );
        emit_owner_changed(&env, None, &owner);

        for (fee, tick_spacing) in DEFAULT_FEE_TIERS {
            write_tick_spacing(&env, fee, tick_spacing);
            emit_fee_amount_enabled(&env, fee, tick_spacing);
        }

        Ok(())
    }

    /// Deploy a pool for a token pair and an enabled fee tier
    ///
    /// The pool address depends only on this factory, the sorted pair and the fee,
    /// so it can be computed ahead of time with `compute_pool_address`.
    pub fn create_pool(
        env: Env,
        token_a: Address,
        token_b: Address,
        fee: u32,
    ) -> Result<Address, FactoryError> {
        let config = read_config(&env)?;

        if token_a == token_b {
            return Err(FactoryError::IdenticalTokens);
        }

        let (token0, token1) = sort_tokens(&token_a, &token_b);

        let tick_spacing = read_tick_spacing(&env, fee).ok_or(FactoryError::FeeNotEnabled)?;

        if pool_exists(&env, &token0, &token1, fee) {
            return Err(FactoryError::PoolAlreadyExists);
        }

        let salt = pool_salt(&env, &token0, &token1, fee);
        let pool = env.deployer().with_current_contract(salt).deploy_v2(
            config.pool_wasm_hash,
            (
                env.current_contract_address(),
                token0.clone(),
                token1.clone(),
                fee,
                tick_spacing,
            ),
        );

        register_pool(&env, &token0, &token1, fee, &pool);
        emit_pool_created(&env, &token0, &token1, fee, tick_spacing, &pool);

        Ok(pool)
    }

    /// Transfer ownership; the current owner must authorize
    pub fn set_owner(env: Env, new_owner: Address) -> Result<(), FactoryError> {
        let mut config = read_config(&env)?;
        config.owner.require_auth();

        emit_owner_changed(&env, Some(config.owner.clone()), &new_owner);

        config.owner = new_owner;
        write_config(&env, &config);
        Ok(())
    }

    /// Enable a new fee tier. Tiers can never be changed or removed once enabled.
    pub fn enable_fee_amount(env: Env, fee: u32, tick_spacing: i32) -> Result<(), FactoryError> {
        let config = read_config(&env)?;
        config.owner.require_auth();

        if fee >= FEE_DENOMINATOR {
            return Err(FactoryError::InvalidFee);
        }
        if tick_spacing <= 0 || tick_spacing >= MAX_TICK_SPACING {
            return Err(FactoryError::InvalidTickSpacing);
        }
        if read_tick_spacing(&env, fee).is_some() {
            log!(&env, "fee tier already enabled", fee);
            return Err(FactoryError::FeeAlreadyEnabled);
        }

        write_tick_spacing(&env, fee, tick_spacing);
        emit_fee_amount_enabled(&env, fee, tick_spacing);
        Ok(())
    }

    // ========================================================
    // READ FUNCTIONS
    // ========================================================

    pub fn owner(env: Env) -> Result<Address, FactoryError> {
        Ok(read_config(&env)?.owner)
    }

    pub fn pool_wasm_hash(env: Env) -> Result<BytesN<32>, FactoryError> {
        Ok(read_config(&env)?.pool_wasm_hash)
    }

    /// Tick spacing of an enabled fee tier
    pub fn fee_amount_tick_spacing(env: Env, fee: u32) -> Option<i32> {
        read_tick_spacing(&env, fee)
    }

    /// Pool address by token pair and fee, in either token order
    pub fn get_pool(env: Env, token_a: Address, token_b: Address, fee: u32) -> Option<Address> {
        let (token0, token1) = sort_tokens(&token_a, &token_b);
        read_pool(&env, &token0, &token1, fee)
    }

    /// Address `create_pool` deploys (or deployed) the pool for this pair and fee to
    pub fn compute_pool_address(
        env: Env,
        token_a: Address,
        token_b: Address,
        fee: u32,
    ) -> Address {
        let (token0, token1) = sort_tokens(&token_a, &token_b);
        let salt = pool_salt(&env, &token0, &token1, fee);
        env.deployer().with_current_contract(salt).deployed_address()
    }

    /// All deployed pools in creation order
    pub fn all_pools(env: Env) -> Vec<Address> {
        read_all_pools(&env)
    }

    pub fn pool_count(env: Env) -> u32 {
        read_pool_count(&env)
    }
}

/// sha256(token0 ‖ token1 ‖ fee) over their XDR encodings
fn pool_salt(env: &Env, token0: &Address, token1: &Address, fee: u32) -> BytesN<32> {
    let mut salt_data = Bytes::new(env);
    salt_data.append(&token0.clone().to_xdr(env));
    salt_data.append(&token1.clone().to_xdr(env));
    salt_data.append(&fee.to_xdr(env));
    env.crypto().sha256(&salt_data).into()
}
