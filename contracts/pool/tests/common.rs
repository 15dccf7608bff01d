#![allow(dead_code)]

use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short,
    testutils::{Address as _, Ledger},
    token, Address, Bytes, Env, U256,
};
use tidepool_pool::types::to_sdk_u256;
use tidepool_pool::{ClmmPool, ClmmPoolClient};

// Test constants
pub const FEE: u32 = 3000; // 0.30%
pub const TICK_SPACING: i32 = 60;
pub const START_TIME: u64 = 1_000;
pub const CALLEE_FUNDS: i128 = 1_000_000_000;

// ============================================================
// MOCK REGISTRY
// ============================================================

mod mock_registry {
    use super::*;

    /// Stands in for the factory: only answers `owner()`
    #[contract]
    pub struct MockRegistry;

    #[contractimpl]
    impl MockRegistry {
        pub fn __constructor(env: Env, owner: Address) {
            env.storage().instance().set(&symbol_short!("owner"), &owner);
        }

        pub fn owner(env: Env) -> Address {
            env.storage()
                .instance()
                .get(&symbol_short!("owner"))
                .unwrap()
        }
    }
}
pub use mock_registry::MockRegistry;

// ============================================================
// TEST CALLEE
// ============================================================

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum PayMode {
    /// Pay exactly what is owed
    Full = 0,
    /// Pay one unit less than owed
    Short = 1,
    /// Pay nothing
    Skip = 2,
    /// Pay in full, then call back into the pool
    Reenter = 3,
}

#[contracttype]
#[derive(Clone)]
enum CalleeKey {
    Pool,
    Token0,
    Token1,
    Mode,
    Loan,
    NestedFailed,
}

/// Pays the pool from its own balance when called back
#[contract]
pub struct TestCallee;

#[contractimpl]
impl TestCallee {
    pub fn __constructor(env: Env, pool: Address, token0: Address, token1: Address) {
        let storage = env.storage().instance();
        storage.set(&CalleeKey::Pool, &pool);
        storage.set(&CalleeKey::Token0, &token0);
        storage.set(&CalleeKey::Token1, &token1);
        storage.set(&CalleeKey::Mode, &PayMode::Full);
        storage.set(&CalleeKey::Loan, &(0i128, 0i128));
        storage.set(&CalleeKey::NestedFailed, &false);
    }

    pub fn set_mode(env: Env, mode: PayMode) {
        env.storage().instance().set(&CalleeKey::Mode, &mode);
    }

    /// Principal to return on the next flash
    pub fn set_loan(env: Env, amount0: i128, amount1: i128) {
        env.storage().instance().set(&CalleeKey::Loan, &(amount0, amount1));
    }

    /// Whether the last nested call made in `Reenter` mode was rejected
    pub fn nested_call_failed(env: Env) -> bool {
        env.storage()
            .instance()
            .get(&CalleeKey::NestedFailed)
            .unwrap()
    }

    pub fn mint_callback(env: Env, amount0_owed: i128, amount1_owed: i128, _data: Bytes) {
        pay(&env, amount0_owed, amount1_owed);
    }

    pub fn swap_callback(env: Env, amount0_delta: i128, amount1_delta: i128, _data: Bytes) {
        pay(&env, amount0_delta.max(0), amount1_delta.max(0));
    }

    pub fn flash_callback(env: Env, fee0: i128, fee1: i128, _data: Bytes) {
        let (loan0, loan1): (i128, i128) =
            env.storage().instance().get(&CalleeKey::Loan).unwrap();
        pay(&env, loan0 + fee0, loan1 + fee1);
    }
}

fn pay(env: &Env, amount0: i128, amount1: i128) {
    let storage = env.storage().instance();
    let pool: Address = storage.get(&CalleeKey::Pool).unwrap();
    let mode: PayMode = storage.get(&CalleeKey::Mode).unwrap();

    for (key, owed) in [(CalleeKey::Token0, amount0), (CalleeKey::Token1, amount1)] {
        let amount = match mode {
            PayMode::Full | PayMode::Reenter => owed,
            PayMode::Short => owed - 1,
            PayMode::Skip => 0,
        };
        if amount > 0 {
            let token: Address = storage.get(&key).unwrap();
            token::Client::new(env, &token).transfer(&env.current_contract_address(), &pool, &amount);
        }
    }

    if mode == PayMode::Reenter {
        let me = env.current_contract_address();
        let nested = ClmmPoolClient::new(env, &pool).try_collect(&me, &me, &-600, &600, &0, &0);
        storage.set(&CalleeKey::NestedFailed, &nested.is_err());
    }
}

// ============================================================
// FIXTURE
// ============================================================

pub struct PoolFixture<'a> {
    pub pool: ClmmPoolClient<'a>,
    pub callee: TestCalleeClient<'a>,
    pub token0: Address,
    pub token1: Address,
    /// Registry owner, the only address allowed to run admin calls
    pub owner: Address,
    /// Position owner used by the liquidity tests
    pub lp: Address,
}

/// Deploy a pool (fee 3000, spacing 60) with a funded callee. The price is not set yet.
pub fn setup_pool(env: &Env) -> PoolFixture<'_> {
    env.ledger().set_timestamp(START_TIME);

    let admin = Address::generate(env);
    let owner = Address::generate(env);
    let token0 = create_token(env, &admin);
    let token1 = create_token(env, &admin);

    let registry = env.register(MockRegistry, (owner.clone(),));
    let pool_id = env.register(
        ClmmPool,
        (registry, token0.clone(), token1.clone(), FEE, TICK_SPACING),
    );
    let callee_id = env.register(TestCallee, (pool_id.clone(), token0.clone(), token1.clone()));

    mint_tokens(env, &token0, &callee_id, CALLEE_FUNDS);
    mint_tokens(env, &token1, &callee_id, CALLEE_FUNDS);

    PoolFixture {
        pool: ClmmPoolClient::new(env, &pool_id),
        callee: TestCalleeClient::new(env, &callee_id),
        token0,
        token1,
        owner,
        lp: Address::generate(env),
    }
}

/// Pool initialized at price 1.0 (tick 0)
pub fn setup_initialized_pool(env: &Env) -> PoolFixture<'_> {
    let fx = setup_pool(env);
    fx.pool.initialize(&q96(env));
    fx
}

/// Initialized pool with 1,000,000 liquidity over [-600, 600] owned by `lp`
pub fn setup_pool_with_liquidity(env: &Env) -> PoolFixture<'_> {
    let fx = setup_initialized_pool(env);
    fx.pool.mint(
        &fx.callee.address,
        &fx.lp,
        &-600,
        &600,
        &1_000_000,
        &Bytes::new(env),
    );
    fx
}

// ============================================================
// HELPERS
// ============================================================

/// Create a test token
pub fn create_token(env: &Env, admin: &Address) -> Address {
    let token_id = env.register_stellar_asset_contract_v2(admin.clone());
    token_id.address()
}

/// Mint tokens to an address
pub fn mint_tokens(env: &Env, token: &Address, to: &Address, amount: i128) {
    use soroban_sdk::token::StellarAssetClient;
    let client = StellarAssetClient::new(env, token);
    client.mint(to, &amount);
}

pub fn balance(env: &Env, token: &Address, owner: &Address) -> i128 {
    token::Client::new(env, token).balance(owner)
}

pub fn advance_time(env: &Env, seconds: u64) {
    let now = env.ledger().timestamp();
    env.ledger().set_timestamp(now + seconds);
}

/// Sqrt price 1.0 in Q64.96
pub fn q96(env: &Env) -> U256 {
    U256::from_u128(env, 1u128 << 96)
}

pub fn sqrt_price_at(env: &Env, tick: i32) -> U256 {
    to_sdk_u256(env, tidepool_math::get_sqrt_ratio_at_tick(tick).unwrap())
}

/// Loosest limit for a token0 -> token1 swap
pub fn min_price_limit(env: &Env) -> U256 {
    to_sdk_u256(env, tidepool_math::MIN_SQRT_RATIO + ethnum::U256::ONE)
}

/// Loosest limit for a token1 -> token0 swap
pub fn max_price_limit(env: &Env) -> U256 {
    to_sdk_u256(env, tidepool_math::MAX_SQRT_RATIO - ethnum::U256::ONE)
}
