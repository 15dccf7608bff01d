// Factory storage module for Tidepool

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::error::FactoryError;
use crate::types::FactoryConfig;

// ============================================================
// STORAGE KEYS
// ============================================================

#[contracttype]
pub enum FactoryDataKey {
    Config,
    FeeAmountTickSpacing(u32),
    Pool(Address, Address, u32),
    PoolByIndex(u32),
    PoolCount,
}

// ============================================================
// TTL CONFIGURATION
// ============================================================

const PERSISTENT_LIFETIME: u32 = 6_307_200;
const PERSISTENT_BUMP: u32 = 6_307_200;

fn extend_ttl(env: &Env, key: &FactoryDataKey) {
    env.storage().persistent().extend_ttl(key, PERSISTENT_LIFETIME, PERSISTENT_BUMP);
}

// ============================================================
// FACTORY CONFIG
// ============================================================

pub fn is_initialized(env: &Env) -> bool {
    env.storage().persistent().has(&FactoryDataKey::Config)
}

pub fn write_config(env: &Env, config: &FactoryConfig) {
    env.storage().persistent().set(&FactoryDataKey::Config, config);
    extend_ttl(env, &FactoryDataKey::Config);
}

pub fn read_config(env: &Env) -> Result<FactoryConfig, FactoryError> {
    let config = env
        .storage()
        .persistent()
        .get(&FactoryDataKey::Config)
        .ok_or(FactoryError::NotInitialized)?;
    extend_ttl(env, &FactoryDataKey::Config);
    Ok(config)
}

// ============================================================
// FEE TIERS
// ============================================================

pub fn write_tick_spacing(env: &Env, fee: u32, tick_spacing: i32) {
    let key = FactoryDataKey::FeeAmountTickSpacing(fee);
    env.storage().persistent().set(&key, &tick_spacing);
    extend_ttl(env, &key);
}

pub fn read_tick_spacing(env: &Env, fee: u32) -> Option<i32> {
    env.storage()
        .persistent()
        .get(&FactoryDataKey::FeeAmountTickSpacing(fee))
}

// ============================================================
// POOL REGISTRY
// ============================================================

/// Orders a pair so that `token0 < token1`
pub fn sort_tokens(token_a: &Address, token_b: &Address) -> (Address, Address) {
    if token_a < token_b {
        (token_a.clone(), token_b.clone())
    } else {
        (token_b.clone(), token_a.clone())
    }
}

pub fn read_pool(env: &Env, token0: &Address, token1: &Address, fee: u32) -> Option<Address> {
    env.storage()
        .persistent()
        .get(&FactoryDataKey::Pool(token0.clone(), token1.clone(), fee))
}

pub fn pool_exists(env: &Env, token0: &Address, token1: &Address, fee: u32) -> bool {
    env.storage()
        .persistent()
        .has(&FactoryDataKey::Pool(token0.clone(), token1.clone(), fee))
}

pub fn read_pool_count(env: &Env) -> u32 {
    env.storage()
        .persistent()
        .get(&FactoryDataKey::PoolCount)
        .unwrap_or(0)
}

/// Records a deployed pool under its sorted pair key and appends it to the index
pub fn register_pool(env: &Env, token0: &Address, token1: &Address, fee: u32, pool: &Address) {
    let key = FactoryDataKey::Pool(token0.clone(), token1.clone(), fee);
    env.storage().persistent().set(&key, pool);
    extend_ttl(env, &key);

    let index = read_pool_count(env);
    let index_key = FactoryDataKey::PoolByIndex(index);
    env.storage().persistent().set(&index_key, pool);
    extend_ttl(env, &index_key);

    env.storage()
        .persistent()
        .set(&FactoryDataKey::PoolCount, &(index + 1));
    extend_ttl(env, &FactoryDataKey::PoolCount);
}

pub fn read_all_pools(env: &Env) -> Vec<Address> {
    let mut pools = Vec::new(env);
    for index in 0..read_pool_count(env) {
        if let Some(pool) = env
            .storage()
            .persistent()
            .get(&FactoryDataKey::PoolByIndex(index))
        {
            pools.push_back(pool);
        }
    }
    pools
}
