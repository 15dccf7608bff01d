//! Factory events

use soroban_sdk::{Address, Env, Symbol};

/// Emitted on initialization and on every ownership transfer
pub fn emit_owner_changed(env: &Env, old_owner: Option<Address>, new_owner: &Address) {
    env.events().publish(
        (Symbol::new(env, "OwnerChanged"),),
        (old_owner, new_owner.clone()),
    );
}

/// Emitted when a fee tier is enabled
pub fn emit_fee_amount_enabled(env: &Env, fee: u32, tick_spacing: i32) {
    env.events().publish(
        (Symbol::new(env, "FeeAmountEnabled"), fee),
        (tick_spacing,),
    );
}

/// Emitted when a new pool is created
pub fn emit_pool_created(
    env: &Env,
    token0: &Address,
    token1: &Address,
    fee: u32,
    tick_spacing: i32,
    pool: &Address,
) {
    env.events().publish(
        (Symbol::new(env, "PoolCreated"), token0.clone(), token1.clone()),
        (fee, tick_spacing, pool.clone()),
    );
}
