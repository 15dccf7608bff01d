mod common;

use common::PayMode;
use soroban_sdk::{testutils::Address as _, Address, Bytes, Env, U256};
use tidepool_pool::types::from_sdk_u256;
use tidepool_pool::PoolError;

fn swap(
    env: &Env,
    fx: &common::PoolFixture,
    recipient: &Address,
    zero_for_one: bool,
    amount_specified: i128,
    limit: &U256,
) -> (i128, i128) {
    fx.pool.swap(
        &fx.callee.address,
        recipient,
        &zero_for_one,
        &amount_specified,
        limit,
        &Bytes::new(env),
    )
}

/// Wide range plus a narrower one over [-60, 60], so upward swaps leave the inner range at 60
fn setup_with_inner_range(env: &Env) -> common::PoolFixture<'_> {
    let fx = common::setup_pool_with_liquidity(env);
    fx.pool.mint(&fx.callee.address, &fx.lp, &-60, &60, &500_000, &Bytes::new(env));
    assert_eq!(fx.pool.liquidity(), 1_500_000);
    fx
}

// ============================================================
// EXACT INPUT
// ============================================================

#[test]
fn test_swap_exact_input_within_range() {
    let env = Env::default();
    env.mock_all_auths();

    let fx = common::setup_pool_with_liquidity(&env);
    let trader = Address::generate(&env);

    let result = swap(&env, &fx, &trader, true, 1_000, &common::min_price_limit(&env));

    assert_eq!(result, (1_000, -996));
    assert_eq!(common::balance(&env, &fx.token1, &trader), 996);
    assert_eq!(common::balance(&env, &fx.token0, &fx.pool.address), 30_554);
    assert_eq!(common::balance(&env, &fx.token1, &fx.pool.address), 28_558);

    let slot0 = fx.pool.slot0();
    assert_eq!(slot0.tick, -20);
    assert_eq!(
        slot0.sqrt_price_x96,
        U256::from_u128(&env, 79149250711305166342700278159)
    );
    // Stayed inside the minted range
    assert_eq!(fx.pool.liquidity(), 1_000_000);
    assert_eq!(
        fx.pool.fee_growth_global_0_x128(),
        U256::from_u128(&env, 1020847100762815390390123822295304)
    );
    assert_eq!(fx.pool.fee_growth_global_1_x128(), U256::from_u32(&env, 0));
}

#[test]
fn test_swap_then_burn_and_collect_everything() {
    let env = Env::default();
    env.mock_all_auths();

    let fx = common::setup_pool_with_liquidity(&env);
    let trader = Address::generate(&env);
    swap(&env, &fx, &trader, true, 1_000, &common::min_price_limit(&env));

    let burned = fx.pool.burn(&fx.lp, &-600, &600, &1_000_000);
    assert_eq!(burned, (30_550, 28_557));

    // Burned principal plus the fee share of the swap input
    let position = fx.pool.positions(&fx.lp, &-600, &600);
    assert_eq!(position.tokens_owed_0, 30_552);
    assert_eq!(position.tokens_owed_1, 28_557);

    let collected = fx.pool.collect(&fx.lp, &fx.lp, &-600, &600, &u128::MAX, &u128::MAX);
    assert_eq!(collected, (30_552, 28_557));

    // Supplied 29,554 + sold 1,000 of token0; the pool never pays out more than it holds
    assert_eq!(common::balance(&env, &fx.token0, &fx.pool.address), 2);
    assert_eq!(common::balance(&env, &fx.token1, &fx.pool.address), 1);
}

#[test]
fn test_swap_fees_accrue_on_poke() {
    let env = Env::default();
    env.mock_all_auths();

    let fx = common::setup_pool_with_liquidity(&env);
    let trader = Address::generate(&env);
    swap(&env, &fx, &trader, true, 1_000, &common::min_price_limit(&env));

    assert_eq!(fx.pool.burn(&fx.lp, &-600, &600, &0), (0, 0));

    let position = fx.pool.positions(&fx.lp, &-600, &600);
    assert_eq!(position.liquidity, 1_000_000);
    assert_eq!(position.tokens_owed_0, 2);
    assert_eq!(position.tokens_owed_1, 0);
    assert_eq!(
        position.fee_growth_inside_0_last_x128,
        fx.pool.fee_growth_global_0_x128()
    );
}

#[test]
fn test_swap_crossing_out_of_liquidity() {
    let env = Env::default();
    env.mock_all_auths();

    let fx = common::setup_pool_with_liquidity(&env);
    let trader = Address::generate(&env);

    let result = swap(&env, &fx, &trader, true, 100_000, &common::min_price_limit(&env));

    // Only part of the input could be used before the range ran dry
    assert_eq!(result, (30_545, -29_553));
    assert_eq!(fx.pool.liquidity(), 0);
    assert_eq!(fx.pool.slot0().sqrt_price_x96, common::min_price_limit(&env));

    // The crossed tick snapshots all fee growth as outside
    assert_eq!(
        fx.pool.ticks(&-600).fee_growth_outside_0_x128,
        fx.pool.fee_growth_global_0_x128()
    );
}

#[test]
fn test_swap_stops_at_price_limit() {
    let env = Env::default();
    env.mock_all_auths();

    let fx = common::setup_pool_with_liquidity(&env);
    let trader = Address::generate(&env);
    let limit = common::sqrt_price_at(&env, -60);

    let result = swap(&env, &fx, &trader, true, 10_000, &limit);

    assert_eq!(result, (3_015, -2_995));
    let slot0 = fx.pool.slot0();
    assert_eq!(slot0.sqrt_price_x96, limit);
    assert_eq!(slot0.tick, -60);
}

#[test]
fn test_swap_price_moves_monotonically() {
    let env = Env::default();
    env.mock_all_auths();

    let fx = common::setup_pool_with_liquidity(&env);
    let trader = Address::generate(&env);
    let mut last = from_sdk_u256(&fx.pool.slot0().sqrt_price_x96);

    for _ in 0..5 {
        swap(&env, &fx, &trader, true, 2_000, &common::min_price_limit(&env));
        let price = from_sdk_u256(&fx.pool.slot0().sqrt_price_x96);
        assert!(price < last);
        last = price;
    }

    for _ in 0..5 {
        swap(&env, &fx, &trader, false, 2_000, &common::max_price_limit(&env));
        let price = from_sdk_u256(&fx.pool.slot0().sqrt_price_x96);
        assert!(price > last);
        last = price;
    }
}

#[test]
fn test_swap_crosses_upward_then_back_down() {
    let env = Env::default();
    env.mock_all_auths();

    let fx = setup_with_inner_range(&env);
    let trader = Address::generate(&env);

    let up = swap(&env, &fx, &trader, false, 10_000, &common::max_price_limit(&env));

    assert_eq!(up, (-9_892, 10_000));
    assert_eq!(fx.pool.slot0().tick, 168);
    assert_eq!(fx.pool.liquidity(), 1_000_000);
    assert_eq!(
        fx.pool.fee_growth_global_1_x128(),
        U256::from_u128(&env, 8960768995584712871202197995703228)
    );
    let upper = fx.pool.ticks(&60);
    assert_eq!(upper.fee_growth_outside_0_x128, U256::from_u32(&env, 0));
    assert_eq!(
        upper.fee_growth_outside_1_x128,
        U256::from_u128(&env, 3175968757928758992324829669363169)
    );

    let down = swap(&env, &fx, &trader, true, 20_000, &common::min_price_limit(&env));

    assert_eq!(down, (20_000, -19_934));
    assert_eq!(fx.pool.slot0().tick, -171);
    assert_eq!(fx.pool.liquidity(), 1_000_000);
    assert_eq!(
        fx.pool.fee_growth_global_0_x128(),
        U256::from_u128(&env, 17921537991169425742404395991406457)
    );

    let upper = fx.pool.ticks(&60);
    assert_eq!(
        upper.fee_growth_outside_0_x128,
        U256::from_u128(&env, 5784800237655953878877368326340059)
    );
    assert_eq!(
        upper.fee_growth_outside_1_x128,
        U256::from_u128(&env, 5784800237655953878877368326340059)
    );
    let lower = fx.pool.ticks(&-60);
    assert_eq!(
        lower.fee_growth_outside_0_x128,
        U256::from_u128(&env, 12136737753513471863527027665066398)
    );
    assert_eq!(lower.fee_growth_outside_1_x128, fx.pool.fee_growth_global_1_x128());

    // Both ranges supplied 29,554 + 1,498 of each token
    assert_eq!(common::balance(&env, &fx.token0, &fx.pool.address), 31_052 - 9_892 + 20_000);
    assert_eq!(common::balance(&env, &fx.token1, &fx.pool.address), 31_052 + 10_000 - 19_934);
}

#[test]
fn test_swap_upward_limit_on_initialized_tick() {
    let env = Env::default();
    env.mock_all_auths();

    let fx = setup_with_inner_range(&env);
    let trader = Address::generate(&env);
    let limit = common::sqrt_price_at(&env, 60);

    let result = swap(&env, &fx, &trader, false, 10_000, &limit);

    assert_eq!(result, (-4_493, 4_521));
    let slot0 = fx.pool.slot0();
    assert_eq!(slot0.sqrt_price_x96, limit);
    assert_eq!(slot0.tick, 60);
    // Sitting on the upper tick means the inner range is no longer active
    assert_eq!(fx.pool.liquidity(), 1_000_000);
}

// ============================================================
// EXACT OUTPUT
// ============================================================

#[test]
fn test_swap_exact_output() {
    let env = Env::default();
    env.mock_all_auths();

    let fx = common::setup_pool_with_liquidity(&env);
    let trader = Address::generate(&env);

    let result = swap(&env, &fx, &trader, true, -1_000, &common::min_price_limit(&env));

    assert_eq!(result, (1_006, -1_000));
    assert_eq!(common::balance(&env, &fx.token1, &trader), 1_000);
    assert_eq!(fx.pool.slot0().tick, -21);
}

#[test]
fn test_swap_exact_output_upward_across_tick() {
    let env = Env::default();
    env.mock_all_auths();

    let fx = setup_with_inner_range(&env);
    let trader = Address::generate(&env);

    let result = swap(&env, &fx, &trader, false, -10_000, &common::max_price_limit(&env));

    assert_eq!(result, (-10_000, 10_109));
    assert_eq!(common::balance(&env, &fx.token0, &trader), 10_000);
    assert_eq!(fx.pool.slot0().tick, 170);
    assert_eq!(fx.pool.liquidity(), 1_000_000);
}

// ============================================================
// PROTOCOL FEE
// ============================================================

#[test]
fn test_swap_with_protocol_fee() {
    let env = Env::default();
    env.mock_all_auths();

    let fx = common::setup_pool_with_liquidity(&env);
    fx.pool.set_fee_protocol(&4, &4);
    let trader = Address::generate(&env);

    let result = swap(&env, &fx, &trader, false, 10_000, &common::max_price_limit(&env));

    assert_eq!(result, (-9_871, 10_000));
    assert_eq!(fx.pool.slot0().tick, 198);

    let protocol_fees = fx.pool.protocol_fees();
    assert_eq!(protocol_fees.token0, 0);
    assert_eq!(protocol_fees.token1, 7);
    assert_eq!(
        fx.pool.fee_growth_global_1_x128(),
        U256::from_u128(&env, 7826494439181584659657615970930668)
    );

    let collected = fx.pool.collect_protocol(&fx.owner, &u128::MAX, &u128::MAX);
    assert_eq!(collected, (0, 7));
    assert_eq!(common::balance(&env, &fx.token1, &fx.owner), 7);
    assert_eq!(fx.pool.protocol_fees().token1, 0);
}

// ============================================================
// VALIDATION & SETTLEMENT
// ============================================================

#[test]
fn test_swap_rejects_zero_amount() {
    let env = Env::default();
    env.mock_all_auths();

    let fx = common::setup_pool_with_liquidity(&env);

    assert_eq!(
        fx.pool.try_swap(
            &fx.callee.address,
            &fx.lp,
            &true,
            &0,
            &common::min_price_limit(&env),
            &Bytes::new(&env),
        ),
        Err(Ok(PoolError::ZeroAmount))
    );
}

#[test]
fn test_swap_rejects_limit_on_wrong_side() {
    let env = Env::default();
    env.mock_all_auths();

    let fx = common::setup_pool_with_liquidity(&env);
    let data = Bytes::new(&env);

    assert_eq!(
        fx.pool.try_swap(
            &fx.callee.address,
            &fx.lp,
            &true,
            &1_000,
            &common::sqrt_price_at(&env, 60),
            &data,
        ),
        Err(Ok(PoolError::InvalidPriceLimit))
    );
    assert_eq!(
        fx.pool.try_swap(
            &fx.callee.address,
            &fx.lp,
            &false,
            &1_000,
            &common::sqrt_price_at(&env, -60),
            &data,
        ),
        Err(Ok(PoolError::InvalidPriceLimit))
    );
}

#[test]
fn test_swap_underpaid_input() {
    let env = Env::default();
    env.mock_all_auths();

    let fx = common::setup_pool_with_liquidity(&env);
    let trader = Address::generate(&env);
    fx.callee.set_mode(&PayMode::Short);

    assert_eq!(
        fx.pool.try_swap(
            &fx.callee.address,
            &trader,
            &true,
            &1_000,
            &common::min_price_limit(&env),
            &Bytes::new(&env),
        ),
        Err(Ok(PoolError::InsufficientInput))
    );

    // The output transfer and the price move were both rolled back
    assert_eq!(common::balance(&env, &fx.token1, &trader), 0);
    assert_eq!(fx.pool.slot0().tick, 0);
}
