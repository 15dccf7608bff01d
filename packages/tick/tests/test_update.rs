mod common;

use common::MemoryTicks;
use tidepool_math::{MathError, U256};
use tidepool_tick::*;

const MAX_LIQUIDITY: u128 = 1_000_000;

fn globals(fee0: u128, fee1: u128) -> GlobalSnapshot {
    GlobalSnapshot {
        fee_growth_global_0_x128: U256::new(fee0),
        fee_growth_global_1_x128: U256::new(fee1),
        seconds_per_liquidity_cumulative_x128: U256::new(7),
        tick_cumulative: 42,
        time: 100,
    }
}

// ============================================================
// UPDATE
// ============================================================

#[test]
fn test_update_flips_on_first_and_last_reference() {
    let mut store = MemoryTicks::default();
    let g = globals(0, 0);

    assert!(update(&mut store, 0, 0, 10, &g, false, MAX_LIQUIDITY).unwrap());
    assert!(!update(&mut store, 0, 0, 5, &g, false, MAX_LIQUIDITY).unwrap());
    assert!(!update(&mut store, 0, 0, -5, &g, false, MAX_LIQUIDITY).unwrap());
    assert!(update(&mut store, 0, 0, -10, &g, false, MAX_LIQUIDITY).unwrap());
}

#[test]
fn test_update_net_liquidity_by_side() {
    let mut store = MemoryTicks::default();
    let g = globals(0, 0);

    update(&mut store, -60, 0, 100, &g, false, MAX_LIQUIDITY).unwrap();
    update(&mut store, 60, 0, 100, &g, true, MAX_LIQUIDITY).unwrap();
    update(&mut store, 60, 0, 50, &g, false, MAX_LIQUIDITY).unwrap();

    assert_eq!(store.read_tick(-60).liquidity_net, 100);
    assert_eq!(store.read_tick(60).liquidity_net, -50);
    assert_eq!(store.read_tick(60).liquidity_gross, 150);
}

#[test]
fn test_update_rejects_liquidity_above_cap() {
    let mut store = MemoryTicks::default();
    let g = globals(0, 0);

    update(&mut store, 0, 0, MAX_LIQUIDITY as i128 / 2, &g, false, MAX_LIQUIDITY).unwrap();
    let result = update(&mut store, 0, 0, MAX_LIQUIDITY as i128 / 2 + 1, &g, true, MAX_LIQUIDITY);
    assert_eq!(result, Err(TickError::LiquidityOverflow));
}

#[test]
fn test_update_rejects_removing_more_than_gross() {
    let mut store = MemoryTicks::default();
    let g = globals(0, 0);

    update(&mut store, 0, 0, 10, &g, false, MAX_LIQUIDITY).unwrap();
    let result = update(&mut store, 0, 0, -11, &g, false, MAX_LIQUIDITY);
    assert_eq!(result, Err(TickError::Math(MathError::LiquidityDelta)));
}

#[test]
fn test_update_snapshots_below_current_tick() {
    let mut store = MemoryTicks::default();
    let g = globals(11, 22);

    update(&mut store, 1, 1, 1, &g, false, MAX_LIQUIDITY).unwrap();
    let info = store.read_tick(1);
    assert_eq!(info.fee_growth_outside_0_x128, U256::new(11));
    assert_eq!(info.fee_growth_outside_1_x128, U256::new(22));
    assert_eq!(info.seconds_per_liquidity_outside_x128, U256::new(7));
    assert_eq!(info.tick_cumulative_outside, 42);
    assert_eq!(info.seconds_outside, 100);
    assert!(info.initialized);
}

#[test]
fn test_update_leaves_above_current_tick_zeroed() {
    let mut store = MemoryTicks::default();
    let g = globals(11, 22);

    update(&mut store, 2, 1, 1, &g, false, MAX_LIQUIDITY).unwrap();
    let info = store.read_tick(2);
    assert_eq!(info.fee_growth_outside_0_x128, U256::ZERO);
    assert_eq!(info.tick_cumulative_outside, 0);
    assert_eq!(info.seconds_outside, 0);
}

#[test]
fn test_update_does_not_resnapshot_initialized_tick() {
    let mut store = MemoryTicks::default();

    update(&mut store, 1, 1, 1, &globals(1, 2), false, MAX_LIQUIDITY).unwrap();
    update(&mut store, 1, 1, 1, &globals(6, 7), false, MAX_LIQUIDITY).unwrap();

    let info = store.read_tick(1);
    assert_eq!(info.fee_growth_outside_0_x128, U256::new(1));
    assert_eq!(info.fee_growth_outside_1_x128, U256::new(2));
}

// ============================================================
// CROSS / CLEAR
// ============================================================

#[test]
fn test_cross_flips_outside_accumulators() {
    let mut store = MemoryTicks::default();
    store.write_tick(
        2,
        &TickInfo {
            liquidity_gross: 3,
            liquidity_net: 4,
            fee_growth_outside_0_x128: U256::new(1),
            fee_growth_outside_1_x128: U256::new(2),
            tick_cumulative_outside: 6,
            seconds_per_liquidity_outside_x128: U256::new(5),
            seconds_outside: 7,
            initialized: true,
        },
    );

    let g = GlobalSnapshot {
        fee_growth_global_0_x128: U256::new(7),
        fee_growth_global_1_x128: U256::new(9),
        seconds_per_liquidity_cumulative_x128: U256::new(8),
        tick_cumulative: 15,
        time: 10,
    };

    assert_eq!(cross(&mut store, 2, &g), 4);

    let info = store.read_tick(2);
    assert_eq!(info.fee_growth_outside_0_x128, U256::new(6));
    assert_eq!(info.fee_growth_outside_1_x128, U256::new(7));
    assert_eq!(info.seconds_per_liquidity_outside_x128, U256::new(3));
    assert_eq!(info.tick_cumulative_outside, 9);
    assert_eq!(info.seconds_outside, 3);
}

#[test]
fn test_cross_twice_restores_snapshot() {
    let mut store = MemoryTicks::default();
    update(&mut store, 2, 3, 1, &globals(5, 6), false, MAX_LIQUIDITY).unwrap();
    let before = store.read_tick(2);

    let g = globals(100, 200);
    cross(&mut store, 2, &g);
    cross(&mut store, 2, &g);

    assert_eq!(store.read_tick(2), before);
}

#[test]
fn test_cross_wraps_seconds_per_liquidity_at_160_bits() {
    let mut store = MemoryTicks::default();
    let mut info = TickInfo::default();
    info.seconds_per_liquidity_outside_x128 = U256::new(2);
    store.write_tick(0, &info);

    let mut g = globals(0, 0);
    g.seconds_per_liquidity_cumulative_x128 = U256::ONE;
    cross(&mut store, 0, &g);

    let expected = (U256::ONE << 160u32) - U256::ONE;
    assert_eq!(store.read_tick(0).seconds_per_liquidity_outside_x128, expected);
}

#[test]
fn test_clear_removes_tick() {
    let mut store = MemoryTicks::default();
    update(&mut store, 2, 3, 1, &globals(5, 6), false, MAX_LIQUIDITY).unwrap();
    clear(&mut store, 2);
    assert_eq!(store.read_tick(2), TickInfo::default());
}

// ============================================================
// FEE GROWTH INSIDE
// ============================================================

#[test]
fn test_fee_growth_inside_uninitialized_bounds() {
    let store = MemoryTicks::default();
    let g0 = U256::new(15);
    let g1 = U256::new(15);

    assert_eq!(get_fee_growth_inside(&store, -2, 2, 0, g0, g1), (g0, g1));
    assert_eq!(
        get_fee_growth_inside(&store, -2, 2, 4, g0, g1),
        (U256::ZERO, U256::ZERO)
    );
    assert_eq!(
        get_fee_growth_inside(&store, -2, 2, -4, g0, g1),
        (U256::ZERO, U256::ZERO)
    );
}

#[test]
fn test_fee_growth_inside_subtracts_outside() {
    let mut store = MemoryTicks::default();
    let mut lower = TickInfo::default();
    lower.fee_growth_outside_0_x128 = U256::new(2);
    lower.fee_growth_outside_1_x128 = U256::new(3);
    let mut upper = TickInfo::default();
    upper.fee_growth_outside_0_x128 = U256::new(4);
    upper.fee_growth_outside_1_x128 = U256::new(1);
    store.write_tick(-2, &lower);
    store.write_tick(2, &upper);

    let (inside0, inside1) =
        get_fee_growth_inside(&store, -2, 2, 0, U256::new(15), U256::new(15));
    assert_eq!(inside0, U256::new(9));
    assert_eq!(inside1, U256::new(11));
}

#[test]
fn test_fee_growth_inside_wraps() {
    let mut store = MemoryTicks::default();
    let mut lower = TickInfo::default();
    lower.fee_growth_outside_0_x128 = U256::MAX - U256::new(3);
    store.write_tick(-2, &lower);

    let (inside0, _) = get_fee_growth_inside(&store, -2, 2, 0, U256::new(15), U256::ZERO);
    assert_eq!(inside0, U256::new(19));
}
