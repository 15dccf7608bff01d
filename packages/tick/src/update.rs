// Tick Update and Crossing Logic

use ethnum::U256;
use tidepool_math::{add_delta, MAX_U160};
use crate::error::TickError;
use crate::types::{GlobalSnapshot, TickInfo};

/// Storage seam for the tick ledger and its bitmap.
///
/// Missing ticks read as `TickInfo::default()` and missing words as zero.
pub trait TickStorage {
    fn read_tick(&self, tick: i32) -> TickInfo;
    fn write_tick(&mut self, tick: i32, info: &TickInfo);
    fn remove_tick(&mut self, tick: i32);
    fn read_tick_word(&self, word_pos: i16) -> U256;
    fn write_tick_word(&mut self, word_pos: i16, word: U256);
}

/// Update a tick when liquidity is added or removed.
///
/// Returns true when the tick flipped between initialized and uninitialized, in which
/// case the caller must flip its bit in the bitmap.
pub fn update<S: TickStorage>(
    store: &mut S,
    tick: i32,
    tick_current: i32,
    liquidity_delta: i128,
    globals: &GlobalSnapshot,
    upper: bool,
    max_liquidity: u128,
) -> Result<bool, TickError> {
    let mut info = store.read_tick(tick);

    let liquidity_gross_before = info.liquidity_gross;
    let liquidity_gross_after = add_delta(liquidity_gross_before, liquidity_delta)?;

    if liquidity_gross_after > max_liquidity {
        return Err(TickError::LiquidityOverflow);
    }

    let flipped = (liquidity_gross_after == 0) != (liquidity_gross_before == 0);

    if liquidity_gross_before == 0 {
        // All growth before initialization is assumed to have happened below the tick
        if tick <= tick_current {
            info.fee_growth_outside_0_x128 = globals.fee_growth_global_0_x128;
            info.fee_growth_outside_1_x128 = globals.fee_growth_global_1_x128;
            info.seconds_per_liquidity_outside_x128 = globals.seconds_per_liquidity_cumulative_x128;
            info.tick_cumulative_outside = globals.tick_cumulative;
            info.seconds_outside = globals.time;
        }
        info.initialized = true;
    }

    info.liquidity_gross = liquidity_gross_after;

    info.liquidity_net = if upper {
        info.liquidity_net.checked_sub(liquidity_delta)
    } else {
        info.liquidity_net.checked_add(liquidity_delta)
    }
    .ok_or(TickError::LiquidityNetOverflow)?;

    store.write_tick(tick, &info);

    Ok(flipped)
}

/// Cross a tick boundary during a swap.
///
/// Every "outside" accumulator is re-expressed relative to the other side of the tick.
/// Returns the net liquidity to add when moving left-to-right.
pub fn cross<S: TickStorage>(store: &mut S, tick: i32, globals: &GlobalSnapshot) -> i128 {
    let mut info = store.read_tick(tick);

    info.fee_growth_outside_0_x128 = globals
        .fee_growth_global_0_x128
        .wrapping_sub(info.fee_growth_outside_0_x128);
    info.fee_growth_outside_1_x128 = globals
        .fee_growth_global_1_x128
        .wrapping_sub(info.fee_growth_outside_1_x128);
    info.seconds_per_liquidity_outside_x128 = globals
        .seconds_per_liquidity_cumulative_x128
        .wrapping_sub(info.seconds_per_liquidity_outside_x128)
        & MAX_U160;
    info.tick_cumulative_outside = globals
        .tick_cumulative
        .wrapping_sub(info.tick_cumulative_outside);
    info.seconds_outside = globals.time.wrapping_sub(info.seconds_outside);

    store.write_tick(tick, &info);

    info.liquidity_net
}

/// Release a tick's storage once nothing references it
pub fn clear<S: TickStorage>(store: &mut S, tick: i32) {
    store.remove_tick(tick);
}
