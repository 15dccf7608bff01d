// Fee Growth Calculations

use ethnum::U256;
use crate::update::TickStorage;

/// Fee growth per unit of liquidity inside `[lower_tick, upper_tick)`.
///
/// Only compares against the current tick, so it is correct for uninitialized bounds
/// too. All subtraction wraps; the result is meaningful as a difference between two reads.
pub fn get_fee_growth_inside<S: TickStorage>(
    store: &S,
    lower_tick: i32,
    upper_tick: i32,
    tick_current: i32,
    fee_growth_global_0_x128: U256,
    fee_growth_global_1_x128: U256,
) -> (U256, U256) {
    let lower = store.read_tick(lower_tick);
    let upper = store.read_tick(upper_tick);

    let (below_0, below_1) = if tick_current >= lower_tick {
        (lower.fee_growth_outside_0_x128, lower.fee_growth_outside_1_x128)
    } else {
        (
            fee_growth_global_0_x128.wrapping_sub(lower.fee_growth_outside_0_x128),
            fee_growth_global_1_x128.wrapping_sub(lower.fee_growth_outside_1_x128),
        )
    };

    let (above_0, above_1) = if tick_current < upper_tick {
        (upper.fee_growth_outside_0_x128, upper.fee_growth_outside_1_x128)
    } else {
        (
            fee_growth_global_0_x128.wrapping_sub(upper.fee_growth_outside_0_x128),
            fee_growth_global_1_x128.wrapping_sub(upper.fee_growth_outside_1_x128),
        )
    };

    (
        fee_growth_global_0_x128.wrapping_sub(below_0).wrapping_sub(above_0),
        fee_growth_global_1_x128.wrapping_sub(below_1).wrapping_sub(above_1),
    )
}
