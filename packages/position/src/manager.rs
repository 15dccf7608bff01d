// Position Management Logic

use ethnum::U256;
use tidepool_math::{add_delta, mul_div, MAX_TICK, MIN_TICK, Q128};
use crate::error::PositionError;
use crate::types::Position;

/// Credit fees earned since the last touch, then apply the liquidity change.
///
/// owed += liquidity_before * (fee_growth_inside - last) / 2^128
///
/// The growth delta wraps, and owed amounts wrap at u128: a position must be collected
/// before it accrues 2^128 of either token.
pub fn update_position(
    pos: &mut Position,
    liquidity_delta: i128,
    fee_growth_inside_0_x128: U256,
    fee_growth_inside_1_x128: U256,
) -> Result<(), PositionError> {
    let liquidity_next = if liquidity_delta == 0 {
        if pos.liquidity == 0 {
            return Err(PositionError::EmptyPosition);
        }
        pos.liquidity
    } else {
        add_delta(pos.liquidity, liquidity_delta)?
    };

    let liquidity = U256::new(pos.liquidity);
    let owed_0 = mul_div(
        fee_growth_inside_0_x128.wrapping_sub(pos.fee_growth_inside_0_last_x128),
        liquidity,
        Q128,
    )?
    .as_u128();
    let owed_1 = mul_div(
        fee_growth_inside_1_x128.wrapping_sub(pos.fee_growth_inside_1_last_x128),
        liquidity,
        Q128,
    )?
    .as_u128();

    pos.liquidity = liquidity_next;
    pos.fee_growth_inside_0_last_x128 = fee_growth_inside_0_x128;
    pos.fee_growth_inside_1_last_x128 = fee_growth_inside_1_x128;
    pos.tokens_owed_0 = pos.tokens_owed_0.wrapping_add(owed_0);
    pos.tokens_owed_1 = pos.tokens_owed_1.wrapping_add(owed_1);

    Ok(())
}

/// Withdraw up to the requested amounts from what the position is owed
pub fn take_owed(pos: &mut Position, requested_0: u128, requested_1: u128) -> (u128, u128) {
    let amount_0 = requested_0.min(pos.tokens_owed_0);
    let amount_1 = requested_1.min(pos.tokens_owed_1);

    pos.tokens_owed_0 -= amount_0;
    pos.tokens_owed_1 -= amount_1;

    (amount_0, amount_1)
}

// ============================================================
// POSITION VALIDATION
// ============================================================

/// Validate a position's tick range against the global bounds and the pool's spacing
pub fn validate_ticks(
    tick_lower: i32,
    tick_upper: i32,
    tick_spacing: i32,
) -> Result<(), PositionError> {
    if tick_lower >= tick_upper {
        return Err(PositionError::TickOrder);
    }
    if tick_lower < MIN_TICK {
        return Err(PositionError::TickLowerOutOfBounds);
    }
    if tick_upper > MAX_TICK {
        return Err(PositionError::TickUpperOutOfBounds);
    }
    if tick_lower % tick_spacing != 0 || tick_upper % tick_spacing != 0 {
        return Err(PositionError::TickMisaligned);
    }

    Ok(())
}
