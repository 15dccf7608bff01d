// SPDX-License-Identifier: MIT
// Liquidity Calculations

use ethnum::U256;
use crate::constants::{Q96, RESOLUTION};
use crate::error::MathError;
use crate::full_math::{div_rounding_up, mul_div, mul_div_rounding_up, to_i128};

#[inline]
fn sort_prices(sqrt_price_a: U256, sqrt_price_b: U256) -> (U256, U256) {
    if sqrt_price_a > sqrt_price_b {
        (sqrt_price_b, sqrt_price_a)
    } else {
        (sqrt_price_a, sqrt_price_b)
    }
}

/// Calculate token0 amount for a liquidity and price range
/// Formula: L * (sqrt_upper - sqrt_lower) / (sqrt_upper * sqrt_lower)
pub fn get_amount0_delta(
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, MathError> {
    let (sqrt_lower, sqrt_upper) = sort_prices(sqrt_price_a_x96, sqrt_price_b_x96);

    if sqrt_lower == U256::ZERO {
        return Err(MathError::ZeroInput);
    }

    let numerator1 = U256::new(liquidity) << RESOLUTION;
    let numerator2 = sqrt_upper - sqrt_lower;

    if round_up {
        div_rounding_up(
            mul_div_rounding_up(numerator1, numerator2, sqrt_upper)?,
            sqrt_lower,
        )
    } else {
        Ok(mul_div(numerator1, numerator2, sqrt_upper)? / sqrt_lower)
    }
}

/// Calculate token1 amount for a liquidity and price range
/// Formula: L * (sqrt_upper - sqrt_lower)
pub fn get_amount1_delta(
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, MathError> {
    let (sqrt_lower, sqrt_upper) = sort_prices(sqrt_price_a_x96, sqrt_price_b_x96);
    let delta = sqrt_upper - sqrt_lower;

    if round_up {
        mul_div_rounding_up(U256::new(liquidity), delta, Q96)
    } else {
        mul_div(U256::new(liquidity), delta, Q96)
    }
}

/// Signed token0 delta for a signed liquidity change.
/// Positive liquidity rounds up (amount owed to the pool), negative rounds down (amount paid out).
pub fn get_amount0_delta_signed(
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    liquidity: i128,
) -> Result<i128, MathError> {
    if liquidity < 0 {
        let amount = get_amount0_delta(
            sqrt_price_a_x96,
            sqrt_price_b_x96,
            liquidity.unsigned_abs(),
            false,
        )?;
        Ok(-to_i128(amount)?)
    } else {
        let amount = get_amount0_delta(sqrt_price_a_x96, sqrt_price_b_x96, liquidity as u128, true)?;
        to_i128(amount)
    }
}

/// Signed token1 delta for a signed liquidity change.
pub fn get_amount1_delta_signed(
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    liquidity: i128,
) -> Result<i128, MathError> {
    if liquidity < 0 {
        let amount = get_amount1_delta(
            sqrt_price_a_x96,
            sqrt_price_b_x96,
            liquidity.unsigned_abs(),
            false,
        )?;
        Ok(-to_i128(amount)?)
    } else {
        let amount = get_amount1_delta(sqrt_price_a_x96, sqrt_price_b_x96, liquidity as u128, true)?;
        to_i128(amount)
    }
}

/// Add a signed liquidity delta to a liquidity amount, failing on underflow or overflow
#[inline]
pub fn add_delta(liquidity: u128, delta: i128) -> Result<u128, MathError> {
    if delta < 0 {
        liquidity
            .checked_sub(delta.unsigned_abs())
            .ok_or(MathError::LiquidityDelta)
    } else {
        liquidity
            .checked_add(delta as u128)
            .ok_or(MathError::LiquidityDelta)
    }
}

/// Maximum liquidity a single tick may reference for a given spacing, so that the
/// sum over every usable tick cannot overflow u128
pub fn tick_spacing_to_max_liquidity_per_tick(tick_spacing: i32) -> u128 {
    use crate::constants::{MAX_TICK, MIN_TICK};

    let min_tick = (MIN_TICK / tick_spacing) * tick_spacing;
    let max_tick = (MAX_TICK / tick_spacing) * tick_spacing;
    let num_ticks = ((max_tick - min_tick) / tick_spacing) as u128 + 1;
    u128::MAX / num_ticks
}
