// SPDX-License-Identifier: MIT
// Sqrt Price Calculations

use ethnum::U256;
use crate::constants::{MAX_U160, Q96, RESOLUTION};
use crate::error::MathError;
use crate::full_math::{div_rounding_up, mul_div, mul_div_rounding_up};

/// Next sqrt price after moving `amount` of token0 into (`add`) or out of the pool.
///
/// Always rounds up: moving the price down on input must not under-charge, and moving it
/// up on output must not over-pay.
/// Formula: L * sqrtP / (L ± amount * sqrtP)
pub fn get_next_sqrt_price_from_amount0_rounding_up(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256, MathError> {
    if amount == U256::ZERO {
        return Ok(sqrt_price_x96);
    }

    let numerator1 = U256::new(liquidity) << RESOLUTION;

    if add {
        if let Some(product) = amount.checked_mul(sqrt_price_x96) {
            if let Some(denominator) = numerator1.checked_add(product) {
                return mul_div_rounding_up(numerator1, sqrt_price_x96, denominator);
            }
        }
        // Fallback with less precision: L / (L / sqrtP + amount)
        let denominator = (numerator1 / sqrt_price_x96)
            .checked_add(amount)
            .ok_or(MathError::Overflow)?;
        div_rounding_up(numerator1, denominator)
    } else {
        let product = amount
            .checked_mul(sqrt_price_x96)
            .ok_or(MathError::Overflow)?;
        if numerator1 <= product {
            return Err(MathError::Underflow);
        }
        let denominator = numerator1 - product;
        let next = mul_div_rounding_up(numerator1, sqrt_price_x96, denominator)?;
        if next > MAX_U160 {
            return Err(MathError::Overflow);
        }
        Ok(next)
    }
}

/// Next sqrt price after moving `amount` of token1 into (`add`) or out of the pool.
///
/// Always rounds down.
/// Formula: sqrtP ± amount / L
pub fn get_next_sqrt_price_from_amount1_rounding_down(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256, MathError> {
    if liquidity == 0 {
        return Err(MathError::DivisionByZero);
    }
    let liquidity = U256::new(liquidity);

    if add {
        let quotient = if amount <= MAX_U160 {
            (amount << RESOLUTION) / liquidity
        } else {
            mul_div(amount, Q96, liquidity)?
        };
        let next = sqrt_price_x96
            .checked_add(quotient)
            .ok_or(MathError::Overflow)?;
        if next > MAX_U160 {
            return Err(MathError::Overflow);
        }
        Ok(next)
    } else {
        let quotient = if amount <= MAX_U160 {
            div_rounding_up(amount << RESOLUTION, liquidity)?
        } else {
            mul_div_rounding_up(amount, Q96, liquidity)?
        };
        if sqrt_price_x96 <= quotient {
            return Err(MathError::Underflow);
        }
        Ok(sqrt_price_x96 - quotient)
    }
}

/// Calculate next sqrt price given an input amount of token0 (zero_for_one) or token1
pub fn get_next_sqrt_price_from_input(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount_in: U256,
    zero_for_one: bool,
) -> Result<U256, MathError> {
    if sqrt_price_x96 == U256::ZERO || liquidity == 0 {
        return Err(MathError::ZeroInput);
    }

    if zero_for_one {
        get_next_sqrt_price_from_amount0_rounding_up(sqrt_price_x96, liquidity, amount_in, true)
    } else {
        get_next_sqrt_price_from_amount1_rounding_down(sqrt_price_x96, liquidity, amount_in, true)
    }
}

/// Calculate next sqrt price given an output amount of token1 (zero_for_one) or token0
pub fn get_next_sqrt_price_from_output(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount_out: U256,
    zero_for_one: bool,
) -> Result<U256, MathError> {
    if sqrt_price_x96 == U256::ZERO || liquidity == 0 {
        return Err(MathError::ZeroInput);
    }

    if zero_for_one {
        get_next_sqrt_price_from_amount1_rounding_down(sqrt_price_x96, liquidity, amount_out, false)
    } else {
        get_next_sqrt_price_from_amount0_rounding_up(sqrt_price_x96, liquidity, amount_out, false)
    }
}
