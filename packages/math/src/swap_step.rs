// SPDX-License-Identifier: MIT
// Single swap step within one liquidity range

use ethnum::U256;
use crate::constants::FEE_DENOMINATOR;
use crate::error::MathError;
use crate::full_math::{mul_div, mul_div_rounding_up};
use crate::liquidity::{get_amount0_delta, get_amount1_delta};
use crate::sqrt_price::{get_next_sqrt_price_from_input, get_next_sqrt_price_from_output};

/// Result of swapping within a single range of constant liquidity
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SwapStep {
    /// Price reached by the step, never beyond the target
    pub sqrt_price_next_x96: U256,
    /// Input consumed, excluding fee
    pub amount_in: U256,
    /// Output produced
    pub amount_out: U256,
    /// Fee charged on the input
    pub fee_amount: U256,
}

/// Compute the result of swapping some amount in or out, given the parameters of the swap.
///
/// Direction is implied by the target: a target at or below the current price swaps
/// token0 for token1. `amount_remaining > 0` is exact input, `< 0` is exact output.
/// All rounding favours the pool.
pub fn compute_swap_step(
    sqrt_price_current_x96: U256,
    sqrt_price_target_x96: U256,
    liquidity: u128,
    amount_remaining: i128,
    fee_pips: u32,
) -> Result<SwapStep, MathError> {
    let zero_for_one = sqrt_price_current_x96 >= sqrt_price_target_x96;
    let exact_in = amount_remaining >= 0;
    let remaining_abs = U256::new(amount_remaining.unsigned_abs());
    let fee_denominator = U256::new(FEE_DENOMINATOR as u128);
    let fee = U256::new(fee_pips as u128);

    let mut amount_in = U256::ZERO;
    let mut amount_out = U256::ZERO;

    let sqrt_price_next_x96 = if exact_in {
        let remaining_less_fee = mul_div(remaining_abs, fee_denominator - fee, fee_denominator)?;
        amount_in = if zero_for_one {
            get_amount0_delta(sqrt_price_target_x96, sqrt_price_current_x96, liquidity, true)?
        } else {
            get_amount1_delta(sqrt_price_current_x96, sqrt_price_target_x96, liquidity, true)?
        };
        if remaining_less_fee >= amount_in {
            sqrt_price_target_x96
        } else {
            get_next_sqrt_price_from_input(
                sqrt_price_current_x96,
                liquidity,
                remaining_less_fee,
                zero_for_one,
            )?
        }
    } else {
        amount_out = if zero_for_one {
            get_amount1_delta(sqrt_price_target_x96, sqrt_price_current_x96, liquidity, false)?
        } else {
            get_amount0_delta(sqrt_price_current_x96, sqrt_price_target_x96, liquidity, false)?
        };
        if remaining_abs >= amount_out {
            sqrt_price_target_x96
        } else {
            get_next_sqrt_price_from_output(
                sqrt_price_current_x96,
                liquidity,
                remaining_abs,
                zero_for_one,
            )?
        }
    };

    let reached_target = sqrt_price_target_x96 == sqrt_price_next_x96;

    // Recompute the legs that were not already computed for the full range
    if zero_for_one {
        if !(reached_target && exact_in) {
            amount_in =
                get_amount0_delta(sqrt_price_next_x96, sqrt_price_current_x96, liquidity, true)?;
        }
        if !(reached_target && !exact_in) {
            amount_out =
                get_amount1_delta(sqrt_price_next_x96, sqrt_price_current_x96, liquidity, false)?;
        }
    } else {
        if !(reached_target && exact_in) {
            amount_in =
                get_amount1_delta(sqrt_price_current_x96, sqrt_price_next_x96, liquidity, true)?;
        }
        if !(reached_target && !exact_in) {
            amount_out =
                get_amount0_delta(sqrt_price_current_x96, sqrt_price_next_x96, liquidity, false)?;
        }
    }

    // Exact output never pays out more than requested
    if !exact_in && amount_out > remaining_abs {
        amount_out = remaining_abs;
    }

    let fee_amount = if exact_in && !reached_target {
        // The remainder of the input becomes the fee
        remaining_abs - amount_in
    } else {
        mul_div_rounding_up(amount_in, fee, fee_denominator - fee)?
    };

    Ok(SwapStep {
        sqrt_price_next_x96,
        amount_in,
        amount_out,
        fee_amount,
    })
}
