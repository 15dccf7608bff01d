use ethnum::U256;
use tidepool_math::{
    add_delta, compute_swap_step, get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio, mul_div,
    to_i128, MathError, MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK, Q128,
};
use tidepool_oracle::{observe_single, write, ObservationStorage};
use tidepool_tick::{cross, next_initialized_tick_within_one_word, GlobalSnapshot, TickStorage};
use crate::error::SwapError;
use crate::types::{SwapParams, SwapResult, SwapState};

// ============================================================
// VALIDATION
// ============================================================

/// Reject a zero amount and limits that sit behind the current price or outside
/// the representable range
pub fn validate_swap(state: &SwapState, params: &SwapParams) -> Result<(), SwapError> {
    if params.amount_specified == 0 {
        return Err(SwapError::ZeroAmount);
    }

    let limit = params.sqrt_price_limit_x96;
    let valid = if params.zero_for_one {
        limit < state.sqrt_price_x96 && limit > MIN_SQRT_RATIO
    } else {
        limit > state.sqrt_price_x96 && limit < MAX_SQRT_RATIO
    };

    if !valid {
        return Err(SwapError::InvalidPriceLimit);
    }

    Ok(())
}

// ============================================================
// SWAP LOOP
// ============================================================

/// Execute a swap against the tick ledger, advancing `state` in place.
///
/// Ticks are crossed in storage as they are reached and one oracle observation is written
/// if the swap moved the tick. Nothing is transferred; the returned deltas tell the
/// caller what to settle.
pub fn engine_swap<S>(
    store: &mut S,
    state: &mut SwapState,
    params: &SwapParams,
) -> Result<SwapResult, SwapError>
where
    S: TickStorage + ObservationStorage,
{
    validate_swap(state, params)?;

    let zero_for_one = params.zero_for_one;
    let exact_input = params.amount_specified > 0;
    let limit = params.sqrt_price_limit_x96;

    let tick_start = state.tick;
    let liquidity_start = state.liquidity;

    let mut amount_specified_remaining = params.amount_specified;
    let mut amount_calculated: i128 = 0;
    let mut sqrt_price_x96 = state.sqrt_price_x96;
    let mut tick = state.tick;
    let mut liquidity = state.liquidity;
    let mut fee_growth_global_x128 = if zero_for_one {
        state.fee_growth_global_0_x128
    } else {
        state.fee_growth_global_1_x128
    };
    let mut protocol_fee: u128 = 0;

    // Oracle cumulatives as of this swap, read at the first crossing
    let mut cumulatives: Option<(i64, U256)> = None;

    while amount_specified_remaining != 0 && sqrt_price_x96 != limit {
        let sqrt_price_start_x96 = sqrt_price_x96;

        let (next, initialized) =
            next_initialized_tick_within_one_word(store, tick, params.tick_spacing, zero_for_one)?;
        // The bitmap knows nothing of the tick bounds
        let tick_next = next.clamp(MIN_TICK, MAX_TICK);
        let sqrt_price_next_x96 = get_sqrt_ratio_at_tick(tick_next)?;

        let target = if zero_for_one {
            sqrt_price_next_x96.max(limit)
        } else {
            sqrt_price_next_x96.min(limit)
        };

        let step = compute_swap_step(
            sqrt_price_x96,
            target,
            liquidity,
            amount_specified_remaining,
            params.fee,
        )?;
        sqrt_price_x96 = step.sqrt_price_next_x96;

        let amount_in_with_fee = to_i128(
            step.amount_in
                .checked_add(step.fee_amount)
                .ok_or(MathError::Overflow)?,
        )?;
        let amount_out = to_i128(step.amount_out)?;

        if exact_input {
            amount_specified_remaining = amount_specified_remaining
                .checked_sub(amount_in_with_fee)
                .ok_or(MathError::Overflow)?;
            amount_calculated = amount_calculated
                .checked_sub(amount_out)
                .ok_or(MathError::Overflow)?;
        } else {
            amount_specified_remaining = amount_specified_remaining
                .checked_add(amount_out)
                .ok_or(MathError::Overflow)?;
            amount_calculated = amount_calculated
                .checked_add(amount_in_with_fee)
                .ok_or(MathError::Overflow)?;
        }

        let mut fee_amount = step.fee_amount;
        if params.fee_protocol > 0 {
            let delta = fee_amount / U256::new(params.fee_protocol as u128);
            fee_amount = fee_amount - delta;
            protocol_fee = protocol_fee
                .checked_add(delta.as_u128())
                .ok_or(MathError::Overflow)?;
        }

        if liquidity > 0 {
            fee_growth_global_x128 = fee_growth_global_x128
                .wrapping_add(mul_div(fee_amount, Q128, U256::new(liquidity))?);
        }

        if sqrt_price_x96 == sqrt_price_next_x96 {
            if initialized {
                let (tick_cumulative, seconds_per_liquidity_x128) = match cumulatives {
                    Some(values) => values,
                    None => {
                        let values = observe_single(
                            store,
                            params.time,
                            0,
                            tick_start,
                            state.observation_index,
                            liquidity_start,
                            state.observation_cardinality,
                        )?;
                        cumulatives = Some(values);
                        values
                    }
                };

                let globals = GlobalSnapshot {
                    fee_growth_global_0_x128: if zero_for_one {
                        fee_growth_global_x128
                    } else {
                        state.fee_growth_global_0_x128
                    },
                    fee_growth_global_1_x128: if zero_for_one {
                        state.fee_growth_global_1_x128
                    } else {
                        fee_growth_global_x128
                    },
                    seconds_per_liquidity_cumulative_x128: seconds_per_liquidity_x128,
                    tick_cumulative,
                    time: params.time,
                };

                let mut liquidity_net = cross(store, tick_next, &globals);
                // Moving left applies the boundary in reverse
                if zero_for_one {
                    liquidity_net = liquidity_net.checked_neg().ok_or(MathError::Overflow)?;
                }
                liquidity = add_delta(liquidity, liquidity_net)?;
            }

            // The price sits exactly on tick_next; moving left we are already below it
            tick = if zero_for_one { tick_next - 1 } else { tick_next };
        } else if sqrt_price_x96 != sqrt_price_start_x96 {
            tick = get_tick_at_sqrt_ratio(sqrt_price_x96)?;
        }
    }

    if tick != tick_start {
        let (index, cardinality) = write(
            store,
            state.observation_index,
            params.time,
            tick_start,
            liquidity_start,
            state.observation_cardinality,
            state.observation_cardinality_next,
        );
        state.observation_index = index;
        state.observation_cardinality = cardinality;
    }

    state.sqrt_price_x96 = sqrt_price_x96;
    state.tick = tick;
    state.liquidity = liquidity;

    if zero_for_one {
        state.fee_growth_global_0_x128 = fee_growth_global_x128;
        state.protocol_fees_0 = state
            .protocol_fees_0
            .checked_add(protocol_fee)
            .ok_or(MathError::Overflow)?;
    } else {
        state.fee_growth_global_1_x128 = fee_growth_global_x128;
        state.protocol_fees_1 = state
            .protocol_fees_1
            .checked_add(protocol_fee)
            .ok_or(MathError::Overflow)?;
    }

    let amount_consumed = params.amount_specified - amount_specified_remaining;
    let (amount0, amount1) = if zero_for_one == exact_input {
        (amount_consumed, amount_calculated)
    } else {
        (amount_calculated, amount_consumed)
    };

    Ok(SwapResult { amount0, amount1 })
}
