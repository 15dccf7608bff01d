// SPDX-License-Identifier: MIT
// Tick <-> Sqrt Price Conversions

use ethnum::{I256, U256};
use crate::bit_math::most_significant_bit;
use crate::constants::{MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK};
use crate::error::MathError;

/// sqrt(1.0001^-(2^i)) * 2^128 for i = 1..=19; bit 0 seeds the ratio directly
const RATIO_MULTIPLIERS: [u128; 19] = [
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
    0x48a170391f7dc42444e8fa2,
];

const RATIO_BIT_ZERO: u128 = 0xfffcb933bd6fad37aa2d162d1a594001;

/// 2^64 / log2(sqrt(1.0001)), turns a Q64.64 log2 into a Q128.128 tick
const LOG_SQRT10001_MULTIPLIER: I256 = U256::new(255738958999603826347141).as_i256();
/// Error bounds of the log2 approximation, in Q128.128
const TICK_LOW_OFFSET: I256 = U256::new(3402992956809132418596140100660247210).as_i256();
const TICK_HIGH_OFFSET: I256 = U256::new(291339464771989622907027621153398088495).as_i256();

/// Convert tick to sqrt price in Q64.96 format
/// Formula: sqrt(1.0001^tick) * 2^96
///
/// Fails with `TickOutOfBounds` when |tick| > MAX_TICK
pub fn get_sqrt_ratio_at_tick(tick: i32) -> Result<U256, MathError> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(MathError::TickOutOfBounds);
    }

    let abs_tick = tick.unsigned_abs();

    let mut ratio = if abs_tick & 0x1 != 0 {
        U256::new(RATIO_BIT_ZERO)
    } else {
        U256::from_words(1, 0)
    };

    for (i, multiplier) in RATIO_MULTIPLIERS.iter().enumerate() {
        if abs_tick & (0x2 << i) != 0 {
            ratio = ratio.wrapping_mul(U256::new(*multiplier)) >> 128u32;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 -> Q128.96, rounding up so that get_tick_at_sqrt_ratio stays consistent
    let round = if ratio % (U256::ONE << 32u32) == U256::ZERO {
        U256::ZERO
    } else {
        U256::ONE
    };

    Ok((ratio >> 32u32) + round)
}

/// Convert a Q64.96 sqrt price to the greatest tick whose ratio is <= the price
///
/// Takes log2 of the price, rescales it to log base sqrt(1.0001), then settles the
/// one-tick ambiguity left by the approximation with a single forward conversion.
///
/// Fails with `SqrtPriceOutOfBounds` when the price is outside [MIN_SQRT_RATIO, MAX_SQRT_RATIO)
pub fn get_tick_at_sqrt_ratio(sqrt_price_x96: U256) -> Result<i32, MathError> {
    if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 >= MAX_SQRT_RATIO {
        return Err(MathError::SqrtPriceOutOfBounds);
    }

    let ratio = sqrt_price_x96 << 32u32;
    let msb = most_significant_bit(ratio)? as u32;

    // Normalize to a 128-bit mantissa in [2^127, 2^128)
    let mut r = if msb >= 128 {
        ratio >> (msb - 127)
    } else {
        ratio << (127 - msb)
    };

    // Integer part of log2 in Q64.64, then 14 fractional bits by repeated squaring
    let mut log_2 = I256::new(msb as i128 - 128) << 64u32;
    for shift in (50u32..=63).rev() {
        r = r.wrapping_mul(r) >> 127u32;
        if r >> 128u32 != U256::ZERO {
            log_2 |= I256::ONE << shift;
            r >>= 1u32;
        }
    }

    let log_sqrt10001 = log_2.wrapping_mul(LOG_SQRT10001_MULTIPLIER);
    let tick_low = ((log_sqrt10001 - TICK_LOW_OFFSET) >> 128u32).as_i32();
    let tick_high = ((log_sqrt10001 + TICK_HIGH_OFFSET) >> 128u32).as_i32();

    if tick_low == tick_high {
        Ok(tick_low)
    } else if get_sqrt_ratio_at_tick(tick_high)? <= sqrt_price_x96 {
        Ok(tick_high)
    } else {
        Ok(tick_low)
    }
}
