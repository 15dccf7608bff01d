// 512-bit intermediate multiply-divide

use ethnum::U256;
use crate::error::MathError;

/// Multiply two 256-bit values into a 512-bit product returned as `(hi, lo)`
pub fn full_mul(a: U256, b: U256) -> (U256, U256) {
    let (a_hi, a_lo) = a.into_words();
    let (b_hi, b_lo) = b.into_words();

    // Each partial product is at most (2^128 - 1)^2 and fits in 256 bits
    let ll = U256::new(a_lo) * U256::new(b_lo);
    let lh = U256::new(a_lo) * U256::new(b_hi);
    let hl = U256::new(a_hi) * U256::new(b_lo);
    let hh = U256::new(a_hi) * U256::new(b_hi);

    let (mid, mid_carry) = lh.overflowing_add(hl);
    let (lo, lo_carry) = ll.overflowing_add(mid << 128u32);

    let mut hi = hh.wrapping_add(mid >> 128u32);
    if mid_carry {
        hi = hi.wrapping_add(Q128_WORD);
    }
    if lo_carry {
        hi = hi.wrapping_add(U256::ONE);
    }

    (hi, lo)
}

const Q128_WORD: U256 = U256::from_words(1, 0);

/// Divide the 512-bit value `(hi, lo)` by `denominator`, returning `(quotient, remainder)`.
/// Requires `hi < denominator` so that the quotient fits in 256 bits.
fn div_rem_wide(hi: U256, lo: U256, denominator: U256) -> (U256, U256) {
    if hi == U256::ZERO {
        return (lo / denominator, lo % denominator);
    }

    let mut remainder = hi;
    let mut quotient = U256::ZERO;

    for bit in (0..256u32).rev() {
        let carry = (remainder >> 255u32) == U256::ONE;
        remainder = (remainder << 1u32) | ((lo >> bit) & U256::ONE);
        quotient = quotient << 1u32;

        if carry || remainder >= denominator {
            remainder = remainder.wrapping_sub(denominator);
            quotient = quotient | U256::ONE;
        }
    }

    (quotient, remainder)
}

/// Calculates floor(a * b / denominator) with full precision.
/// Fails if the denominator is zero or the result overflows 256 bits.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    if denominator == U256::ZERO {
        return Err(MathError::DivisionByZero);
    }

    let (hi, lo) = full_mul(a, b);
    if hi >= denominator {
        return Err(MathError::Overflow);
    }

    Ok(div_rem_wide(hi, lo, denominator).0)
}

/// Calculates ceil(a * b / denominator) with full precision.
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    if denominator == U256::ZERO {
        return Err(MathError::DivisionByZero);
    }

    let (hi, lo) = full_mul(a, b);
    if hi >= denominator {
        return Err(MathError::Overflow);
    }

    let (quotient, remainder) = div_rem_wide(hi, lo, denominator);
    if remainder > U256::ZERO {
        quotient.checked_add(U256::ONE).ok_or(MathError::Overflow)
    } else {
        Ok(quotient)
    }
}

/// Divide with rounding up
#[inline]
pub fn div_rounding_up(numerator: U256, denominator: U256) -> Result<U256, MathError> {
    if denominator == U256::ZERO {
        return Err(MathError::DivisionByZero);
    }
    let quotient = numerator / denominator;
    if numerator % denominator != U256::ZERO {
        Ok(quotient + U256::ONE)
    } else {
        Ok(quotient)
    }
}

/// Narrow a 256-bit value to u128, failing if it does not fit
#[inline]
pub fn to_u128(value: U256) -> Result<u128, MathError> {
    let (hi, lo) = value.into_words();
    if hi != 0 {
        return Err(MathError::Overflow);
    }
    Ok(lo)
}

/// Narrow a 256-bit value to a non-negative i128, failing if it does not fit
#[inline]
pub fn to_i128(value: U256) -> Result<i128, MathError> {
    let narrowed = to_u128(value)?;
    i128::try_from(narrowed).map_err(|_| MathError::Overflow)
}
