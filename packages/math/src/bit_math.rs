// Bit scanning over 256-bit words

use ethnum::U256;
use crate::error::MathError;

/// Index of the most significant set bit, so that `x >= 2**msb && x < 2**(msb+1)`
#[inline]
pub fn most_significant_bit(x: U256) -> Result<u8, MathError> {
    if x == U256::ZERO {
        return Err(MathError::ZeroInput);
    }
    Ok((255 - x.leading_zeros()) as u8)
}

/// Index of the least significant set bit, so that `x & 2**lsb != 0` and lower bits are clear
#[inline]
pub fn least_significant_bit(x: U256) -> Result<u8, MathError> {
    if x == U256::ZERO {
        return Err(MathError::ZeroInput);
    }
    Ok(x.trailing_zeros() as u8)
}
