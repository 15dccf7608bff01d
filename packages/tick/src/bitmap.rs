// Tick Bitmap
//
// One bit per spaced tick, packed into 256-bit words keyed by the high bits of the
// compressed tick.

use ethnum::U256;
use tidepool_math::{least_significant_bit, most_significant_bit};
use crate::error::TickError;
use crate::update::TickStorage;

/// Word index and bit index of a compressed tick
#[inline]
pub fn position(compressed: i32) -> (i16, u8) {
    ((compressed >> 8) as i16, (compressed & 0xff) as u8)
}

#[inline]
fn compress(tick: i32, tick_spacing: i32) -> i32 {
    let compressed = tick / tick_spacing;
    // Round towards negative infinity
    if tick < 0 && tick % tick_spacing != 0 {
        compressed - 1
    } else {
        compressed
    }
}

/// Flip the initialized state of a tick
pub fn flip_tick<S: TickStorage>(
    store: &mut S,
    tick: i32,
    tick_spacing: i32,
) -> Result<(), TickError> {
    if tick % tick_spacing != 0 {
        return Err(TickError::TickMisaligned);
    }

    let (word_pos, bit_pos) = position(tick / tick_spacing);
    let mask = U256::ONE << bit_pos as u32;
    let word = store.read_tick_word(word_pos);
    store.write_tick_word(word_pos, word ^ mask);

    Ok(())
}

/// Next initialized tick in the same word as `tick`, searching left (`lte`, inclusive of
/// `tick`) or right (exclusive). When nothing is set the word boundary is returned with
/// `initialized = false` so callers can step word by word.
pub fn next_initialized_tick_within_one_word<S: TickStorage>(
    store: &S,
    tick: i32,
    tick_spacing: i32,
    lte: bool,
) -> Result<(i32, bool), TickError> {
    let compressed = compress(tick, tick_spacing);

    if lte {
        let (word_pos, bit_pos) = position(compressed);
        // All bits at or to the right of bit_pos
        let bit = U256::ONE << bit_pos as u32;
        let mask = (bit - U256::ONE) + bit;
        let masked = store.read_tick_word(word_pos) & mask;

        if masked != U256::ZERO {
            let msb = most_significant_bit(masked)? as i32;
            Ok(((compressed - (bit_pos as i32 - msb)) * tick_spacing, true))
        } else {
            Ok(((compressed - bit_pos as i32) * tick_spacing, false))
        }
    } else {
        let (word_pos, bit_pos) = position(compressed + 1);
        // All bits at or to the left of bit_pos
        let mask = !((U256::ONE << bit_pos as u32) - U256::ONE);
        let masked = store.read_tick_word(word_pos) & mask;

        if masked != U256::ZERO {
            let lsb = least_significant_bit(masked)? as i32;
            Ok(((compressed + 1 + (lsb - bit_pos as i32)) * tick_spacing, true))
        } else {
            Ok(((compressed + 1 + (255 - bit_pos as i32)) * tick_spacing, false))
        }
    }
}
