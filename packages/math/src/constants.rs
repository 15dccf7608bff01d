// Constants module:
// - Clear documentation for each constant
// - Grouped by functionality

use ethnum::U256;

// ============================================================
// TICK CONSTANTS
// ============================================================

/// Minimum valid tick value, log base sqrt(1.0001) of 2^-128
pub const MIN_TICK: i32 = -887272;

/// Maximum valid tick value, log base sqrt(1.0001) of 2^128
pub const MAX_TICK: i32 = -MIN_TICK;

// ============================================================
// SQRT PRICE CONSTANTS (Q64.96 format)
// ============================================================

/// Sqrt price at MIN_TICK, the smallest value `get_sqrt_ratio_at_tick` returns
pub const MIN_SQRT_RATIO: U256 = U256::new(4295128739);

/// Sqrt price at MAX_TICK, one above the largest value `get_sqrt_ratio_at_tick` returns
/// = 1461446703485210103287273052203988822378723970342
pub const MAX_SQRT_RATIO: U256 =
    U256::from_words(4294805859, 318775800626314356294205765087544249638);

/// Largest value representable by a sqrt price (160 bits)
pub const MAX_U160: U256 = U256::from_words((1u128 << 32) - 1, u128::MAX);

// ============================================================
// FIXED POINT CONSTANTS
// ============================================================

/// Bit width of the fractional part of a sqrt price
pub const RESOLUTION: u32 = 96;

/// 2^96, the Q64.96 unit
pub const Q96: U256 = U256::new(1u128 << 96);

/// 2^128, the Q128.128 unit used by fee growth and seconds-per-liquidity accumulators
pub const Q128: U256 = U256::from_words(1, 0);

// ============================================================
// FEE CONSTANTS
// ============================================================

/// Fee denominator: fees are expressed in hundredths of a basis point
pub const FEE_DENOMINATOR: u32 = 1_000_000;

/// Smallest non-zero protocol fee denominator (1/4 of the swap fee)
pub const MIN_FEE_PROTOCOL: u32 = 4;

/// Largest protocol fee denominator (1/10 of the swap fee)
pub const MAX_FEE_PROTOCOL: u32 = 10;

// ============================================================
// ORACLE CONSTANTS
// ============================================================

/// Maximum number of oracle slots a pool can grow to
pub const MAX_OBSERVATION_CARDINALITY: u32 = u16::MAX as u32;

/// Slots one `increase_obs_cardinality_next` call may add; each slot is one ledger write
pub const MAX_OBSERVATION_GROWTH: u32 = 64;
