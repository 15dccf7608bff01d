// Tidepool Math Package
//
// Fixed-point primitives shared by the tick, oracle, swap and pool crates.
// Sqrt prices are Q64.96 and fee growth is Q128.128, both carried in 256-bit words.

#![no_std]

pub mod bit_math;
pub mod constants;
pub mod error;
pub mod full_math;
pub mod liquidity;
pub mod sqrt_price;
pub mod swap_step;
pub mod tick_math;

pub use ethnum::U256;

// Re-export commonly used items from constants
pub use constants::*;
pub use error::MathError;

pub use full_math::{div_rounding_up, mul_div, mul_div_rounding_up, to_i128, to_u128};

pub use bit_math::{least_significant_bit, most_significant_bit};

pub use tick_math::{get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio};

pub use sqrt_price::{get_next_sqrt_price_from_input, get_next_sqrt_price_from_output};

pub use liquidity::{
    add_delta,
    get_amount0_delta,
    get_amount0_delta_signed,
    get_amount1_delta,
    get_amount1_delta_signed,
    tick_spacing_to_max_liquidity_per_tick,
};

pub use swap_step::{compute_swap_step, SwapStep};
