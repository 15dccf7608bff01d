#![no_std]

pub mod engine;
pub mod error;
pub mod types;

pub use engine::{engine_swap, validate_swap};
pub use error::SwapError;
pub use types::{SwapParams, SwapResult, SwapState};
