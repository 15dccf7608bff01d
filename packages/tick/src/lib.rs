// Tidepool Tick Package
//
// Sparse per-tick ledger plus the bitmap used to find the next initialized tick.
// Storage is abstracted behind `TickStorage` so the same logic runs against contract
// storage and in-memory test stores.

#![no_std]

pub mod bitmap;
pub mod error;
pub mod fee_growth;
pub mod types;
pub mod update;

pub use bitmap::{flip_tick, next_initialized_tick_within_one_word, position};
pub use error::TickError;
pub use fee_growth::get_fee_growth_inside;
pub use types::{GlobalSnapshot, TickInfo};
pub use update::{clear, cross, update, TickStorage};
