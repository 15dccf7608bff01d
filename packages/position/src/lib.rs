#![no_std]

pub mod error;
pub mod manager;
pub mod types;

pub use error::PositionError;
pub use manager::{take_owed, update_position, validate_ticks};
pub use types::Position;
