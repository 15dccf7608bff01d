// Tidepool Oracle Package
//
// Growable ring buffer of cumulative tick and seconds-per-liquidity observations.
// Timestamps are u32 and every comparison is made relative to the current time so the
// buffer keeps working across the 2^32 wrap.

#![no_std]

pub mod error;
pub mod observation;
pub mod ring;

pub use error::OracleError;
pub use observation::{transform, Observation};
pub use ring::{grow, initialize, observe_single, write, ObservationStorage};
