use tidepool_math::MathError;
use tidepool_oracle::OracleError;
use tidepool_tick::TickError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwapError {
    /// amount_specified is zero
    ZeroAmount,
    /// Limit is on the wrong side of the current price or outside the price bounds
    InvalidPriceLimit,
    Math(MathError),
    Tick(TickError),
    Oracle(OracleError),
}

impl From<MathError> for SwapError {
    fn from(err: MathError) -> Self {
        SwapError::Math(err)
    }
}

impl From<TickError> for SwapError {
    fn from(err: TickError) -> Self {
        SwapError::Tick(err)
    }
}

impl From<OracleError> for SwapError {
    fn from(err: OracleError) -> Self {
        SwapError::Oracle(err)
    }
}
