use tidepool_math::MathError;

/// Failures raised by tick ledger and bitmap operations
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickError {
    Math(MathError),
    /// Gross liquidity on a tick would exceed the per-tick cap
    LiquidityOverflow,
    /// Net liquidity on a tick left the i128 range
    LiquidityNetOverflow,
    /// Tick is not a multiple of the tick spacing
    TickMisaligned,
}

impl From<MathError> for TickError {
    fn from(err: MathError) -> Self {
        TickError::Math(err)
    }
}
