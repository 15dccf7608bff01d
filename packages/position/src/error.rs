use tidepool_math::MathError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PositionError {
    Math(MathError),
    /// Fee poke on a position holding no liquidity
    EmptyPosition,
    /// Lower tick is not strictly below upper tick
    TickOrder,
    TickLowerOutOfBounds,
    TickUpperOutOfBounds,
    /// Boundary is not a multiple of the tick spacing
    TickMisaligned,
}

impl From<MathError> for PositionError {
    fn from(err: MathError) -> Self {
        PositionError::Math(err)
    }
}
