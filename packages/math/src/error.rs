/// Failures raised by the fixed-point routines.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MathError {
    /// Denominator was zero
    DivisionByZero,
    /// Result does not fit the target width
    Overflow,
    /// Subtraction went below zero
    Underflow,
    /// Tick outside [MIN_TICK, MAX_TICK]
    TickOutOfBounds,
    /// Sqrt price outside [MIN_SQRT_RATIO, MAX_SQRT_RATIO)
    SqrtPriceOutOfBounds,
    /// Price or liquidity input was zero where it must be positive
    ZeroInput,
    /// Adding a liquidity delta overflowed or underflowed
    LiquidityDelta,
}
