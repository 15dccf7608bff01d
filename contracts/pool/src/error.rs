// Pool error handling
//
// Every fallible entry point returns `Result<_, PoolError>`; a failed invocation rolls back
// all of its storage writes and transfers. Errors raised by the engine packages are folded
// in through the `From` impls at the bottom of this file.

use soroban_sdk::contracterror;
use tidepool_math::MathError;
use tidepool_oracle::OracleError;
use tidepool_position::PositionError;
use tidepool_swap::SwapError;
use tidepool_tick::TickError;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum PoolError {
    // Initialization errors (100-199)
    /// Pool price has already been set
    AlreadyInitialized = 100,
    /// Pool price has not been set yet
    NotInitialized = 101,

    // Concurrency errors (200-299)
    /// A mutating call is already in progress on this pool
    Locked = 200,

    // Validation errors (300-399)
    /// Lower tick is not below upper tick
    TickOrder = 300,
    /// Lower tick below MIN_TICK
    TickLowerOutOfBounds = 301,
    /// Upper tick above MAX_TICK
    TickUpperOutOfBounds = 302,
    /// Tick is not a multiple of the tick spacing
    TickMisaligned = 303,
    /// Tick outside [MIN_TICK, MAX_TICK]
    TickOutOfBounds = 304,
    /// Sqrt price outside [MIN_SQRT_RATIO, MAX_SQRT_RATIO)
    PriceOutOfBounds = 305,
    /// Amount must be non-zero
    ZeroAmount = 306,
    /// Swap limit is on the wrong side of the price or out of bounds
    InvalidPriceLimit = 307,
    /// Burn of zero on a position with no liquidity
    EmptyPosition = 308,
    /// Protocol fee must be 0 or within 4..=10
    InvalidFeeProtocol = 309,
    /// Flash requires in-range liquidity
    NoLiquidity = 310,
    /// Oracle query reaches past the oldest observation
    ObservationTooOld = 311,
    /// Range boundary has no liquidity referencing it
    TickNotInitialized = 312,
    /// Tick spacing must be positive
    InvalidTickSpacing = 313,

    // Settlement errors (400-499)
    /// Mint callback paid less token0 than owed
    InsufficientPayment0 = 400,
    /// Mint callback paid less token1 than owed
    InsufficientPayment1 = 401,
    /// Swap callback paid less than the input amount
    InsufficientInput = 402,
    /// Flash callback did not repay token0 plus fee
    FlashUnderpaid0 = 403,
    /// Flash callback did not repay token1 plus fee
    FlashUnderpaid1 = 404,

    // Authorization errors (500-599)
    /// Registry owner could not be resolved
    Unauthorized = 500,

    // Arithmetic errors (600-699)
    DivisionByZero = 600,
    Overflow = 601,
    Underflow = 602,
    /// Tick gross liquidity would exceed the per-tick cap
    LiquidityOverflow = 603,
    /// Liquidity delta would take a balance below zero or out of range
    LiquidityDelta = 604,
}

// ============================================================
// ENGINE ERROR CONVERSION
// ============================================================

impl From<MathError> for PoolError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::DivisionByZero => PoolError::DivisionByZero,
            MathError::Overflow => PoolError::Overflow,
            MathError::Underflow => PoolError::Underflow,
            MathError::TickOutOfBounds => PoolError::TickOutOfBounds,
            MathError::SqrtPriceOutOfBounds => PoolError::PriceOutOfBounds,
            MathError::ZeroInput => PoolError::DivisionByZero,
            MathError::LiquidityDelta => PoolError::LiquidityDelta,
        }
    }
}

impl From<TickError> for PoolError {
    fn from(err: TickError) -> Self {
        match err {
            TickError::Math(e) => e.into(),
            TickError::LiquidityOverflow => PoolError::LiquidityOverflow,
            TickError::LiquidityNetOverflow => PoolError::Overflow,
            TickError::TickMisaligned => PoolError::TickMisaligned,
        }
    }
}

impl From<PositionError> for PoolError {
    fn from(err: PositionError) -> Self {
        match err {
            PositionError::Math(e) => e.into(),
            PositionError::EmptyPosition => PoolError::EmptyPosition,
            PositionError::TickOrder => PoolError::TickOrder,
            PositionError::TickLowerOutOfBounds => PoolError::TickLowerOutOfBounds,
            PositionError::TickUpperOutOfBounds => PoolError::TickUpperOutOfBounds,
            PositionError::TickMisaligned => PoolError::TickMisaligned,
        }
    }
}

impl From<OracleError> for PoolError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::NotInitialized => PoolError::NotInitialized,
            OracleError::TargetTooOld => PoolError::ObservationTooOld,
        }
    }
}

impl From<SwapError> for PoolError {
    fn from(err: SwapError) -> Self {
        match err {
            SwapError::ZeroAmount => PoolError::ZeroAmount,
            SwapError::InvalidPriceLimit => PoolError::InvalidPriceLimit,
            SwapError::Math(e) => e.into(),
            SwapError::Tick(e) => e.into(),
            SwapError::Oracle(e) => e.into(),
        }
    }
}
