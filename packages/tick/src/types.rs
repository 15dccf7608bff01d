// Tick Types

use ethnum::U256;

/// Information stored for each initialized tick
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TickInfo {
    /// Total liquidity referencing this tick
    pub liquidity_gross: u128,
    /// Net liquidity change when crossing left-to-right
    pub liquidity_net: i128,
    /// Fee growth on the other side of this tick for token0 (Q128.128)
    pub fee_growth_outside_0_x128: U256,
    /// Fee growth on the other side of this tick for token1 (Q128.128)
    pub fee_growth_outside_1_x128: U256,
    /// Tick cumulative on the other side of this tick
    pub tick_cumulative_outside: i64,
    /// Seconds per liquidity on the other side of this tick (Q128.128, 160-bit)
    pub seconds_per_liquidity_outside_x128: U256,
    /// Seconds spent on the other side of this tick
    pub seconds_outside: u32,
    /// Whether this tick is initialized
    pub initialized: bool,
}

impl Default for TickInfo {
    fn default() -> Self {
        Self {
            liquidity_gross: 0,
            liquidity_net: 0,
            fee_growth_outside_0_x128: U256::ZERO,
            fee_growth_outside_1_x128: U256::ZERO,
            tick_cumulative_outside: 0,
            seconds_per_liquidity_outside_x128: U256::ZERO,
            seconds_outside: 0,
            initialized: false,
        }
    }
}

/// Pool-wide accumulators at the moment a tick is touched
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct GlobalSnapshot {
    pub fee_growth_global_0_x128: U256,
    pub fee_growth_global_1_x128: U256,
    pub seconds_per_liquidity_cumulative_x128: U256,
    pub tick_cumulative: i64,
    pub time: u32,
}
