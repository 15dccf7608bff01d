use ethnum::U256;
use tidepool_math::MAX_U160;

/// One slot of the ring buffer
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Observation {
    pub block_timestamp: u32,
    /// Tick accumulated over time since the pool was initialized
    pub tick_cumulative: i64,
    /// Seconds per unit of in-range liquidity since initialization (Q128.128, 160-bit)
    pub seconds_per_liquidity_cumulative_x128: U256,
    pub initialized: bool,
}

impl Default for Observation {
    fn default() -> Self {
        Self {
            block_timestamp: 0,
            tick_cumulative: 0,
            seconds_per_liquidity_cumulative_x128: U256::ZERO,
            initialized: false,
        }
    }
}

/// Extrapolate `last` forward to `block_timestamp` assuming `tick` and `liquidity` held
/// for the whole interval. Zero liquidity counts as one.
pub fn transform(last: &Observation, block_timestamp: u32, tick: i32, liquidity: u128) -> Observation {
    let delta = block_timestamp.wrapping_sub(last.block_timestamp);
    let divisor = U256::new(liquidity.max(1));

    Observation {
        block_timestamp,
        tick_cumulative: last
            .tick_cumulative
            .wrapping_add((tick as i64).wrapping_mul(delta as i64)),
        seconds_per_liquidity_cumulative_x128: last
            .seconds_per_liquidity_cumulative_x128
            .wrapping_add((U256::new(delta as u128) << 128u32) / divisor)
            & MAX_U160,
        initialized: true,
    }
}
