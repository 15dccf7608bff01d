// Pool Types
//
// Contract-facing records. The engine packages work on `ethnum::U256`; everything that
// crosses storage or the ABI is converted to `soroban_sdk::U256` here.

use soroban_sdk::{contracttype, Address, Bytes, Env, U256};

use tidepool_oracle::Observation;
use tidepool_position::Position;
use tidepool_tick::TickInfo;

// ============================================================
// U256 CONVERSION
// ============================================================

pub fn to_sdk_u256(env: &Env, value: ethnum::U256) -> U256 {
    U256::from_be_bytes(env, &Bytes::from_array(env, &value.to_be_bytes()))
}

pub fn from_sdk_u256(value: &U256) -> ethnum::U256 {
    let mut buf = [0u8; 32];
    value.to_be_bytes().copy_into_slice(&mut buf);
    ethnum::U256::from_be_bytes(buf)
}

// ============================================================
// POOL CONFIGURATION
// ============================================================

/// Immutable parameters fixed by the factory at deployment
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    /// Registry that deployed this pool and answers `owner()`
    pub factory: Address,
    /// Lower-sorted token
    pub token0: Address,
    pub token1: Address,
    /// Swap fee in hundredths of a basis point
    pub fee: u32,
    pub tick_spacing: i32,
    /// Cap on gross liquidity referencing any single tick
    pub max_liquidity_per_tick: u128,
}

// ============================================================
// POOL STATE
// ============================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Slot0 {
    /// Current sqrt price as Q64.96
    pub sqrt_price_x96: U256,
    /// floor(log_sqrt(1.0001)(price))
    pub tick: i32,
    /// Most recently written oracle slot
    pub observation_index: u32,
    pub observation_cardinality: u32,
    pub observation_cardinality_next: u32,
    /// Protocol share of token0 swap fees as 1/N, 0 when off
    pub fee_protocol_0: u32,
    /// Protocol share of token1 swap fees as 1/N, 0 when off
    pub fee_protocol_1: u32,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProtocolFees {
    pub token0: u128,
    pub token1: u128,
}

// ============================================================
// LEDGER RECORDS
// ============================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TickData {
    pub liquidity_gross: u128,
    pub liquidity_net: i128,
    pub fee_growth_outside_0_x128: U256,
    pub fee_growth_outside_1_x128: U256,
    pub tick_cumulative_outside: i64,
    pub secs_per_liq_outside_x128: U256,
    pub seconds_outside: u32,
    pub initialized: bool,
}

impl TickData {
    pub fn from_info(env: &Env, info: &TickInfo) -> Self {
        Self {
            liquidity_gross: info.liquidity_gross,
            liquidity_net: info.liquidity_net,
            fee_growth_outside_0_x128: to_sdk_u256(env, info.fee_growth_outside_0_x128),
            fee_growth_outside_1_x128: to_sdk_u256(env, info.fee_growth_outside_1_x128),
            tick_cumulative_outside: info.tick_cumulative_outside,
            secs_per_liq_outside_x128: to_sdk_u256(
                env,
                info.seconds_per_liquidity_outside_x128,
            ),
            seconds_outside: info.seconds_outside,
            initialized: info.initialized,
        }
    }

    pub fn to_info(&self) -> TickInfo {
        TickInfo {
            liquidity_gross: self.liquidity_gross,
            liquidity_net: self.liquidity_net,
            fee_growth_outside_0_x128: from_sdk_u256(&self.fee_growth_outside_0_x128),
            fee_growth_outside_1_x128: from_sdk_u256(&self.fee_growth_outside_1_x128),
            tick_cumulative_outside: self.tick_cumulative_outside,
            seconds_per_liquidity_outside_x128: from_sdk_u256(
                &self.secs_per_liq_outside_x128,
            ),
            seconds_outside: self.seconds_outside,
            initialized: self.initialized,
        }
    }
}

/// Positions are keyed by owner and range
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionKey {
    pub owner: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionData {
    pub liquidity: u128,
    pub fee_growth_inside_0_last_x128: U256,
    pub fee_growth_inside_1_last_x128: U256,
    pub tokens_owed_0: u128,
    pub tokens_owed_1: u128,
}

impl PositionData {
    pub fn from_position(env: &Env, pos: &Position) -> Self {
        Self {
            liquidity: pos.liquidity,
            fee_growth_inside_0_last_x128: to_sdk_u256(env, pos.fee_growth_inside_0_last_x128),
            fee_growth_inside_1_last_x128: to_sdk_u256(env, pos.fee_growth_inside_1_last_x128),
            tokens_owed_0: pos.tokens_owed_0,
            tokens_owed_1: pos.tokens_owed_1,
        }
    }

    pub fn to_position(&self) -> Position {
        Position {
            liquidity: self.liquidity,
            fee_growth_inside_0_last_x128: from_sdk_u256(&self.fee_growth_inside_0_last_x128),
            fee_growth_inside_1_last_x128: from_sdk_u256(&self.fee_growth_inside_1_last_x128),
            tokens_owed_0: self.tokens_owed_0,
            tokens_owed_1: self.tokens_owed_1,
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ObservationData {
    pub block_timestamp: u32,
    pub tick_cumulative: i64,
    pub secs_per_liq_cumulative_x128: U256,
    pub initialized: bool,
}

impl ObservationData {
    pub fn from_observation(env: &Env, obs: &Observation) -> Self {
        Self {
            block_timestamp: obs.block_timestamp,
            tick_cumulative: obs.tick_cumulative,
            secs_per_liq_cumulative_x128: to_sdk_u256(
                env,
                obs.seconds_per_liquidity_cumulative_x128,
            ),
            initialized: obs.initialized,
        }
    }

    pub fn to_observation(&self) -> Observation {
        Observation {
            block_timestamp: self.block_timestamp,
            tick_cumulative: self.tick_cumulative,
            seconds_per_liquidity_cumulative_x128: from_sdk_u256(
                &self.secs_per_liq_cumulative_x128,
            ),
            initialized: self.initialized,
        }
    }
}

// ============================================================
// QUERY RESULTS
// ============================================================

/// Time-weighted accumulators accrued while the price sat inside a range
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CumulativesInside {
    pub tick_cumulative_inside: i64,
    pub secs_per_liq_inside_x128: U256,
    pub seconds_inside: u32,
}
