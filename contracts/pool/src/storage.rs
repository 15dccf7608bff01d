// Pool storage module
//
// Pool-wide state lives in instance storage; per-tick, per-position, per-word and
// per-observation records live in persistent storage and have their TTL extended on write.

use soroban_sdk::{contracttype, Env};

use ethnum::U256;
use tidepool_oracle::{Observation, ObservationStorage};
use tidepool_position::Position;
use tidepool_tick::{TickInfo, TickStorage};

use crate::error::PoolError;
use crate::types::{
    from_sdk_u256, to_sdk_u256, ObservationData, PoolConfig, PositionData, PositionKey,
    ProtocolFees, Slot0, TickData,
};

// ============================================================
// STORAGE KEYS
// ============================================================

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Immutable pool configuration
    Config,
    /// Price, tick and oracle cursor; present once initialized
    Slot0,
    /// Set while a mutating call is in progress
    Locked,
    /// In-range liquidity
    Liquidity,
    FeeGrowthGlobal0,
    FeeGrowthGlobal1,
    ProtocolFees,
    /// Tick ledger entry by tick index
    Tick(i32),
    /// Bitmap word by word position
    TickWord(i32),
    /// Position by (owner, lower, upper)
    Position(PositionKey),
    /// Oracle slot by ring index
    Observation(u32),
}

// ============================================================
// TTL CONFIGURATION
// ============================================================

/// Persistent storage lifetime in ledgers (~1 year at 5s/ledger)
const PERSISTENT_LIFETIME: u32 = 6_307_200;
/// TTL bump threshold
const PERSISTENT_BUMP: u32 = 6_307_200;

const INSTANCE_LIFETIME: u32 = 518_400;
const INSTANCE_BUMP: u32 = 535_680;

fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME, PERSISTENT_BUMP);
}

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME, INSTANCE_BUMP);
}

// ============================================================
// CONFIG
// ============================================================

pub fn write_config(env: &Env, config: &PoolConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn read_config(env: &Env) -> Result<PoolConfig, PoolError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(PoolError::NotInitialized)
}

// ============================================================
// SLOT0 & LOCK
// ============================================================

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Slot0)
}

pub fn read_slot0(env: &Env) -> Result<Slot0, PoolError> {
    env.storage()
        .instance()
        .get(&DataKey::Slot0)
        .ok_or(PoolError::NotInitialized)
}

pub fn write_slot0(env: &Env, slot0: &Slot0) {
    env.storage().instance().set(&DataKey::Slot0, slot0);
}

pub fn is_locked(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Locked)
}

pub fn set_locked(env: &Env, locked: bool) {
    if locked {
        env.storage().instance().set(&DataKey::Locked, &true);
    } else {
        env.storage().instance().remove(&DataKey::Locked);
    }
}

// ============================================================
// GLOBAL ACCUMULATORS
// ============================================================

pub fn read_liquidity(env: &Env) -> u128 {
    env.storage()
        .instance()
        .get(&DataKey::Liquidity)
        .unwrap_or_default()
}

pub fn write_liquidity(env: &Env, liquidity: u128) {
    env.storage().instance().set(&DataKey::Liquidity, &liquidity);
}

pub fn read_fee_growth_global(env: &Env) -> (U256, U256) {
    let read = |key: &DataKey| -> U256 {
        env.storage()
            .instance()
            .get::<DataKey, soroban_sdk::U256>(key)
            .map(|v| from_sdk_u256(&v))
            .unwrap_or(U256::ZERO)
    };
    (read(&DataKey::FeeGrowthGlobal0), read(&DataKey::FeeGrowthGlobal1))
}

pub fn write_fee_growth_global(env: &Env, fee_growth_0: U256, fee_growth_1: U256) {
    env.storage()
        .instance()
        .set(&DataKey::FeeGrowthGlobal0, &to_sdk_u256(env, fee_growth_0));
    env.storage()
        .instance()
        .set(&DataKey::FeeGrowthGlobal1, &to_sdk_u256(env, fee_growth_1));
}

pub fn read_protocol_fees(env: &Env) -> ProtocolFees {
    env.storage()
        .instance()
        .get(&DataKey::ProtocolFees)
        .unwrap_or_default()
}

pub fn write_protocol_fees(env: &Env, fees: &ProtocolFees) {
    env.storage().instance().set(&DataKey::ProtocolFees, fees);
}

// ============================================================
// POSITIONS
// ============================================================

pub fn read_position(env: &Env, key: &PositionKey) -> Position {
    env.storage()
        .persistent()
        .get::<DataKey, PositionData>(&DataKey::Position(key.clone()))
        .map(|data| data.to_position())
        .unwrap_or_default()
}

pub fn write_position(env: &Env, key: &PositionKey, pos: &Position) {
    let key = DataKey::Position(key.clone());
    env.storage()
        .persistent()
        .set(&key, &PositionData::from_position(env, pos));
    extend_persistent_ttl(env, &key);
}

// ============================================================
// ENGINE STORAGE ADAPTER
// ============================================================

/// Exposes contract storage to the tick, oracle and swap packages
pub struct PoolStore<'a> {
    env: &'a Env,
}

impl<'a> PoolStore<'a> {
    pub fn new(env: &'a Env) -> Self {
        Self { env }
    }
}

impl TickStorage for PoolStore<'_> {
    fn read_tick(&self, tick: i32) -> TickInfo {
        self.env
            .storage()
            .persistent()
            .get::<DataKey, TickData>(&DataKey::Tick(tick))
            .map(|data| data.to_info())
            .unwrap_or_default()
    }

    fn write_tick(&mut self, tick: i32, info: &TickInfo) {
        let key = DataKey::Tick(tick);
        self.env
            .storage()
            .persistent()
            .set(&key, &TickData::from_info(self.env, info));
        extend_persistent_ttl(self.env, &key);
    }

    fn remove_tick(&mut self, tick: i32) {
        self.env.storage().persistent().remove(&DataKey::Tick(tick));
    }

    fn read_tick_word(&self, word_pos: i16) -> U256 {
        self.env
            .storage()
            .persistent()
            .get::<DataKey, soroban_sdk::U256>(&DataKey::TickWord(word_pos as i32))
            .map(|word| from_sdk_u256(&word))
            .unwrap_or(U256::ZERO)
    }

    fn write_tick_word(&mut self, word_pos: i16, word: U256) {
        let key = DataKey::TickWord(word_pos as i32);
        if word == U256::ZERO {
            self.env.storage().persistent().remove(&key);
            return;
        }
        self.env
            .storage()
            .persistent()
            .set(&key, &to_sdk_u256(self.env, word));
        extend_persistent_ttl(self.env, &key);
    }
}

impl ObservationStorage for PoolStore<'_> {
    fn read_observation(&self, index: u32) -> Observation {
        self.env
            .storage()
            .persistent()
            .get::<DataKey, ObservationData>(&DataKey::Observation(index))
            .map(|data| data.to_observation())
            .unwrap_or_default()
    }

    fn write_observation(&mut self, index: u32, observation: &Observation) {
        let key = DataKey::Observation(index);
        self.env
            .storage()
            .persistent()
            .set(&key, &ObservationData::from_observation(self.env, observation));
        extend_persistent_ttl(self.env, &key);
    }
}
