//! Factory type definitions

use soroban_sdk::{contracttype, Address, BytesN};

/// Factory configuration
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FactoryConfig {
    /// Registry owner; also the admin of every pool deployed here
    pub owner: Address,
    pub pool_wasm_hash: BytesN<32>,
}

/// Default fee tiers enabled at initialization, in hundredths of a bip
/// - 500 (0.05%) + tick spacing 10 → Stablecoins
/// - 3000 (0.30%) + tick spacing 60 → Volatile
/// - 10000 (1.00%) + tick spacing 200 → Exotic
pub const DEFAULT_FEE_TIERS: [(u32, i32); 3] = [(500, 10), (3_000, 60), (10_000, 200)];

/// Fees are expressed against this denominator and must stay below it
pub const FEE_DENOMINATOR: u32 = 1_000_000;

/// Upper bound (exclusive) on tick spacing; keeps per-tick liquidity caps from collapsing
pub const MAX_TICK_SPACING: i32 = 16_384;
