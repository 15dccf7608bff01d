// Factory error module for Tidepool

use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum FactoryError {
    // Initialization errors (1000-1099)
    AlreadyInitialized = 1000,
    NotInitialized = 1001,

    // Pool creation errors (1100-1199)
    PoolAlreadyExists = 1100,
    IdenticalTokens = 1101,
    FeeNotEnabled = 1102,

    // Fee tier errors (1200-1299)
    InvalidFee = 1200,
    InvalidTickSpacing = 1201,
    FeeAlreadyEnabled = 1202,
}
