use ethnum::U256;

/// Liquidity owned by one address over one tick range
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Position {
    pub liquidity: u128,
    /// Fee growth inside the range as of the last touch (Q128.128)
    pub fee_growth_inside_0_last_x128: U256,
    pub fee_growth_inside_1_last_x128: U256,
    /// Fees and burned principal waiting to be collected
    pub tokens_owed_0: u128,
    pub tokens_owed_1: u128,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            liquidity: 0,
            fee_growth_inside_0_last_x128: U256::ZERO,
            fee_growth_inside_1_last_x128: U256::ZERO,
            tokens_owed_0: 0,
            tokens_owed_1: 0,
        }
    }
}
