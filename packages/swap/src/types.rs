use ethnum::U256;

/// Mutable pool state the swap loop reads and advances
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SwapState {
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub liquidity: u128,
    pub fee_growth_global_0_x128: U256,
    pub fee_growth_global_1_x128: U256,
    pub protocol_fees_0: u128,
    pub protocol_fees_1: u128,
    pub observation_index: u32,
    pub observation_cardinality: u32,
    pub observation_cardinality_next: u32,
}

/// Caller request plus the pool constants that shape it
#[derive(Clone, Copy, Debug)]
pub struct SwapParams {
    pub zero_for_one: bool,
    /// Positive for exact input, negative for exact output
    pub amount_specified: i128,
    pub sqrt_price_limit_x96: U256,
    /// Swap fee in pips
    pub fee: u32,
    /// Protocol share of the input-token fee as 1/N, 0 when off
    pub fee_protocol: u32,
    pub tick_spacing: i32,
    pub time: u32,
}

/// Pool-side token deltas: positive is owed to the pool, negative is paid out
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SwapResult {
    pub amount0: i128,
    pub amount1: i128,
}
