#![no_std]

use soroban_sdk::{
    contract, contractimpl, log, panic_with_error, token, vec, Address, Bytes, Env, IntoVal,
    Symbol, Vec, U256,
};

// External packages
use tidepool_math::{
    add_delta, get_amount0_delta_signed, get_amount1_delta_signed, get_sqrt_ratio_at_tick,
    get_tick_at_sqrt_ratio, mul_div, mul_div_rounding_up, tick_spacing_to_max_liquidity_per_tick,
    to_u128, FEE_DENOMINATOR, MAX_FEE_PROTOCOL, MAX_OBSERVATION_CARDINALITY,
    MAX_OBSERVATION_GROWTH, MAX_U160, MIN_FEE_PROTOCOL, Q128,
};
use tidepool_oracle::{self as oracle, ObservationStorage};
use tidepool_position::{take_owed, update_position, validate_ticks, Position};
use tidepool_swap::{engine_swap, SwapParams, SwapResult, SwapState};
use tidepool_tick::{
    clear as clear_tick, flip_tick, get_fee_growth_inside, update as update_tick,
    GlobalSnapshot, TickStorage,
};

// Local modules
mod error;
mod events;
mod lock;
mod storage;
pub mod types;

pub use error::PoolError;
use events::*;
use lock::PoolLock;
use storage::*;
use types::{
    from_sdk_u256, to_sdk_u256, CumulativesInside, ObservationData, PoolConfig, PositionData,
    PositionKey, ProtocolFees, Slot0, TickData,
};

#[contract]
pub struct ClmmPool;

#[contractimpl]
impl ClmmPool {
    // ========================================================
    // CONSTRUCTION & INITIALIZATION
    // ========================================================

    /// Capture the immutable pool parameters. Called once by the factory at deployment.
    ///
    /// # Arguments
    /// * `factory` - Registry whose `owner()` gates the administrative calls
    /// * `token0` / `token1` - Sorted token pair
    /// * `fee` - Swap fee in hundredths of a basis point
    /// * `tick_spacing` - Spacing of usable ticks for this fee tier
    pub fn __constructor(
        env: Env,
        factory: Address,
        token0: Address,
        token1: Address,
        fee: u32,
        tick_spacing: i32,
    ) {
        if tick_spacing <= 0 {
            panic_with_error!(&env, PoolError::InvalidTickSpacing);
        }

        let config = PoolConfig {
            factory,
            token0,
            token1,
            fee,
            tick_spacing,
            max_liquidity_per_tick: tick_spacing_to_max_liquidity_per_tick(tick_spacing),
        };

        write_config(&env, &config);
        extend_instance_ttl(&env);
    }

    /// Set the starting price. Anyone may call this exactly once.
    pub fn initialize(env: Env, sqrt_price_x96: U256) -> Result<(), PoolError> {
        if is_initialized(&env) {
            return Err(PoolError::AlreadyInitialized);
        }

        let tick = get_tick_at_sqrt_ratio(from_sdk_u256(&sqrt_price_x96))?;
        let (cardinality, cardinality_next) =
            oracle::initialize(&mut PoolStore::new(&env), ledger_time(&env));

        write_slot0(
            &env,
            &Slot0 {
                sqrt_price_x96: sqrt_price_x96.clone(),
                tick,
                observation_index: 0,
                observation_cardinality: cardinality,
                observation_cardinality_next: cardinality_next,
                fee_protocol_0: 0,
                fee_protocol_1: 0,
            },
        );
        extend_instance_ttl(&env);

        emit_initialize(&env, &sqrt_price_x96, tick);
        Ok(())
    }

    // ========================================================
    // LIQUIDITY
    // ========================================================

    /// Add `amount` liquidity to `recipient`'s position over [tick_lower, tick_upper).
    ///
    /// The owed token amounts are requested from `sender` through `mint_callback` and
    /// checked against the pool's balances afterwards.
    ///
    /// # Returns
    /// (amount0, amount1) paid into the pool
    pub fn mint(
        env: Env,
        sender: Address,
        recipient: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount: u128,
        data: Bytes,
    ) -> Result<(i128, i128), PoolError> {
        sender.require_auth();
        let _lock = PoolLock::acquire(&env)?;

        if amount == 0 {
            return Err(PoolError::ZeroAmount);
        }
        let liquidity_delta =
            i128::try_from(amount).map_err(|_| PoolError::LiquidityOverflow)?;

        let config = read_config(&env)?;
        let mut slot0 = read_slot0(&env)?;
        let key = PositionKey {
            owner: recipient.clone(),
            tick_lower,
            tick_upper,
        };

        let (position, amount0, amount1) =
            modify_position(&env, &config, &mut slot0, &key, liquidity_delta)?;
        write_position(&env, &key, &position);
        write_slot0(&env, &slot0);

        let balance0_before = if amount0 > 0 { balance(&env, &config.token0) } else { 0 };
        let balance1_before = if amount1 > 0 { balance(&env, &config.token1) } else { 0 };

        invoke_callback(&env, &sender, "mint_callback", amount0, amount1, &data);

        if amount0 > 0 && balance(&env, &config.token0) < checked_sum(balance0_before, amount0)? {
            return Err(PoolError::InsufficientPayment0);
        }
        if amount1 > 0 && balance(&env, &config.token1) < checked_sum(balance1_before, amount1)? {
            return Err(PoolError::InsufficientPayment1);
        }

        emit_mint(&env, &sender, &recipient, tick_lower, tick_upper, amount, amount0, amount1);

        Ok((amount0, amount1))
    }

    /// Remove `amount` liquidity from the caller's position. The released tokens are credited
    /// to the position's owed balances and leave the pool only through `collect`.
    ///
    /// Burning zero recomputes the fees owed to a position that still holds liquidity.
    pub fn burn(
        env: Env,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount: u128,
    ) -> Result<(i128, i128), PoolError> {
        owner.require_auth();
        let _lock = PoolLock::acquire(&env)?;

        let liquidity_delta =
            i128::try_from(amount).map_err(|_| PoolError::LiquidityOverflow)?;

        let config = read_config(&env)?;
        let mut slot0 = read_slot0(&env)?;
        let key = PositionKey {
            owner: owner.clone(),
            tick_lower,
            tick_upper,
        };

        let (mut position, amount0, amount1) =
            modify_position(&env, &config, &mut slot0, &key, -liquidity_delta)?;
        let amount0 = amount0.checked_neg().ok_or(PoolError::Overflow)?;
        let amount1 = amount1.checked_neg().ok_or(PoolError::Overflow)?;

        if amount0 > 0 || amount1 > 0 {
            position.tokens_owed_0 = position.tokens_owed_0.wrapping_add(amount0 as u128);
            position.tokens_owed_1 = position.tokens_owed_1.wrapping_add(amount1 as u128);
        }

        write_position(&env, &key, &position);
        write_slot0(&env, &slot0);

        emit_burn(&env, &owner, tick_lower, tick_upper, amount, amount0, amount1);

        Ok((amount0, amount1))
    }

    /// Send up to the requested amounts of the position's owed tokens to `recipient`.
    /// Requests above the owed balance are clamped rather than rejected.
    pub fn collect(
        env: Env,
        owner: Address,
        recipient: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount0_requested: u128,
        amount1_requested: u128,
    ) -> Result<(u128, u128), PoolError> {
        owner.require_auth();
        let _lock = PoolLock::acquire(&env)?;

        let config = read_config(&env)?;
        let key = PositionKey {
            owner: owner.clone(),
            tick_lower,
            tick_upper,
        };

        let mut position = read_position(&env, &key);
        let (amount0, amount1) = take_owed(&mut position, amount0_requested, amount1_requested);
        write_position(&env, &key, &position);

        if amount0 > 0 {
            transfer_out(&env, &config.token0, &recipient, to_amount(amount0)?);
        }
        if amount1 > 0 {
            transfer_out(&env, &config.token1, &recipient, to_amount(amount1)?);
        }

        emit_collect(&env, &owner, &recipient, tick_lower, tick_upper, amount0, amount1);

        Ok((amount0, amount1))
    }

    // ========================================================
    // SWAP
    // ========================================================

    /// Swap token0 for token1 (`zero_for_one`) or the reverse.
    ///
    /// A positive `amount_specified` is an exact input, a negative one an exact output.
    /// The output is sent to `recipient` first; the input is then requested from `sender`
    /// through `swap_callback` and verified by balance delta.
    ///
    /// # Returns
    /// Pool-side deltas (amount0, amount1): positive was received, negative was paid out
    pub fn swap(
        env: Env,
        sender: Address,
        recipient: Address,
        zero_for_one: bool,
        amount_specified: i128,
        sqrt_price_limit_x96: U256,
        data: Bytes,
    ) -> Result<(i128, i128), PoolError> {
        sender.require_auth();
        let _lock = PoolLock::acquire(&env)?;

        let config = read_config(&env)?;
        let mut slot0 = read_slot0(&env)?;
        let (fee_growth_global_0_x128, fee_growth_global_1_x128) = read_fee_growth_global(&env);
        let protocol_fees = read_protocol_fees(&env);

        let mut state = SwapState {
            sqrt_price_x96: from_sdk_u256(&slot0.sqrt_price_x96),
            tick: slot0.tick,
            liquidity: read_liquidity(&env),
            fee_growth_global_0_x128,
            fee_growth_global_1_x128,
            protocol_fees_0: protocol_fees.token0,
            protocol_fees_1: protocol_fees.token1,
            observation_index: slot0.observation_index,
            observation_cardinality: slot0.observation_cardinality,
            observation_cardinality_next: slot0.observation_cardinality_next,
        };

        let params = SwapParams {
            zero_for_one,
            amount_specified,
            sqrt_price_limit_x96: from_sdk_u256(&sqrt_price_limit_x96),
            fee: config.fee,
            fee_protocol: if zero_for_one {
                slot0.fee_protocol_0
            } else {
                slot0.fee_protocol_1
            },
            tick_spacing: config.tick_spacing,
            time: ledger_time(&env),
        };

        let SwapResult { amount0, amount1 } =
            engine_swap(&mut PoolStore::new(&env), &mut state, &params)?;

        // Persist the final state before any token moves
        slot0.sqrt_price_x96 = to_sdk_u256(&env, state.sqrt_price_x96);
        slot0.tick = state.tick;
        slot0.observation_index = state.observation_index;
        slot0.observation_cardinality = state.observation_cardinality;
        write_slot0(&env, &slot0);
        write_liquidity(&env, state.liquidity);
        write_fee_growth_global(
            &env,
            state.fee_growth_global_0_x128,
            state.fee_growth_global_1_x128,
        );
        write_protocol_fees(
            &env,
            &ProtocolFees {
                token0: state.protocol_fees_0,
                token1: state.protocol_fees_1,
            },
        );

        let (token_in, amount_in, token_out, amount_out) = if zero_for_one {
            (&config.token0, amount0, &config.token1, amount1)
        } else {
            (&config.token1, amount1, &config.token0, amount0)
        };

        if amount_out < 0 {
            let paid = amount_out.checked_neg().ok_or(PoolError::Overflow)?;
            transfer_out(&env, token_out, &recipient, paid);
        }

        let balance_before = balance(&env, token_in);
        invoke_callback(&env, &sender, "swap_callback", amount0, amount1, &data);
        if balance(&env, token_in) < checked_sum(balance_before, amount_in)? {
            return Err(PoolError::InsufficientInput);
        }

        emit_swap(
            &env,
            &sender,
            &recipient,
            amount0,
            amount1,
            &slot0.sqrt_price_x96,
            state.liquidity,
            state.tick,
        );

        Ok((amount0, amount1))
    }

    // ========================================================
    // FLASH
    // ========================================================

    /// Lend `amount0`/`amount1` to `recipient` for the duration of `flash_callback`.
    ///
    /// The callback must return the principal plus the pool fee on each amount. Anything
    /// paid beyond the principal is distributed to in-range liquidity, less the protocol share.
    pub fn flash(
        env: Env,
        sender: Address,
        recipient: Address,
        amount0: u128,
        amount1: u128,
        data: Bytes,
    ) -> Result<(), PoolError> {
        sender.require_auth();
        let _lock = PoolLock::acquire(&env)?;

        let config = read_config(&env)?;
        let slot0 = read_slot0(&env)?;
        let liquidity = read_liquidity(&env);
        if liquidity == 0 {
            return Err(PoolError::NoLiquidity);
        }

        let fee = ethnum::U256::new(config.fee as u128);
        let denominator = ethnum::U256::new(FEE_DENOMINATOR as u128);
        let fee0 = to_amount(to_u128(mul_div_rounding_up(
            ethnum::U256::new(amount0),
            fee,
            denominator,
        )?)?)?;
        let fee1 = to_amount(to_u128(mul_div_rounding_up(
            ethnum::U256::new(amount1),
            fee,
            denominator,
        )?)?)?;

        let balance0_before = balance(&env, &config.token0);
        let balance1_before = balance(&env, &config.token1);

        if amount0 > 0 {
            transfer_out(&env, &config.token0, &recipient, to_amount(amount0)?);
        }
        if amount1 > 0 {
            transfer_out(&env, &config.token1, &recipient, to_amount(amount1)?);
        }

        invoke_callback(&env, &sender, "flash_callback", fee0, fee1, &data);

        let balance0_after = balance(&env, &config.token0);
        let balance1_after = balance(&env, &config.token1);

        if balance0_after < checked_sum(balance0_before, fee0)? {
            return Err(PoolError::FlashUnderpaid0);
        }
        if balance1_after < checked_sum(balance1_before, fee1)? {
            return Err(PoolError::FlashUnderpaid1);
        }

        // Both are non-negative after the checks above
        let paid0 = (balance0_after - balance0_before) as u128;
        let paid1 = (balance1_after - balance1_before) as u128;

        let (mut fee_growth_0, mut fee_growth_1) = read_fee_growth_global(&env);
        let mut protocol_fees = read_protocol_fees(&env);

        if paid0 > 0 {
            let (lp_share, protocol_share) = split_fee(paid0, slot0.fee_protocol_0);
            protocol_fees.token0 = protocol_fees
                .token0
                .checked_add(protocol_share)
                .ok_or(PoolError::Overflow)?;
            fee_growth_0 = fee_growth_0.wrapping_add(mul_div(
                ethnum::U256::new(lp_share),
                Q128,
                ethnum::U256::new(liquidity),
            )?);
        }
        if paid1 > 0 {
            let (lp_share, protocol_share) = split_fee(paid1, slot0.fee_protocol_1);
            protocol_fees.token1 = protocol_fees
                .token1
                .checked_add(protocol_share)
                .ok_or(PoolError::Overflow)?;
            fee_growth_1 = fee_growth_1.wrapping_add(mul_div(
                ethnum::U256::new(lp_share),
                Q128,
                ethnum::U256::new(liquidity),
            )?);
        }

        write_fee_growth_global(&env, fee_growth_0, fee_growth_1);
        write_protocol_fees(&env, &protocol_fees);

        emit_flash(&env, &sender, &recipient, amount0, amount1, paid0, paid1);

        Ok(())
    }

    // ========================================================
    // ADMIN FUNCTIONS (registry owner only)
    // ========================================================

    /// Set the protocol's share of swap fees per token as 1/N. Each value must be 0 (off)
    /// or between 4 and 10.
    pub fn set_fee_protocol(
        env: Env,
        fee_protocol_0: u32,
        fee_protocol_1: u32,
    ) -> Result<(), PoolError> {
        let _lock = PoolLock::acquire(&env)?;
        let config = read_config(&env)?;
        require_owner(&env, &config)?;

        let valid = |fp: u32| fp == 0 || (MIN_FEE_PROTOCOL..=MAX_FEE_PROTOCOL).contains(&fp);
        if !valid(fee_protocol_0) || !valid(fee_protocol_1) {
            return Err(PoolError::InvalidFeeProtocol);
        }

        let mut slot0 = read_slot0(&env)?;
        let (old0, old1) = (slot0.fee_protocol_0, slot0.fee_protocol_1);
        slot0.fee_protocol_0 = fee_protocol_0;
        slot0.fee_protocol_1 = fee_protocol_1;
        write_slot0(&env, &slot0);

        emit_set_fee_protocol(&env, old0, old1, fee_protocol_0, fee_protocol_1);
        Ok(())
    }

    /// Withdraw accrued protocol fees, clamped to what has accrued
    pub fn collect_protocol(
        env: Env,
        recipient: Address,
        amount0_requested: u128,
        amount1_requested: u128,
    ) -> Result<(u128, u128), PoolError> {
        let _lock = PoolLock::acquire(&env)?;
        let config = read_config(&env)?;
        require_owner(&env, &config)?;

        let mut protocol_fees = read_protocol_fees(&env);
        let amount0 = amount0_requested.min(protocol_fees.token0);
        let amount1 = amount1_requested.min(protocol_fees.token1);
        protocol_fees.token0 -= amount0;
        protocol_fees.token1 -= amount1;
        write_protocol_fees(&env, &protocol_fees);

        if amount0 > 0 {
            transfer_out(&env, &config.token0, &recipient, to_amount(amount0)?);
        }
        if amount1 > 0 {
            transfer_out(&env, &config.token1, &recipient, to_amount(amount1)?);
        }

        emit_collect_protocol(&env, &recipient, amount0, amount1);
        Ok((amount0, amount1))
    }

    /// Pre-allocate oracle slots so the ring can hold up to `observation_cardinality_next`
    /// observations. Requests above 65535 are capped.
    ///
    /// One call adds at most `MAX_OBSERVATION_GROWTH` slots to stay within the per-transaction
    /// ledger write limit; larger targets are reached by calling again.
    pub fn increase_obs_cardinality_next(
        env: Env,
        observation_cardinality_next: u32,
    ) -> Result<(), PoolError> {
        let _lock = PoolLock::acquire(&env)?;
        let config = read_config(&env)?;
        require_owner(&env, &config)?;

        let mut slot0 = read_slot0(&env)?;
        let old = slot0.observation_cardinality_next;
        let target = observation_cardinality_next
            .min(MAX_OBSERVATION_CARDINALITY)
            .min(old.saturating_add(MAX_OBSERVATION_GROWTH));
        let new = oracle::grow(&mut PoolStore::new(&env), old, target)?;
        slot0.observation_cardinality_next = new;
        write_slot0(&env, &slot0);

        if old != new {
            emit_increase_observation_cardinality_next(&env, old, new);
        }
        Ok(())
    }

    // ========================================================
    // ORACLE QUERIES
    // ========================================================

    /// Tick cumulative, seconds per liquidity and seconds accrued while the price was
    /// inside [tick_lower, tick_upper). Only differences between two snapshots of the same
    /// range are meaningful.
    pub fn snapshot_cumulatives_inside(
        env: Env,
        tick_lower: i32,
        tick_upper: i32,
    ) -> Result<CumulativesInside, PoolError> {
        let config = read_config(&env)?;
        validate_ticks(tick_lower, tick_upper, config.tick_spacing)?;
        let slot0 = read_slot0(&env)?;

        let store = PoolStore::new(&env);
        let lower = store.read_tick(tick_lower);
        let upper = store.read_tick(tick_upper);
        if !lower.initialized || !upper.initialized {
            return Err(PoolError::TickNotInitialized);
        }

        let (tick_cumulative, seconds_per_liquidity, seconds) = if slot0.tick < tick_lower {
            (
                lower.tick_cumulative_outside.wrapping_sub(upper.tick_cumulative_outside),
                lower
                    .seconds_per_liquidity_outside_x128
                    .wrapping_sub(upper.seconds_per_liquidity_outside_x128),
                lower.seconds_outside.wrapping_sub(upper.seconds_outside),
            )
        } else if slot0.tick < tick_upper {
            let time = ledger_time(&env);
            let (tick_cumulative, seconds_per_liquidity) = oracle::observe_single(
                &store,
                time,
                0,
                slot0.tick,
                slot0.observation_index,
                read_liquidity(&env),
                slot0.observation_cardinality,
            )?;
            (
                tick_cumulative
                    .wrapping_sub(lower.tick_cumulative_outside)
                    .wrapping_sub(upper.tick_cumulative_outside),
                seconds_per_liquidity
                    .wrapping_sub(lower.seconds_per_liquidity_outside_x128)
                    .wrapping_sub(upper.seconds_per_liquidity_outside_x128),
                time.wrapping_sub(lower.seconds_outside)
                    .wrapping_sub(upper.seconds_outside),
            )
        } else {
            (
                upper.tick_cumulative_outside.wrapping_sub(lower.tick_cumulative_outside),
                upper
                    .seconds_per_liquidity_outside_x128
                    .wrapping_sub(lower.seconds_per_liquidity_outside_x128),
                upper.seconds_outside.wrapping_sub(lower.seconds_outside),
            )
        };

        Ok(CumulativesInside {
            tick_cumulative_inside: tick_cumulative,
            secs_per_liq_inside_x128: to_sdk_u256(
                &env,
                seconds_per_liquidity & MAX_U160,
            ),
            seconds_inside: seconds,
        })
    }

    /// Cumulative tick and seconds per liquidity as of each `seconds_ago` before now.
    /// Fails as a whole if any entry predates the oldest observation.
    pub fn observe(
        env: Env,
        seconds_agos: Vec<u32>,
    ) -> Result<(Vec<i64>, Vec<U256>), PoolError> {
        let slot0 = read_slot0(&env)?;
        let liquidity = read_liquidity(&env);
        let time = ledger_time(&env);
        let store = PoolStore::new(&env);

        let mut tick_cumulatives = Vec::new(&env);
        let mut seconds_per_liquidity_cumulatives = Vec::new(&env);

        for seconds_ago in seconds_agos.iter() {
            let (tick_cumulative, seconds_per_liquidity) = oracle::observe_single(
                &store,
                time,
                seconds_ago,
                slot0.tick,
                slot0.observation_index,
                liquidity,
                slot0.observation_cardinality,
            )?;
            tick_cumulatives.push_back(tick_cumulative);
            seconds_per_liquidity_cumulatives.push_back(to_sdk_u256(&env, seconds_per_liquidity));
        }

        Ok((tick_cumulatives, seconds_per_liquidity_cumulatives))
    }

    // ========================================================
    // VIEW FUNCTIONS
    // ========================================================

    pub fn config(env: Env) -> Result<PoolConfig, PoolError> {
        read_config(&env)
    }

    pub fn slot0(env: Env) -> Result<Slot0, PoolError> {
        read_slot0(&env)
    }

    /// In-range liquidity
    pub fn liquidity(env: Env) -> u128 {
        read_liquidity(&env)
    }

    pub fn fee_growth_global_0_x128(env: Env) -> U256 {
        to_sdk_u256(&env, read_fee_growth_global(&env).0)
    }

    pub fn fee_growth_global_1_x128(env: Env) -> U256 {
        to_sdk_u256(&env, read_fee_growth_global(&env).1)
    }

    pub fn protocol_fees(env: Env) -> ProtocolFees {
        read_protocol_fees(&env)
    }

    pub fn ticks(env: Env, tick: i32) -> TickData {
        TickData::from_info(&env, &PoolStore::new(&env).read_tick(tick))
    }

    /// Bitmap word at `word_pos`; bit `i` is set when compressed tick `word_pos * 256 + i`
    /// is initialized
    pub fn tick_bitmap(env: Env, word_pos: i32) -> U256 {
        let word = i16::try_from(word_pos)
            .map(|pos| PoolStore::new(&env).read_tick_word(pos))
            .unwrap_or(ethnum::U256::ZERO);
        to_sdk_u256(&env, word)
    }

    pub fn positions(env: Env, owner: Address, tick_lower: i32, tick_upper: i32) -> PositionData {
        let key = PositionKey {
            owner,
            tick_lower,
            tick_upper,
        };
        PositionData::from_position(&env, &read_position(&env, &key))
    }

    pub fn observations(env: Env, index: u32) -> ObservationData {
        ObservationData::from_observation(&env, &PoolStore::new(&env).read_observation(index))
    }
}

// ========================================================
// POSITION MODIFICATION
// ========================================================

/// Apply a liquidity change to a position and the ticks bounding it.
///
/// Returns the updated (unsaved) position and the signed token amounts the change
/// requires: positive is owed to the pool, negative is released by it.
fn modify_position(
    env: &Env,
    config: &PoolConfig,
    slot0: &mut Slot0,
    key: &PositionKey,
    liquidity_delta: i128,
) -> Result<(Position, i128, i128), PoolError> {
    validate_ticks(key.tick_lower, key.tick_upper, config.tick_spacing)?;

    let mut store = PoolStore::new(env);
    let position = update_position_ledger(env, &mut store, config, slot0, key, liquidity_delta)?;

    let mut amount0 = 0;
    let mut amount1 = 0;

    if liquidity_delta != 0 {
        let sqrt_price_x96 = from_sdk_u256(&slot0.sqrt_price_x96);
        let sqrt_lower = get_sqrt_ratio_at_tick(key.tick_lower)?;
        let sqrt_upper = get_sqrt_ratio_at_tick(key.tick_upper)?;

        if slot0.tick < key.tick_lower {
            // Range is above the price: only token0 is needed
            amount0 = get_amount0_delta_signed(sqrt_lower, sqrt_upper, liquidity_delta)?;
        } else if slot0.tick < key.tick_upper {
            let liquidity_before = read_liquidity(env);

            let (index, cardinality) = oracle::write(
                &mut store,
                slot0.observation_index,
                ledger_time(env),
                slot0.tick,
                liquidity_before,
                slot0.observation_cardinality,
                slot0.observation_cardinality_next,
            );
            slot0.observation_index = index;
            slot0.observation_cardinality = cardinality;

            amount0 = get_amount0_delta_signed(sqrt_price_x96, sqrt_upper, liquidity_delta)?;
            amount1 = get_amount1_delta_signed(sqrt_lower, sqrt_price_x96, liquidity_delta)?;

            write_liquidity(env, add_delta(liquidity_before, liquidity_delta)?);
        } else {
            // Range is below the price: only token1 is needed
            amount1 = get_amount1_delta_signed(sqrt_lower, sqrt_upper, liquidity_delta)?;
        }
    }

    Ok((position, amount0, amount1))
}

/// Update both boundary ticks (flipping bitmap bits as needed) and settle fees owed to the
/// position up to now
fn update_position_ledger(
    env: &Env,
    store: &mut PoolStore<'_>,
    config: &PoolConfig,
    slot0: &Slot0,
    key: &PositionKey,
    liquidity_delta: i128,
) -> Result<Position, PoolError> {
    let mut position = read_position(env, key);
    let (fee_growth_global_0_x128, fee_growth_global_1_x128) = read_fee_growth_global(env);

    let mut flipped_lower = false;
    let mut flipped_upper = false;

    if liquidity_delta != 0 {
        let time = ledger_time(env);
        let (tick_cumulative, seconds_per_liquidity_cumulative_x128) = oracle::observe_single(
            store,
            time,
            0,
            slot0.tick,
            slot0.observation_index,
            read_liquidity(env),
            slot0.observation_cardinality,
        )?;

        let globals = GlobalSnapshot {
            fee_growth_global_0_x128,
            fee_growth_global_1_x128,
            seconds_per_liquidity_cumulative_x128,
            tick_cumulative,
            time,
        };

        flipped_lower = update_tick(
            store,
            key.tick_lower,
            slot0.tick,
            liquidity_delta,
            &globals,
            false,
            config.max_liquidity_per_tick,
        )?;
        flipped_upper = update_tick(
            store,
            key.tick_upper,
            slot0.tick,
            liquidity_delta,
            &globals,
            true,
            config.max_liquidity_per_tick,
        )?;

        if flipped_lower {
            flip_tick(store, key.tick_lower, config.tick_spacing)?;
        }
        if flipped_upper {
            flip_tick(store, key.tick_upper, config.tick_spacing)?;
        }
    }

    let (fee_growth_inside_0_x128, fee_growth_inside_1_x128) = get_fee_growth_inside(
        store,
        key.tick_lower,
        key.tick_upper,
        slot0.tick,
        fee_growth_global_0_x128,
        fee_growth_global_1_x128,
    );

    update_position(
        &mut position,
        liquidity_delta,
        fee_growth_inside_0_x128,
        fee_growth_inside_1_x128,
    )?;

    // Ticks that lost their last reference no longer need their snapshots
    if liquidity_delta < 0 {
        if flipped_lower {
            clear_tick(store, key.tick_lower);
        }
        if flipped_upper {
            clear_tick(store, key.tick_upper);
        }
    }

    Ok(position)
}

// ========================================================
// HELPER FUNCTIONS
// ========================================================

/// Ledger time truncated to 32 bits; the oracle compares timestamps modulo 2^32
#[inline]
fn ledger_time(env: &Env) -> u32 {
    env.ledger().timestamp() as u32
}

fn balance(env: &Env, token: &Address) -> i128 {
    token::Client::new(env, token).balance(&env.current_contract_address())
}

fn transfer_out(env: &Env, token: &Address, to: &Address, amount: i128) {
    token::Client::new(env, token).transfer(&env.current_contract_address(), to, &amount);
}

#[inline]
fn to_amount(value: u128) -> Result<i128, PoolError> {
    i128::try_from(value).map_err(|_| PoolError::Overflow)
}

#[inline]
fn checked_sum(balance: i128, amount: i128) -> Result<i128, PoolError> {
    balance.checked_add(amount).ok_or(PoolError::Overflow)
}

/// Split a fee into (liquidity provider share, protocol share) for a 1/N protocol fee
#[inline]
fn split_fee(paid: u128, fee_protocol: u32) -> (u128, u128) {
    let protocol_share = if fee_protocol == 0 {
        0
    } else {
        paid / fee_protocol as u128
    };
    (paid - protocol_share, protocol_share)
}

/// Notify the caller contract of what it owes. A failing callback is only logged; the
/// balance check that follows turns any shortfall into a settlement error.
fn invoke_callback(
    env: &Env,
    target: &Address,
    name: &str,
    amount0: i128,
    amount1: i128,
    data: &Bytes,
) {
    let callback = Symbol::new(env, name);
    let result = env.try_invoke_contract::<(), soroban_sdk::Error>(
        target,
        &callback,
        vec![
            env,
            amount0.into_val(env),
            amount1.into_val(env),
            data.clone().into_val(env),
        ],
    );

    if !matches!(result, Ok(Ok(()))) {
        log!(env, "callback failed", target.clone(), callback);
    }
}

/// Require the authorization of the registry owner
fn require_owner(env: &Env, config: &PoolConfig) -> Result<(), PoolError> {
    let result = env.try_invoke_contract::<Address, soroban_sdk::Error>(
        &config.factory,
        &Symbol::new(env, "owner"),
        Vec::new(env),
    );

    match result {
        Ok(Ok(owner)) => {
            owner.require_auth();
            Ok(())
        }
        _ => {
            log!(env, "registry owner lookup failed", config.factory.clone());
            Err(PoolError::Unauthorized)
        }
    }
}
