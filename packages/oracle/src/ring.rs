// Ring buffer maintenance and lookup

use ethnum::U256;
use tidepool_math::MAX_U160;
use crate::error::OracleError;
use crate::observation::{transform, Observation};

/// Timestamp written into pre-allocated slots so that later writes only overwrite
const SENTINEL_TIMESTAMP: u32 = 1;

pub trait ObservationStorage {
    fn read_observation(&self, index: u32) -> Observation;
    fn write_observation(&mut self, index: u32, observation: &Observation);
}

/// Seed slot 0. Returns `(cardinality, cardinality_next)`.
pub fn initialize<S: ObservationStorage>(store: &mut S, time: u32) -> (u32, u32) {
    store.write_observation(
        0,
        &Observation {
            block_timestamp: time,
            tick_cumulative: 0,
            seconds_per_liquidity_cumulative_x128: U256::ZERO,
            initialized: true,
        },
    );
    (1, 1)
}

/// Record an observation for `time` after the slot at `index`.
///
/// At most one observation is written per timestamp. A pending `cardinality_next` is
/// adopted only once the cursor reaches the end of the current ring.
/// Returns the updated `(index, cardinality)`.
pub fn write<S: ObservationStorage>(
    store: &mut S,
    index: u32,
    time: u32,
    tick: i32,
    liquidity: u128,
    cardinality: u32,
    cardinality_next: u32,
) -> (u32, u32) {
    let last = store.read_observation(index);

    if last.block_timestamp == time {
        return (index, cardinality);
    }

    let cardinality_updated = if cardinality_next > cardinality && index == cardinality - 1 {
        cardinality_next
    } else {
        cardinality
    };

    let index_updated = (index + 1) % cardinality_updated;
    store.write_observation(index_updated, &transform(&last, time, tick, liquidity));

    (index_updated, cardinality_updated)
}

/// Pre-allocate slots up to `next`. Capacity never shrinks; returns the new capacity.
pub fn grow<S: ObservationStorage>(store: &mut S, current: u32, next: u32) -> Result<u32, OracleError> {
    if current == 0 {
        return Err(OracleError::NotInitialized);
    }
    if next <= current {
        return Ok(current);
    }

    for index in current..next {
        store.write_observation(
            index,
            &Observation {
                block_timestamp: SENTINEL_TIMESTAMP,
                ..Observation::default()
            },
        );
    }

    Ok(next)
}

/// `a <= b` where both are assumed to be at or before `time`, modulo 2^32
fn lte(time: u32, a: u32, b: u32) -> bool {
    if a <= time && b <= time {
        return a <= b;
    }

    let a_adjusted = if a > time { a as u64 } else { a as u64 + (1u64 << 32) };
    let b_adjusted = if b > time { b as u64 } else { b as u64 + (1u64 << 32) };

    a_adjusted <= b_adjusted
}

/// Observations bracketing `target`, assuming `target` lies inside the retained window
fn binary_search<S: ObservationStorage>(
    store: &S,
    time: u32,
    target: u32,
    index: u32,
    cardinality: u32,
) -> (Observation, Observation) {
    // Oldest slot and newest slot, unrolled past the wrap
    let mut l = (index + 1) % cardinality;
    let mut r = l + cardinality - 1;

    loop {
        let i = (l + r) / 2;

        let before_or_at = store.read_observation(i % cardinality);
        if !before_or_at.initialized {
            l = i + 1;
            continue;
        }

        let at_or_after = store.read_observation((i + 1) % cardinality);
        let target_at_or_after = lte(time, before_or_at.block_timestamp, target);

        if target_at_or_after && lte(time, target, at_or_after.block_timestamp) {
            return (before_or_at, at_or_after);
        }

        if !target_at_or_after {
            r = i - 1;
        } else {
            l = i + 1;
        }
    }
}

fn get_surrounding_observations<S: ObservationStorage>(
    store: &S,
    time: u32,
    target: u32,
    tick: i32,
    index: u32,
    liquidity: u128,
    cardinality: u32,
) -> Result<(Observation, Observation), OracleError> {
    let newest = store.read_observation(index);

    if lte(time, newest.block_timestamp, target) {
        if newest.block_timestamp == target {
            return Ok((newest, newest));
        }
        return Ok((newest, transform(&newest, target, tick, liquidity)));
    }

    let mut oldest = store.read_observation((index + 1) % cardinality);
    if !oldest.initialized {
        oldest = store.read_observation(0);
    }

    if !lte(time, oldest.block_timestamp, target) {
        return Err(OracleError::TargetTooOld);
    }

    Ok(binary_search(store, time, target, index, cardinality))
}

/// Cumulative tick and seconds-per-liquidity as of `seconds_ago` before `time`.
///
/// `seconds_ago == 0` extrapolates the newest slot to `time`. Anything between two slots
/// is linearly interpolated.
pub fn observe_single<S: ObservationStorage>(
    store: &S,
    time: u32,
    seconds_ago: u32,
    tick: i32,
    index: u32,
    liquidity: u128,
    cardinality: u32,
) -> Result<(i64, U256), OracleError> {
    if cardinality == 0 {
        return Err(OracleError::NotInitialized);
    }

    if seconds_ago == 0 {
        let mut last = store.read_observation(index);
        if last.block_timestamp != time {
            last = transform(&last, time, tick, liquidity);
        }
        return Ok((last.tick_cumulative, last.seconds_per_liquidity_cumulative_x128));
    }

    let target = time.wrapping_sub(seconds_ago);
    let (before_or_at, at_or_after) =
        get_surrounding_observations(store, time, target, tick, index, liquidity, cardinality)?;

    if target == before_or_at.block_timestamp {
        Ok((
            before_or_at.tick_cumulative,
            before_or_at.seconds_per_liquidity_cumulative_x128,
        ))
    } else if target == at_or_after.block_timestamp {
        Ok((
            at_or_after.tick_cumulative,
            at_or_after.seconds_per_liquidity_cumulative_x128,
        ))
    } else {
        let observation_time_delta =
            at_or_after.block_timestamp.wrapping_sub(before_or_at.block_timestamp);
        let target_delta = target.wrapping_sub(before_or_at.block_timestamp);

        let tick_cumulative = before_or_at.tick_cumulative.wrapping_add(
            (at_or_after
                .tick_cumulative
                .wrapping_sub(before_or_at.tick_cumulative)
                / observation_time_delta as i64)
                .wrapping_mul(target_delta as i64),
        );

        let spl_delta = at_or_after
            .seconds_per_liquidity_cumulative_x128
            .wrapping_sub(before_or_at.seconds_per_liquidity_cumulative_x128)
            & MAX_U160;
        let seconds_per_liquidity = before_or_at
            .seconds_per_liquidity_cumulative_x128
            .wrapping_add(
                spl_delta * U256::new(target_delta as u128)
                    / U256::new(observation_time_delta as u128),
            )
            & MAX_U160;

        Ok((tick_cumulative, seconds_per_liquidity))
    }
}
