// Mutual exclusion for mutating entry points

use soroban_sdk::{log, Env};

use crate::error::PoolError;
use crate::storage::{extend_instance_ttl, is_initialized, is_locked, set_locked};

/// Holds the pool lock for the lifetime of a mutating call and releases it on drop
pub struct PoolLock<'a> {
    env: &'a Env,
}

impl<'a> PoolLock<'a> {
    /// Fails with `NotInitialized` before the price is set and `Locked` while another call
    /// is in flight
    pub fn acquire(env: &'a Env) -> Result<Self, PoolError> {
        if !is_initialized(env) {
            return Err(PoolError::NotInitialized);
        }
        if is_locked(env) {
            log!(env, "pool locked, rejecting nested call");
            return Err(PoolError::Locked);
        }
        set_locked(env, true);
        extend_instance_ttl(env);
        Ok(Self { env })
    }
}

impl Drop for PoolLock<'_> {
    fn drop(&mut self) {
        set_locked(self.env, false);
    }
}
