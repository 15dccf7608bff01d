#![allow(dead_code)]

use soroban_sdk::{testutils::Address as _, Address, BytesN, Env};
use tidepool_factory::{PoolFactory, PoolFactoryClient};

pub fn pool_wasm_hash(env: &Env) -> BytesN<32> {
    BytesN::from_array(env, &[7u8; 32])
}

pub fn setup_uninitialized(env: &Env) -> PoolFactoryClient<'_> {
    let factory_id = env.register(PoolFactory, ());
    PoolFactoryClient::new(env, &factory_id)
}

pub fn setup_factory(env: &Env) -> (PoolFactoryClient<'_>, Address) {
    let owner = Address::generate(env);
    let client = setup_uninitialized(env);
    client.initialize(&owner, &pool_wasm_hash(env));
    (client, owner)
}

pub fn create_token(env: &Env) -> Address {
    let admin = Address::generate(env);
    let token_id = env.register_stellar_asset_contract_v2(admin.clone());
    token_id.address()
}
