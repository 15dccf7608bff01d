mod common;

use soroban_sdk::Env;
use tidepool_factory::FactoryError;

#[test]
fn test_empty_registry() {
    let env = Env::default();
    env.mock_all_auths();

    let (client, _) = common::setup_factory(&env);
    let token_a = common::create_token(&env);
    let token_b = common::create_token(&env);

    assert_eq!(client.get_pool(&token_a, &token_b, &3_000), None);
    assert_eq!(client.pool_count(), 0);
}

#[test]
fn test_compute_pool_address_ignores_token_order() {
    let env = Env::default();
    env.mock_all_auths();

    let (client, _) = common::setup_factory(&env);
    let token_a = common::create_token(&env);
    let token_b = common::create_token(&env);

    assert_eq!(
        client.compute_pool_address(&token_a, &token_b, &3_000),
        client.compute_pool_address(&token_b, &token_a, &3_000)
    );
}

#[test]
fn test_compute_pool_address_differs_per_key() {
    let env = Env::default();
    env.mock_all_auths();

    let (client, _) = common::setup_factory(&env);
    let token_a = common::create_token(&env);
    let token_b = common::create_token(&env);
    let token_c = common::create_token(&env);

    let base = client.compute_pool_address(&token_a, &token_b, &3_000);
    assert_ne!(base, client.compute_pool_address(&token_a, &token_b, &500));
    assert_ne!(base, client.compute_pool_address(&token_a, &token_c, &3_000));
}

#[test]
fn test_compute_pool_address_depends_on_factory() {
    let env = Env::default();
    env.mock_all_auths();

    let (first, _) = common::setup_factory(&env);
    let (second, _) = common::setup_factory(&env);
    let token_a = common::create_token(&env);
    let token_b = common::create_token(&env);

    assert_ne!(
        first.compute_pool_address(&token_a, &token_b, &3_000),
        second.compute_pool_address(&token_a, &token_b, &3_000)
    );
}

#[test]
fn test_create_pool_rejects_identical_tokens() {
    let env = Env::default();
    env.mock_all_auths();

    let (client, _) = common::setup_factory(&env);
    let token = common::create_token(&env);

    assert_eq!(
        client.try_create_pool(&token, &token, &3_000),
        Err(Ok(FactoryError::IdenticalTokens))
    );
}

#[test]
fn test_create_pool_rejects_disabled_fee() {
    let env = Env::default();
    env.mock_all_auths();

    let (client, _) = common::setup_factory(&env);
    let token_a = common::create_token(&env);
    let token_b = common::create_token(&env);

    assert_eq!(
        client.try_create_pool(&token_a, &token_b, &2_500),
        Err(Ok(FactoryError::FeeNotEnabled))
    );
    assert_eq!(client.pool_count(), 0);
}
