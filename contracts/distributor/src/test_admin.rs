extern crate std;

use soroban_sdk::{testutils::Address as _, Address, Env};

use crate::{
    ContractError, DistributorContract, DistributorContractClient, PoolConfig, RewardFunding,
};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn setup() -> (Env, DistributorContractClient<'static>, Address, PoolConfig) {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(DistributorContract, ());
    let client = DistributorContractClient::new(&env, &contract_id);

    let reward_token = env
        .register_stellar_asset_contract_v2(contract_id.clone())
        .address();
    let staked_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let admin = Address::generate(&env);
    client.initialize(
        &admin,
        &reward_token,
        &RewardFunding::Mint,
        &Address::generate(&env),
    );

    let config = PoolConfig {
        staked_token,
        start_height: 100,
        end_height: 10_000,
        bonus_multiplier: 20,
        reward_rate: 2,
        fee_numerator: 0,
        fee_denominator: 0,
        display_end_time: 0,
    };

    (env, client, admin, config)
}

// ── Privileged operations reject everyone but the admin ──────────────────────

#[test]
fn test_register_pool_by_non_admin_fails() {
    let (env, client, _admin, config) = setup();

    let intruder = Address::generate(&env);
    let result = client.try_register_pool(&intruder, &config);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(client.pool_length(), 0);
}

#[test]
fn test_update_multiplier_by_non_admin_fails() {
    let (env, client, admin, config) = setup();
    client.register_pool(&admin, &config);

    let intruder = Address::generate(&env);
    let result = client.try_update_multiplier(&intruder, &0, &100, &10_000, &40);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(client.pool_info(&0).bonus_multiplier, 20);
}

#[test]
fn test_set_reward_rate_by_non_admin_fails() {
    let (env, client, admin, config) = setup();
    client.register_pool(&admin, &config);

    let intruder = Address::generate(&env);
    let result = client.try_set_reward_rate(&intruder, &0, &999);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(client.pool_info(&0).reward_rate, 2);
}

#[test]
fn test_set_penalty_recipient() {
    let (env, client, admin, _config) = setup();

    let recipient = Address::generate(&env);
    client.set_penalty_recipient(&admin, &recipient);
    assert_eq!(client.penalty_recipient(), recipient);

    let intruder = Address::generate(&env);
    let result = client.try_set_penalty_recipient(&intruder, &intruder);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(client.penalty_recipient(), recipient);
}

// ── Two-step admin transfer ──────────────────────────────────────────────────

#[test]
fn test_admin_transfer_propose_and_accept() {
    let (env, client, admin, config) = setup();
    let successor = Address::generate(&env);

    client.propose_admin(&admin, &successor);
    assert_eq!(client.get_pending_admin(), Some(successor.clone()));
    // Nothing changes until the successor accepts.
    assert_eq!(client.get_admin(), admin);

    client.accept_admin(&successor);
    assert_eq!(client.get_admin(), successor);
    assert_eq!(client.get_pending_admin(), None);

    // The old admin has lost its privileges, the new one has them.
    let result = client.try_register_pool(&admin, &config);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(client.register_pool(&successor, &config), 0);
}

#[test]
fn test_propose_admin_by_non_admin_fails() {
    let (env, client, _admin, _config) = setup();

    let intruder = Address::generate(&env);
    let result = client.try_propose_admin(&intruder, &intruder);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(client.get_pending_admin(), None);
}

#[test]
fn test_accept_admin_by_wrong_address_fails() {
    let (env, client, admin, _config) = setup();
    let successor = Address::generate(&env);
    let intruder = Address::generate(&env);

    client.propose_admin(&admin, &successor);

    let result = client.try_accept_admin(&intruder);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(client.get_admin(), admin);
}

#[test]
fn test_accept_admin_without_proposal_fails() {
    let (env, client, _admin, _config) = setup();

    let result = client.try_accept_admin(&Address::generate(&env));
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidInput),
        _ => unreachable!("Expected InvalidInput error"),
    }
}

#[test]
fn test_cancel_admin_transfer() {
    let (env, client, admin, _config) = setup();
    let successor = Address::generate(&env);

    client.propose_admin(&admin, &successor);
    client.cancel_admin_transfer(&admin);
    assert_eq!(client.get_pending_admin(), None);

    let result = client.try_accept_admin(&successor);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidInput),
        _ => unreachable!("Expected InvalidInput error"),
    }

    let result = client.try_cancel_admin_transfer(&admin);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidInput),
        _ => unreachable!("Expected InvalidInput error"),
    }
}
