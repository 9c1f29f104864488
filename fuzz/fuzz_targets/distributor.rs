#![no_main]

use arbitrary::Arbitrary;
use distributor::{DistributorContract, DistributorContractClient, PoolConfig, RewardFunding};
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Deposit { user: u8, amount: u32 },
    Withdraw { user: u8, amount: u32 },
    EmergencyWithdraw { user: u8 },
    Advance { heights: u8 },
    Settle,
    UpdateMultiplier { start: u16, window: u16, multiplier: u8 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
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
    client.register_pool(
        &admin,
        &PoolConfig {
            staked_token: staked_token.clone(),
            start_height: 10,
            end_height: 500,
            bonus_multiplier: 10,
            reward_rate: 1_000,
            fee_numerator: 1,
            fee_denominator: 20,
            display_end_time: 0,
        },
    );

    let mut users = Vec::new();
    for _ in 0..4 {
        let user = Address::generate(&env);
        StellarAssetClient::new(&env, &staked_token).mint(&user, &i128::from(u64::MAX));
        TokenClient::new(&env, &staked_token).approve(
            &user,
            &contract_id,
            &i128::from(u64::MAX),
            &3_000,
        );
        users.push(user);
    }

    let mut height = 0u32;
    // Errors are fine; panics and broken invariants are not.
    for action in actions.into_iter().take(64) {
        match action {
            FuzzAction::Deposit { user, amount } => {
                let who = &users[user as usize % users.len()];
                let _ = client.try_deposit(who, &0, &i128::from(amount));
            }
            FuzzAction::Withdraw { user, amount } => {
                let who = &users[user as usize % users.len()];
                let _ = client.try_withdraw(who, &0, &i128::from(amount));
            }
            FuzzAction::EmergencyWithdraw { user } => {
                let who = &users[user as usize % users.len()];
                let _ = client.try_emergency_withdraw(who, &0);
            }
            FuzzAction::Advance { heights } => {
                // Stay well inside the default test-ledger entry TTL.
                height = (height + u32::from(heights)).min(2_900);
                env.ledger().set_sequence_number(height);
            }
            FuzzAction::Settle => {
                let _ = client.try_settle(&0);
            }
            FuzzAction::UpdateMultiplier {
                start,
                window,
                multiplier,
            } => {
                let start = u32::from(start);
                let _ = client.try_update_multiplier(
                    &admin,
                    &0,
                    &start,
                    &(start + u32::from(window)),
                    &u32::from(multiplier),
                );
            }
        }

        let info = client.pool_info(&0);
        let staked: i128 = users
            .iter()
            .map(|user| client.user_info(&0, user).amount)
            .sum();
        assert_eq!(info.total_staked, staked);
    }
});
