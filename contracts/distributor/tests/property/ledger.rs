#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based tests over arbitrary interleavings of staking operations.
//!
//! Invariants tested after every step:
//! - `total_staked` equals the sum of all position amounts
//! - the distributor holds exactly `total_staked` of the staked token
//! - `acc_reward_per_share` and `last_accrual_height` never decrease
//! - `pending_reward` is zero right after the caller deposits or withdraws
//! - emergency withdrawal leaves an empty position with nothing pending
//! - settling twice at the same height changes nothing

use proptest::prelude::*;
use soroban_sdk::token::Client as TokenClient;

use crate::common::{set_height, setup, TestContext};

const USERS: usize = 3;
const START: u32 = 100;

#[derive(Clone, Debug)]
enum Action {
    Deposit { user: usize, amount: i128 },
    Withdraw { user: usize, amount: i128 },
    EmergencyWithdraw { user: usize },
    Advance { heights: u32 },
    Settle,
    UpdateMultiplier { multiplier: u32, window: u32 },
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => (0..USERS, 0i128..500).prop_map(|(user, amount)| Action::Deposit { user, amount }),
        2 => (0..USERS, 0i128..500).prop_map(|(user, amount)| Action::Withdraw { user, amount }),
        1 => (0..USERS).prop_map(|user| Action::EmergencyWithdraw { user }),
        3 => (1u32..40).prop_map(|heights| Action::Advance { heights }),
        1 => Just(Action::Settle),
        1 => (1u32..50, 1u32..400)
            .prop_map(|(multiplier, window)| Action::UpdateMultiplier { multiplier, window }),
    ]
}

fn total_positions(ctx: &TestContext) -> i128 {
    ctx.users
        .iter()
        .map(|user| ctx.client.user_info(&0, user).amount)
        .sum()
}

fn apply(ctx: &TestContext, height: &mut u32, action: &Action) {
    match *action {
        Action::Deposit { user, amount } => {
            let who = &ctx.users[user];
            ctx.client.deposit(who, &0, &amount);
            assert_eq!(ctx.client.pending_reward(&0, who), 0);
        }
        Action::Withdraw { user, amount } => {
            let who = &ctx.users[user];
            let staked = ctx.client.user_info(&0, who).amount;
            ctx.client.withdraw(who, &0, &amount.min(staked));
            assert_eq!(ctx.client.pending_reward(&0, who), 0);
        }
        Action::EmergencyWithdraw { user } => {
            let who = &ctx.users[user];
            ctx.client.emergency_withdraw(who, &0);
            assert_eq!(ctx.client.user_info(&0, who).amount, 0);
            assert_eq!(ctx.client.user_info(&0, who).reward_debt, 0);
            assert_eq!(ctx.client.pending_reward(&0, who), 0);
        }
        Action::Advance { heights } => {
            *height += heights;
            set_height(&ctx.env, *height);
        }
        Action::Settle => {
            ctx.client.settle(&0);
            let once = ctx.client.pool_info(&0);
            ctx.client.settle(&0);
            assert_eq!(ctx.client.pool_info(&0), once);
        }
        Action::UpdateMultiplier { multiplier, window } => {
            ctx.client
                .update_multiplier(&ctx.admin, &0, &START, &(START + window), &multiplier);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_ledger_invariants_hold(actions in prop::collection::vec(action(), 1..30)) {
        let ctx = setup(START, START + 200, 10, USERS);
        let mut height = START;
        set_height(&ctx.env, height);

        let stake = TokenClient::new(&ctx.env, &ctx.staked_token);
        let mut prev = ctx.client.pool_info(&0);

        for action in &actions {
            apply(&ctx, &mut height, action);

            let info = ctx.client.pool_info(&0);
            prop_assert_eq!(info.total_staked, total_positions(&ctx));
            prop_assert_eq!(stake.balance(&ctx.client.address), info.total_staked);
            prop_assert!(info.acc_reward_per_share >= prev.acc_reward_per_share);
            prop_assert!(info.last_accrual_height >= prev.last_accrual_height);
            for user in &ctx.users {
                prop_assert!(ctx.client.pending_reward(&0, user) >= 0);
            }
            prev = info;
        }
    }

    /// A lone staker collects every unit emitted while they are staked.
    #[test]
    fn prop_sole_staker_collects_full_emission(
        amount in 1i128..10_000,
        elapsed in 1u32..500,
        multiplier in 1u32..50,
    ) {
        let ctx = setup(START, START + 10_000, multiplier, 1);
        let alice = &ctx.users[0];

        set_height(&ctx.env, START);
        ctx.client.deposit(alice, &0, &amount);

        set_height(&ctx.env, START + elapsed);
        let expected = crate::common::RATE * elapsed as i128 * multiplier as i128;
        let pending = ctx.client.pending_reward(&0, alice);

        // Floor division may strand at most one unit per settlement.
        prop_assert!(pending <= expected);
        prop_assert!(expected - pending <= 1);
    }
}
