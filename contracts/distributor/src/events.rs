#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

use crate::{pool::PoolInfo, RewardFunding};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the distributor is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub reward_token: Address,
    pub funding: RewardFunding,
    pub penalty_recipient: Address,
    pub height: u32,
}

/// Fired when the admin registers a new pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolAddedEvent {
    pub pool_id: u32,
    pub staked_token: Address,
    pub start_height: u32,
    pub end_height: u32,
    pub bonus_multiplier: u32,
    pub reward_rate: i128,
    pub height: u32,
}

/// Fired when a pool's bonus window or multiplier is replaced.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MultiplierUpdatedEvent {
    pub pool_id: u32,
    pub start_height: u32,
    pub end_height: u32,
    pub bonus_multiplier: u32,
    pub height: u32,
}

/// Fired when a pool's base reward rate is replaced.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardRateUpdatedEvent {
    pub pool_id: u32,
    pub reward_rate: i128,
    pub height: u32,
}

/// Fired whenever a settlement accrues a nonzero reward.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SettledEvent {
    pub pool_id: u32,
    pub minted: i128,
    pub acc_reward_per_share: i128,
    pub height: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub pool_id: u32,
    pub user: Address,
    pub amount: i128,
    pub new_total_staked: i128,
    pub height: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    pub pool_id: u32,
    pub user: Address,
    pub amount: i128,
    pub new_total_staked: i128,
    pub height: u32,
}

/// Fired on the forfeiting exit path. `fee` went to the penalty recipient.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawEvent {
    pub pool_id: u32,
    pub user: Address,
    pub returned: i128,
    pub fee: i128,
    pub height: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardPaidEvent {
    pub pool_id: u32,
    pub user: Address,
    pub amount: i128,
    pub height: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsFundedEvent {
    pub funder: Address,
    pub amount: i128,
    pub height: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PenaltyRecipientSetEvent {
    pub recipient: Address,
    pub height: u32,
}

/// Fired when an admin transfer is proposed.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferProposedEvent {
    pub current_admin: Address,
    pub proposed_admin: Address,
    pub height: u32,
}

/// Fired when an admin transfer is accepted.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferAcceptedEvent {
    pub old_admin: Address,
    pub new_admin: Address,
    pub height: u32,
}

/// Fired when a pending admin transfer is cancelled.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferCancelledEvent {
    pub admin: Address,
    pub cancelled_proposed: Address,
    pub height: u32,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    reward_token: Address,
    funding: RewardFunding,
    penalty_recipient: Address,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            reward_token,
            funding,
            penalty_recipient,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_pool_added(env: &Env, pool: &PoolInfo) {
    env.events().publish(
        (symbol_short!("POOL_ADD"), pool.id),
        PoolAddedEvent {
            pool_id: pool.id,
            staked_token: pool.staked_token.clone(),
            start_height: pool.start_height,
            end_height: pool.end_height,
            bonus_multiplier: pool.bonus_multiplier,
            reward_rate: pool.reward_rate,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_multiplier_updated(env: &Env, pool: &PoolInfo) {
    env.events().publish(
        (symbol_short!("MULT_UPD"), pool.id),
        MultiplierUpdatedEvent {
            pool_id: pool.id,
            start_height: pool.start_height,
            end_height: pool.end_height,
            bonus_multiplier: pool.bonus_multiplier,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_reward_rate_updated(env: &Env, pool_id: u32, reward_rate: i128) {
    env.events().publish(
        (symbol_short!("RATE_UPD"), pool_id),
        RewardRateUpdatedEvent {
            pool_id,
            reward_rate,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_settled(env: &Env, pool_id: u32, minted: i128, acc_reward_per_share: i128) {
    env.events().publish(
        (symbol_short!("SETTLED"), pool_id),
        SettledEvent {
            pool_id,
            minted,
            acc_reward_per_share,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_deposit(
    env: &Env,
    pool_id: u32,
    user: Address,
    amount: i128,
    new_total_staked: i128,
) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), pool_id, user.clone()),
        DepositEvent {
            pool_id,
            user,
            amount,
            new_total_staked,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_withdraw(
    env: &Env,
    pool_id: u32,
    user: Address,
    amount: i128,
    new_total_staked: i128,
) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), pool_id, user.clone()),
        WithdrawEvent {
            pool_id,
            user,
            amount,
            new_total_staked,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_emergency_withdraw(
    env: &Env,
    pool_id: u32,
    user: Address,
    returned: i128,
    fee: i128,
) {
    env.events().publish(
        (symbol_short!("EMRG_WD"), pool_id, user.clone()),
        EmergencyWithdrawEvent {
            pool_id,
            user,
            returned,
            fee,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_reward_paid(env: &Env, pool_id: u32, user: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("RWD_PAID"), pool_id, user.clone()),
        RewardPaidEvent {
            pool_id,
            user,
            amount,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_rewards_funded(env: &Env, funder: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("FUNDED"), funder.clone()),
        RewardsFundedEvent {
            funder,
            amount,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_penalty_recipient_set(env: &Env, recipient: Address) {
    env.events().publish(
        (symbol_short!("PEN_RCPT"),),
        PenaltyRecipientSetEvent {
            recipient,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_admin_transfer_proposed(env: &Env, current_admin: Address, proposed_admin: Address) {
    env.events().publish(
        (symbol_short!("ADM_PROP"), current_admin.clone()),
        AdminTransferProposedEvent {
            current_admin,
            proposed_admin,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_admin_transfer_accepted(env: &Env, old_admin: Address, new_admin: Address) {
    env.events().publish(
        (symbol_short!("ADM_ACPT"), new_admin.clone()),
        AdminTransferAcceptedEvent {
            old_admin,
            new_admin,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_admin_transfer_cancelled(env: &Env, admin: Address, cancelled_proposed: Address) {
    env.events().publish(
        (symbol_short!("ADM_CNCL"), admin.clone()),
        AdminTransferCancelledEvent {
            admin,
            cancelled_proposed,
            height: env.ledger().sequence(),
        },
    );
}
