use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::{ContractError, TTL_EXTEND_TO, TTL_THRESHOLD};

// ── Storage keys ─────────────────────────────────────────────────────────────

const POOL: Symbol = symbol_short!("POOL");
const POOL_COUNT: Symbol = symbol_short!("POOL_CNT");

// ── Types ────────────────────────────────────────────────────────────────────

/// Parameters supplied by the admin when registering a pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    pub staked_token: Address,
    pub start_height: u32,
    pub end_height: u32,
    pub bonus_multiplier: u32,
    pub reward_rate: i128,
    pub fee_numerator: u32,
    pub fee_denominator: u32,
    /// Advisory wall-clock end for front-ends. Never read by accounting.
    pub display_end_time: u64,
}

/// A registered pool: its schedule plus the reward accumulators.
///
/// `acc_reward_per_share` is scaled by [`crate::rewards::PRECISION`] and only
/// ever grows. `last_accrual_height` only ever grows.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolInfo {
    pub id: u32,
    pub staked_token: Address,
    pub start_height: u32,
    pub end_height: u32,
    pub bonus_multiplier: u32,
    pub reward_rate: i128,
    pub last_accrual_height: u32,
    pub acc_reward_per_share: i128,
    pub total_staked: i128,
    pub fee_numerator: u32,
    pub fee_denominator: u32,
    pub display_end_time: u64,
}

impl PoolInfo {
    /// Builds a fresh pool. Accrual starts at the later of `current_height`
    /// and the configured start.
    pub fn new(id: u32, config: PoolConfig, current_height: u32) -> Self {
        PoolInfo {
            id,
            staked_token: config.staked_token,
            start_height: config.start_height,
            end_height: config.end_height,
            bonus_multiplier: config.bonus_multiplier,
            reward_rate: config.reward_rate,
            last_accrual_height: current_height.max(config.start_height),
            acc_reward_per_share: 0,
            total_staked: 0,
            fee_numerator: config.fee_numerator,
            fee_denominator: config.fee_denominator,
            display_end_time: config.display_end_time,
        }
    }

    /// Portion of `amount` withheld on emergency exit.
    pub fn emergency_fee(&self, amount: i128) -> Result<i128, ContractError> {
        emergency_fee(amount, self.fee_numerator, self.fee_denominator)
    }
}

// ── Validation ───────────────────────────────────────────────────────────────

pub fn validate_schedule(
    start_height: u32,
    end_height: u32,
    bonus_multiplier: u32,
) -> Result<(), ContractError> {
    if start_height >= end_height {
        return Err(ContractError::InvalidSchedule);
    }
    if bonus_multiplier == 0 {
        return Err(ContractError::InvalidInput);
    }
    Ok(())
}

/// A fee is either absent (`0/_`) or a fraction no greater than one.
pub fn validate_fee(fee_numerator: u32, fee_denominator: u32) -> Result<(), ContractError> {
    if fee_numerator == 0 {
        return Ok(());
    }
    if fee_denominator == 0 || fee_numerator > fee_denominator {
        return Err(ContractError::InvalidFee);
    }
    Ok(())
}

pub fn emergency_fee(
    amount: i128,
    fee_numerator: u32,
    fee_denominator: u32,
) -> Result<i128, ContractError> {
    if fee_numerator == 0 || fee_denominator == 0 || amount <= 0 {
        return Ok(0);
    }
    let scaled = amount
        .checked_mul(fee_numerator as i128)
        .ok_or(ContractError::ArithmeticOverflow)?;
    Ok(scaled / fee_denominator as i128)
}

// ── Storage helpers ──────────────────────────────────────────────────────────

fn pool_key(id: u32) -> (Symbol, u32) {
    (POOL, id)
}

pub fn pool_count(env: &Env) -> u32 {
    env.storage().instance().get(&POOL_COUNT).unwrap_or(0)
}

/// Reserves the next sequential pool id.
pub fn next_pool_id(env: &Env) -> Result<u32, ContractError> {
    let id = pool_count(env);
    let next = id.checked_add(1).ok_or(ContractError::ArithmeticOverflow)?;
    env.storage().instance().set(&POOL_COUNT, &next);
    Ok(id)
}

/// Reads a pool without touching its TTL; writers extend it in [`store_pool`].
pub fn load_pool(env: &Env, id: u32) -> Result<PoolInfo, ContractError> {
    env.storage()
        .persistent()
        .get(&pool_key(id))
        .ok_or(ContractError::PoolNotFound)
}

pub fn store_pool(env: &Env, pool: &PoolInfo) {
    let key = pool_key(pool.id);
    env.storage().persistent().set(&key, pool);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
