//! Reward accrual arithmetic.
//!
//! Everything here is pure: callers load a [`PoolInfo`], ask for the
//! accrual at some height, and decide whether to persist it. Settlement and
//! the read-only `pending_reward` projection share [`accrue`], so the two can
//! never disagree.

use crate::{pool::PoolInfo, ContractError};

/// Fixed-point scale of `acc_reward_per_share`.
pub const PRECISION: i128 = 1_000_000_000_000;

/// Result of bringing a pool's accumulator up to a height.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Accrual {
    /// Reward units emitted over the settled span.
    pub minted: i128,
    pub acc_reward_per_share: i128,
}

/// Number of reward-weighted heights in `[from, to)`.
///
/// Heights before `start_height` earn nothing. Heights inside
/// `[start_height, end_height)` count `bonus_multiplier` times; heights at or
/// after `end_height` count once.
pub fn weighted_span(
    from: u32,
    to: u32,
    start_height: u32,
    end_height: u32,
    bonus_multiplier: u32,
) -> i128 {
    let from = from.max(start_height);
    if to <= from {
        return 0;
    }

    let bonus_to = to.min(end_height);
    let bonus = if bonus_to > from {
        (bonus_to - from) as i128 * bonus_multiplier as i128
    } else {
        0
    };

    let regular_from = from.max(end_height);
    let regular = if to > regular_from {
        (to - regular_from) as i128
    } else {
        0
    };

    bonus + regular
}

/// Accrual of `pool` from `last_accrual_height` up to `at_height`.
///
/// Returns the stored accumulator unchanged when `at_height` does not move
/// forward or when nothing is staked.
pub fn accrue(pool: &PoolInfo, at_height: u32) -> Result<Accrual, ContractError> {
    let unchanged = Accrual {
        minted: 0,
        acc_reward_per_share: pool.acc_reward_per_share,
    };
    if at_height <= pool.last_accrual_height || pool.total_staked <= 0 {
        return Ok(unchanged);
    }

    let span = weighted_span(
        pool.last_accrual_height,
        at_height,
        pool.start_height,
        pool.end_height,
        pool.bonus_multiplier,
    );
    let minted = pool
        .reward_rate
        .checked_mul(span)
        .ok_or(ContractError::ArithmeticOverflow)?;
    if minted <= 0 {
        return Ok(unchanged);
    }

    let per_share = minted
        .checked_mul(PRECISION)
        .ok_or(ContractError::ArithmeticOverflow)?
        / pool.total_staked;
    let acc_reward_per_share = pool
        .acc_reward_per_share
        .checked_add(per_share)
        .ok_or(ContractError::ArithmeticOverflow)?;

    Ok(Accrual {
        minted,
        acc_reward_per_share,
    })
}

/// `amount * acc_reward_per_share / PRECISION`; also the reward debt to store
/// after a settlement.
pub fn accumulated(amount: i128, acc_reward_per_share: i128) -> Result<i128, ContractError> {
    let scaled = amount
        .checked_mul(acc_reward_per_share)
        .ok_or(ContractError::ArithmeticOverflow)?;
    Ok(scaled / PRECISION)
}

/// Reward owed to a position at `acc_reward_per_share`. Never negative.
pub fn pending(
    amount: i128,
    acc_reward_per_share: i128,
    reward_debt: i128,
) -> Result<i128, ContractError> {
    let owed = accumulated(amount, acc_reward_per_share)?;
    Ok(owed.saturating_sub(reward_debt).max(0))
}
