use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::{TTL_EXTEND_TO, TTL_THRESHOLD};

// Per-user persistent storage uses tuple keys: (prefix, pool_id, user)
const POSITION: Symbol = symbol_short!("POS");

/// A user's stake in one pool. An absent entry is the zero position.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserPosition {
    pub amount: i128,
    /// `amount * acc_reward_per_share / PRECISION` at the last settlement.
    pub reward_debt: i128,
}

fn position_key(pool_id: u32, user: &Address) -> (Symbol, u32, Address) {
    (POSITION, pool_id, user.clone())
}

pub fn load_position(env: &Env, pool_id: u32, user: &Address) -> UserPosition {
    env.storage()
        .persistent()
        .get(&position_key(pool_id, user))
        .unwrap_or_default()
}

pub fn store_position(env: &Env, pool_id: u32, user: &Address, position: &UserPosition) {
    let key = position_key(pool_id, user);
    env.storage().persistent().set(&key, position);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
