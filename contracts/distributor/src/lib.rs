#![no_std]

pub mod events;
pub mod pool;
pub mod position;
pub mod rewards;

use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, token, Address, Env, Symbol};

pub use pool::{PoolConfig, PoolInfo};
pub use position::UserPosition;

// ── Storage key constants ────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const PENDING_ADMIN: Symbol = symbol_short!("PEND_ADM");
const INITIALIZED: Symbol = symbol_short!("INIT");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const FUNDING: Symbol = symbol_short!("FUNDING");
const PENALTY_RECIPIENT: Symbol = symbol_short!("PEN_RCPT");

pub(crate) const TTL_THRESHOLD: u32 = 120_960;
pub(crate) const TTL_EXTEND_TO: u32 = 518_400;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    InvalidSchedule = 5,
    PoolNotFound = 6,
    InsufficientStake = 7,
    InsufficientBalance = 8,
    InsufficientAllowance = 9,
    InvalidFee = 10,
    TokensIdentical = 11,
    ArithmeticOverflow = 12,
}

// ── Public-facing types ──────────────────────────────────────────────────────

/// Where settled rewards come from.
///
/// - `Mint`      – the distributor is the reward token's admin and mints each
///                 settlement's emission into its own balance.
/// - `Prefunded` – rewards are paid out of a balance topped up beforehand via
///                 `fund_rewards`; payouts fail once it runs dry.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum RewardFunding {
    Mint = 0,
    Prefunded = 1,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct DistributorContract;

#[contractimpl]
impl DistributorContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the distributor.
    ///
    /// * `reward_token`      – token paid out by every pool.
    /// * `funding`           – whether rewards are minted or prefunded.
    /// * `penalty_recipient` – receives emergency-withdraw fees.
    pub fn initialize(
        env: Env,
        admin: Address,
        reward_token: Address,
        funding: RewardFunding,
        penalty_recipient: Address,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&REWARD_TOKEN, &reward_token);
        env.storage().instance().set(&FUNDING, &funding);
        env.storage()
            .instance()
            .set(&PENALTY_RECIPIENT, &penalty_recipient);
        Self::extend_instance_ttl(&env);

        events::publish_initialized(&env, admin, reward_token, funding, penalty_recipient);

        Ok(())
    }

    // ── Pool administration ─────────────────────────────────────────────────

    /// Register a new pool and return its id. Ids are assigned 0, 1, 2, …
    pub fn register_pool(
        env: Env,
        caller: Address,
        config: PoolConfig,
    ) -> Result<u32, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        pool::validate_schedule(
            config.start_height,
            config.end_height,
            config.bonus_multiplier,
        )?;
        if config.reward_rate < 0 {
            return Err(ContractError::InvalidInput);
        }
        pool::validate_fee(config.fee_numerator, config.fee_denominator)?;
        if config.staked_token == Self::load_reward_token(&env)? {
            return Err(ContractError::TokensIdentical);
        }

        let id = pool::next_pool_id(&env)?;
        let info = PoolInfo::new(id, config, Self::current_height(&env));
        pool::store_pool(&env, &info);
        Self::extend_instance_ttl(&env);

        events::publish_pool_added(&env, &info);

        Ok(id)
    }

    /// Replace a pool's bonus window and multiplier.
    ///
    /// The pool is settled under the old schedule first, so reward earned
    /// so far keeps the multiplier it was earned under.
    pub fn update_multiplier(
        env: Env,
        caller: Address,
        pool_id: u32,
        start_height: u32,
        end_height: u32,
        bonus_multiplier: u32,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let mut info = pool::load_pool(&env, pool_id)?;
        pool::validate_schedule(start_height, end_height, bonus_multiplier)?;

        Self::settle_pool(&env, &mut info)?;

        // A pool that has not started yet accrues from its new start.
        let now = Self::current_height(&env);
        if info.last_accrual_height > now {
            info.last_accrual_height = now.max(start_height);
        }

        info.start_height = start_height;
        info.end_height = end_height;
        info.bonus_multiplier = bonus_multiplier;
        pool::store_pool(&env, &info);

        events::publish_multiplier_updated(&env, &info);

        Ok(())
    }

    /// Replace a pool's base reward rate, settling at the old rate first.
    pub fn set_reward_rate(
        env: Env,
        caller: Address,
        pool_id: u32,
        reward_rate: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        if reward_rate < 0 {
            return Err(ContractError::InvalidInput);
        }

        let mut info = pool::load_pool(&env, pool_id)?;
        Self::settle_pool(&env, &mut info)?;
        info.reward_rate = reward_rate;
        pool::store_pool(&env, &info);

        events::publish_reward_rate_updated(&env, pool_id, reward_rate);

        Ok(())
    }

    pub fn set_penalty_recipient(
        env: Env,
        caller: Address,
        recipient: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        env.storage().instance().set(&PENALTY_RECIPIENT, &recipient);

        events::publish_penalty_recipient_set(&env, recipient);

        Ok(())
    }

    // ── Accrual ─────────────────────────────────────────────────────────────

    /// Bring a pool's accumulator up to the current height. Anyone may call.
    pub fn settle(env: Env, pool_id: u32) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;

        let mut info = pool::load_pool(&env, pool_id)?;
        Self::settle_pool(&env, &mut info)?;
        pool::store_pool(&env, &info);

        Ok(())
    }

    /// Settle every registered pool.
    pub fn settle_all(env: Env) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;

        for pool_id in 0..pool::pool_count(&env) {
            let mut info = pool::load_pool(&env, pool_id)?;
            Self::settle_pool(&env, &mut info)?;
            pool::store_pool(&env, &info);
        }

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` of the pool's staked token.
    ///
    /// Pending reward on the existing position is paid out first. A zero
    /// `amount` only pays out.
    pub fn deposit(
        env: Env,
        user: Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();

        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        let mut info = pool::load_pool(&env, pool_id)?;
        Self::settle_pool(&env, &mut info)?;

        let mut position = position::load_position(&env, pool_id, &user);
        if position.amount > 0 {
            let owed = rewards::pending(
                position.amount,
                info.acc_reward_per_share,
                position.reward_debt,
            )?;
            Self::pay_reward(&env, pool_id, &user, owed)?;
        }

        if amount > 0 {
            Self::pull_stake(&env, &info.staked_token, &user, amount)?;
            position.amount = position
                .amount
                .checked_add(amount)
                .ok_or(ContractError::ArithmeticOverflow)?;
            info.total_staked = info
                .total_staked
                .checked_add(amount)
                .ok_or(ContractError::ArithmeticOverflow)?;
        }

        position.reward_debt = rewards::accumulated(position.amount, info.acc_reward_per_share)?;
        position::store_position(&env, pool_id, &user, &position);
        pool::store_pool(&env, &info);

        events::publish_deposit(&env, pool_id, user, amount, info.total_staked);

        Ok(())
    }

    /// Withdraw `amount` of staked token, paying out pending reward.
    pub fn withdraw(
        env: Env,
        user: Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();

        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        let mut info = pool::load_pool(&env, pool_id)?;
        let mut position = position::load_position(&env, pool_id, &user);
        if amount > position.amount {
            return Err(ContractError::InsufficientStake);
        }

        Self::settle_pool(&env, &mut info)?;

        let owed = rewards::pending(
            position.amount,
            info.acc_reward_per_share,
            position.reward_debt,
        )?;
        Self::pay_reward(&env, pool_id, &user, owed)?;

        position.amount -= amount;
        info.total_staked = info
            .total_staked
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        position.reward_debt = rewards::accumulated(position.amount, info.acc_reward_per_share)?;
        position::store_position(&env, pool_id, &user, &position);
        pool::store_pool(&env, &info);

        if amount > 0 {
            token::Client::new(&env, &info.staked_token).transfer(
                &env.current_contract_address(),
                &user,
                &amount,
            );
        }

        events::publish_withdraw(&env, pool_id, user, amount, info.total_staked);

        Ok(())
    }

    /// Return the caller's whole stake without settling or paying reward.
    ///
    /// Pending reward is forfeited. If the pool carries a fee, that share of
    /// the stake goes to the penalty recipient. Returns the amount sent back
    /// to `user`.
    pub fn emergency_withdraw(
        env: Env,
        user: Address,
        pool_id: u32,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();

        let mut info = pool::load_pool(&env, pool_id)?;
        let position = position::load_position(&env, pool_id, &user);

        let amount = position.amount;
        let fee = info.emergency_fee(amount)?;
        let returned = amount - fee;

        info.total_staked = info
            .total_staked
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        position::store_position(&env, pool_id, &user, &UserPosition::default());
        pool::store_pool(&env, &info);

        // Checks-effects-interactions: position is cleared before any transfer.
        let staked = token::Client::new(&env, &info.staked_token);
        let this = env.current_contract_address();
        if fee > 0 {
            staked.transfer(&this, &Self::load_penalty_recipient(&env)?, &fee);
        }
        if returned > 0 {
            staked.transfer(&this, &user, &returned);
        }

        events::publish_emergency_withdraw(&env, pool_id, user, returned, fee);

        Ok(returned)
    }

    /// Top up the reward balance used by `Prefunded` distributors.
    pub fn fund_rewards(env: Env, funder: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        funder.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }

        let reward = token::Client::new(&env, &Self::load_reward_token(&env)?);
        if reward.balance(&funder) < amount {
            return Err(ContractError::InsufficientBalance);
        }
        reward.transfer(&funder, &env.current_contract_address(), &amount);

        events::publish_rewards_funded(&env, funder, amount);

        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Reward `user` could collect from `pool_id` right now. Read-only.
    pub fn pending_reward(env: Env, pool_id: u32, user: Address) -> Result<i128, ContractError> {
        let info = pool::load_pool(&env, pool_id)?;
        let accrual = rewards::accrue(&info, Self::current_height(&env))?;
        let position = position::load_position(&env, pool_id, &user);

        rewards::pending(
            position.amount,
            accrual.acc_reward_per_share,
            position.reward_debt,
        )
    }

    pub fn pool_info(env: Env, pool_id: u32) -> Result<PoolInfo, ContractError> {
        pool::load_pool(&env, pool_id)
    }

    pub fn user_info(env: Env, pool_id: u32, user: Address) -> UserPosition {
        position::load_position(&env, pool_id, &user)
    }

    pub fn pool_length(env: Env) -> u32 {
        pool::pool_count(&env)
    }

    pub fn reward_token(env: Env) -> Result<Address, ContractError> {
        Self::load_reward_token(&env)
    }

    pub fn funding(env: Env) -> Result<RewardFunding, ContractError> {
        Self::load_funding(&env)
    }

    pub fn penalty_recipient(env: Env) -> Result<Address, ContractError> {
        Self::load_penalty_recipient(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)
    }

    // ── Admin transfer (two-step) ──────────────────────────────────────────

    /// Propose a new admin address. Only the current admin can call this.
    /// The new admin must call `accept_admin` to complete the transfer.
    pub fn propose_admin(
        env: Env,
        current_admin: Address,
        new_admin: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_admin.require_auth();
        Self::require_admin(&env, &current_admin)?;

        env.storage().instance().set(&PENDING_ADMIN, &new_admin);

        events::publish_admin_transfer_proposed(&env, current_admin, new_admin);

        Ok(())
    }

    /// Accept the pending admin transfer. Only the proposed new admin can call this.
    pub fn accept_admin(env: Env, new_admin: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        new_admin.require_auth();

        let pending: Address = env
            .storage()
            .instance()
            .get(&PENDING_ADMIN)
            .ok_or(ContractError::InvalidInput)?;

        if new_admin != pending {
            return Err(ContractError::Unauthorized);
        }

        let old_admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)?;

        env.storage().instance().set(&ADMIN, &new_admin);
        env.storage().instance().remove(&PENDING_ADMIN);

        events::publish_admin_transfer_accepted(&env, old_admin, new_admin);

        Ok(())
    }

    /// Cancel a pending admin transfer. Only the current admin can call this.
    pub fn cancel_admin_transfer(env: Env, current_admin: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_admin.require_auth();
        Self::require_admin(&env, &current_admin)?;

        let pending: Address = env
            .storage()
            .instance()
            .get(&PENDING_ADMIN)
            .ok_or(ContractError::InvalidInput)?;

        env.storage().instance().remove(&PENDING_ADMIN);

        events::publish_admin_transfer_cancelled(&env, current_admin, pending);

        Ok(())
    }

    pub fn get_pending_admin(env: Env) -> Option<Address> {
        env.storage().instance().get(&PENDING_ADMIN)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// The chain height every schedule is measured in.
    fn current_height(env: &Env) -> u32 {
        env.ledger().sequence()
    }

    fn extend_instance_ttl(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
    }

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)?;
        if *caller != admin {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    fn load_reward_token(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(ContractError::NotInitialized)
    }

    fn load_funding(env: &Env) -> Result<RewardFunding, ContractError> {
        env.storage()
            .instance()
            .get(&FUNDING)
            .ok_or(ContractError::NotInitialized)
    }

    fn load_penalty_recipient(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&PENALTY_RECIPIENT)
            .ok_or(ContractError::NotInitialized)
    }

    /// Bring `info` up to the current height in memory. The caller persists it.
    ///
    /// In `Mint` mode the emission is minted into the distributor's own
    /// balance; a failing mint traps and aborts the whole invocation.
    fn settle_pool(env: &Env, info: &mut PoolInfo) -> Result<(), ContractError> {
        let height = Self::current_height(env);
        if height <= info.last_accrual_height {
            return Ok(());
        }

        let accrual = rewards::accrue(info, height)?;
        if accrual.minted > 0 {
            if Self::load_funding(env)? == RewardFunding::Mint {
                token::StellarAssetClient::new(env, &Self::load_reward_token(env)?)
                    .mint(&env.current_contract_address(), &accrual.minted);
            }
            events::publish_settled(env, info.id, accrual.minted, accrual.acc_reward_per_share);
        }

        info.acc_reward_per_share = accrual.acc_reward_per_share;
        info.last_accrual_height = height;

        Ok(())
    }

    /// Pull `amount` of `staked_token` from `from` using its allowance.
    fn pull_stake(
        env: &Env,
        staked_token: &Address,
        from: &Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        let client = token::Client::new(env, staked_token);
        let this = env.current_contract_address();

        if client.balance(from) < amount {
            return Err(ContractError::InsufficientBalance);
        }
        if client.allowance(from, &this) < amount {
            return Err(ContractError::InsufficientAllowance);
        }
        client.transfer_from(&this, from, &this, &amount);

        Ok(())
    }

    /// Transfer `amount` of reward token from the distributor to `to`.
    ///
    /// Floor rounding of individual reward debts can leave a payout a few
    /// units above what settlements minted. `Mint` distributors mint that
    /// shortfall; `Prefunded` ones fail with `InsufficientBalance`.
    fn pay_reward(
        env: &Env,
        pool_id: u32,
        to: &Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        if amount <= 0 {
            return Ok(());
        }

        let reward_token = Self::load_reward_token(env)?;
        let reward = token::Client::new(env, &reward_token);
        let this = env.current_contract_address();
        let available = reward.balance(&this);
        if available < amount {
            if Self::load_funding(env)? != RewardFunding::Mint {
                return Err(ContractError::InsufficientBalance);
            }
            token::StellarAssetClient::new(env, &reward_token).mint(&this, &(amount - available));
        }
        reward.transfer(&this, to, &amount);

        events::publish_reward_paid(env, pool_id, to.clone(), amount);

        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_admin;
