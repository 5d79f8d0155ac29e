#![no_std]

pub mod accumulator;
pub mod cap;
pub mod dividends;
pub mod events;
pub mod positions;
pub mod storage;

use common::roles::{self, Permission, Role};
use common::ttl;
use common::{CommonError, EmissionPolicyClient, EquityTokenClient};
use soroban_sdk::{contract, contractimpl, token, Address, Env, Vec};

use accumulator::{Eligibility, GlobalAccumulator, PoolAccumulator, Rolled};
use dividends::HolderSnapshot;
use positions::Position;
use storage::{LockupConfig, INITIALIZED};

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    /// Caller lacks the role the operation requires.
    IllegalAccess = 3,
    /// Caller does not own the position.
    IllegalSender = 4,
    IllegalAmount = 5,
    InsufficientStake = 6,
    InsufficientBalance = 7,
    PoolNotEligible = 8,
    NoWithdrawableAmount = 9,
    PositionNotFound = 10,
    TokensIdentical = 11,
    /// The account has no role to revoke.
    RoleNotHeld = 12,
}

impl From<CommonError> for ContractError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::AccessDenied => ContractError::IllegalAccess,
            CommonError::RoleNotHeld => ContractError::RoleNotHeld,
        }
    }
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct LockupContract;

#[contractimpl]
impl LockupContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the engine.
    ///
    /// * `governor`     – receives the `Governance` role.
    /// * `stake_token`  – token locked into positions.
    /// * `reward_token` – token rewards and dividends are paid in; the engine
    ///                    pays from its own balance, funded externally.
    /// * `policy`       – emission policy; also seeds the cap ceiling.
    /// * `registry`     – pool registry; should bind this engine so it is
    ///                    told about eligibility flips.
    /// * `treasury`     – recipient of the treasury share.
    pub fn initialize(
        env: Env,
        governor: Address,
        stake_token: Address,
        reward_token: Address,
        policy: Address,
        registry: Address,
        treasury: Address,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if stake_token == reward_token {
            return Err(ContractError::TokensIdentical);
        }

        let cap = EmissionPolicyClient::new(&env, &policy).cap_ceiling();
        let config = LockupConfig {
            stake_token: stake_token.clone(),
            reward_token: reward_token.clone(),
            policy: policy.clone(),
            registry: registry.clone(),
            treasury,
        };

        env.storage().instance().set(&INITIALIZED, &true);
        storage::store_config(&env, &config);
        cap::set_ceiling(&env, cap.max(0));
        accumulator::store_global(
            &env,
            &GlobalAccumulator {
                last_rolled_at: env.ledger().timestamp(),
                policy_version: 1,
                ..GlobalAccumulator::default()
            },
        );
        roles::bootstrap(&env, &governor);

        events::publish_initialized(
            &env,
            governor,
            stake_token,
            reward_token,
            policy,
            registry,
            cap,
        );

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Lock `amount` into `pool`. Tops up the position `account` already
    /// holds there, or mints a new one. Returns the position id.
    pub fn deposit_to_pool(
        env: Env,
        account: Address,
        pool: Address,
        amount: i128,
    ) -> Result<u64, ContractError> {
        account.require_auth();
        let cfg = storage::load_config(&env)?;

        let eligibility = Eligibility::query(&env, &cfg, &pool);
        if !eligibility.pool_eligible {
            return Err(ContractError::PoolNotEligible);
        }
        Self::check_deposit(&env, &cfg, &account, amount)?;
        let rolled = accumulator::roll_forward(&env, &cfg, &pool, eligibility);

        let position = match positions::position_of(&env, &account, &pool) {
            Some(id) => positions::get(&env, id).ok_or(ContractError::PositionNotFound)?,
            None => positions::mint(&env, &account, &pool, rolled.pool.interest_price),
        };

        Self::deposit_into(&env, &cfg, &account, position, rolled, amount)
    }

    /// Lock `amount` into an existing position owned by `account`.
    pub fn deposit_to_position(
        env: Env,
        account: Address,
        position_id: u64,
        amount: i128,
    ) -> Result<u64, ContractError> {
        account.require_auth();
        let cfg = storage::load_config(&env)?;

        let position = positions::get(&env, position_id).ok_or(ContractError::PositionNotFound)?;
        if position.owner != account {
            return Err(ContractError::IllegalSender);
        }

        let eligibility = Eligibility::query(&env, &cfg, &position.pool);
        if !eligibility.pool_eligible {
            return Err(ContractError::PoolNotEligible);
        }
        Self::check_deposit(&env, &cfg, &account, amount)?;
        let rolled = accumulator::roll_forward(&env, &cfg, &position.pool, eligibility);

        Self::deposit_into(&env, &cfg, &account, position, rolled, amount)
    }

    /// Withdraw `amount` of principal from a position and flush its whole
    /// accrued reward. `amount == 0` only flushes the reward.
    ///
    /// The reward is paid up to the engine's free reward balance; any
    /// shortfall stays on the position as `pending_reward`. Returns the
    /// reward paid.
    pub fn withdraw_by_position(
        env: Env,
        account: Address,
        position_id: u64,
        amount: i128,
    ) -> Result<i128, ContractError> {
        account.require_auth();
        let cfg = storage::load_config(&env)?;

        if amount < 0 {
            return Err(ContractError::IllegalAmount);
        }
        let mut position =
            positions::get(&env, position_id).ok_or(ContractError::PositionNotFound)?;
        if position.owner != account {
            return Err(ContractError::IllegalSender);
        }
        if amount > position.amount {
            return Err(ContractError::InsufficientStake);
        }

        let eligibility = Eligibility::query(&env, &cfg, &position.pool);
        let mut rolled = accumulator::roll_forward(&env, &cfg, &position.pool, eligibility);

        let owed = position.reward_owed(rolled.pool.interest_price);
        if amount == 0 && owed == 0 {
            return Err(ContractError::NoWithdrawableAmount);
        }

        let reserve = Self::free_reward_balance(&env, &cfg, &rolled.global);
        let paid = owed.min(reserve).max(0);
        let carried = owed.saturating_sub(paid);

        position.price_snapshot = rolled.pool.interest_price;
        position.cumulative_reward = 0;
        position.pending_reward = carried;
        position.amount = position.amount.saturating_sub(amount);
        rolled.unlock(amount);

        positions::update(&env, &position);
        rolled.persist(&env);

        let here = env.current_contract_address();
        if amount > 0 {
            token::Client::new(&env, &cfg.stake_token).transfer(&here, &account, &amount);
        }
        if paid > 0 {
            token::Client::new(&env, &cfg.reward_token).transfer(&here, &account, &paid);
        }

        events::publish_withdrawn(
            &env,
            position.pool,
            account,
            position_id,
            amount,
            paid,
            carried,
        );

        Ok(paid)
    }

    // ── Position ledger ─────────────────────────────────────────────────────

    /// Hand a position to `to`. The position's reward entitlement moves with
    /// it untouched; nothing is settled or rolled.
    pub fn transfer_position(
        env: Env,
        from: Address,
        to: Address,
        position_id: u64,
    ) -> Result<(), ContractError> {
        storage::require_initialized(&env)?;
        from.require_auth();

        let mut position =
            positions::get(&env, position_id).ok_or(ContractError::PositionNotFound)?;
        if position.owner != from {
            return Err(ContractError::IllegalSender);
        }
        if from == to {
            return Ok(());
        }

        positions::transfer(&env, &mut position, &to);
        events::publish_position_transferred(&env, position_id, from, to);
        Ok(())
    }

    pub fn get_position(env: Env, position_id: u64) -> Result<Position, ContractError> {
        positions::get(&env, position_id).ok_or(ContractError::PositionNotFound)
    }

    pub fn owner_of(env: Env, position_id: u64) -> Result<Address, ContractError> {
        Ok(positions::get(&env, position_id)
            .ok_or(ContractError::PositionNotFound)?
            .owner)
    }

    pub fn position_of(env: Env, owner: Address, pool: Address) -> Option<u64> {
        positions::position_of(&env, &owner, &pool)
    }

    pub fn positions_of_owner(env: Env, owner: Address) -> Vec<u64> {
        positions::positions_of_owner(&env, &owner)
    }

    pub fn positions_of_pool(env: Env, pool: Address) -> Vec<u64> {
        positions::positions_of_pool(&env, &pool)
    }

    pub fn owner_position_count(env: Env, owner: Address) -> u32 {
        positions::owner_count(&env, &owner)
    }

    pub fn owner_position_at(env: Env, owner: Address, index: u32) -> Option<u64> {
        positions::owner_position_at(&env, &owner, index)
    }

    pub fn pool_position_count(env: Env, pool: Address) -> u32 {
        positions::pool_count(&env, &pool)
    }

    pub fn pool_position_at(env: Env, pool: Address, index: u32) -> Option<u64> {
        positions::pool_position_at(&env, &pool, index)
    }

    pub fn total_positions(env: Env) -> u64 {
        positions::total(&env)
    }

    // ── Reward queries (read-only) ──────────────────────────────────────────

    /// Holder reward amount and cap value of `pool`, rolled forward to now
    /// without persisting anything.
    pub fn calculate_reward_amount(env: Env, pool: Address) -> Result<(i128, i128), ContractError> {
        let cfg = storage::load_config(&env)?;
        let eligibility = Eligibility::query(&env, &cfg, &pool);
        let rolled = accumulator::roll_forward(&env, &cfg, &pool, eligibility);
        Ok((rolled.pool.holders_reward, rolled.pool.cap_value))
    }

    /// Reward the position could withdraw right now.
    pub fn withdrawable_interest(
        env: Env,
        position_id: u64,
    ) -> Result<i128, ContractError> {
        let cfg = storage::load_config(&env)?;
        let position = positions::get(&env, position_id).ok_or(ContractError::PositionNotFound)?;
        let eligibility = Eligibility::query(&env, &cfg, &position.pool);
        let rolled = accumulator::roll_forward(&env, &cfg, &position.pool, eligibility);
        Ok(position.reward_owed(rolled.pool.interest_price))
    }

    /// Global (interest, holders, cap) prices rolled forward to now.
    pub fn cumulative_reward_prices(
        env: Env,
    ) -> Result<(i128, i128, i128), ContractError> {
        let cfg = storage::load_config(&env)?;
        let mut global = accumulator::load_global(&env);
        accumulator::roll_global(
            &env,
            &cfg,
            &mut global,
            Eligibility::pools_only(&env, &cfg),
        );
        Ok((global.interest_price, global.holders_price, global.cap_price))
    }

    /// Dividend `account` could withdraw from `pool` right now, as
    /// `(claimable, price, cap, raw)`. Claimable is zero while the pool is
    /// not eligible.
    pub fn calculate_holder_reward_amount(
        env: Env,
        pool: Address,
        account: Address,
    ) -> Result<(i128, i128, i128, i128), ContractError> {
        let cfg = storage::load_config(&env)?;
        let eligibility = Eligibility::query(&env, &cfg, &pool);
        let rolled = accumulator::roll_forward(&env, &cfg, &pool, eligibility);

        let equity = EquityTokenClient::new(&env, &pool);
        let quote = dividends::quote(
            &dividends::load(&env, &pool, &account),
            &rolled.pool,
            equity.balance(&account),
            equity.total_supply(),
        );
        let claimable = if eligibility.pool_eligible {
            quote.claimable
        } else {
            0
        };
        Ok((claimable, quote.price, quote.cap, quote.raw))
    }

    // ── Holder dividends ────────────────────────────────────────────────────

    /// Pay `account` its settled and newly accrued dividend from `pool`.
    pub fn holder_withdraw(env: Env, account: Address, pool: Address) -> Result<i128, ContractError> {
        account.require_auth();
        let cfg = storage::load_config(&env)?;

        let eligibility = Eligibility::query(&env, &cfg, &pool);
        let rolled = accumulator::roll_forward(&env, &cfg, &pool, eligibility);

        let equity = EquityTokenClient::new(&env, &pool);
        let quote = dividends::quote(
            &dividends::load(&env, &pool, &account),
            &rolled.pool,
            equity.balance(&account),
            equity.total_supply(),
        );
        if !eligibility.pool_eligible || quote.claimable <= 0 {
            return Err(ContractError::NoWithdrawableAmount);
        }
        if Self::free_reward_balance(&env, &cfg, &rolled.global) < quote.claimable {
            return Err(ContractError::InsufficientBalance);
        }

        dividends::store(&env, &pool, &account, &quote.paid());
        rolled.persist(&env);

        token::Client::new(&env, &cfg.reward_token).transfer(
            &env.current_contract_address(),
            &account,
            &quote.claimable,
        );

        events::publish_holder_withdrawn(&env, pool, account, quote.claimable);

        Ok(quote.claimable)
    }

    /// Settle `account`'s dividend against `balance`, its equity balance
    /// *before* the pending change. Only the equity token `pool` may call
    /// this, and it must do so before writing the balance.
    pub fn before_balance_change(
        env: Env,
        pool: Address,
        account: Address,
        balance: i128,
        total_supply: i128,
    ) -> Result<(), ContractError> {
        pool.require_auth();
        let cfg = storage::load_config(&env)?;

        let eligibility = Eligibility::query(&env, &cfg, &pool);
        let rolled = accumulator::roll_forward(&env, &cfg, &pool, eligibility);

        let quote = dividends::quote(
            &dividends::load(&env, &pool, &account),
            &rolled.pool,
            balance,
            total_supply,
        );
        dividends::store(&env, &pool, &account, &quote.settled());
        rolled.persist(&env);

        events::publish_dividend_settled(&env, pool, account, balance, quote.claimable);
        Ok(())
    }

    /// Close or reopen `pool`'s reward window at exactly the registry's
    /// change. `eligible` and `eligible_pools` are the pre-change values.
    pub fn before_eligibility_change(
        env: Env,
        pool: Address,
        eligible: bool,
        eligible_pools: u32,
    ) -> Result<(), ContractError> {
        let cfg = storage::load_config(&env)?;
        cfg.registry.require_auth();

        let mut rolled = accumulator::roll_forward(
            &env,
            &cfg,
            &pool,
            Eligibility {
                pool_eligible: eligible,
                eligible_pools,
            },
        );
        rolled.recount(!eligible);
        rolled.persist(&env);

        events::publish_eligibility_changed(&env, pool, eligible, rolled.pool.total_locked);
        Ok(())
    }

    /// Roll `pool` forward and persist it. Anyone may call this.
    pub fn sync_pool(env: Env, pool: Address) -> Result<(), ContractError> {
        let cfg = storage::load_config(&env)?;
        let eligibility = Eligibility::query(&env, &cfg, &pool);
        accumulator::roll_forward(&env, &cfg, &pool, eligibility).persist(&env);
        ttl::extend_instance(&env);
        Ok(())
    }

    // ── Governance ──────────────────────────────────────────────────────────

    /// Change the cap ceiling. The cap price is rolled forward under the old
    /// ceiling first, so the change only affects time after now.
    ///
    /// Any role may do this.
    pub fn update_cap(env: Env, caller: Address, cap: i128) -> Result<(), ContractError> {
        caller.require_auth();
        let cfg = storage::load_config(&env)?;
        roles::authorize(&env, &caller, Permission::UpdateCap)?;
        if cap < 0 {
            return Err(ContractError::IllegalAmount);
        }

        Self::roll_global_and_store(&env, &cfg);

        let old_cap = cap::ceiling(&env);
        cap::set_ceiling(&env, cap);

        events::publish_cap_updated(&env, caller, old_cap, cap);
        Ok(())
    }

    /// Swap the emission policy. Prices accumulated so far are kept; only
    /// the forward rate changes.
    ///
    /// Requires `PolicyAdmin` or `Governance`.
    pub fn set_policy(env: Env, caller: Address, policy: Address) -> Result<u32, ContractError> {
        caller.require_auth();
        let mut cfg = storage::load_config(&env)?;
        roles::authorize(&env, &caller, Permission::SwapPolicy)?;

        let mut global = Self::roll_global_and_store(&env, &cfg);

        let old_policy = cfg.policy.clone();
        cfg.policy = policy.clone();
        storage::store_config(&env, &cfg);

        global.policy_version = global.policy_version.saturating_add(1);
        accumulator::store_global(&env, &global);

        events::publish_policy_changed(&env, old_policy, policy, global.policy_version);
        Ok(global.policy_version)
    }

    /// Pay the accrued treasury share to the treasury address.
    pub fn withdraw_treasury(env: Env, caller: Address) -> Result<i128, ContractError> {
        caller.require_auth();
        let cfg = storage::load_config(&env)?;
        if caller != cfg.treasury {
            return Err(ContractError::IllegalAccess);
        }

        let mut global = Self::roll_global_and_store(&env, &cfg);
        let amount = global.treasury_accrued;
        if amount <= 0 {
            return Err(ContractError::NoWithdrawableAmount);
        }
        global.treasury_accrued = 0;
        accumulator::store_global(&env, &global);

        token::Client::new(&env, &cfg.reward_token).transfer(
            &env.current_contract_address(),
            &caller,
            &amount,
        );

        events::publish_treasury_withdrawn(&env, caller, amount);
        Ok(amount)
    }

    /// Give `target` exactly `role`, replacing any role it held. Only
    /// `Governance` may call this.
    pub fn grant_role(
        env: Env,
        caller: Address,
        target: Address,
        role: Role,
    ) -> Result<(), ContractError> {
        storage::require_initialized(&env)?;
        caller.require_auth();
        let previous = roles::grant(&env, &caller, &target, role)?;
        events::publish_role_changed(&env, caller, target, previous, Some(role));
        Ok(())
    }

    /// Take away whatever role `target` holds. Only `Governance` may call
    /// this.
    pub fn revoke_role(env: Env, caller: Address, target: Address) -> Result<(), ContractError> {
        storage::require_initialized(&env)?;
        caller.require_auth();
        let held = roles::revoke(&env, &caller, &target)?;
        events::publish_role_changed(&env, caller, target, Some(held), None);
        Ok(())
    }

    pub fn get_role(env: Env, account: Address) -> Option<Role> {
        roles::role_of(&env, &account)
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_config(env: Env) -> Result<LockupConfig, ContractError> {
        storage::load_config(&env)
    }

    pub fn get_governor(env: Env) -> Result<Address, ContractError> {
        roles::governor(&env).ok_or(ContractError::NotInitialized)
    }

    /// Stored global accumulator, as of its last roll-forward.
    pub fn get_global(env: Env) -> GlobalAccumulator {
        accumulator::load_global(&env)
    }

    /// Stored pool accumulator, as of its last roll-forward.
    pub fn get_pool(env: Env, pool: Address) -> Option<PoolAccumulator> {
        accumulator::load_pool(&env, &pool)
    }

    pub fn get_cap(env: Env) -> i128 {
        cap::ceiling(&env)
    }

    pub fn get_holder_snapshot(env: Env, pool: Address, account: Address) -> HolderSnapshot {
        dividends::load(&env, &pool, &account)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn check_deposit(
        env: &Env,
        cfg: &LockupConfig,
        account: &Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        if amount <= 0 {
            return Err(ContractError::IllegalAmount);
        }
        if token::Client::new(env, &cfg.stake_token).balance(account) < amount {
            return Err(ContractError::InsufficientBalance);
        }
        Ok(())
    }

    /// Shared tail of both deposit paths: settle the position at the rolled
    /// price, add the stake, persist, then pull the tokens.
    fn deposit_into(
        env: &Env,
        cfg: &LockupConfig,
        account: &Address,
        mut position: Position,
        mut rolled: Rolled,
        amount: i128,
    ) -> Result<u64, ContractError> {
        position.settle(rolled.pool.interest_price);
        position.amount = position.amount.saturating_add(amount);
        rolled.lock(amount);

        positions::update(env, &position);
        rolled.persist(env);
        ttl::extend_instance(env);

        token::Client::new(env, &cfg.stake_token).transfer(
            account,
            &env.current_contract_address(),
            &amount,
        );

        events::publish_deposited(
            env,
            position.pool,
            account.clone(),
            amount,
            position.id,
            rolled.pool.total_locked,
        );

        Ok(position.id)
    }

    fn roll_global_and_store(env: &Env, cfg: &LockupConfig) -> GlobalAccumulator {
        let mut global = accumulator::load_global(env);
        accumulator::roll_global(env, cfg, &mut global, Eligibility::pools_only(env, cfg));
        accumulator::store_global(env, &global);
        global
    }

    /// Reward token balance not earmarked for the treasury.
    fn free_reward_balance(env: &Env, cfg: &LockupConfig, global: &GlobalAccumulator) -> i128 {
        let balance =
            token::Client::new(env, &cfg.reward_token).balance(&env.current_contract_address());
        balance.saturating_sub(global.treasury_accrued).max(0)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────



#[cfg(test)]
mod test_cap;

#[cfg(test)]
mod test_dividends;
