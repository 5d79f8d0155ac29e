//! Cumulative-price accumulators.
//!
//! The global record carries three monotone prices: staker interest and
//! holder reward per unit of *counted* locked stake, and the cap per unit of
//! equity token. A pool record folds the global growth into its own prices
//! for the spans in which it was eligible and counted, so a participant's
//! accrual is always `amount × (price_now − snapshot) / PRECISION`.
//!
//! `roll_forward` works on copies; nothing is written until
//! [`Rolled::persist`], which lets read-only queries reuse the exact same
//! path as mutating operations.

use common::math::{delta, mul_div, PRECISION};
use common::ttl;
use common::{EmissionPolicyClient, PoolRegistryClient};
use soroban_sdk::{contracttype, log, Address, Env};

use crate::cap;
use crate::storage::{LockupConfig, GLOBAL, POOL};

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GlobalAccumulator {
    /// Staker reward per unit of counted stake, scaled by `PRECISION`.
    pub interest_price: i128,
    /// Holder reward per unit of counted stake, scaled by `PRECISION`.
    pub holders_price: i128,
    /// Cap per unit of equity token, scaled by `PRECISION`.
    pub cap_price: i128,
    /// Stake locked in pools currently counted as eligible.
    pub total_locked: i128,
    /// Treasury share emitted and not yet withdrawn.
    pub treasury_accrued: i128,
    /// Everything emitted since inception (stakers + holders + treasury).
    pub total_emitted: i128,
    pub last_rolled_at: u64,
    /// Bumped every time governance swaps the emission policy.
    pub policy_version: u32,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PoolAccumulator {
    pub total_locked: i128,
    /// Staker reward per unit locked in this pool, scaled by `PRECISION`.
    pub interest_price: i128,
    /// Staker reward attributed to this pool since inception.
    pub interest_reward: i128,
    /// Holder reward attributed to this pool since inception.
    pub holders_reward: i128,
    /// Cap per equity token unit accrued by this pool, scaled by `PRECISION`.
    pub cap_value: i128,
    pub global_interest_snapshot: i128,
    pub global_holders_snapshot: i128,
    pub global_cap_snapshot: i128,
    /// Whether `total_locked` is currently included in the global total.
    pub counted: bool,
    pub last_rolled_at: u64,
}

/// Eligibility inputs of a roll-forward, either read from the registry or
/// handed over by the registry's pre-change hook.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Eligibility {
    pub pool_eligible: bool,
    pub eligible_pools: u32,
}

impl Eligibility {
    pub fn query(env: &Env, cfg: &LockupConfig, pool: &Address) -> Self {
        let registry = PoolRegistryClient::new(env, &cfg.registry);
        Self {
            pool_eligible: registry.is_eligible(pool),
            eligible_pools: registry.total_eligible_pools(),
        }
    }

    pub fn pools_only(env: &Env, cfg: &LockupConfig) -> u32 {
        PoolRegistryClient::new(env, &cfg.registry).total_eligible_pools()
    }
}

/// Global and pool accumulators rolled forward to the current ledger time.
#[derive(Clone, Debug)]
pub struct Rolled {
    pub pool_id: Address,
    pub global: GlobalAccumulator,
    pub pool: PoolAccumulator,
}

impl Rolled {
    pub fn persist(&self, env: &Env) {
        store_global(env, &self.global);
        store_pool(env, &self.pool_id, &self.pool);
    }

    /// Adds freshly locked stake to the pool, and to the global total when
    /// the pool is counted.
    pub fn lock(&mut self, amount: i128) {
        self.pool.total_locked = self.pool.total_locked.saturating_add(amount);
        if self.pool.counted {
            self.global.total_locked = self.global.total_locked.saturating_add(amount);
        }
    }

    pub fn unlock(&mut self, amount: i128) {
        self.pool.total_locked = self.pool.total_locked.saturating_sub(amount).max(0);
        if self.pool.counted {
            self.global.total_locked = self.global.total_locked.saturating_sub(amount).max(0);
        }
    }

    /// Applies an eligibility flip taking effect now. The pool was just
    /// rolled, so only its membership in the global total changes.
    pub fn recount(&mut self, eligible: bool) {
        let now = self.pool.last_rolled_at;
        roll_pool(&mut self.pool, &mut self.global, eligible, now);
    }
}

// ── Storage ──────────────────────────────────────────────────────────────────

pub fn load_global(env: &Env) -> GlobalAccumulator {
    env.storage().instance().get(&GLOBAL).unwrap_or_default()
}

pub fn store_global(env: &Env, global: &GlobalAccumulator) {
    env.storage().instance().set(&GLOBAL, global);
}

pub fn load_pool(env: &Env, pool: &Address) -> Option<PoolAccumulator> {
    let key = (POOL, pool.clone());
    let record: Option<PoolAccumulator> = env.storage().persistent().get(&key);
    if record.is_some() {
        ttl::extend_persistent(env, &key);
    }
    record
}

pub fn store_pool(env: &Env, pool: &Address, record: &PoolAccumulator) {
    let key = (POOL, pool.clone());
    env.storage().persistent().set(&key, record);
    ttl::extend_persistent(env, &key);
}

/// A pool first seen now starts from the current global prices, so nothing
/// emitted before it existed is attributed to it.
fn fresh_pool(global: &GlobalAccumulator) -> PoolAccumulator {
    PoolAccumulator {
        global_interest_snapshot: global.interest_price,
        global_holders_snapshot: global.holders_price,
        global_cap_snapshot: global.cap_price,
        last_rolled_at: global.last_rolled_at,
        ..PoolAccumulator::default()
    }
}

// ── Pure math ────────────────────────────────────────────────────────────────

/// Price growth from distributing `reward` over `total_locked` units.
/// Zero when nothing is locked.
pub fn price_increment(reward: i128, total_locked: i128) -> i128 {
    mul_div(reward, PRECISION, total_locked)
}

/// How one window's emission is divided.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EmissionSplit {
    pub stakers: i128,
    pub holders: i128,
    pub treasury: i128,
}

impl EmissionSplit {
    /// Clamps the policy's answers so the three parts always sum to
    /// `reward`.
    pub fn new(reward: i128, treasury: i128, holders: i128) -> Self {
        let treasury = treasury.clamp(0, reward.max(0));
        let distributable = reward.saturating_sub(treasury).max(0);
        let holders = holders.clamp(0, distributable);
        Self {
            stakers: distributable.saturating_sub(holders),
            holders,
            treasury,
        }
    }
}

/// Folds the global growth since the pool's snapshots into the pool, then
/// brings its counted flag in line with `eligible`, moving its stake in or
/// out of the global total.
pub fn roll_pool(
    pool: &mut PoolAccumulator,
    global: &mut GlobalAccumulator,
    eligible: bool,
    now: u64,
) {
    if eligible && pool.counted && pool.total_locked > 0 {
        let interest = delta(global.interest_price, pool.global_interest_snapshot);
        let holders = delta(global.holders_price, pool.global_holders_snapshot);
        let cap = delta(global.cap_price, pool.global_cap_snapshot);

        pool.interest_price = pool.interest_price.saturating_add(interest);
        pool.interest_reward = pool
            .interest_reward
            .saturating_add(mul_div(interest, pool.total_locked, PRECISION));
        pool.holders_reward = pool
            .holders_reward
            .saturating_add(mul_div(holders, pool.total_locked, PRECISION));
        pool.cap_value = pool.cap_value.saturating_add(cap);
    }

    pool.global_interest_snapshot = global.interest_price;
    pool.global_holders_snapshot = global.holders_price;
    pool.global_cap_snapshot = global.cap_price;
    pool.last_rolled_at = now;

    if eligible != pool.counted {
        if eligible {
            global.total_locked = global.total_locked.saturating_add(pool.total_locked);
        } else {
            global.total_locked = global.total_locked.saturating_sub(pool.total_locked).max(0);
        }
        pool.counted = eligible;
    }
}

// ── Roll-forward ─────────────────────────────────────────────────────────────

/// Rolls the global accumulator to the current ledger time under the
/// configured policy and cap. The policy is only consulted when something is
/// locked; the cap price advances regardless.
pub fn roll_global(env: &Env, cfg: &LockupConfig, global: &mut GlobalAccumulator, eligible_pools: u32) {
    let now = env.ledger().timestamp();
    let elapsed = now.saturating_sub(global.last_rolled_at);
    if elapsed == 0 {
        return;
    }

    if global.total_locked > 0 {
        let policy = EmissionPolicyClient::new(env, &cfg.policy);
        let rate = policy.reward_rate(&global.total_locked, &eligible_pools);
        let reward = rate.max(0).saturating_mul(elapsed as i128);
        if reward > 0 {
            let treasury = policy.treasury_share(&reward);
            let holders = policy.holders_share(
                &reward.saturating_sub(treasury.clamp(0, reward)),
                &global.total_locked,
            );
            let split = EmissionSplit::new(reward, treasury, holders);

            global.interest_price = global
                .interest_price
                .saturating_add(price_increment(split.stakers, global.total_locked));
            global.holders_price = global
                .holders_price
                .saturating_add(price_increment(split.holders, global.total_locked));
            global.treasury_accrued = global.treasury_accrued.saturating_add(split.treasury);
            global.total_emitted = global.total_emitted.saturating_add(reward);
        }
    }

    global.cap_price = global
        .cap_price
        .saturating_add(cap::ceiling(env).saturating_mul(elapsed as i128));
    global.last_rolled_at = now;

    log!(
        env,
        "global rolled",
        elapsed,
        global.interest_price,
        global.holders_price,
        global.cap_price
    );
}

/// Rolls the global accumulator and `pool` forward to now, without
/// persisting anything.
pub fn roll_forward(
    env: &Env,
    cfg: &LockupConfig,
    pool: &Address,
    eligibility: Eligibility,
) -> Rolled {
    let mut global = load_global(env);
    roll_global(env, cfg, &mut global, eligibility.eligible_pools);

    let mut record = load_pool(env, pool).unwrap_or_else(|| fresh_pool(&global));
    roll_pool(
        &mut record,
        &mut global,
        eligibility.pool_eligible,
        env.ledger().timestamp(),
    );

    Rolled {
        pool_id: pool.clone(),
        global,
        pool: record,
    }
}
