//! Holder dividend accountant.
//!
//! A pool's holder reward is an amount (`PoolAccumulator::holders_reward`);
//! dividing it by the equity token's supply gives a per-token price, and
//! each holder keeps a snapshot of that price and of the pool's cap value.
//! Settlement must run before the holder's balance changes, because the
//! owed amount is computed from the balance passed in.

use common::math::{accrued, mul_div, PRECISION};
use common::ttl;
use soroban_sdk::{contracttype, Address, Env};

use crate::accumulator::PoolAccumulator;
use crate::cap;
use crate::storage::HOLDER;

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HolderSnapshot {
    /// Per-token holder price at the last settlement, scaled by `PRECISION`.
    pub last_withdrawn_price: i128,
    /// Pool cap value at the last settlement.
    pub last_withdrawn_cap_price: i128,
    /// Settled dividend not yet withdrawn.
    pub pending_withdrawal: i128,
}

/// Result of pricing a holder's dividend against the current accumulators.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DividendQuote {
    /// `pending_withdrawal` plus the capped accrual since the snapshot.
    pub claimable: i128,
    /// Per-token holder price used.
    pub price: i128,
    /// Pool cap value used.
    pub cap: i128,
    /// Accrual since the snapshot before the cap was applied.
    pub raw: i128,
}

impl DividendQuote {
    /// The snapshot to store once this quote has been settled into
    /// `pending_withdrawal`.
    pub fn settled(&self) -> HolderSnapshot {
        HolderSnapshot {
            last_withdrawn_price: self.price,
            last_withdrawn_cap_price: self.cap,
            pending_withdrawal: self.claimable,
        }
    }

    /// The snapshot to store once this quote has been paid out.
    pub fn paid(&self) -> HolderSnapshot {
        HolderSnapshot {
            pending_withdrawal: 0,
            ..self.settled()
        }
    }
}

pub fn load(env: &Env, pool: &Address, account: &Address) -> HolderSnapshot {
    let key = (HOLDER, pool.clone(), account.clone());
    let snapshot: Option<HolderSnapshot> = env.storage().persistent().get(&key);
    match snapshot {
        Some(s) => {
            ttl::extend_persistent(env, &key);
            s
        }
        None => HolderSnapshot::default(),
    }
}

pub fn store(env: &Env, pool: &Address, account: &Address, snapshot: &HolderSnapshot) {
    let key = (HOLDER, pool.clone(), account.clone());
    env.storage().persistent().set(&key, snapshot);
    ttl::extend_persistent(env, &key);
}

/// Per-token holder price of a pool with `total_supply` equity units.
pub fn holder_price(pool: &PoolAccumulator, total_supply: i128) -> i128 {
    mul_div(pool.holders_reward, PRECISION, total_supply)
}

/// Prices `balance` against the pool's current accumulators. The part of
/// the raw accrual above the cap allowance is dropped.
pub fn quote(
    snapshot: &HolderSnapshot,
    pool: &PoolAccumulator,
    balance: i128,
    total_supply: i128,
) -> DividendQuote {
    let price = holder_price(pool, total_supply);
    let raw = accrued(balance, price, snapshot.last_withdrawn_price);
    let allowance = cap::contribution(
        balance,
        pool.cap_value,
        snapshot.last_withdrawn_cap_price,
    );

    DividendQuote {
        claimable: snapshot
            .pending_withdrawal
            .saturating_add(cap::clamp(raw, allowance)),
        price,
        cap: pool.cap_value,
        raw,
    }
}
