//! Position ledger.
//!
//! Positions are never burned: a fully withdrawn position stays enumerable
//! and can take new deposits. Ownership is indexed per owner (swap-remove
//! on transfer) and per pool (append-only, since a position never changes
//! pool), so every insert and removal is O(1).
//!
//! Each (owner, pool) pair links to the position deposits land in. When a
//! transfer takes the linked position away, the link moves to another
//! position the owner still holds in that pool, if any.

use common::math::accrued;
use common::ttl;
use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::storage::{
    OWNER_AT, OWNER_LEN, OWNER_POOL, OWNER_SLOT, POOL_AT, POOL_LEN, POSITION, POSITION_CTR,
};

/// One staking claim against one pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    pub id: u64,
    pub owner: Address,
    pub pool: Address,
    pub amount: i128,
    /// Pool interest price at the last touch, scaled by `PRECISION`.
    pub price_snapshot: i128,
    /// Reward settled at the last touch and not yet withdrawn.
    pub cumulative_reward: i128,
    /// Reward a previous withdrawal could not pay out.
    pub pending_reward: i128,
}

impl Position {
    /// `pending + cumulative + amount × (price − snapshot)`.
    pub fn reward_owed(&self, pool_price: i128) -> i128 {
        self.pending_reward
            .saturating_add(self.cumulative_reward)
            .saturating_add(accrued(self.amount, pool_price, self.price_snapshot))
    }

    /// Locks the reward accrued so far into `cumulative_reward` and moves
    /// the snapshot to `pool_price`. `reward_owed` is unchanged.
    pub fn settle(&mut self, pool_price: i128) {
        let earned = accrued(self.amount, pool_price, self.price_snapshot);
        self.cumulative_reward = self.cumulative_reward.saturating_add(earned);
        self.price_snapshot = pool_price;
    }
}

// ── Records ──────────────────────────────────────────────────────────────────

pub fn get(env: &Env, id: u64) -> Option<Position> {
    let key = (POSITION, id);
    let position: Option<Position> = env.storage().persistent().get(&key);
    if position.is_some() {
        ttl::extend_persistent(env, &key);
    }
    position
}

pub fn update(env: &Env, position: &Position) {
    let key = (POSITION, position.id);
    env.storage().persistent().set(&key, position);
    ttl::extend_persistent(env, &key);
}

pub fn total(env: &Env) -> u64 {
    env.storage().instance().get(&POSITION_CTR).unwrap_or(0)
}

fn next_id(env: &Env) -> u64 {
    let next = total(env).saturating_add(1);
    env.storage().instance().set(&POSITION_CTR, &next);
    next
}

/// Creates an empty position for `owner` in `pool` starting at
/// `pool_price`, and indexes it.
pub fn mint(env: &Env, owner: &Address, pool: &Address, pool_price: i128) -> Position {
    let position = Position {
        id: next_id(env),
        owner: owner.clone(),
        pool: pool.clone(),
        amount: 0,
        price_snapshot: pool_price,
        cumulative_reward: 0,
        pending_reward: 0,
    };
    update(env, &position);
    push_owner(env, owner, position.id);
    push_pool(env, pool, position.id);
    link_owner_pool(env, owner, pool, position.id);
    position
}

/// Hands `position` to `to`. Economic fields are left untouched.
pub fn transfer(env: &Env, position: &mut Position, to: &Address) {
    let from = position.owner.clone();
    remove_owner(env, &from, position.id);
    unlink_owner_pool(env, &from, &position.pool, position.id);

    position.owner = to.clone();
    update(env, position);
    push_owner(env, to, position.id);
    link_owner_pool(env, to, &position.pool, position.id);
}

// ── Owner/pool lookup ────────────────────────────────────────────────────────

/// The position `owner` deposits into when targeting `pool`.
pub fn position_of(env: &Env, owner: &Address, pool: &Address) -> Option<u64> {
    env.storage()
        .persistent()
        .get(&(OWNER_POOL, owner.clone(), pool.clone()))
}

fn link_owner_pool(env: &Env, owner: &Address, pool: &Address, id: u64) {
    let key = (OWNER_POOL, owner.clone(), pool.clone());
    if !env.storage().persistent().has(&key) {
        env.storage().persistent().set(&key, &id);
        ttl::extend_persistent(env, &key);
    }
}

/// Runs after `id` left `owner`'s index, so the scan only sees positions
/// the owner still holds.
fn unlink_owner_pool(env: &Env, owner: &Address, pool: &Address, id: u64) {
    let key = (OWNER_POOL, owner.clone(), pool.clone());
    let linked: Option<u64> = env.storage().persistent().get(&key);
    if linked != Some(id) {
        return;
    }

    let successor = positions_of_owner(env, owner)
        .iter()
        .find(|other| get(env, *other).is_some_and(|p| p.pool == *pool));
    match successor {
        Some(other) => {
            env.storage().persistent().set(&key, &other);
            ttl::extend_persistent(env, &key);
        }
        None => env.storage().persistent().remove(&key),
    }
}

// ── Owner index ──────────────────────────────────────────────────────────────

pub fn owner_count(env: &Env, owner: &Address) -> u32 {
    env.storage()
        .persistent()
        .get(&(OWNER_LEN, owner.clone()))
        .unwrap_or(0)
}

pub fn owner_position_at(env: &Env, owner: &Address, index: u32) -> Option<u64> {
    env.storage()
        .persistent()
        .get(&(OWNER_AT, owner.clone(), index))
}

fn push_owner(env: &Env, owner: &Address, id: u64) {
    let len = owner_count(env, owner);
    let at_key = (OWNER_AT, owner.clone(), len);
    env.storage().persistent().set(&at_key, &id);
    ttl::extend_persistent(env, &at_key);

    let slot_key = (OWNER_SLOT, id);
    env.storage().persistent().set(&slot_key, &len);
    ttl::extend_persistent(env, &slot_key);

    let len_key = (OWNER_LEN, owner.clone());
    env.storage().persistent().set(&len_key, &len.saturating_add(1));
    ttl::extend_persistent(env, &len_key);
}

/// Moves the owner's last position into `id`'s slot and shrinks the index.
fn remove_owner(env: &Env, owner: &Address, id: u64) {
    let len = owner_count(env, owner);
    if len == 0 {
        return;
    }
    let slot: u32 = match env.storage().persistent().get(&(OWNER_SLOT, id)) {
        Some(slot) => slot,
        None => return,
    };
    let last = len - 1;

    if slot != last {
        if let Some(moved) = owner_position_at(env, owner, last) {
            let at_key = (OWNER_AT, owner.clone(), slot);
            env.storage().persistent().set(&at_key, &moved);
            ttl::extend_persistent(env, &at_key);

            let moved_slot_key = (OWNER_SLOT, moved);
            env.storage().persistent().set(&moved_slot_key, &slot);
            ttl::extend_persistent(env, &moved_slot_key);
        }
    }

    env.storage()
        .persistent()
        .remove(&(OWNER_AT, owner.clone(), last));
    env.storage().persistent().remove(&(OWNER_SLOT, id));

    let len_key = (OWNER_LEN, owner.clone());
    env.storage().persistent().set(&len_key, &last);
    ttl::extend_persistent(env, &len_key);
}

pub fn positions_of_owner(env: &Env, owner: &Address) -> Vec<u64> {
    let mut ids = Vec::new(env);
    for i in 0..owner_count(env, owner) {
        if let Some(id) = owner_position_at(env, owner, i) {
            ids.push_back(id);
        }
    }
    ids
}

// ── Pool index ───────────────────────────────────────────────────────────────

pub fn pool_count(env: &Env, pool: &Address) -> u32 {
    env.storage()
        .persistent()
        .get(&(POOL_LEN, pool.clone()))
        .unwrap_or(0)
}

pub fn pool_position_at(env: &Env, pool: &Address, index: u32) -> Option<u64> {
    env.storage()
        .persistent()
        .get(&(POOL_AT, pool.clone(), index))
}

fn push_pool(env: &Env, pool: &Address, id: u64) {
    let len = pool_count(env, pool);
    let at_key = (POOL_AT, pool.clone(), len);
    env.storage().persistent().set(&at_key, &id);
    ttl::extend_persistent(env, &at_key);

    let len_key = (POOL_LEN, pool.clone());
    env.storage().persistent().set(&len_key, &len.saturating_add(1));
    ttl::extend_persistent(env, &len_key);
}

pub fn positions_of_pool(env: &Env, pool: &Address) -> Vec<u64> {
    let mut ids = Vec::new(env);
    for i in 0..pool_count(env, pool) {
        if let Some(id) = pool_position_at(env, pool, i) {
            ids.push_back(id);
        }
    }
    ids
}
