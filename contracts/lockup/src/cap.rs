//! Cap enforcer.
//!
//! The ceiling is a per-second allowance per equity token unit (scaled by
//! `PRECISION`). It drives the global `cap_price`, which advances in
//! lockstep with the reward prices; a holder's payout for a window is the
//! smaller of what the reward prices owe and what the cap prices allow.
//! Whatever the cap cuts off is forfeited, not queued.

use common::math::accrued;
use soroban_sdk::Env;

use crate::storage::CAP;

pub fn ceiling(env: &Env) -> i128 {
    env.storage().instance().get(&CAP).unwrap_or(0)
}

pub fn set_ceiling(env: &Env, value: i128) {
    env.storage().instance().set(&CAP, &value);
}

/// Cap allowance earned by `balance` units between two cap prices.
pub fn contribution(balance: i128, cap_now: i128, cap_snapshot: i128) -> i128 {
    accrued(balance, cap_now, cap_snapshot)
}

/// Payout for one window: the raw accrual, clamped by the cap allowance.
pub fn clamp(raw: i128, allowance: i128) -> i128 {
    raw.min(allowance).max(0)
}
