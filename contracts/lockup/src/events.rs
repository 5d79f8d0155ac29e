#![allow(deprecated)] // events().publish migration tracked separately

use common::roles::Role;
use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the engine is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub governor: Address,
    pub stake_token: Address,
    pub reward_token: Address,
    pub policy: Address,
    pub registry: Address,
    pub cap: i128,
    pub timestamp: u64,
}

/// Fired on every deposit, whether it minted a position or topped one up.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositedEvent {
    pub pool: Address,
    pub account: Address,
    pub amount: i128,
    pub position_id: u64,
    pub pool_total_locked: i128,
    pub timestamp: u64,
}

/// Fired when a position withdraws principal and/or flushes its reward.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub pool: Address,
    pub account: Address,
    pub position_id: u64,
    pub amount: i128,
    pub reward: i128,
    pub carried: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionTransferredEvent {
    pub position_id: u64,
    pub from: Address,
    pub to: Address,
    pub timestamp: u64,
}

/// Fired by the pre-transfer hook after a holder's dividend was settled.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DividendSettledEvent {
    pub pool: Address,
    pub account: Address,
    pub balance: i128,
    pub pending: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HolderWithdrawnEvent {
    pub pool: Address,
    pub account: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CapUpdatedEvent {
    pub setter: Address,
    pub old_cap: i128,
    pub new_cap: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PolicyChangedEvent {
    pub old_policy: Address,
    pub new_policy: Address,
    pub policy_version: u32,
    pub timestamp: u64,
}

/// Fired when the registry closes or reopens a pool's reward window.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EligibilityChangedEvent {
    pub pool: Address,
    pub was_eligible: bool,
    pub pool_total_locked: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TreasuryWithdrawnEvent {
    pub treasury: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when governance grants or revokes a role. `None` means no role.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleChangedEvent {
    pub caller: Address,
    pub account: Address,
    pub old_role: Option<Role>,
    pub new_role: Option<Role>,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    governor: Address,
    stake_token: Address,
    reward_token: Address,
    policy: Address,
    registry: Address,
    cap: i128,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            governor,
            stake_token,
            reward_token,
            policy,
            registry,
            cap,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_deposited(
    env: &Env,
    pool: Address,
    account: Address,
    amount: i128,
    position_id: u64,
    pool_total_locked: i128,
) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), pool.clone(), account.clone()),
        DepositedEvent {
            pool,
            account,
            amount,
            position_id,
            pool_total_locked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(
    env: &Env,
    pool: Address,
    account: Address,
    position_id: u64,
    amount: i128,
    reward: i128,
    carried: i128,
) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), pool.clone(), account.clone()),
        WithdrawnEvent {
            pool,
            account,
            position_id,
            amount,
            reward,
            carried,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_position_transferred(env: &Env, position_id: u64, from: Address, to: Address) {
    env.events().publish(
        (symbol_short!("POS_XFER"), position_id),
        PositionTransferredEvent {
            position_id,
            from,
            to,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_dividend_settled(
    env: &Env,
    pool: Address,
    account: Address,
    balance: i128,
    pending: i128,
) {
    env.events().publish(
        (symbol_short!("DIV_STL"), pool.clone(), account.clone()),
        DividendSettledEvent {
            pool,
            account,
            balance,
            pending,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_holder_withdrawn(env: &Env, pool: Address, account: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("DIV_CLMD"), pool.clone(), account.clone()),
        HolderWithdrawnEvent {
            pool,
            account,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_cap_updated(env: &Env, setter: Address, old_cap: i128, new_cap: i128) {
    env.events().publish(
        (symbol_short!("CAP_SET"),),
        CapUpdatedEvent {
            setter,
            old_cap,
            new_cap,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_policy_changed(
    env: &Env,
    old_policy: Address,
    new_policy: Address,
    policy_version: u32,
) {
    env.events().publish(
        (symbol_short!("POLICY"),),
        PolicyChangedEvent {
            old_policy,
            new_policy,
            policy_version,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_eligibility_changed(
    env: &Env,
    pool: Address,
    was_eligible: bool,
    pool_total_locked: i128,
) {
    env.events().publish(
        (symbol_short!("ELIG"), pool.clone()),
        EligibilityChangedEvent {
            pool,
            was_eligible,
            pool_total_locked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_treasury_withdrawn(env: &Env, treasury: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("TRSY_WD"),),
        TreasuryWithdrawnEvent {
            treasury,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_role_changed(
    env: &Env,
    caller: Address,
    account: Address,
    old_role: Option<Role>,
    new_role: Option<Role>,
) {
    env.events().publish(
        (symbol_short!("ROLE"), account.clone()),
        RoleChangedEvent {
            caller,
            account,
            old_role,
            new_role,
            timestamp: env.ledger().timestamp(),
        },
    );
}
