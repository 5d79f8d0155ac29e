//! Client traits for the cross-contract seams of the suite.
//!
//! Each trait only generates a client; the contracts implementing them expose
//! inherent functions with the same names and argument lists.

use soroban_sdk::{contractclient, Address, Env};

/// Emission curve consulted by the engine on every roll-forward.
#[contractclient(name = "EmissionPolicyClient")]
pub trait EmissionPolicy {
    /// Reward units emitted per second across all pools.
    fn reward_rate(env: Env, total_locked: i128, eligible_pools: u32) -> i128;

    /// Part of `reward` owed to equity holders; the remainder goes to stakers.
    fn holders_share(env: Env, reward: i128, total_locked: i128) -> i128;

    /// Part of `reward` set aside for the protocol treasury before the
    /// holder/staker split.
    fn treasury_share(env: Env, reward: i128) -> i128;

    /// Default per-second cap ceiling per equity token unit (scaled by
    /// `PRECISION`).
    fn cap_ceiling(env: Env) -> i128;

    fn version(env: Env) -> u32;
}

/// Eligibility source for pools. The engine reads it, never writes it.
#[contractclient(name = "PoolRegistryClient")]
pub trait PoolRegistry {
    fn is_eligible(env: Env, pool: Address) -> bool;

    fn total_eligible_pools(env: Env) -> u32;
}

/// Read side of a pool's equity token.
#[contractclient(name = "EquityTokenClient")]
pub trait EquityToken {
    fn balance(env: Env, id: Address) -> i128;

    fn total_supply(env: Env) -> i128;
}

/// Hooks the engine exposes to its collaborators. Both must run before the
/// state they guard changes, and both receive the pre-change values as
/// arguments so the engine never calls back into the notifying contract.
#[contractclient(name = "LockupHooksClient")]
pub trait LockupHooks {
    /// Called by the equity token `pool` for each party of a transfer, with
    /// the party's balance as it was before the transfer.
    fn before_balance_change(
        env: Env,
        pool: Address,
        account: Address,
        balance: i128,
        total_supply: i128,
    );

    /// Called by the registry before it flips `pool`'s eligibility.
    fn before_eligibility_change(env: Env, pool: Address, eligible: bool, eligible_pools: u32);
}
