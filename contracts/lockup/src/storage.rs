use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::ContractError;

// ── Storage key constants ────────────────────────────────────────────────────

pub const INITIALIZED: Symbol = symbol_short!("INIT");
pub const CONFIG: Symbol = symbol_short!("CONFIG");
pub const GLOBAL: Symbol = symbol_short!("GLOBAL");
pub const CAP: Symbol = symbol_short!("CAP");
pub const POSITION_CTR: Symbol = symbol_short!("POS_CTR");

// Persistent entries use tuple keys: (prefix, ...)
pub const POOL: Symbol = symbol_short!("POOL");
pub const POSITION: Symbol = symbol_short!("POS");
pub const HOLDER: Symbol = symbol_short!("HOLDER");
pub const OWNER_LEN: Symbol = symbol_short!("OWN_LEN");
pub const OWNER_AT: Symbol = symbol_short!("OWN_AT");
pub const OWNER_SLOT: Symbol = symbol_short!("OWN_SLOT");
pub const OWNER_POOL: Symbol = symbol_short!("OWN_POOL");
pub const POOL_LEN: Symbol = symbol_short!("POOL_LEN");
pub const POOL_AT: Symbol = symbol_short!("POOL_AT");

/// Addresses of every collaborator, fixed at `initialize` except for the
/// policy, which governance may swap.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockupConfig {
    /// Token users lock into positions.
    pub stake_token: Address,
    /// Token rewards and dividends are paid in.
    pub reward_token: Address,
    /// Current emission policy contract.
    pub policy: Address,
    /// Pool registry contract.
    pub registry: Address,
    /// Recipient of the treasury share of emission.
    pub treasury: Address,
}

pub fn load_config(env: &Env) -> Result<LockupConfig, ContractError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(ContractError::NotInitialized)
}

pub fn store_config(env: &Env, config: &LockupConfig) {
    env.storage().instance().set(&CONFIG, config);
}

pub fn require_initialized(env: &Env) -> Result<(), ContractError> {
    if !env.storage().instance().has(&INITIALIZED) {
        return Err(ContractError::NotInitialized);
    }
    Ok(())
}
