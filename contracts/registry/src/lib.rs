#![no_std]


use common::{ttl, LockupHooksClient};
use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, Symbol};

// ── Storage keys ─────────────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const ENGINE: Symbol = symbol_short!("ENGINE");
const ELIG_COUNT: Symbol = symbol_short!("ELIG_CNT");

// Per-pool persistent flag: (prefix, pool)
const ELIGIBLE: Symbol = symbol_short!("ELIGIBLE");

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    AlreadyRegistered = 4,
    NotRegistered = 5,
}

// ── Contract ─────────────────────────────────────────────────────────────────

/// Tracks which pools are eligible for rewards.
///
/// When an engine is bound it is notified *before* every eligibility flip
/// with the pre-change values, so the engine can close the pool's reward
/// window at exactly the boundary.
#[contract]
pub struct RegistryContract;

#[contractimpl]
impl RegistryContract {
    pub fn initialize(env: Env, admin: Address) -> Result<(), ContractError> {
        if env.storage().instance().has(&ADMIN) {
            return Err(ContractError::AlreadyInitialized);
        }
        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&ELIG_COUNT, &0u32);
        Ok(())
    }

    /// Bind the engine that must hear about eligibility changes.
    pub fn bind_engine(env: Env, admin: Address, engine: Address) -> Result<(), ContractError> {
        Self::require_admin(&env, &admin)?;
        env.storage().instance().set(&ENGINE, &engine);
        Ok(())
    }

    pub fn register(env: Env, admin: Address, pool: Address) -> Result<(), ContractError> {
        Self::require_admin(&env, &admin)?;
        if Self::is_eligible(env.clone(), pool.clone()) {
            return Err(ContractError::AlreadyRegistered);
        }

        let count = Self::total_eligible_pools(env.clone());
        Self::notify_engine(&env, &pool, false, count);

        Self::set_flag(&env, &pool, true);
        env.storage()
            .instance()
            .set(&ELIG_COUNT, &count.saturating_add(1));

        env.events().publish(
            (symbol_short!("POOL_REG"), pool),
            env.ledger().timestamp(),
        );
        Ok(())
    }

    pub fn deregister(env: Env, admin: Address, pool: Address) -> Result<(), ContractError> {
        Self::require_admin(&env, &admin)?;
        if !Self::is_eligible(env.clone(), pool.clone()) {
            return Err(ContractError::NotRegistered);
        }

        let count = Self::total_eligible_pools(env.clone());
        Self::notify_engine(&env, &pool, true, count);

        Self::set_flag(&env, &pool, false);
        env.storage()
            .instance()
            .set(&ELIG_COUNT, &count.saturating_sub(1));

        env.events().publish(
            (symbol_short!("POOL_DRG"), pool),
            env.ledger().timestamp(),
        );
        Ok(())
    }

    pub fn is_eligible(env: Env, pool: Address) -> bool {
        let key = (ELIGIBLE, pool);
        let eligible: bool = env.storage().persistent().get(&key).unwrap_or(false);
        if eligible {
            ttl::extend_persistent(&env, &key);
        }
        eligible
    }

    pub fn total_eligible_pools(env: Env) -> u32 {
        env.storage().instance().get(&ELIG_COUNT).unwrap_or(0)
    }

    pub fn get_engine(env: Env) -> Option<Address> {
        env.storage().instance().get(&ENGINE)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
        caller.require_auth();
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

    fn notify_engine(env: &Env, pool: &Address, eligible: bool, eligible_pools: u32) {
        let engine: Option<Address> = env.storage().instance().get(&ENGINE);
        if let Some(engine) = engine {
            LockupHooksClient::new(env, &engine).before_eligibility_change(
                pool,
                &eligible,
                &eligible_pools,
            );
        }
    }

    fn set_flag(env: &Env, pool: &Address, eligible: bool) {
        let key = (ELIGIBLE, pool.clone());
        if eligible {
            env.storage().persistent().set(&key, &true);
            ttl::extend_persistent(env, &key);
        } else {
            env.storage().persistent().remove(&key);
        }
    }
}
