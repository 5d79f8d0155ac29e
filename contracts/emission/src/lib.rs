#![no_std]


use common::math::{apply_bps, mul_div, BPS_DENOMINATOR};
use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, Address, Env, Symbol};

// ── Storage keys ─────────────────────────────────────────────────────────────

const CONFIG: Symbol = symbol_short!("CONFIG");

// ── Types ────────────────────────────────────────────────────────────────────

/// Parameters of the emission curve. Replaced as a whole by `update_config`,
/// which bumps `version`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmissionConfig {
    pub admin: Address,
    /// Reward units per second contributed by each eligible pool.
    pub per_pool_rate: i128,
    /// Ceiling on the total reward rate.
    pub max_rate: i128,
    /// Total locked amount at which the rate is halved. Zero disables decay.
    pub saturation: i128,
    pub holders_share_bps: u32,
    pub treasury_share_bps: u32,
    /// Default per-second cap per equity token unit, scaled by `PRECISION`.
    pub cap_ceiling: i128,
    pub version: u32,
}

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn load_config(env: &Env) -> Result<EmissionConfig, ContractError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(ContractError::NotInitialized)
}

fn validate(
    per_pool_rate: i128,
    max_rate: i128,
    saturation: i128,
    holders_share_bps: u32,
    treasury_share_bps: u32,
    cap_ceiling: i128,
) -> Result<(), ContractError> {
    if per_pool_rate < 0 || max_rate < 0 || saturation < 0 || cap_ceiling < 0 {
        return Err(ContractError::InvalidInput);
    }
    if holders_share_bps as i128 > BPS_DENOMINATOR || treasury_share_bps as i128 > BPS_DENOMINATOR
    {
        return Err(ContractError::InvalidInput);
    }
    Ok(())
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct EmissionContract;

#[contractimpl]
impl EmissionContract {
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        admin: Address,
        per_pool_rate: i128,
        max_rate: i128,
        saturation: i128,
        holders_share_bps: u32,
        treasury_share_bps: u32,
        cap_ceiling: i128,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&CONFIG) {
            return Err(ContractError::AlreadyInitialized);
        }
        validate(
            per_pool_rate,
            max_rate,
            saturation,
            holders_share_bps,
            treasury_share_bps,
            cap_ceiling,
        )?;

        env.storage().instance().set(
            &CONFIG,
            &EmissionConfig {
                admin,
                per_pool_rate,
                max_rate,
                saturation,
                holders_share_bps,
                treasury_share_bps,
                cap_ceiling,
                version: 1,
            },
        );
        Ok(())
    }

    /// Replace the curve parameters. Engines already rolled forward keep
    /// their accumulated prices; only the forward rate changes on their next
    /// roll-forward.
    #[allow(clippy::too_many_arguments)]
    pub fn update_config(
        env: Env,
        admin: Address,
        per_pool_rate: i128,
        max_rate: i128,
        saturation: i128,
        holders_share_bps: u32,
        treasury_share_bps: u32,
        cap_ceiling: i128,
    ) -> Result<u32, ContractError> {
        admin.require_auth();
        let cfg = load_config(&env)?;
        if cfg.admin != admin {
            return Err(ContractError::Unauthorized);
        }
        validate(
            per_pool_rate,
            max_rate,
            saturation,
            holders_share_bps,
            treasury_share_bps,
            cap_ceiling,
        )?;

        let version = cfg.version.saturating_add(1);
        env.storage().instance().set(
            &CONFIG,
            &EmissionConfig {
                admin,
                per_pool_rate,
                max_rate,
                saturation,
                holders_share_bps,
                treasury_share_bps,
                cap_ceiling,
                version,
            },
        );
        env.events()
            .publish((symbol_short!("EMIS_UPD"),), (version, env.ledger().timestamp()));
        Ok(version)
    }

    pub fn get_config(env: Env) -> Result<EmissionConfig, ContractError> {
        load_config(&env)
    }

    // ── Curve ────────────────────────────────────────────────────────────────

    /// Reward units per second across all pools.
    ///
    /// ```text
    /// base = min(per_pool_rate × eligible_pools, max_rate)
    /// rate = base × saturation / (saturation + total_locked)   (saturation > 0)
    /// ```
    ///
    /// The rate per locked unit never increases as more is locked.
    pub fn reward_rate(
        env: Env,
        total_locked: i128,
        eligible_pools: u32,
    ) -> Result<i128, ContractError> {
        let cfg = load_config(&env)?;
        if total_locked <= 0 || eligible_pools == 0 {
            return Ok(0);
        }
        let base = cfg
            .per_pool_rate
            .saturating_mul(eligible_pools as i128)
            .min(cfg.max_rate);
        if cfg.saturation == 0 {
            return Ok(base);
        }
        Ok(mul_div(
            base,
            cfg.saturation,
            cfg.saturation.saturating_add(total_locked),
        ))
    }

    pub fn holders_share(env: Env, reward: i128, total_locked: i128) -> Result<i128, ContractError> {
        let cfg = load_config(&env)?;
        if total_locked <= 0 {
            return Ok(0);
        }
        Ok(apply_bps(reward, cfg.holders_share_bps))
    }

    pub fn treasury_share(env: Env, reward: i128) -> Result<i128, ContractError> {
        let cfg = load_config(&env)?;
        Ok(apply_bps(reward, cfg.treasury_share_bps))
    }

    pub fn cap_ceiling(env: Env) -> Result<i128, ContractError> {
        Ok(load_config(&env)?.cap_ceiling)
    }

    pub fn version(env: Env) -> Result<u32, ContractError> {
        Ok(load_config(&env)?.version)
    }
}
