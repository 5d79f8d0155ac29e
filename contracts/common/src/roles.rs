//! Governance roles guarding the engine's configuration setters.
//!
//! A role is the set of [`Permission`]s it grants. Setters name the
//! permission they need and call [`authorize`], which fails with
//! [`CommonError::AccessDenied`] unless the caller's role grants it.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::{ttl, CommonError};

const ROLE: Symbol = symbol_short!("ROLE");
const GOVERNOR: Symbol = symbol_short!("GOVERNOR");

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Role {
    /// Moves the holder-reward cap ceiling.
    CapSetter = 1,
    /// Swaps the emission policy and moves the cap ceiling.
    PolicyAdmin = 2,
    /// Everything, including handing out and taking back roles.
    Governance = 3,
}

/// What a guarded operation needs from its caller.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Permission {
    UpdateCap,
    SwapPolicy,
    ManageRoles,
}

impl Role {
    pub fn grants(self, permission: Permission) -> bool {
        match permission {
            Permission::UpdateCap => true,
            Permission::SwapPolicy => matches!(self, Role::PolicyAdmin | Role::Governance),
            Permission::ManageRoles => self == Role::Governance,
        }
    }
}

fn key(account: &Address) -> (Symbol, Address) {
    (ROLE, account.clone())
}

pub fn role_of(env: &Env, account: &Address) -> Option<Role> {
    let key = key(account);
    let role: Option<Role> = env.storage().persistent().get(&key);
    if role.is_some() {
        ttl::extend_persistent(env, &key);
    }
    role
}

/// Role `caller` acts under for `permission`. `caller` must already have
/// passed `require_auth()`.
pub fn authorize(
    env: &Env,
    caller: &Address,
    permission: Permission,
) -> Result<Role, CommonError> {
    role_of(env, caller)
        .filter(|role| role.grants(permission))
        .ok_or(CommonError::AccessDenied)
}

/// Records the initial governor and gives it `Governance`. Called once, from
/// `initialize`.
pub fn bootstrap(env: &Env, governor: &Address) {
    env.storage().instance().set(&GOVERNOR, governor);
    let key = key(governor);
    env.storage().persistent().set(&key, &Role::Governance);
    ttl::extend_persistent(env, &key);
}

pub fn governor(env: &Env) -> Option<Address> {
    env.storage().instance().get(&GOVERNOR)
}

/// Gives `target` exactly `role`, replacing whatever it held. Returns the
/// replaced role.
pub fn grant(
    env: &Env,
    caller: &Address,
    target: &Address,
    role: Role,
) -> Result<Option<Role>, CommonError> {
    authorize(env, caller, Permission::ManageRoles)?;
    let previous = role_of(env, target);
    let key = key(target);
    env.storage().persistent().set(&key, &role);
    ttl::extend_persistent(env, &key);
    Ok(previous)
}

/// Takes `target`'s role away and returns it.
pub fn revoke(env: &Env, caller: &Address, target: &Address) -> Result<Role, CommonError> {
    authorize(env, caller, Permission::ManageRoles)?;
    let held = role_of(env, target).ok_or(CommonError::RoleNotHeld)?;
    env.storage().persistent().remove(&key(target));
    Ok(held)
}
