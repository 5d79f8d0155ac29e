//! Shared building blocks for the Proplock contract suite.
//!
//! This crate provides:
//! - [`CommonError`]: failures raised by the shared helpers. Contracts map
//!   them into their own error enums with `From`.
//! - [`math`]: fixed-point helpers used by the reward accumulators.
//! - [`roles`]: governance roles and the permission guard for setters.
//! - [`ttl`]: the ledger TTL policy every contract extends entries with.
//! - [`interfaces`]: client traits for every cross-contract seam (emission
//!   policy, pool registry, equity token, engine hooks).

#![no_std]

use soroban_sdk::contracterror;

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod interfaces;
pub mod math;
pub mod roles;
pub mod ttl;

pub use interfaces::*;

// ── Shared error enum ────────────────────────────────────────────────────────

/// Errors raised inside `common`.
///
/// # Code ranges
/// | Range   | Purpose                        |
/// |---------|--------------------------------|
/// | 10 – 19 | Authentication & authorisation |
#[contracterror]
#[derive(Clone, Debug, Eq, PartialEq, Copy)]
#[repr(u32)]
pub enum CommonError {
    /// The caller's role does not grant the required permission.
    AccessDenied = 10,

    /// The account holds no role to revoke.
    RoleNotHeld = 11,
}
