//! Ledger TTL policy shared by every contract in the suite.
//!
//! Entries are extended whenever they are read or written; roughly 60 days
//! below the threshold brings them back up to roughly 120 days.

use soroban_sdk::{Env, IntoVal, Val};

pub const TTL_THRESHOLD: u32 = 5_184_000;
pub const TTL_EXTEND_TO: u32 = 10_368_000;

pub fn extend_persistent<K: IntoVal<Env, Val>>(env: &Env, key: &K) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}
