//! Two-phase balance mutation.
//!
//! Balances can only be written through [`apply`], and `apply` only accepts a
//! [`Settlement`], which only [`settle`] can build. `settle` is where the
//! engine's `before_balance_change` hook runs, so a balance write without a
//! prior dividend settlement does not type-check.

use common::{ttl, LockupHooksClient};
use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::ContractError;

const BALANCE: Symbol = symbol_short!("BAL");

/// Pre-transfer balances of the parties whose dividends were settled.
pub struct Settlement {
    from: Option<(Address, i128)>,
    to: (Address, i128),
}

pub fn read_balance(env: &Env, id: &Address) -> i128 {
    let key = (BALANCE, id.clone());
    let balance: Option<i128> = env.storage().persistent().get(&key);
    match balance {
        Some(b) => {
            ttl::extend_persistent(env, &key);
            b
        }
        None => 0,
    }
}

fn write_balance(env: &Env, id: &Address, balance: i128) {
    let key = (BALANCE, id.clone());
    env.storage().persistent().set(&key, &balance);
    ttl::extend_persistent(env, &key);
}

/// Phase one: settle every party against its current balance. `from` is
/// `None` for the initial mint.
pub fn settle(
    env: &Env,
    engine: &Address,
    from: Option<&Address>,
    to: &Address,
    total_supply: i128,
) -> Settlement {
    let hooks = LockupHooksClient::new(env, engine);
    let pool = env.current_contract_address();

    let from = from.map(|account| {
        let balance = read_balance(env, account);
        hooks.before_balance_change(&pool, account, &balance, &total_supply);
        (account.clone(), balance)
    });

    let to_balance = read_balance(env, to);
    hooks.before_balance_change(&pool, to, &to_balance, &total_supply);

    Settlement {
        from,
        to: (to.clone(), to_balance),
    }
}

/// Phase two: write the new balances from the settled snapshot.
pub fn apply(env: &Env, settlement: Settlement, amount: i128) -> Result<(), ContractError> {
    if let Some((from, balance)) = settlement.from {
        if balance < amount {
            return Err(ContractError::InsufficientBalance);
        }
        write_balance(env, &from, balance.saturating_sub(amount));
    }
    let (to, balance) = settlement.to;
    write_balance(env, &to, balance.saturating_add(amount));
    Ok(())
}
