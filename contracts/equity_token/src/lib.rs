#![no_std]

pub mod transfer;


use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, Address, Env, String, Symbol};

// ── Storage keys ─────────────────────────────────────────────────────────────

const METADATA: Symbol = symbol_short!("META");
const SUPPLY: Symbol = symbol_short!("SUPPLY");
const ENGINE: Symbol = symbol_short!("ENGINE");

const DECIMALS: u32 = 7;

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    IllegalAmount = 3,
    InsufficientBalance = 4,
    SelfTransfer = 5,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Metadata {
    pub author: Address,
    pub name: String,
    pub symbol: String,
}

/// Fixed-supply equity token of a single pool. The token's own address is
/// the pool identifier the engine keys holder dividends by.
#[contract]
pub struct EquityTokenContract;

#[contractimpl]
impl EquityTokenContract {
    /// Mint the whole `supply` to `author`. The engine is told about the
    /// author's balance before it is written, like any later transfer.
    pub fn initialize(
        env: Env,
        author: Address,
        engine: Address,
        name: String,
        symbol: String,
        supply: i128,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&METADATA) {
            return Err(ContractError::AlreadyInitialized);
        }
        if supply <= 0 {
            return Err(ContractError::IllegalAmount);
        }

        env.storage().instance().set(
            &METADATA,
            &Metadata {
                author: author.clone(),
                name,
                symbol,
            },
        );
        env.storage().instance().set(&SUPPLY, &supply);
        env.storage().instance().set(&ENGINE, &engine);

        let settlement = transfer::settle(&env, &engine, None, &author, supply);
        transfer::apply(&env, settlement, supply)?;
        Ok(())
    }

    /// Move `amount` from `from` to `to`, settling both parties' dividends
    /// against their balances before either balance is written.
    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), ContractError> {
        from.require_auth();
        if amount <= 0 {
            return Err(ContractError::IllegalAmount);
        }
        if from == to {
            return Err(ContractError::SelfTransfer);
        }
        if transfer::read_balance(&env, &from) < amount {
            return Err(ContractError::InsufficientBalance);
        }

        let engine = Self::engine(&env)?;
        let supply = Self::total_supply(env.clone());
        let settlement = transfer::settle(&env, &engine, Some(&from), &to, supply);
        transfer::apply(&env, settlement, amount)?;

        env.events()
            .publish((symbol_short!("transfer"), from, to), amount);
        Ok(())
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        transfer::read_balance(&env, &id)
    }

    pub fn total_supply(env: Env) -> i128 {
        env.storage().instance().get(&SUPPLY).unwrap_or(0)
    }

    pub fn decimals(_env: Env) -> u32 {
        DECIMALS
    }

    pub fn name(env: Env) -> Result<String, ContractError> {
        Ok(Self::metadata(&env)?.name)
    }

    pub fn symbol(env: Env) -> Result<String, ContractError> {
        Ok(Self::metadata(&env)?.symbol)
    }

    pub fn author(env: Env) -> Result<Address, ContractError> {
        Ok(Self::metadata(&env)?.author)
    }

    fn metadata(env: &Env) -> Result<Metadata, ContractError> {
        env.storage()
            .instance()
            .get(&METADATA)
            .ok_or(ContractError::NotInitialized)
    }

    fn engine(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ENGINE)
            .ok_or(ContractError::NotInitialized)
    }
}
