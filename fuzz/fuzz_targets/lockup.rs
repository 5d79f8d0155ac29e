#![no_main]

use arbitrary::Arbitrary;
use emission::{EmissionContract, EmissionContractClient};
use equity_token::{EquityTokenContract, EquityTokenContractClient};
use libfuzzer_sys::fuzz_target;
use lockup::{LockupContract, LockupContractClient};
use registry::{RegistryContract, RegistryContractClient};
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::StellarAssetClient,
    Address, Env, String,
};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Deposit { pool: u8, amount: u64 },
    Withdraw { position: u8, amount: u64 },
    TransferPosition { position: u8, to: u8 },
    TransferEquity { pool: u8, to: u8, amount: u64 },
    HolderWithdraw { pool: u8 },
    Deregister { pool: u8 },
    Register { pool: u8 },
    UpdateCap { cap: u64 },
    Advance { secs: u16 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let policy_id = env.register(EmissionContract, ());
    let _ = EmissionContractClient::new(&env, &policy_id).try_initialize(
        &Address::generate(&env),
        &100,
        &10_000,
        &1_000_000,
        &3_000,
        &1_000,
        &1_000_000_000_000,
    );

    let admin = Address::generate(&env);
    let registry_id = env.register(RegistryContract, ());
    let registry = RegistryContractClient::new(&env, &registry_id);
    let _ = registry.try_initialize(&admin);

    let governor = Address::generate(&env);
    let engine_id = env.register(LockupContract, ());
    let engine = LockupContractClient::new(&env, &engine_id);
    let _ = engine.try_initialize(
        &governor,
        &stake_token,
        &reward_token,
        &policy_id,
        &registry_id,
        &Address::generate(&env),
    );
    let _ = registry.try_bind_engine(&admin, &engine_id);
    StellarAssetClient::new(&env, &reward_token).mint(&engine_id, &1_000_000_000_000);

    let mut users = vec![];
    for _ in 0..4 {
        let user = Address::generate(&env);
        StellarAssetClient::new(&env, &stake_token).mint(&user, &(u64::MAX as i128));
        users.push(user);
    }

    let mut pools = vec![];
    for i in 0..2 {
        let pool = env.register(EquityTokenContract, ());
        let _ = EquityTokenContractClient::new(&env, &pool).try_initialize(
            &users[i],
            &engine_id,
            &String::from_str(&env, "Property"),
            &String::from_str(&env, "PROP"),
            &10_000_000,
        );
        let _ = registry.try_register(&admin, &pool);
        pools.push(pool);
    }

    // Looking for panics: overflow, missing records, broken index invariants.
    for (i, action) in actions.into_iter().enumerate() {
        let caller = &users[i % users.len()];
        match action {
            FuzzAction::Deposit { pool, amount } => {
                let pool = &pools[pool as usize % pools.len()];
                let _ = engine.try_deposit_to_pool(caller, pool, &(amount as i128));
            }
            FuzzAction::Withdraw { position, amount } => {
                let _ = engine.try_withdraw_by_position(
                    caller,
                    &(position as u64),
                    &(amount as i128),
                );
            }
            FuzzAction::TransferPosition { position, to } => {
                let to = &users[to as usize % users.len()];
                let _ = engine.try_transfer_position(caller, to, &(position as u64));
            }
            FuzzAction::TransferEquity { pool, to, amount } => {
                let pool = &pools[pool as usize % pools.len()];
                let to = &users[to as usize % users.len()];
                let _ = EquityTokenContractClient::new(&env, pool).try_transfer(
                    caller,
                    to,
                    &(amount as i128),
                );
            }
            FuzzAction::HolderWithdraw { pool } => {
                let pool = &pools[pool as usize % pools.len()];
                let _ = engine.try_holder_withdraw(caller, pool);
            }
            FuzzAction::Deregister { pool } => {
                let pool = &pools[pool as usize % pools.len()];
                let _ = registry.try_deregister(&admin, pool);
            }
            FuzzAction::Register { pool } => {
                let pool = &pools[pool as usize % pools.len()];
                let _ = registry.try_register(&admin, pool);
            }
            FuzzAction::UpdateCap { cap } => {
                let _ = engine.try_update_cap(&governor, &(cap as i128));
            }
            FuzzAction::Advance { secs } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now + secs as u64);
            }
        }

        let global = engine.get_global();
        assert!(global.total_locked >= 0);
        assert!(global.treasury_accrued >= 0);
    }
});
