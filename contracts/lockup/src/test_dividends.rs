extern crate std;

use soroban_sdk::{testutils::Address as _, Address};

use crate::fixture::{Fixture, Params, SUPPLY};
use crate::ContractError;

/// Holders take half of every emission. One staker keeps the pool earning.
fn half_to_holders() -> Fixture {
    Fixture::with(Params {
        holders_bps: 5_000,
        ..Params::default()
    })
}

fn claimable(fx: &Fixture, pool: &Address, account: &Address) -> i128 {
    fx.engine.calculate_holder_reward_amount(pool, account).0
}

#[test]
fn test_split_follows_balance_after_transfer() {
    let fx = half_to_holders();
    let alice = Address::generate(&fx.env);
    let bob = Address::generate(&fx.env);
    let pool = fx.pool(&alice);
    let equity = fx.equity(&pool);

    // 80 / 20.
    equity.transfer(&alice, &bob, &(SUPPLY / 5));
    let staker = fx.staker(1_000);
    fx.engine.deposit_to_pool(&staker, &pool, &1_000);

    // 1_000 emitted, 500 to holders.
    fx.at(10);
    assert_eq!(claimable(&fx, &pool, &alice), 400);
    assert_eq!(claimable(&fx, &pool, &bob), 100);

    // Alice moves 10% of supply: 70 / 30 from here on.
    equity.transfer(&alice, &bob, &(SUPPLY / 10));
    assert_eq!(claimable(&fx, &pool, &alice), 400);
    assert_eq!(claimable(&fx, &pool, &bob), 100);
    assert_eq!(fx.engine.get_holder_snapshot(&pool, &alice).pending_withdrawal, 400);

    fx.at(20);
    assert_eq!(claimable(&fx, &pool, &alice), 750);
    assert_eq!(claimable(&fx, &pool, &bob), 250);
}

#[test]
fn test_holder_withdraw_pays_and_resets() {
    let fx = half_to_holders();
    let alice = Address::generate(&fx.env);
    let pool = fx.pool(&alice);
    let staker = fx.staker(1_000);
    fx.engine.deposit_to_pool(&staker, &pool, &1_000);

    fx.at(10);
    assert_eq!(fx.engine.holder_withdraw(&alice, &pool), 500);
    assert_eq!(fx.reward_balance(&alice), 500);

    let snapshot = fx.engine.get_holder_snapshot(&pool, &alice);
    assert_eq!(snapshot.pending_withdrawal, 0);
    assert!(snapshot.last_withdrawn_price > 0);

    match fx.engine.try_holder_withdraw(&alice, &pool) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NoWithdrawableAmount),
        _ => unreachable!("Expected NoWithdrawableAmount error"),
    }

    fx.at(20);
    assert_eq!(fx.engine.holder_withdraw(&alice, &pool), 500);
}

#[test]
fn test_settled_dividend_survives_selling_everything() {
    let fx = half_to_holders();
    let alice = Address::generate(&fx.env);
    let bob = Address::generate(&fx.env);
    let pool = fx.pool(&alice);
    let staker = fx.staker(1_000);
    fx.engine.deposit_to_pool(&staker, &pool, &1_000);

    fx.at(10);
    fx.equity(&pool).transfer(&alice, &bob, &SUPPLY);

    // Bob bought in after the window; Alice keeps what she earned.
    assert_eq!(claimable(&fx, &pool, &bob), 0);
    fx.at(20);
    assert_eq!(claimable(&fx, &pool, &alice), 500);
    assert_eq!(claimable(&fx, &pool, &bob), 500);
    assert_eq!(fx.engine.holder_withdraw(&alice, &pool), 500);
}

#[test]
fn test_staker_share_excludes_holders() {
    let fx = half_to_holders();
    let pool = fx.pool(&Address::generate(&fx.env));
    let staker = fx.staker(1_000);
    let id = fx.engine.deposit_to_pool(&staker, &pool, &1_000);

    fx.at(10);
    assert_eq!(fx.engine.withdrawable_interest(&id), 500);
    let (holders_reward, cap_value) = fx.engine.calculate_reward_amount(&pool);
    assert_eq!(holders_reward, 500);
    assert!(cap_value > 0);
}

#[test]
fn test_ineligible_pool_pays_no_dividend() {
    let fx = half_to_holders();
    let alice = Address::generate(&fx.env);
    let pool = fx.unregistered_pool(&alice);

    fx.at(10);
    let (claim, price, _, raw) = fx.engine.calculate_holder_reward_amount(&pool, &alice);
    assert_eq!(claim, 0);
    assert_eq!(price, 0);
    assert_eq!(raw, 0);

    match fx.engine.try_holder_withdraw(&alice, &pool) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NoWithdrawableAmount),
        _ => unreachable!("Expected NoWithdrawableAmount error"),
    }
}

#[test]
fn test_deregistered_pool_withholds_until_reregistered() {
    let fx = half_to_holders();
    let alice = Address::generate(&fx.env);
    let pool = fx.pool(&alice);
    let staker = fx.staker(1_000);
    fx.engine.deposit_to_pool(&staker, &pool, &1_000);

    fx.at(10);
    fx.registry.deregister(&fx.registry_admin, &pool);

    fx.at(20);
    let (claim, _, _, raw) = fx.engine.calculate_holder_reward_amount(&pool, &alice);
    assert_eq!(claim, 0);
    // Only the eligible window accrued.
    assert_eq!(raw, 500);

    fx.registry.register(&fx.registry_admin, &pool);
    assert_eq!(claimable(&fx, &pool, &alice), 500);
}

#[test]
fn test_holder_withdraw_requires_reserve() {
    let fx = Fixture::with(Params {
        holders_bps: 5_000,
        reward_funding: 100,
        ..Params::default()
    });
    let alice = Address::generate(&fx.env);
    let pool = fx.pool(&alice);
    let staker = fx.staker(1_000);
    fx.engine.deposit_to_pool(&staker, &pool, &1_000);

    fx.at(10);
    match fx.engine.try_holder_withdraw(&alice, &pool) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InsufficientBalance),
        _ => unreachable!("Expected InsufficientBalance error"),
    }

    fx.fund_rewards(400);
    assert_eq!(fx.engine.holder_withdraw(&alice, &pool), 500);
}
