extern crate std;

use common::math::PRECISION;
use common::roles::Role;
use soroban_sdk::{testutils::Address as _, Address};

use crate::fixture::{Fixture, Params, LOOSE_CAP, RATE, SUPPLY};
use crate::ContractError;

/// 2.5 reward units per second per million equity units.
const TIGHT_CAP: i128 = 2_500_000;

/// Holders take half of emission, split 80 / 20 between Alice and Bob.
fn capped(cap: i128) -> (Fixture, Address, Address, Address) {
    let fx = Fixture::with(Params {
        holders_bps: 5_000,
        cap,
        ..Params::default()
    });
    let alice = Address::generate(&fx.env);
    let bob = Address::generate(&fx.env);
    let pool = fx.pool(&alice);
    fx.equity(&pool).transfer(&alice, &bob, &(SUPPLY / 5));

    let staker = fx.staker(1_000);
    fx.engine.deposit_to_pool(&staker, &pool, &1_000);

    (fx, pool, alice, bob)
}

#[test]
fn test_cap_seeded_from_policy() {
    let (fx, ..) = capped(TIGHT_CAP);
    assert_eq!(fx.engine.get_cap(), TIGHT_CAP);
}

#[test]
fn test_cap_clamps_holder_dividend() {
    let (fx, pool, alice, bob) = capped(TIGHT_CAP);

    fx.at(10);
    let (claim, _, cap, raw) = fx.engine.calculate_holder_reward_amount(&pool, &alice);
    assert_eq!(raw, 400);
    assert_eq!(claim, 200);
    assert_eq!(cap, TIGHT_CAP * 10);

    let (claim, _, _, raw) = fx.engine.calculate_holder_reward_amount(&pool, &bob);
    assert_eq!(raw, 100);
    assert_eq!(claim, 50);
}

#[test]
fn test_clamped_excess_is_forfeited() {
    let (fx, pool, alice, _) = capped(TIGHT_CAP);

    fx.at(10);
    assert_eq!(fx.engine.holder_withdraw(&alice, &pool), 200);

    // Same instant: nothing left, the other 200 is gone.
    match fx.engine.try_holder_withdraw(&alice, &pool) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NoWithdrawableAmount),
        _ => unreachable!("Expected NoWithdrawableAmount error"),
    }
    assert_eq!(fx.engine.calculate_holder_reward_amount(&pool, &alice).0, 0);
}

#[test]
fn test_raising_cap_does_not_pay_past_windows() {
    let (fx, pool, alice, _) = capped(TIGHT_CAP);

    fx.at(10);
    assert_eq!(fx.engine.holder_withdraw(&alice, &pool), 200);

    fx.engine.update_cap(&fx.governor, &LOOSE_CAP);
    assert_eq!(fx.engine.get_cap(), LOOSE_CAP);

    fx.at(20);
    assert_eq!(fx.engine.holder_withdraw(&alice, &pool), 400);
    assert_eq!(fx.reward_balance(&alice), 600);
}

#[test]
fn test_cap_change_applies_forward_only() {
    let (fx, ..) = capped(TIGHT_CAP);

    fx.at(10);
    fx.engine.update_cap(&fx.governor, &(TIGHT_CAP * 2));

    fx.at(20);
    let (_, _, cap) = fx.engine.cumulative_reward_prices();
    assert_eq!(cap, TIGHT_CAP * 10 + TIGHT_CAP * 2 * 10);
}

#[test]
fn test_zero_cap_blocks_dividends() {
    let (fx, pool, alice, _) = capped(0);

    fx.at(10);
    let (claim, _, _, raw) = fx.engine.calculate_holder_reward_amount(&pool, &alice);
    assert_eq!(raw, 400);
    assert_eq!(claim, 0);
}

#[test]
fn test_update_cap_requires_role() {
    let (fx, ..) = capped(TIGHT_CAP);
    let stranger = Address::generate(&fx.env);

    match fx.engine.try_update_cap(&stranger, &PRECISION) {
        Err(Ok(e)) => assert_eq!(e, ContractError::IllegalAccess),
        _ => unreachable!("Expected IllegalAccess error"),
    }

    let setter = Address::generate(&fx.env);
    fx.engine.grant_role(&fx.governor, &setter, &Role::CapSetter);
    fx.engine.update_cap(&setter, &PRECISION);
    assert_eq!(fx.engine.get_cap(), PRECISION);

    match fx.engine.try_update_cap(&setter, &-1) {
        Err(Ok(e)) => assert_eq!(e, ContractError::IllegalAmount),
        _ => unreachable!("Expected IllegalAmount error"),
    }
}

// ── Policy swap ───────────────────────────────────────────────────────────────

#[test]
fn test_policy_swap_keeps_accumulated_prices() {
    let fx = Fixture::new();
    let pool = fx.pool(&Address::generate(&fx.env));
    let alice = fx.staker(1_000);
    let id = fx.engine.deposit_to_pool(&alice, &pool, &1_000);

    fx.at(10);
    let faster = fx.another_policy(RATE * 3);
    assert_eq!(fx.engine.set_policy(&fx.governor, &faster), 2);
    assert_eq!(fx.engine.get_config().policy, faster);
    assert_eq!(fx.engine.get_global().policy_version, 2);

    // Ten seconds under the old rate, ten under the new one.
    fx.at(20);
    assert_eq!(fx.engine.withdrawable_interest(&id), RATE * 10 + RATE * 3 * 10);
}

#[test]
fn test_set_policy_requires_policy_admin() {
    let fx = Fixture::new();
    let setter = Address::generate(&fx.env);
    let admin = Address::generate(&fx.env);
    let other = fx.another_policy(RATE);

    fx.engine.grant_role(&fx.governor, &setter, &Role::CapSetter);
    match fx.engine.try_set_policy(&setter, &other) {
        Err(Ok(e)) => assert_eq!(e, ContractError::IllegalAccess),
        _ => unreachable!("Expected IllegalAccess error"),
    }

    fx.engine.grant_role(&fx.governor, &admin, &Role::PolicyAdmin);
    assert_eq!(fx.engine.set_policy(&admin, &other), 2);
    // PolicyAdmin outranks CapSetter.
    fx.engine.update_cap(&admin, &0);
    assert_eq!(fx.engine.get_cap(), 0);
}
