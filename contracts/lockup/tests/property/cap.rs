#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Cap enforcement.
//!
//! Invariants tested:
//! - A holder's claim is the smaller of the raw accrual and the cap allowance
//! - The pool's cap value grows by exactly `ceiling × elapsed`
//! - Withdrawing twice at the same instant pays nothing the second time

use proptest::prelude::*;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::Address;

use crate::fixture::{Suite, SUPPLY};

const PRECISION: i128 = 1_000_000_000_000;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_claim_is_min_of_raw_and_allowance(
        ceiling in 0i128..20_000_000,
        elapsed in 1u64..1_000,
        share in 1i128..SUPPLY,
    ) {
        let suite = Suite::new(100, 5_000, ceiling);
        let bob = Address::generate(&suite.env);
        suite.equity().transfer(&suite.author, &bob, &share);
        let staker = suite.account(1_000);
        suite.engine.deposit_to_pool(&staker, &suite.pool, &1_000);

        suite.advance(elapsed);
        let (claim, _, cap, raw) = suite.engine.calculate_holder_reward_amount(&suite.pool, &bob);

        prop_assert_eq!(cap, ceiling * elapsed as i128);
        prop_assert_eq!(claim, raw.min(share * cap / PRECISION));
    }

    #[test]
    fn prop_second_withdraw_at_same_instant_pays_nothing(
        ceiling in 1_000_000i128..20_000_000,
        elapsed in 10u64..1_000,
    ) {
        let suite = Suite::new(100, 5_000, ceiling);
        let staker = suite.account(1_000);
        suite.engine.deposit_to_pool(&staker, &suite.pool, &1_000);

        suite.advance(elapsed);
        let first = suite.engine.holder_withdraw(&suite.author, &suite.pool);
        prop_assert!(first > 0);
        prop_assert!(suite.engine.try_holder_withdraw(&suite.author, &suite.pool).is_err());
        prop_assert_eq!(suite.reward_balance(&suite.author), first);
    }
}
