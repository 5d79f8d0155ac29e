#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Transfers move entitlements without creating or destroying any.
//!
//! Invariants tested:
//! - A transferred position accrues exactly like an untouched twin
//! - An equity transfer leaves both parties' claimable dividend unchanged at
//!   the instant it happens
//! - Holder claims never exceed the pool's holder reward

use proptest::prelude::*;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::Address;

use crate::fixture::{Suite, SUPPLY};

const LOOSE_CAP: i128 = 1_000_000_000_000;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_transferred_position_matches_twin(
        amount in 1i128..1_000_000,
        before in 0u64..1_000,
        after in 1u64..1_000,
    ) {
        let suite = Suite::new(100, 0, 0);
        let alice = suite.account(amount);
        let bob = suite.account(amount);
        let carol = Address::generate(&suite.env);

        let kept = suite.engine.deposit_to_pool(&alice, &suite.pool, &amount);
        let moved = suite.engine.deposit_to_pool(&bob, &suite.pool, &amount);

        suite.advance(before);
        suite.engine.transfer_position(&bob, &carol, &moved);
        suite.advance(after);

        prop_assert_eq!(suite.engine.withdrawable_interest(&kept), suite.engine.withdrawable_interest(&moved));
        prop_assert_eq!(suite.engine.owner_of(&moved), carol);
    }

    #[test]
    fn prop_equity_transfer_is_claim_neutral(
        steps in proptest::collection::vec((1u64..200, 1i128..SUPPLY / 4), 1..8),
    ) {
        let suite = Suite::new(100, 5_000, LOOSE_CAP);
        let alice = suite.author.clone();
        let bob = Address::generate(&suite.env);
        let staker = suite.account(1_000);
        suite.engine.deposit_to_pool(&staker, &suite.pool, &1_000);

        let claim = |who: &Address| suite.engine.calculate_holder_reward_amount(&suite.pool, who).0;

        for (secs, amount) in steps {
            suite.advance(secs);
            let (from, to) = if suite.equity().balance(&alice) >= amount {
                (&alice, &bob)
            } else {
                (&bob, &alice)
            };
            if suite.equity().balance(from) < amount {
                continue;
            }

            let before = (claim(&alice), claim(&bob));
            suite.equity().transfer(from, to, &amount);
            prop_assert_eq!((claim(&alice), claim(&bob)), before);
        }

        let (holders_reward, _) = suite.engine.calculate_reward_amount(&suite.pool);
        prop_assert!(claim(&alice) + claim(&bob) <= holders_reward);
    }
}
