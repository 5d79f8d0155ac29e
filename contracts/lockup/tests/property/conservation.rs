#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Reward conservation under arbitrary deposit / withdraw / time sequences.
//!
//! Invariants tested:
//! - Rewards paid plus rewards still owed never exceed what was emitted
//! - Rounding loses at most a unit per settlement
//! - Principal always comes back in full

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use soroban_sdk::Address;

use crate::fixture::{Suite, FUNDING};

const STAKERS: usize = 3;
const STAKE: i128 = 10_000_000;

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Deposit {
        #[proptest(strategy = "0usize..STAKERS")]
        who: usize,
        #[proptest(strategy = "1i128..100_000")]
        amount: i128,
    },
    Withdraw {
        #[proptest(strategy = "0usize..STAKERS")]
        who: usize,
        #[proptest(strategy = "0i128..=100")]
        percent: i128,
    },
    Advance {
        #[proptest(strategy = "1u64..500")]
        secs: u64,
    },
}

fn run(suite: &Suite, stakers: &[Address], ops: &[Op]) -> [Option<u64>; STAKERS] {
    let mut positions = [None; STAKERS];
    for op in ops {
        match op {
            Op::Deposit { who, amount } => {
                let id = suite
                    .engine
                    .deposit_to_pool(&stakers[*who], &suite.pool, amount);
                positions[*who] = Some(id);
            }
            Op::Withdraw { who, percent } => {
                if let Some(id) = positions[*who] {
                    let locked = suite.engine.get_position(&id).amount;
                    let amount = locked * percent / 100;
                    let _ = suite
                        .engine
                        .try_withdraw_by_position(&stakers[*who], &id, &amount);
                }
            }
            Op::Advance { secs } => suite.advance(*secs),
        }
    }
    positions
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_paid_plus_owed_never_exceeds_emitted(
        rate in 1i128..10_000,
        ops in proptest::collection::vec(any::<Op>(), 1..24),
    ) {
        let suite = Suite::new(rate, 0, 0);
        let stakers: std::vec::Vec<Address> = (0..STAKERS).map(|_| suite.account(STAKE)).collect();

        let positions = run(&suite, &stakers, &ops);

        suite.engine.sync_pool(&suite.pool);
        let emitted = suite.engine.get_global().total_emitted;
        let paid = FUNDING - suite.reward_balance(&suite.engine_id);
        let owed: i128 = positions
            .iter()
            .flatten()
            .map(|id| suite.engine.withdrawable_interest(id))
            .sum();

        prop_assert!(paid + owed <= emitted);
        prop_assert!(emitted - (paid + owed) <= 2 * (ops.len() as i128 + STAKERS as i128));
    }

    #[test]
    fn prop_principal_is_returned_in_full(
        ops in proptest::collection::vec(any::<Op>(), 1..24),
    ) {
        let suite = Suite::new(100, 0, 0);
        let stakers: std::vec::Vec<Address> = (0..STAKERS).map(|_| suite.account(STAKE)).collect();

        let positions = run(&suite, &stakers, &ops);

        for (who, id) in positions.iter().enumerate() {
            if let Some(id) = id {
                let locked = suite.engine.get_position(id).amount;
                if locked > 0 {
                    suite.engine.withdraw_by_position(&stakers[who], id, &locked);
                }
            }
            prop_assert_eq!(
                soroban_sdk::token::Client::new(&suite.env, &suite.stake_token).balance(&stakers[who]),
                STAKE
            );
        }
        prop_assert_eq!(suite.engine.get_global().total_locked, 0);
    }
}
