//! Root short-circuit behavior
//!
//! The moment the walk reaches the designated root account, the root is
//! credited the entire remaining pool in one entry and the run terminates,
//! regardless of how many tiers are left. Covers the mid-chain case, the
//! walk-starts-at-root case, and the fee-sum property across both.

mod common;

use bonus_engine::store::{AccountStore, PaymentStore};
use bonus_engine::AccountId;

#[test]
fn root_at_level_three_absorbs_the_remainder() {
    let fx = common::fixture();

    // donor -> a1 -> a2 -> main
    fx.seed("a2", common::ROOT, 8);
    fx.seed("a1", "a2", 8);

    let payment_id = fx.seed_payment("p1", "order-1", "donor", 10_000);

    let receipt = fx
        .engine
        .distribute(&AccountId::from("a1"), "donor@example.com", 10_000, &payment_id)
        .unwrap();

    assert!(receipt.root_reached);
    assert_eq!(receipt.fees.len(), 3);
    assert_eq!(receipt.total_distributed, 4_500);

    // 1_000 + 500 at tiers 1 and 2, then 3_000 lands on the root at once
    assert_eq!(receipt.fees[0].fee, 1_000);
    assert_eq!(receipt.fees[1].fee, 500);
    assert_eq!(receipt.fees[2].fee, 3_000);
    assert_eq!(receipt.fees[2].account_id, AccountId::from(common::ROOT));
    assert_eq!(receipt.fees[2].level_bonus, 3);
    assert_eq!(receipt.fees[2].level_partner, 3);

    let root = AccountStore::get(fx.ledger.as_ref(), &AccountId::from(common::ROOT)).unwrap();
    assert_eq!(root.balance, 3_000);
    assert_eq!(root.history.len(), 1);
    assert_eq!(root.history[0].amount_credited, 3_000);

    let payment = PaymentStore::get(fx.ledger.as_ref(), &payment_id).unwrap();
    assert_eq!(payment.fees_total(), 4_500);
}

#[test]
fn walk_starting_at_root_hands_it_the_whole_pool() {
    let fx = common::fixture();

    let payment_id = fx.seed_payment("p2", "order-2", "donor", 10_000);

    let receipt = fx
        .engine
        .distribute(
            &AccountId::from(common::ROOT),
            "donor@example.com",
            10_000,
            &payment_id,
        )
        .unwrap();

    assert!(receipt.root_reached);
    assert_eq!(receipt.fees.len(), 1);
    assert_eq!(receipt.fees[0].fee, 4_500);
    assert_eq!(receipt.fees[0].level_bonus, 1);
    assert_eq!(receipt.fees[0].level_partner, 1);

    let root = AccountStore::get(fx.ledger.as_ref(), &AccountId::from(common::ROOT)).unwrap();
    assert_eq!(root.balance, 4_500);
}

#[test]
fn root_payout_ignores_root_qualification_level() {
    let fx = common::fixture();

    // the root's own support level plays no part in the short-circuit
    fx.oracle.set_level(AccountId::from(common::ROOT), 0);
    fx.seed("a1", common::ROOT, 8);

    let payment_id = fx.seed_payment("p3", "order-3", "donor", 2_000);

    let receipt = fx
        .engine
        .distribute(&AccountId::from("a1"), "donor@example.com", 2_000, &payment_id)
        .unwrap();

    // tier 1 pays 200, the root takes the remaining 700 of the 900 pool
    assert_eq!(receipt.total_distributed, 900);
    assert_eq!(receipt.fees.len(), 2);
    assert_eq!(receipt.fees[1].fee, 700);
    assert!(receipt.root_reached);
}
