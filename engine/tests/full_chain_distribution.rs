//! Full eight-level distribution over an immediately qualified chain
//!
//! Scenario from the accounting identity: amount 100.00 (10_000 minor
//! units), pool 4_500. Level 1 pays 1_000, levels 2..=8 pay 500 each,
//! leaving exactly zero. Eight fee records, in level order, root never
//! reached.

mod common;

use bonus_engine::store::{AccountStore, PaymentStore};
use bonus_engine::AccountId;

#[test]
fn eight_qualified_levels_exhaust_the_pool_exactly() {
    let fx = common::fixture();

    // donor -> a1 -> a2 -> ... -> a8 -> main, everyone fully qualified
    fx.seed("a8", common::ROOT, 8);
    let names: Vec<String> = (1..=8).map(|i| format!("a{i}")).collect();
    for pair in names.windows(2) {
        fx.seed(&pair[0], &pair[1], 8);
    }
    fx.seed("donor", "a1", 0);

    let payment_id = fx.seed_payment("p1", "order-1", "donor", 10_000);

    let receipt = fx
        .engine
        .distribute(&AccountId::from("a1"), "donor@example.com", 10_000, &payment_id)
        .unwrap();

    assert_eq!(receipt.total_distributed, 4_500);
    assert!(!receipt.root_reached);
    assert_eq!(receipt.fees.len(), 8);

    // level 1 earns 10%, every later level 5%
    assert_eq!(receipt.fees[0].fee, 1_000);
    for record in &receipt.fees[1..] {
        assert_eq!(record.fee, 500);
    }

    // records appear in level-processing order with true chain depth
    for (i, record) in receipt.fees.iter().enumerate() {
        let expected_level = u8::try_from(i).unwrap().checked_add(1).unwrap();
        assert_eq!(record.level_bonus, expected_level);
        assert_eq!(record.level_partner, u32::from(expected_level));
        assert_eq!(record.account_id, AccountId::from(format!("a{}", i.checked_add(1).unwrap()).as_str()));
    }

    // the payment carries the same records in the same order
    let payment = PaymentStore::get(fx.ledger.as_ref(), &payment_id).unwrap();
    assert_eq!(payment.fees, receipt.fees);
    assert_eq!(payment.fees_total(), 4_500);

    // balances and ledgers line up
    let a1 = AccountStore::get(fx.ledger.as_ref(), &AccountId::from("a1")).unwrap();
    assert_eq!(a1.balance, 1_000);
    assert_eq!(a1.history.len(), 1);
    assert_eq!(a1.history[0].prior_balance, 0);
    assert_eq!(a1.history[0].final_balance, 1_000);
    assert_eq!(a1.history[0].counterparty_email, "donor@example.com");
    assert_eq!(a1.history[0].level_bonus, 1);

    let a5 = AccountStore::get(fx.ledger.as_ref(), &AccountId::from("a5")).unwrap();
    assert_eq!(a5.balance, 500);

    // the root earned nothing: the schedule closed the pool on its own
    let root = AccountStore::get(fx.ledger.as_ref(), &AccountId::from(common::ROOT)).unwrap();
    assert_eq!(root.balance, 0);
    assert!(root.history.is_empty());
}

#[test]
fn awkward_amount_still_closes_the_pool() {
    let fx = common::fixture();

    fx.seed("a8", common::ROOT, 8);
    let names: Vec<String> = (1..=8).map(|i| format!("a{i}")).collect();
    for pair in names.windows(2) {
        fx.seed(&pair[0], &pair[1], 8);
    }

    // 100.03 is not divisible by 20, so truncated tier fees leave dust
    let payment_id = fx.seed_payment("p2", "order-2", "donor", 10_003);

    let receipt = fx
        .engine
        .distribute(&AccountId::from("a1"), "donor@example.com", 10_003, &payment_id)
        .unwrap();

    // pool = floor(10_003 * 45%) = 4_501; the final tier absorbs the dust
    assert_eq!(receipt.total_distributed, 4_501);
    assert_eq!(receipt.fees[0].fee, 1_000);
    assert_eq!(receipt.fees[7].fee, 501);
}

#[test]
fn tiny_amounts_skip_zero_fee_tiers() {
    let fx = common::fixture();

    fx.seed("a8", common::ROOT, 8);
    let names: Vec<String> = (1..=8).map(|i| format!("a{i}")).collect();
    for pair in names.windows(2) {
        fx.seed(&pair[0], &pair[1], 8);
    }

    // 0.10: pool = 4, level 1 fee = 1, level fees 2..=7 truncate to 0,
    // the final tier absorbs the remaining 3
    let payment_id = fx.seed_payment("p3", "order-3", "donor", 10);

    let receipt = fx
        .engine
        .distribute(&AccountId::from("a1"), "donor@example.com", 10, &payment_id)
        .unwrap();

    assert_eq!(receipt.total_distributed, 4);

    // only the non-zero tiers produced records
    assert_eq!(receipt.fees.len(), 2);
    assert_eq!(receipt.fees[0].account_id, AccountId::from("a1"));
    assert_eq!(receipt.fees[0].fee, 1);
    assert_eq!(receipt.fees[1].account_id, AccountId::from("a8"));
    assert_eq!(receipt.fees[1].level_bonus, 8);
    assert_eq!(receipt.fees[1].fee, 3);

    // the zero-fee tiers wrote nothing to the middle accounts
    for name in &names[1..7] {
        let account = AccountStore::get(fx.ledger.as_ref(), &AccountId::from(name.as_str())).unwrap();
        assert_eq!(account.balance, 0);
        assert!(account.history.is_empty());
    }

    let payment = PaymentStore::get(fx.ledger.as_ref(), &payment_id).unwrap();
    assert_eq!(payment.fees, receipt.fees);
    assert_eq!(payment.fees_total(), 4);
}
