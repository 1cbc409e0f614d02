//! Shared fixtures for engine scenario tests

#![allow(dead_code)]

use bonus_engine::memory::{MemoryLedger, StaticSupportOracle};
use bonus_engine::store::PaymentStore;
use bonus_engine::{
    Account, AccountId, DistributionEngine, EngineConfig, Payment, PaymentId, PaymentStatus,
};
use std::sync::Arc;

pub const ROOT: &str = "main";

pub struct Fixture {
    pub ledger: Arc<MemoryLedger>,
    pub oracle: Arc<StaticSupportOracle>,
    pub engine: DistributionEngine<MemoryLedger, MemoryLedger, StaticSupportOracle>,
}

/// Builds a ledger seeded with the root account and an engine over it.
pub fn fixture() -> Fixture {
    let ledger = Arc::new(MemoryLedger::new());
    let oracle = Arc::new(StaticSupportOracle::new());

    ledger.upsert_account(Account::new(
        AccountId::from(ROOT),
        None,
        "main@example.com",
    ));
    oracle.set_level(AccountId::from(ROOT), 0);

    let engine = DistributionEngine::new(
        EngineConfig::new(AccountId::from(ROOT)),
        Arc::clone(&ledger),
        Arc::clone(&ledger),
        Arc::clone(&oracle),
    )
    .unwrap();

    Fixture {
        ledger,
        oracle,
        engine,
    }
}

impl Fixture {
    /// Seeds an account with the given inviter and support level.
    pub fn seed(&self, id: &str, inviter: &str, support: u32) {
        self.ledger.upsert_account(Account::new(
            AccountId::from(id),
            Some(AccountId::from(inviter)),
            format!("{id}@example.com"),
        ));
        self.oracle.set_level(AccountId::from(id), support);
    }

    /// Records a confirmed payment ready for distribution.
    pub fn seed_payment(&self, id: &str, order_id: &str, customer: &str, amount: u64) -> PaymentId {
        let payment_id = PaymentId::from(id);
        self.ledger
            .create(Payment::new(
                payment_id.clone(),
                order_id,
                PaymentStatus::Success,
                AccountId::from(customer),
                amount,
            ))
            .unwrap();
        payment_id
    }
}
