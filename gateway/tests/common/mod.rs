//! Shared fixtures for gateway scenario tests

#![allow(dead_code)]

use base64::prelude::*;
use bonus_engine::memory::{MemoryLedger, StaticSupportOracle};
use bonus_engine::{Account, AccountId, DistributionEngine, EngineConfig};
use bonus_gateway::{sign_payload, GatewayConfig, PaymentProcessor};
use std::sync::Arc;

pub const ROOT: &str = "main";
pub const SECRET: &str = "test-private-key";

pub struct Fixture {
    pub ledger: Arc<MemoryLedger>,
    pub oracle: Arc<StaticSupportOracle>,
    pub processor: PaymentProcessor<MemoryLedger, MemoryLedger, StaticSupportOracle>,
}

pub fn gateway_config() -> GatewayConfig {
    GatewayConfig {
        public_key: "test-public-key".to_owned(),
        private_key: SECRET.to_owned(),
        result_url: "https://client.example.com".to_owned(),
        server_url: "https://api.example.com/payments/process".to_owned(),
        currency: "UAH".to_owned(),
        description: "charitable donation".to_owned(),
    }
}

pub fn fixture() -> Fixture {
    let ledger = Arc::new(MemoryLedger::new());
    let oracle = Arc::new(StaticSupportOracle::new());

    ledger.upsert_account(Account::new(AccountId::from(ROOT), None, "main@example.com"));
    oracle.set_level(AccountId::from(ROOT), 0);

    let engine = DistributionEngine::new(
        EngineConfig::new(AccountId::from(ROOT)),
        Arc::clone(&ledger),
        Arc::clone(&ledger),
        Arc::clone(&oracle),
    )
    .unwrap();

    let processor = PaymentProcessor::new(
        gateway_config(),
        Arc::clone(&ledger),
        Arc::clone(&ledger),
        engine,
    );

    Fixture {
        ledger,
        oracle,
        processor,
    }
}

impl Fixture {
    pub fn seed(&self, id: &str, inviter: &str, support: u32) {
        self.ledger.upsert_account(Account::new(
            AccountId::from(id),
            Some(AccountId::from(inviter)),
            format!("{id}@example.com"),
        ));
        self.oracle.set_level(AccountId::from(id), support);
    }

    /// Encodes and signs a callback the way the gateway would.
    pub fn signed_callback(&self, order_id: &str, status: &str, customer: &str, amount: f64) -> (String, String) {
        let json = format!(
            r#"{{"order_id":"{order_id}","status":"{status}","customer":"{customer}","amount":{amount}}}"#
        );
        let data = BASE64_STANDARD.encode(json);
        let signature = sign_payload(SECRET, &data);
        (data, signature)
    }
}
