//! Referral Bonus Distribution Engine
//!
//! Distributes 45% of every confirmed donation or subscription payment up
//! the donor's inviter chain: 10% to the first qualified inviter, 5% to
//! each qualified inviter at tiers 2 through 8, with the designated root
//! account absorbing whatever pool remains the moment the walk reaches it.
//!
//! ## Core pieces
//! - [`step`]: the pure chain-walk state machine, store-free and unit
//!   testable
//! - [`DistributionEngine`]: the driver wiring the walk to the store and
//!   oracle contracts, with atomic credits and bounded contention retries
//! - [`store`]: the [`store::AccountStore`] / [`store::PaymentStore`] /
//!   [`store::SupportOracle`] contracts persistence must satisfy
//! - [`memory::MemoryLedger`]: in-process reference store backing the test
//!   suites
//!
//! Every terminal state of a run is a typed value: a
//! [`DistributionReceipt`] on success, a [`DistributionError`] otherwise.
//! Partial failures leave applied credits and fee records in place and are
//! surfaced for manual reconciliation, never silently swallowed.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod constants;
pub mod distribute;
pub mod errors;
pub mod events;
pub mod memory;
pub mod state;
pub mod step;
pub mod store;

pub use config::{EngineConfig, FeeSchedule};
pub use distribute::{DistributionEngine, DistributionReceipt};
pub use errors::{DistributionError, DistributionResult, StoreError, StoreResult};
pub use state::{
    Account, AccountId, FeeRecord, LedgerEntry, Payment, PaymentId, PaymentStatus,
};
