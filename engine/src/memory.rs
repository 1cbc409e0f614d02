//! In-memory reference store
//!
//! Backs the test suites and small deployments. Both maps sit behind their
//! own `RwLock`; the compare-and-swap in [`AccountStore::credit`] is what
//! makes the concurrency contract real: a reader that loaded a stale
//! balance gets `Conflict`, not a lost update.

use crate::errors::{StoreError, StoreResult};
use crate::state::{Account, AccountId, FeeRecord, LedgerEntry, Payment, PaymentId, PaymentStatus};
use crate::store::{AccountStore, PaymentStore, SupportOracle};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-process account + payment store
#[derive(Debug, Default)]
pub struct MemoryLedger {
    accounts: RwLock<HashMap<AccountId, Account>>,
    payments: RwLock<HashMap<PaymentId, Payment>>,
}

impl MemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an account. Registration happens outside the
    /// engine core; tests and callers seed accounts through this.
    pub fn upsert_account(&self, account: Account) {
        let mut accounts = self.accounts.write().expect("account map poisoned");
        accounts.insert(account.id.clone(), account);
    }
}

impl AccountStore for MemoryLedger {
    fn get(&self, id: &AccountId) -> StoreResult<Account> {
        let accounts = self.accounts.read().expect("account map poisoned");
        accounts
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::AccountNotFound(id.clone()))
    }

    fn credit(&self, id: &AccountId, entry: LedgerEntry) -> StoreResult<Account> {
        let expected_final = entry
            .prior_balance
            .checked_add(entry.amount_credited)
            .ok_or_else(|| StoreError::UnbalancedEntry(id.clone()))?;
        if expected_final != entry.final_balance {
            return Err(StoreError::UnbalancedEntry(id.clone()));
        }

        let mut accounts = self.accounts.write().expect("account map poisoned");
        let account = accounts
            .get_mut(id)
            .ok_or_else(|| StoreError::AccountNotFound(id.clone()))?;

        // Conditional write: the caller's snapshot must still be current.
        if account.balance != entry.prior_balance {
            return Err(StoreError::Conflict(id.clone()));
        }

        account.balance = entry.final_balance;
        account.history.push(entry);
        Ok(account.clone())
    }
}

impl PaymentStore for MemoryLedger {
    fn get(&self, id: &PaymentId) -> StoreResult<Payment> {
        let payments = self.payments.read().expect("payment map poisoned");
        payments
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::PaymentNotFound(id.clone()))
    }

    fn create(&self, payment: Payment) -> StoreResult<Payment> {
        let mut payments = self.payments.write().expect("payment map poisoned");
        let duplicate = payments
            .values()
            .any(|p| p.order_id == payment.order_id && p.status == payment.status);
        if duplicate {
            return Err(StoreError::DuplicatePayment {
                order_id: payment.order_id,
            });
        }
        payments.insert(payment.id.clone(), payment.clone());
        Ok(payment)
    }

    fn find_by_order(
        &self,
        order_id: &str,
        status: &PaymentStatus,
    ) -> StoreResult<Option<Payment>> {
        let payments = self.payments.read().expect("payment map poisoned");
        Ok(payments
            .values()
            .find(|p| p.order_id == order_id && &p.status == status)
            .cloned())
    }

    fn append_fee(&self, id: &PaymentId, fee: FeeRecord) -> StoreResult<Payment> {
        let mut payments = self.payments.write().expect("payment map poisoned");
        let payment = payments
            .get_mut(id)
            .ok_or_else(|| StoreError::PaymentNotFound(id.clone()))?;
        payment.fees.push(fee);
        Ok(payment.clone())
    }
}

/// Fixed-level oracle for tests and single-node deployments
///
/// Production wires the real qualification computation behind
/// [`SupportOracle`]; this map-backed stand-in returns whatever level was
/// seeded per account.
#[derive(Debug, Default)]
pub struct StaticSupportOracle {
    levels: RwLock<HashMap<AccountId, u32>>,
}

impl StaticSupportOracle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_level(&self, id: AccountId, level: u32) {
        let mut levels = self.levels.write().expect("oracle map poisoned");
        levels.insert(id, level);
    }
}

impl SupportOracle for StaticSupportOracle {
    fn support_level(&self, id: &AccountId) -> StoreResult<u32> {
        let levels = self.levels.read().expect("oracle map poisoned");
        levels
            .get(id)
            .copied()
            .ok_or_else(|| StoreError::AccountNotFound(id.clone()))
    }
}
