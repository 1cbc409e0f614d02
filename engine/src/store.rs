//! Store and oracle contracts
//!
//! The engine only ever talks to these traits; persistence technology is a
//! deployment concern. The one hard requirement is on [`AccountStore::credit`]:
//! the balance update and the history append must land as a single
//! conditional write against the account's current stored balance, or
//! concurrent runs over a shared inviter lose credits.

use crate::errors::StoreResult;
use crate::state::{Account, AccountId, FeeRecord, LedgerEntry, Payment, PaymentId, PaymentStatus};

/// Account balance and history storage
pub trait AccountStore {
    /// Fetches the current state of an account.
    ///
    /// # Errors
    /// [`crate::errors::StoreError::AccountNotFound`] when the id is unknown.
    fn get(&self, id: &AccountId) -> StoreResult<Account>;

    /// Atomically credits an account and appends the ledger entry.
    ///
    /// The write applies only if the stored balance still equals
    /// `entry.prior_balance`; otherwise the store returns
    /// [`crate::errors::StoreError::Conflict`] and applies nothing, and the
    /// caller must re-read and rebuild the entry.
    ///
    /// # Errors
    /// `AccountNotFound`, `Conflict`, or `UnbalancedEntry` when
    /// `entry.final_balance != entry.prior_balance + entry.amount_credited`.
    fn credit(&self, id: &AccountId, entry: LedgerEntry) -> StoreResult<Account>;
}

/// Payment record storage
pub trait PaymentStore {
    /// Fetches a payment with its fee list.
    ///
    /// # Errors
    /// [`crate::errors::StoreError::PaymentNotFound`] when the id is unknown.
    fn get(&self, id: &PaymentId) -> StoreResult<Payment>;

    /// Records a new confirmed payment.
    ///
    /// # Errors
    /// [`crate::errors::StoreError::DuplicatePayment`] when a payment with
    /// the same `order_id` and `status` already exists.
    fn create(&self, payment: Payment) -> StoreResult<Payment>;

    /// Looks up a payment by gateway order id and status. Returns `Ok(None)`
    /// when absent; used by the ingestion duplicate guard.
    ///
    /// # Errors
    /// Store-level failures only; absence is not an error here.
    fn find_by_order(&self, order_id: &str, status: &PaymentStatus)
        -> StoreResult<Option<Payment>>;

    /// Appends one fee record to a payment's fee list, preserving order.
    ///
    /// # Errors
    /// [`crate::errors::StoreError::PaymentNotFound`] when the id is unknown.
    fn append_fee(&self, id: &PaymentId, fee: FeeRecord) -> StoreResult<Payment>;
}

/// External qualification oracle
///
/// Reports how many commission levels an account is currently eligible to
/// earn from. The engine reads it fresh on every ascent so decisions
/// reflect state possibly changed by concurrent runs, never a value cached
/// at the start of the walk.
pub trait SupportOracle {
    /// Current qualification depth of the account, `>= 0`.
    ///
    /// # Errors
    /// [`crate::errors::StoreError::AccountNotFound`] when the id is unknown.
    fn support_level(&self, id: &AccountId) -> StoreResult<u32>;
}
