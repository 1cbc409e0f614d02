use crate::state::{AccountId, PaymentId};
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by the account and payment store contracts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The requested account does not exist
    #[error("account not found: {0}")]
    AccountNotFound(AccountId),

    /// The requested payment does not exist
    #[error("payment not found: {0}")]
    PaymentNotFound(PaymentId),

    /// A payment with this order id and status is already recorded
    #[error("payment already recorded for order {order_id}")]
    DuplicatePayment { order_id: String },

    /// Conditional credit lost the race: the account balance moved between
    /// the read and the write. The caller must re-read and retry.
    #[error("concurrent update on account {0}, credit not applied")]
    Conflict(AccountId),

    /// The ledger entry does not balance (`final != prior + credited`)
    #[error("unbalanced ledger entry for account {0}")]
    UnbalancedEntry(AccountId),
}

/// Result type for distribution runs
pub type DistributionResult<T> = std::result::Result<T, DistributionError>;

/// Terminal failures of a distribution run
///
/// Every variant is fatal for the run and must be surfaced to the ingestion
/// boundary; none may be logged-and-swallowed, since that would leave the
/// ledger partially distributed with nobody told.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DistributionError {
    /// The inviter chain references an account that does not exist.
    /// Fees applied before the break are left in place.
    #[error("inviter chain broken: account not found: {0}")]
    AccountNotFound(AccountId),

    /// The target payment record does not exist
    #[error("payment not found: {0}")]
    PaymentNotFound(PaymentId),

    /// The caller-supplied amount disagrees with the stored payment, so
    /// fees computed from it would not respect the payment's own pool
    #[error("supplied amount {supplied} does not match recorded payment amount {recorded}")]
    AmountMismatch { recorded: u64, supplied: u64 },

    /// The payment already carries fee records from an earlier run.
    /// Re-running would double-credit; the payment needs manual
    /// reconciliation instead.
    #[error("payment {0} already has distributed fees")]
    AlreadyDistributed(PaymentId),

    /// A credit would push the fee total past the bonus pool. The fixed
    /// schedule makes this unreachable; any occurrence is a constant or
    /// data bug and must alert loudly.
    #[error("distribution exceeded bonus pool: fee {fee} > remaining {remaining}")]
    Overdistributed { fee: u64, remaining: u64 },

    /// All commission levels were walked without exhausting the pool or
    /// reaching the root account; the payment is flagged for manual
    /// reconciliation.
    #[error("bonus pool not exhausted after {levels} levels, {remaining} undistributed")]
    IncompleteDistribution { levels: u8, remaining: u64 },

    /// A non-root account has no inviter, so the chain ended before the
    /// root while pool was still undistributed
    #[error("inviter chain ended at {0} without reaching the root account")]
    MissingInviter(AccountId),

    /// Compare-and-swap contention persisted past the retry bound
    #[error("credit contention on account {0} exceeded retry limit")]
    CreditContention(AccountId),

    /// Distribution requested for a non-positive amount
    #[error("payment amount must be positive")]
    InvalidAmount,

    /// Checked arithmetic failed; amounts near `u64::MAX` or a corrupt
    /// schedule are the only ways here
    #[error("arithmetic overflow while computing fees")]
    ArithmeticError,

    /// The injected fee schedule violates the closed pool identity
    #[error("fee schedule is inconsistent: level fees sum to {scheduled} bps, pool is {pool} bps")]
    InvalidSchedule { scheduled: u32, pool: u32 },

    /// Any other store failure that reached the engine
    #[error("store failure: {0}")]
    Store(StoreError),
}

impl From<StoreError> for DistributionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AccountNotFound(id) => Self::AccountNotFound(id),
            StoreError::PaymentNotFound(id) => Self::PaymentNotFound(id),
            // Bounded retries happen inside the engine; a Conflict escaping
            // them is reported as contention.
            StoreError::Conflict(id) => Self::CreditContention(id),
            other => Self::Store(other),
        }
    }
}
