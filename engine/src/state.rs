use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque account identifier
///
/// Account ids come from the registration system and are treated as opaque
/// strings here. The one distinguished value is the root account id carried
/// in [`crate::config::EngineConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Opaque payment record identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(String);

impl PaymentId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaymentId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// One append-only bonus ledger entry on an account
///
/// Invariant: `final_balance == prior_balance + amount_credited`, and the
/// last entry's `final_balance` equals the account's current `balance`.
/// The store enforces the first half at write time; replaying the history
/// in order reconstructs the balance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Balance read immediately before this credit (in minor units)
    pub prior_balance: u64,
    /// Balance after the credit was applied (in minor units)
    pub final_balance: u64,
    /// Amount credited by this entry (in minor units)
    pub amount_credited: u64,
    /// Human-readable reason for the credit
    pub comment: String,
    /// Commission tier (1..=8) this credit was earned at
    pub level_bonus: u8,
    /// Email of the donor whose payment funded this credit
    pub counterparty_email: String,
    /// When the credit was applied
    pub timestamp: DateTime<Utc>,
}

/// A participant account in the referral forest
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// The account that referred this one; `None` for the root account.
    /// Inviter references form a forest converging on the root.
    pub inviter_id: Option<AccountId>,
    /// Bonus balance in minor currency units, adjusted only by engine credits
    pub balance: u64,
    /// Append-only credit history, never mutated or truncated
    pub history: Vec<LedgerEntry>,
    /// Contact email, recorded as counterparty on fees this account's
    /// donations fund
    pub email: String,
}

impl Account {
    /// Creates an account with a zero balance and empty history.
    #[must_use]
    pub fn new(id: AccountId, inviter_id: Option<AccountId>, email: impl Into<String>) -> Self {
        Self {
            id,
            inviter_id,
            balance: 0,
            history: Vec::new(),
            email: email.into(),
        }
    }
}

/// Gateway-reported payment status
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// One-off payment settled; triggers bonus distribution
    Success,
    /// Recurring payment agreement created; recorded but not distributed
    Subscribed,
    /// Any other gateway status (failure, wait, sandbox, ...)
    #[serde(other)]
    Other,
}

/// One fee paid out against a payment during distribution
///
/// `level_partner` is the true chain depth (every visited account counts,
/// qualified or not) while `level_bonus` is the commission tier the fee was
/// earned at. Downstream auditing relies on records appearing in
/// level-processing order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRecord {
    /// Account credited by this step
    pub account_id: AccountId,
    /// Chain depth at which the credited account was found
    pub level_partner: u32,
    /// Commission tier (1..=8)
    pub level_bonus: u8,
    /// The credited account's qualification level at the time of the credit
    pub level_support: u32,
    /// Fee amount in minor units
    pub fee: u64,
}

/// A confirmed gateway payment and the fees distributed against it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    /// Gateway order id, unique per gateway transaction
    pub order_id: String,
    pub status: PaymentStatus,
    /// The paying customer
    pub customer_id: AccountId,
    /// Payment amount in minor currency units
    pub amount: u64,
    /// Fees appended exactly once per distribution step, in level order
    pub fees: Vec<FeeRecord>,
}

impl Payment {
    /// Creates a payment record with no fees distributed yet.
    #[must_use]
    pub fn new(
        id: PaymentId,
        order_id: impl Into<String>,
        status: PaymentStatus,
        customer_id: AccountId,
        amount: u64,
    ) -> Self {
        Self {
            id,
            order_id: order_id.into(),
            status,
            customer_id,
            amount,
            fees: Vec::new(),
        }
    }

    /// Total of all fees recorded against this payment, in minor units.
    #[must_use]
    pub fn fees_total(&self) -> u64 {
        self.fees
            .iter()
            .fold(0_u64, |acc, f| acc.saturating_add(f.fee))
    }
}
