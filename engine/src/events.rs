use crate::state::{AccountId, PaymentId};
use serde::Serialize;

/// Event emitted when one inviter is credited during a run
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FeeCredited {
    /// Payment the fee was distributed from
    pub payment_id: PaymentId,
    /// Account that earned the fee
    pub account_id: AccountId,
    /// Commission tier the fee was earned at (1..=8)
    pub level_bonus: u8,
    /// True chain depth of the credited account
    pub level_partner: u32,
    /// Fee amount in minor units
    pub fee: u64,
    /// Whether this was the root account absorbing the remainder
    pub root_payout: bool,
}

/// Event emitted when a run terminates successfully
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DistributionSettled {
    /// Payment whose pool was distributed
    pub payment_id: PaymentId,
    /// Total distributed across all fee records, in minor units
    pub total_distributed: u64,
    /// Number of fee records written
    pub fee_count: u32,
    /// Whether the run ended at the root account
    pub root_reached: bool,
}
