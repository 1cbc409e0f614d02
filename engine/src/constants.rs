//! Engine constants
//!
//! Mathematical constants for the referral commission schedule. These are
//! protocol-level invariants: the per-level percentages are chosen so that
//! one full eight-level walk distributes exactly the bonus pool, and any
//! change to one constant must preserve that identity (checked by
//! [`crate::config::FeeSchedule::validate`]).

/// Basis points divisor for percentage calculations
///
/// 1 basis point = 0.01%, so 10,000 basis points = 100%. All fee math is
/// `amount * bps / FEE_BASIS_POINTS_DIVISOR` performed in `u128` to avoid
/// intermediate overflow.
pub const FEE_BASIS_POINTS_DIVISOR: u128 = 10_000;

/// Share of a successful payment that forms the bonus pool: 45%
pub const BONUS_POOL_BPS: u16 = 4_500;

/// Commission for the first qualified inviter: 10% of the payment
pub const LEVEL_ONE_FEE_BPS: u16 = 1_000;

/// Commission for each of levels 2 through 8: 5% of the payment
pub const UPPER_LEVEL_FEE_BPS: u16 = 500;

/// Number of commission levels walked before a run is declared incomplete
pub const MAX_BONUS_LEVELS: u8 = 8;

/// Attempts per account credit before giving up on compare-and-swap
/// contention and surfacing [`crate::errors::DistributionError::CreditContention`]
pub const MAX_CREDIT_ATTEMPTS: u32 = 16;

/// Ledger comment recorded on every referral credit
pub const BONUS_COMMENT: &str = "referral bonus";
