//! Engine configuration
//!
//! The root account id and the commission schedule are injected here at
//! construction time and treated as immutable for the life of the engine.
//! Nothing in the core reads ambient global state.

use crate::constants::{
    BONUS_POOL_BPS, FEE_BASIS_POINTS_DIVISOR, LEVEL_ONE_FEE_BPS, MAX_BONUS_LEVELS,
    UPPER_LEVEL_FEE_BPS,
};
use crate::errors::{DistributionError, DistributionResult};
use crate::state::AccountId;
use serde::{Deserialize, Serialize};

/// Commission schedule expressed in basis points
///
/// The default schedule is a closed accounting identity: the level fees
/// sum to exactly the pool share (`1_000 + 7 x 500 == 4_500`), so a full
/// walk distributes the pool with nothing left over. [`Self::validate`]
/// rejects any schedule that breaks the identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Share of the payment forming the bonus pool
    pub pool_bps: u16,
    /// Commission for the first qualified inviter
    pub level_one_bps: u16,
    /// Commission for every later level
    pub upper_level_bps: u16,
    /// Levels walked before the run is declared incomplete
    pub max_levels: u8,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            pool_bps: BONUS_POOL_BPS,
            level_one_bps: LEVEL_ONE_FEE_BPS,
            upper_level_bps: UPPER_LEVEL_FEE_BPS,
            max_levels: MAX_BONUS_LEVELS,
        }
    }
}

impl FeeSchedule {
    /// Checks the closed pool identity:
    /// `level_one_bps + (max_levels - 1) * upper_level_bps == pool_bps`.
    ///
    /// # Errors
    /// Returns [`DistributionError::InvalidSchedule`] when the identity
    /// does not hold.
    pub fn validate(&self) -> DistributionResult<()> {
        let upper_levels = u32::from(self.max_levels).saturating_sub(1);
        let scheduled = u32::from(self.level_one_bps)
            .saturating_add(u32::from(self.upper_level_bps).saturating_mul(upper_levels));
        let pool = u32::from(self.pool_bps);
        if scheduled == pool {
            Ok(())
        } else {
            Err(DistributionError::InvalidSchedule { scheduled, pool })
        }
    }

    /// Bonus pool for a payment: `amount * pool_bps / 10_000`, truncating.
    ///
    /// # Errors
    /// Returns [`DistributionError::ArithmeticError`] on overflow.
    pub fn bonus_pool(&self, amount: u64) -> DistributionResult<u64> {
        bps_of(amount, self.pool_bps)
    }

    /// Scheduled fee for a commission tier (1-based).
    ///
    /// # Errors
    /// Returns [`DistributionError::ArithmeticError`] on overflow.
    pub fn level_fee(&self, level: u8, amount: u64) -> DistributionResult<u64> {
        let bps = if level == 1 {
            self.level_one_bps
        } else {
            self.upper_level_bps
        };
        bps_of(amount, bps)
    }

    /// Whether `level` is the final commission tier of this schedule.
    #[must_use]
    pub const fn is_final_level(&self, level: u8) -> bool {
        level >= self.max_levels
    }
}

fn bps_of(amount: u64, bps: u16) -> DistributionResult<u64> {
    let wide = u128::from(amount)
        .checked_mul(u128::from(bps))
        .and_then(|v| v.checked_div(FEE_BASIS_POINTS_DIVISOR))
        .ok_or(DistributionError::ArithmeticError)?;
    u64::try_from(wide).map_err(|_| DistributionError::ArithmeticError)
}

/// Immutable per-engine configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The designated root ("MAIN") account absorbing undistributed bonus
    pub root_account: AccountId,
    /// Commission schedule applied to every run
    pub schedule: FeeSchedule,
}

impl EngineConfig {
    /// Builds a config with the default schedule for the given root account.
    #[must_use]
    pub fn new(root_account: AccountId) -> Self {
        Self {
            root_account,
            schedule: FeeSchedule::default(),
        }
    }
}
