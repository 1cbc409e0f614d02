//! Pure chain-walk state machine
//!
//! One distribution run is a fold of [`step`] over the inviter chain: the
//! caller feeds in the freshly loaded account and its freshly read support
//! level, and gets back the next [`WalkState`] plus the credit to apply, if
//! any. Nothing in this module touches a store, which is what makes the
//! algorithm testable against hand-built accounts.

use crate::config::EngineConfig;
use crate::errors::{DistributionError, DistributionResult};
use crate::state::{Account, AccountId};

/// Walking state of one distribution run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkState {
    /// Next account to visit; `None` means the chain ended without reaching
    /// the root, which is fatal if the walk still has pool to place
    pub cursor: Option<AccountId>,
    /// Undistributed bonus in minor units
    pub remaining: u64,
    /// Payment amount the fees are computed from, in minor units
    pub amount: u64,
    /// Current commission tier, 1-based
    pub level: u8,
    /// True chain depth: counts every visited account, qualified or not
    pub level_partner: u32,
}

impl WalkState {
    /// Initial state for a run starting at `start` with the given pool.
    #[must_use]
    pub const fn begin(start: AccountId, amount: u64, pool: u64) -> Self {
        Self {
            cursor: Some(start),
            remaining: pool,
            amount,
            level: 1,
            level_partner: 0,
        }
    }
}

/// A credit decided by one step, to be applied by the driver as a single
/// atomic account update plus one fee record on the payment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credit {
    pub account_id: AccountId,
    pub fee: u64,
    pub level_bonus: u8,
    pub level_partner: u32,
    pub level_support: u32,
}

/// Result of visiting one account
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    /// State after the visit, cursor already advanced past the account
    pub state: WalkState,
    /// Credit earned by the visited account, if it qualified
    pub credit: Option<Credit>,
    /// Whether the run terminates after applying `credit`
    pub done: bool,
}

/// Visits one account and decides what it earns.
///
/// Every visit advances the cursor to the account's inviter and bumps
/// `level_partner`, so skipped (unqualified) accounts still count toward
/// chain depth. The root account short-circuits the run: it absorbs the
/// entire remaining pool regardless of tier. A qualified non-root account
/// earns the tier fee; the final tier takes whatever pool is left, which
/// equals the scheduled fee plus any integer-division dust.
///
/// # Errors
/// [`DistributionError::Overdistributed`] when a scheduled fee exceeds the
/// remaining pool. Unreachable with a validated schedule; it firing means
/// a data or constant bug.
pub fn step(
    state: WalkState,
    visited: &Account,
    support: u32,
    config: &EngineConfig,
) -> DistributionResult<Step> {
    let mut next = state;
    next.level_partner = next
        .level_partner
        .checked_add(1)
        .ok_or(DistributionError::ArithmeticError)?;
    next.cursor = visited.inviter_id.clone();

    // Root short-circuit: the whole remaining pool lands here, even when
    // tiers and chain depth are left over.
    if visited.id == config.root_account {
        let fee = next.remaining;
        next.remaining = 0;
        let credit = Credit {
            account_id: visited.id.clone(),
            fee,
            level_bonus: next.level,
            level_partner: next.level_partner,
            level_support: support,
        };
        return Ok(Step {
            state: next,
            credit: Some(credit),
            done: true,
        });
    }

    // Not yet qualified for this tier: keep climbing, nobody is credited.
    if support < u32::from(next.level) {
        return Ok(Step {
            state: next,
            credit: None,
            done: false,
        });
    }

    let fee = if config.schedule.is_final_level(next.level) {
        // The last tier absorbs the remainder so the pool closes exactly.
        next.remaining
    } else {
        config.schedule.level_fee(next.level, next.amount)?
    };

    if fee > next.remaining {
        return Err(DistributionError::Overdistributed {
            fee,
            remaining: next.remaining,
        });
    }
    next.remaining = next
        .remaining
        .checked_sub(fee)
        .ok_or(DistributionError::ArithmeticError)?;

    let credit = Credit {
        account_id: visited.id.clone(),
        fee,
        level_bonus: next.level,
        level_partner: next.level_partner,
        level_support: support,
    };
    let done = next.remaining == 0;
    next.level = next
        .level
        .checked_add(1)
        .ok_or(DistributionError::ArithmeticError)?;

    Ok(Step {
        state: next,
        credit: Some(credit),
        done,
    })
}

/// Verifies that a finished walk actually placed the whole pool.
///
/// # Errors
/// [`DistributionError::IncompleteDistribution`] when tiers ran out with
/// pool still undistributed.
pub const fn finish(state: &WalkState, config: &EngineConfig) -> DistributionResult<()> {
    if state.remaining > 0 {
        return Err(DistributionError::IncompleteDistribution {
            levels: config.schedule.max_levels,
            remaining: state.remaining,
        });
    }
    Ok(())
}
