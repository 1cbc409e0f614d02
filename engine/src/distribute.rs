//! Distribution engine driver
//!
//! Wires the pure chain-walk from [`crate::step`] to the store and oracle
//! contracts: fresh account read and fresh support-level read per visit,
//! one atomic credit plus one fee append per earning step, bounded retries
//! on credit contention. Terminal states are typed values returned to the
//! caller; the tracing output is observability, not the result channel.

use crate::config::EngineConfig;
use crate::constants::{BONUS_COMMENT, MAX_CREDIT_ATTEMPTS};
use crate::errors::{DistributionError, DistributionResult, StoreError};
use crate::events::{DistributionSettled, FeeCredited};
use crate::state::{Account, AccountId, FeeRecord, LedgerEntry, PaymentId};
use crate::step::{self, Credit, WalkState};
use crate::store::{AccountStore, PaymentStore, SupportOracle};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Summary of a successful distribution run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistributionReceipt {
    pub payment_id: PaymentId,
    /// Fee records written, in level-processing order
    pub fees: Vec<FeeRecord>,
    /// Sum of all fees, equal to the payment's bonus pool
    pub total_distributed: u64,
    /// Whether the run terminated by reaching the root account
    pub root_reached: bool,
}

/// The referral bonus distribution engine
///
/// Holds its configuration immutably and shares the stores and oracle via
/// `Arc`, so one engine can serve concurrent runs across payments.
#[derive(Debug)]
pub struct DistributionEngine<A, P, O> {
    config: EngineConfig,
    accounts: Arc<A>,
    payments: Arc<P>,
    oracle: Arc<O>,
}

impl<A, P, O> DistributionEngine<A, P, O>
where
    A: AccountStore,
    P: PaymentStore,
    O: SupportOracle,
{
    /// Builds an engine, rejecting schedules that break the pool identity.
    ///
    /// # Errors
    /// [`DistributionError::InvalidSchedule`] when the configured level
    /// fees do not sum to the configured pool share.
    pub fn new(
        config: EngineConfig,
        accounts: Arc<A>,
        payments: Arc<P>,
        oracle: Arc<O>,
    ) -> DistributionResult<Self> {
        config.schedule.validate()?;
        Ok(Self {
            config,
            accounts,
            payments,
            oracle,
        })
    }

    /// The engine's immutable configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Distributes the bonus pool of one confirmed payment up the inviter
    /// chain starting at `start_inviter`.
    ///
    /// Walks commission tiers 1 through the schedule maximum, skipping
    /// unqualified inviters (their chain depth still counts), crediting the
    /// tier fee to the first qualified account per tier, and handing the
    /// entire remaining pool to the root account the moment the walk
    /// reaches it. Each credit lands as one atomic balance+history update
    /// followed by one fee record on the payment.
    ///
    /// # Errors
    /// Any [`DistributionError`]; every failure is terminal for the run and
    /// leaves already-applied credits in place for manual reconciliation.
    pub fn distribute(
        &self,
        start_inviter: &AccountId,
        counterparty_email: &str,
        amount: u64,
        payment_id: &PaymentId,
    ) -> DistributionResult<DistributionReceipt> {
        if amount == 0 {
            return Err(DistributionError::InvalidAmount);
        }

        let payment = self.payments.get(payment_id)?;
        if !payment.fees.is_empty() {
            return Err(DistributionError::AlreadyDistributed(payment_id.clone()));
        }
        // The pool invariant is defined over the stored payment's amount;
        // a caller working from a different figure must not reach the chain.
        if amount != payment.amount {
            return Err(DistributionError::AmountMismatch {
                recorded: payment.amount,
                supplied: amount,
            });
        }

        let pool = self.config.schedule.bonus_pool(amount)?;
        debug!(
            payment_id = %payment_id,
            start = %start_inviter,
            amount,
            pool,
            "starting distribution run"
        );

        let mut state = WalkState::begin(start_inviter.clone(), amount, pool);
        let mut fees: Vec<FeeRecord> = Vec::new();
        let mut total: u64 = 0;
        let mut root_reached = false;
        let mut last_visited: Option<AccountId> = None;

        loop {
            let Some(cursor) = state.cursor.clone() else {
                let broken_at = last_visited.unwrap_or_else(|| start_inviter.clone());
                return Err(DistributionError::MissingInviter(broken_at));
            };

            // Fresh reads on every ascent: concurrent runs may have moved
            // both the balance and the qualification since the last visit.
            let account = self.accounts.get(&cursor)?;
            let support = self.oracle.support_level(&cursor)?;
            last_visited = Some(cursor);

            let outcome = step::step(state, &account, support, &self.config)?;
            state = outcome.state;

            // Small amounts truncate some tier fees to zero. The tier is
            // still consumed, but a zero credit writes no ledger entry and
            // no fee record.
            let credit = outcome.credit.filter(|credit| {
                if credit.fee == 0 {
                    debug!(
                        account = %credit.account_id,
                        level_bonus = credit.level_bonus,
                        "tier fee truncated to zero, nothing to credit"
                    );
                    return false;
                }
                true
            });

            if let Some(credit) = credit {
                let is_root = credit.account_id == self.config.root_account;
                self.apply_credit(&credit, counterparty_email)?;

                let record = FeeRecord {
                    account_id: credit.account_id.clone(),
                    level_partner: credit.level_partner,
                    level_bonus: credit.level_bonus,
                    level_support: credit.level_support,
                    fee: credit.fee,
                };
                self.payments.append_fee(payment_id, record.clone())?;

                total = total
                    .checked_add(credit.fee)
                    .ok_or(DistributionError::ArithmeticError)?;
                root_reached = is_root;

                let event = FeeCredited {
                    payment_id: payment_id.clone(),
                    account_id: credit.account_id.clone(),
                    level_bonus: credit.level_bonus,
                    level_partner: credit.level_partner,
                    fee: credit.fee,
                    root_payout: is_root,
                };
                debug!(
                    account = %event.account_id,
                    level_bonus = event.level_bonus,
                    level_partner = event.level_partner,
                    fee = event.fee,
                    root_payout = event.root_payout,
                    "fee credited"
                );
                fees.push(record);
            }

            if outcome.done {
                break;
            }
            if state.level > self.config.schedule.max_levels {
                break;
            }
        }

        step::finish(&state, &self.config)?;

        let settled = DistributionSettled {
            payment_id: payment_id.clone(),
            total_distributed: total,
            fee_count: u32::try_from(fees.len()).unwrap_or(u32::MAX),
            root_reached,
        };
        info!(
            payment_id = %settled.payment_id,
            total = settled.total_distributed,
            fee_count = settled.fee_count,
            root_reached = settled.root_reached,
            "distribution settled"
        );

        Ok(DistributionReceipt {
            payment_id: payment_id.clone(),
            fees,
            total_distributed: total,
            root_reached,
        })
    }

    /// Applies one credit with bounded compare-and-swap retries.
    ///
    /// The ledger entry is rebuilt from a fresh balance read on every
    /// attempt, so a lost race never produces a stale `prior_balance`.
    fn apply_credit(&self, credit: &Credit, counterparty_email: &str) -> DistributionResult<Account> {
        for attempt in 1..=MAX_CREDIT_ATTEMPTS {
            let account = self.accounts.get(&credit.account_id)?;
            let final_balance = account
                .balance
                .checked_add(credit.fee)
                .ok_or(DistributionError::ArithmeticError)?;
            let entry = LedgerEntry {
                prior_balance: account.balance,
                final_balance,
                amount_credited: credit.fee,
                comment: BONUS_COMMENT.to_owned(),
                level_bonus: credit.level_bonus,
                counterparty_email: counterparty_email.to_owned(),
                timestamp: Utc::now(),
            };

            match self.accounts.credit(&credit.account_id, entry) {
                Ok(updated) => return Ok(updated),
                Err(StoreError::Conflict(id)) => {
                    warn!(account = %id, attempt, "credit lost the race, retrying with fresh read");
                }
                Err(other) => return Err(other.into()),
            }
        }
        Err(DistributionError::CreditContention(credit.account_id.clone()))
    }
}
