//! Ledger mutation coordinator
//!
//! Create, update and delete of transactions. Each write walks
//! `Validating -> BudgetChecking (strict mode, expenses) -> Persisting ->
//! Notifying -> Done`, ending in `Rejected` for bad input, missing rows or
//! budget conflicts and in `Failed` when the store gives out. Writes to the
//! same user and category are serialized through [`CategoryLocks`].

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{EnforcementMode, Settings};
use crate::error::{ErrorKind, LedgerError, LedgerResult};
use crate::models::{
    category_key, Budget, BudgetPeriod, BudgetStatus, Notification, Transaction, TransactionId,
    UserId,
};
use crate::storage::LedgerStore;
use crate::validation::{validate_transaction, TransactionDraft, ValidTransaction};

use super::aggregate::{spent_in_category, TransactionFilter};
use super::alerts::AlertPolicy;
use super::locks::{lock_key, CategoryLocks};
use super::status::evaluate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStage {
    Validating,
    BudgetChecking,
    Persisting,
    Notifying,
    Done,
    Rejected,
    Failed,
}

/// Result of a successful create or update
#[derive(Debug, Clone, Serialize)]
pub struct LedgerWrite {
    pub transaction: Transaction,
    /// Status of the matching budget after the write, if there is one
    pub status: Option<BudgetStatus>,
    /// Alert raised by this write
    pub notification: Option<Notification>,
}

/// Outcome of one locked attempt at an update
enum Attempt<T> {
    Done(T),
    /// The row moved to another category while we waited for the lock
    Retry,
}

pub struct LedgerService<'a> {
    store: &'a dyn LedgerStore,
    settings: &'a Settings,
    locks: &'a CategoryLocks,
}

impl<'a> LedgerService<'a> {
    pub fn new(store: &'a dyn LedgerStore, settings: &'a Settings, locks: &'a CategoryLocks) -> Self {
        Self {
            store,
            settings,
            locks,
        }
    }

    fn stage(&self, op: &'static str, stage: MutationStage) {
        debug!(op, ?stage, "ledger mutation");
    }

    fn finish<T>(&self, op: &'static str, result: LedgerResult<T>) -> LedgerResult<T> {
        match &result {
            Ok(_) => self.stage(op, MutationStage::Done),
            Err(e) if e.kind() == ErrorKind::Store => self.stage(op, MutationStage::Failed),
            Err(_) => self.stage(op, MutationStage::Rejected),
        }
        result
    }

    fn require_user(&self, user_id: UserId) -> LedgerResult<()> {
        match self.store.get_user(user_id)? {
            Some(_) => Ok(()),
            None => Err(LedgerError::user_not_found(user_id.to_string())),
        }
    }

    /// The row, if it exists and belongs to `user_id`
    fn owned(&self, user_id: UserId, id: TransactionId) -> LedgerResult<Transaction> {
        self.store
            .get_transaction(id)?
            .filter(|t| t.user_id == user_id)
            .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))
    }

    fn budget_for(&self, user_id: UserId, category: &str) -> LedgerResult<Option<Budget>> {
        let key = category_key(category);
        Ok(self
            .store
            .budgets_for(user_id)?
            .into_iter()
            .find(|b| b.category_key() == key))
    }

    /// Strict mode: refuse an expense that would take its budget past the limit
    ///
    /// `replacing` is the row being edited; its old amount is taken out of the
    /// total when it counted toward the same budget and month.
    fn check_budget(
        &self,
        valid: &ValidTransaction,
        replacing: Option<&Transaction>,
    ) -> LedgerResult<()> {
        if self.settings.enforcement != EnforcementMode::Strict || !valid.kind.is_expense() {
            return Ok(());
        }
        let Some(budget) = self.budget_for(valid.user_id, &valid.category)? else {
            return Ok(());
        };

        let key = budget.category_key();
        let period = BudgetPeriod::of(valid.date);
        let txns = self.store.transactions_for(valid.user_id)?;
        let overflow = || LedgerError::overflow(format!("prospective spend in {}", budget.category));
        let mut prospective = spent_in_category(&txns, valid.user_id, &key, Some(period))?;
        if let Some(old) = replacing.filter(|t| t.counts_toward(valid.user_id, &key, Some(period))) {
            prospective = prospective.checked_sub(old.amount).ok_or_else(overflow)?;
        }
        let prospective = prospective.checked_add(valid.amount).ok_or_else(overflow)?;

        if prospective > budget.limit {
            return Err(LedgerError::BudgetExceeded {
                category: budget.category,
                limit: budget.limit,
                prospective,
            });
        }
        Ok(())
    }

    /// Post-write side effects; failures here never undo the write
    fn notify(&self, op: &'static str, txn: &Transaction) -> (Option<BudgetStatus>, Option<Notification>) {
        if !txn.is_expense() {
            return (None, None);
        }
        self.stage(op, MutationStage::Notifying);

        let notification = AlertPolicy::new(self.store, &self.settings.alerts)
            .on_expense_recorded(txn.user_id, &txn.category, txn.date)
            .unwrap_or_else(|e| {
                warn!(error = %e, transaction = %txn.id, "budget alert could not be recorded");
                None
            });

        let status = self
            .status_for(txn.user_id, &txn.category, txn.period())
            .unwrap_or_else(|e| {
                warn!(error = %e, transaction = %txn.id, "budget status unavailable after write");
                None
            });

        (status, notification)
    }

    fn status_for(
        &self,
        user_id: UserId,
        category: &str,
        period: BudgetPeriod,
    ) -> LedgerResult<Option<BudgetStatus>> {
        let Some(budget) = self.budget_for(user_id, category)? else {
            return Ok(None);
        };
        let txns = self.store.transactions_for(user_id)?;
        let spent = spent_in_category(&txns, user_id, &budget.category, Some(period))?;
        Ok(Some(evaluate(&budget, spent)))
    }

    pub fn create(&self, draft: &TransactionDraft) -> LedgerResult<LedgerWrite> {
        const OP: &str = "create";
        let result = (|| -> LedgerResult<LedgerWrite> {
            self.stage(OP, MutationStage::Validating);
            let valid = validate_transaction(draft)?;
            self.require_user(valid.user_id)?;

            let key = lock_key(valid.user_id, &valid.category);
            self.locks.with_keys(&[key], || -> LedgerResult<LedgerWrite> {
                self.stage(OP, MutationStage::BudgetChecking);
                self.check_budget(&valid, None)?;

                self.stage(OP, MutationStage::Persisting);
                let txn = Transaction::new(
                    valid.user_id,
                    valid.kind,
                    valid.amount,
                    &valid.category,
                    valid.date,
                )
                .with_description(valid.description.clone());
                self.store.insert_transaction(&txn)?;
                info!(id = %txn.id, kind = %txn.kind, category = %txn.category, amount = %txn.amount, "transaction recorded");

                let (status, notification) = self.notify(OP, &txn);
                Ok(LedgerWrite {
                    transaction: txn,
                    status,
                    notification,
                })
            })
        })();
        self.finish(OP, result)
    }

    /// Replace the fields of an existing transaction
    ///
    /// The owner comes from `user_id`; a user id in the draft is ignored.
    pub fn update(
        &self,
        user_id: UserId,
        id: TransactionId,
        draft: &TransactionDraft,
    ) -> LedgerResult<LedgerWrite> {
        const OP: &str = "update";
        let result = (|| -> LedgerResult<LedgerWrite> {
            self.stage(OP, MutationStage::Validating);
            let draft = TransactionDraft {
                user_id: Some(user_id),
                ..draft.clone()
            };
            let valid = validate_transaction(&draft)?;
            let new_key = lock_key(user_id, &valid.category);

            loop {
                let seen = self.owned(user_id, id)?;
                let keys = [lock_key(user_id, &seen.category), new_key.clone()];

                let attempt = self.locks.with_keys(&keys, || -> LedgerResult<Attempt<LedgerWrite>> {
                    let existing = self.owned(user_id, id)?;
                    if existing.category_key() != seen.category_key() {
                        return Ok(Attempt::Retry);
                    }

                    self.stage(OP, MutationStage::BudgetChecking);
                    self.check_budget(&valid, Some(&existing))?;

                    self.stage(OP, MutationStage::Persisting);
                    let updated = Transaction {
                        amount: valid.amount,
                        category: valid.category.clone(),
                        date: valid.date,
                        kind: valid.kind,
                        updated_at: Utc::now(),
                        ..existing
                    }
                    .with_description(valid.description.clone());
                    if self.store.update_transaction(&updated)? == 0 {
                        return Err(LedgerError::transaction_not_found(id.to_string()));
                    }
                    info!(id = %updated.id, category = %updated.category, amount = %updated.amount, "transaction updated");

                    let (status, notification) = self.notify(OP, &updated);
                    Ok(Attempt::Done(LedgerWrite {
                        transaction: updated,
                        status,
                        notification,
                    }))
                })?;

                match attempt {
                    Attempt::Done(write) => return Ok(write),
                    Attempt::Retry => continue,
                }
            }
        })();
        self.finish(OP, result)
    }

    /// Remove a transaction; returns the deleted row
    pub fn delete(&self, user_id: UserId, id: TransactionId) -> LedgerResult<Transaction> {
        const OP: &str = "delete";
        let result = (|| -> LedgerResult<Transaction> {
            let seen = self.owned(user_id, id)?;
            let key = lock_key(user_id, &seen.category);
            self.locks.with_keys(&[key], || -> LedgerResult<Transaction> {
                self.stage(OP, MutationStage::Persisting);
                if self.store.delete_transaction(id)? == 0 {
                    return Err(LedgerError::transaction_not_found(id.to_string()));
                }
                info!(id = %id, "transaction deleted");
                Ok(seen)
            })
        })();
        self.finish(OP, result)
    }

    pub fn get(&self, user_id: UserId, id: TransactionId) -> LedgerResult<Transaction> {
        self.owned(user_id, id)
    }

    /// A user's transactions matching `filter`, newest first
    pub fn list(&self, user_id: UserId, filter: &TransactionFilter) -> LedgerResult<Vec<Transaction>> {
        Ok(filter.apply(self.store.transactions_for(user_id)?))
    }
}
