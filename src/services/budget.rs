//! Budget service
//!
//! Per-category limits and the statuses derived from them. Statuses are
//! recomputed from the ledger on every call.

use chrono::Utc;
use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    category_key, Budget, BudgetId, BudgetPeriod, BudgetState, BudgetStatus, BudgetSummary, Money,
    UserId,
};
use crate::storage::LedgerStore;
use crate::validation::{validate_budget, BudgetDraft};

use super::aggregate::spent_in_category;
use super::locks::{lock_key, CategoryLocks};
use super::status::{evaluate, reaches};

/// Default lower bound for [`BudgetService::near_limit`]
pub const NEAR_LIMIT_THRESHOLD: u32 = 80;

pub struct BudgetService<'a> {
    store: &'a dyn LedgerStore,
    locks: &'a CategoryLocks,
}

impl<'a> BudgetService<'a> {
    pub fn new(store: &'a dyn LedgerStore, locks: &'a CategoryLocks) -> Self {
        Self { store, locks }
    }

    fn owned(&self, user_id: UserId, id: BudgetId) -> LedgerResult<Budget> {
        self.store
            .get_budget(id)?
            .filter(|b| b.user_id == user_id)
            .ok_or_else(|| LedgerError::budget_not_found(id.to_string()))
    }

    /// Fail if `user_id` already has a budget for `category` other than `except`
    fn ensure_unique(&self, user_id: UserId, category: &str, except: Option<BudgetId>) -> LedgerResult<()> {
        let key = category_key(category);
        let taken = self
            .store
            .budgets_for(user_id)?
            .iter()
            .any(|b| b.category_key() == key && Some(b.id) != except);
        if taken {
            return Err(LedgerError::Duplicate {
                entity_type: "Budget",
                identifier: category.to_string(),
            });
        }
        Ok(())
    }

    pub fn create(&self, draft: &BudgetDraft) -> LedgerResult<Budget> {
        let valid = validate_budget(draft)?;
        if self.store.get_user(valid.user_id)?.is_none() {
            return Err(LedgerError::user_not_found(valid.user_id.to_string()));
        }

        let key = lock_key(valid.user_id, &valid.category);
        self.locks.with_keys(&[key], || -> LedgerResult<Budget> {
            self.ensure_unique(valid.user_id, &valid.category, None)?;
            let budget = Budget::new(valid.user_id, &valid.category, valid.limit);
            self.store.insert_budget(&budget)?;
            info!(id = %budget.id, category = %budget.category, limit = %budget.limit, "budget created");
            Ok(budget)
        })
    }

    /// Change the category or limit of a budget
    pub fn update(&self, user_id: UserId, id: BudgetId, draft: &BudgetDraft) -> LedgerResult<Budget> {
        let draft = BudgetDraft {
            user_id: Some(user_id),
            ..draft.clone()
        };
        let valid = validate_budget(&draft)?;
        let existing = self.owned(user_id, id)?;

        let keys = [
            lock_key(user_id, &existing.category),
            lock_key(user_id, &valid.category),
        ];
        self.locks.with_keys(&keys, || -> LedgerResult<Budget> {
            self.ensure_unique(user_id, &valid.category, Some(id))?;
            let updated = Budget {
                category: valid.category.clone(),
                limit: valid.limit,
                updated_at: Utc::now(),
                ..existing
            };
            if self.store.update_budget(&updated)? == 0 {
                return Err(LedgerError::budget_not_found(id.to_string()));
            }
            info!(id = %updated.id, category = %updated.category, limit = %updated.limit, "budget updated");
            Ok(updated)
        })
    }

    pub fn delete(&self, user_id: UserId, id: BudgetId) -> LedgerResult<Budget> {
        let existing = self.owned(user_id, id)?;
        if self.store.delete_budget(id)? == 0 {
            return Err(LedgerError::budget_not_found(id.to_string()));
        }
        info!(id = %id, category = %existing.category, "budget deleted");
        Ok(existing)
    }

    pub fn get(&self, user_id: UserId, id: BudgetId) -> LedgerResult<Budget> {
        self.owned(user_id, id)
    }

    pub fn list(&self, user_id: UserId) -> LedgerResult<Vec<Budget>> {
        self.store.budgets_for(user_id)
    }

    /// Status of every budget of `user_id` for `period` (default: this month)
    pub fn statuses(&self, user_id: UserId, period: Option<BudgetPeriod>) -> LedgerResult<Vec<BudgetStatus>> {
        let period = period.unwrap_or_else(BudgetPeriod::current_month);
        let txns = self.store.transactions_for(user_id)?;
        self.store
            .budgets_for(user_id)?
            .iter()
            .map(|b| -> LedgerResult<BudgetStatus> {
                let spent = spent_in_category(&txns, user_id, &b.category, Some(period))?;
                Ok(evaluate(b, spent))
            })
            .collect()
    }

    pub fn exceeded(&self, user_id: UserId, period: Option<BudgetPeriod>) -> LedgerResult<Vec<BudgetStatus>> {
        Ok(self
            .statuses(user_id, period)?
            .into_iter()
            .filter(|s| s.state == BudgetState::Exceeded)
            .collect())
    }

    /// Budgets at or above `threshold` percent but not yet exceeded
    pub fn near_limit(
        &self,
        user_id: UserId,
        period: Option<BudgetPeriod>,
        threshold: Option<u32>,
    ) -> LedgerResult<Vec<BudgetStatus>> {
        let threshold = threshold.unwrap_or(NEAR_LIMIT_THRESHOLD);
        Ok(self
            .statuses(user_id, period)?
            .into_iter()
            .filter(|s| reaches(s.spent, s.limit, threshold) && !reaches(s.spent, s.limit, 100))
            .collect())
    }

    /// Budgets in the ALERT or EXCEEDED band
    pub fn alerting(&self, user_id: UserId, period: Option<BudgetPeriod>) -> LedgerResult<Vec<BudgetStatus>> {
        Ok(self
            .statuses(user_id, period)?
            .into_iter()
            .filter(|s| s.state.needs_attention())
            .collect())
    }

    pub fn summary(&self, user_id: UserId, period: Option<BudgetPeriod>) -> LedgerResult<BudgetSummary> {
        let statuses = self.statuses(user_id, period)?;
        let total_limits = Money::checked_sum(statuses.iter().map(|s| s.limit))
            .ok_or_else(|| LedgerError::overflow("total of budget limits"))?;
        let total_spent = Money::checked_sum(statuses.iter().map(|s| s.spent))
            .ok_or_else(|| LedgerError::overflow("total spent across budgets"))?;
        Ok(BudgetSummary {
            total_limits,
            total_spent,
            available: total_limits - total_spent,
            percentage: total_spent.percent_of(total_limits),
            budget_count: statuses.len(),
        })
    }
}
