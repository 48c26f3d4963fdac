//! Budget alerting policy
//!
//! Runs after every expense write. A budget at 100% or more yields a
//! `danger` notification, one at 80% or more a `warning`; below that nothing
//! is raised. Each qualifying write raises exactly one notification, unless
//! per-period deduplication is switched on in the settings.

use chrono::NaiveDate;
use tracing::debug;

use crate::config::AlertSettings;
use crate::error::LedgerResult;
use crate::models::{
    category_key, BudgetPeriod, BudgetState, BudgetStatus, Notification, Severity, UserId,
};
use crate::storage::LedgerStore;

use super::aggregate::spent_in_category;
use super::status::evaluate;

/// Build the notification a status calls for, if any
pub fn alert_for(user_id: UserId, status: &BudgetStatus, period: BudgetPeriod) -> Option<Notification> {
    let notification = match status.state {
        BudgetState::Exceeded => Notification::new(
            user_id,
            Severity::Danger,
            format!("Budget exceeded: {}", status.category),
            format!(
                "You exceeded your {} budget for {} by {}. Spent {} of {}.",
                status.category,
                period,
                status.overage(),
                status.spent,
                status.limit
            ),
        ),
        BudgetState::Alert => Notification::new(
            user_id,
            Severity::Warning,
            format!("Budget alert: {}", status.category),
            format!(
                "You have used {}% of your {} budget for {}. Spent {} of {}.",
                status.percentage, status.category, period, status.spent, status.limit
            ),
        ),
        BudgetState::Safe | BudgetState::Caution => return None,
    };
    Some(notification.about(status.category.clone(), period))
}

pub struct AlertPolicy<'a> {
    store: &'a dyn LedgerStore,
    settings: &'a AlertSettings,
}

impl<'a> AlertPolicy<'a> {
    pub fn new(store: &'a dyn LedgerStore, settings: &'a AlertSettings) -> Self {
        Self { store, settings }
    }

    /// Evaluate the budget for `category` in the month of `date` and store a
    /// notification when it is at or past the alert threshold
    pub fn on_expense_recorded(
        &self,
        user_id: UserId,
        category: &str,
        date: NaiveDate,
    ) -> LedgerResult<Option<Notification>> {
        let key = category_key(category);
        let Some(budget) = self
            .store
            .budgets_for(user_id)?
            .into_iter()
            .find(|b| b.category_key() == key)
        else {
            return Ok(None);
        };

        let period = BudgetPeriod::of(date);
        let txns = self.store.transactions_for(user_id)?;
        let status = evaluate(&budget, spent_in_category(&txns, user_id, &key, Some(period))?);

        let Some(notification) = alert_for(user_id, &status, period) else {
            return Ok(None);
        };

        if self.settings.deduplicate_per_period && self.already_alerted(&notification)? {
            debug!(category = %status.category, %period, "alert suppressed, already raised this period");
            return Ok(None);
        }

        self.store.insert_notification(&notification)?;
        Ok(Some(notification))
    }

    fn already_alerted(&self, candidate: &Notification) -> LedgerResult<bool> {
        let key = candidate.related_category.as_deref().map(category_key);
        Ok(self
            .store
            .notifications_for(candidate.user_id)?
            .iter()
            .any(|n| {
                n.severity == candidate.severity
                    && n.period == candidate.period
                    && n.related_category.as_deref().map(category_key) == key
            }))
    }
}
