//! Ledger reports
//!
//! Thin service wrappers that load a user's snapshot and hand it to the
//! aggregation functions.

use crate::error::LedgerResult;
use crate::models::{BudgetPeriod, UserId};
use crate::storage::LedgerStore;

use super::aggregate::{group_by_category, group_by_month, period_summary, GroupTotals, PeriodSummary};

pub struct ReportService<'a> {
    store: &'a dyn LedgerStore,
}

impl<'a> ReportService<'a> {
    pub fn new(store: &'a dyn LedgerStore) -> Self {
        Self { store }
    }

    /// Income, expense and balance for `period` (default: this month)
    pub fn period_summary(&self, user_id: UserId, period: Option<BudgetPeriod>) -> LedgerResult<PeriodSummary> {
        let period = period.unwrap_or_else(BudgetPeriod::current_month);
        let txns = self.store.transactions_for(user_id)?;
        period_summary(&txns, user_id, period)
    }

    /// Per-category totals, optionally limited to one month
    pub fn by_category(&self, user_id: UserId, period: Option<BudgetPeriod>) -> LedgerResult<Vec<GroupTotals>> {
        let mut txns = self.store.transactions_for(user_id)?;
        if let Some(period) = period {
            txns.retain(|t| period.contains(t.date));
        }
        group_by_category(&txns, user_id)
    }

    pub fn by_month(&self, user_id: UserId) -> LedgerResult<Vec<GroupTotals>> {
        let txns = self.store.transactions_for(user_id)?;
        group_by_month(&txns, user_id)
    }
}
