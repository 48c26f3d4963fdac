//! Ledger aggregation
//!
//! Pure functions over a transaction snapshot. Services load the snapshot
//! from the store and hand it here; nothing in this module does I/O, and all
//! sums are exact cent arithmetic. A total that leaves the i64 cent range is
//! an [`LedgerError::Overflow`], never a wrapped value.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{category_key, BudgetPeriod, Money, Transaction, TransactionKind, UserId};

/// Total expense for `user` in `category`, optionally restricted to `period`
pub fn spent_in_category(
    txns: &[Transaction],
    user_id: UserId,
    category: &str,
    period: Option<BudgetPeriod>,
) -> LedgerResult<Money> {
    let key = category_key(category);
    let amounts = txns
        .iter()
        .filter(|t| t.counts_toward(user_id, &key, period))
        .map(|t| t.amount);
    Money::checked_sum(amounts).ok_or_else(|| LedgerError::overflow(format!("spent in {}", category)))
}

/// Income and expense totals for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    pub period: BudgetPeriod,
    pub income: Money,
    pub expense: Money,
    /// `income - expense`
    pub balance: Money,
    pub count: usize,
}

pub fn period_summary(
    txns: &[Transaction],
    user_id: UserId,
    period: BudgetPeriod,
) -> LedgerResult<PeriodSummary> {
    let mut group = GroupTotals::new(period.to_string());
    for txn in txns
        .iter()
        .filter(|t| t.user_id == user_id && period.contains(t.date))
    {
        group.add(txn)?;
    }
    Ok(PeriodSummary {
        period,
        income: group.income,
        expense: group.expense,
        // both sides are non-negative, so this cannot leave the range
        balance: group.income - group.expense,
        count: group.count,
    })
}

/// Totals for one category or one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupTotals {
    /// Category label or `YYYY-MM`
    pub key: String,
    pub income: Money,
    pub expense: Money,
    /// Gross movement, `income + expense`
    pub total: Money,
    pub count: usize,
}

impl GroupTotals {
    fn new(key: String) -> Self {
        Self {
            key,
            income: Money::zero(),
            expense: Money::zero(),
            total: Money::zero(),
            count: 0,
        }
    }

    fn add(&mut self, txn: &Transaction) -> LedgerResult<()> {
        let overflow = || LedgerError::overflow(format!("totals for {}", self.key));
        let side = match txn.kind {
            TransactionKind::Income => self.income,
            TransactionKind::Expense => self.expense,
        };
        let side = side.checked_add(txn.amount).ok_or_else(overflow)?;
        let total = self.total.checked_add(txn.amount).ok_or_else(overflow)?;
        match txn.kind {
            TransactionKind::Income => self.income = side,
            TransactionKind::Expense => self.expense = side,
        }
        self.total = total;
        self.count += 1;
        Ok(())
    }
}

/// Group by `key_of`, keeping groups in first-seen order
fn group_by(
    txns: &[Transaction],
    user_id: UserId,
    key_of: impl Fn(&Transaction) -> (String, String),
) -> LedgerResult<Vec<GroupTotals>> {
    let mut groups: Vec<(String, GroupTotals)> = Vec::new();
    for txn in txns.iter().filter(|t| t.user_id == user_id) {
        let (match_key, label) = key_of(txn);
        match groups.iter_mut().find(|(k, _)| *k == match_key) {
            Some((_, group)) => group.add(txn)?,
            None => {
                let mut group = GroupTotals::new(label);
                group.add(txn)?;
                groups.push((match_key, group));
            }
        }
    }
    Ok(groups.into_iter().map(|(_, g)| g).collect())
}

/// Per-category totals in first-seen order of the snapshot
pub fn group_by_category(txns: &[Transaction], user_id: UserId) -> LedgerResult<Vec<GroupTotals>> {
    group_by(txns, user_id, |t| (t.category_key(), t.category.clone()))
}

/// Per-month totals, newest month first
pub fn group_by_month(txns: &[Transaction], user_id: UserId) -> LedgerResult<Vec<GroupTotals>> {
    let mut groups = group_by(txns, user_id, |t| {
        let month = t.period().to_string();
        (month.clone(), month)
    })?;
    groups.sort_by(|a, b| b.key.cmp(&a.key));
    Ok(groups)
}

/// Criteria for listing a user's transactions
///
/// Every bound is inclusive; unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Matched case-insensitively after normalization
    pub category: Option<String>,
    pub kind: Option<TransactionKind>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_amount: Option<Money>,
    pub max_amount: Option<Money>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn amount_range(mut self, min: Money, max: Money) -> Self {
        self.min_amount = Some(min);
        self.max_amount = Some(max);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| category_key(c) == txn.category_key());
        category_ok
            && self.kind.map_or(true, |k| txn.kind == k)
            && self.start_date.map_or(true, |d| txn.date >= d)
            && self.end_date.map_or(true, |d| txn.date <= d)
            && self.min_amount.map_or(true, |m| txn.amount >= m)
            && self.max_amount.map_or(true, |m| txn.amount <= m)
    }

    /// Matching rows, newest first, truncated to the limit
    pub fn apply(&self, txns: Vec<Transaction>) -> Vec<Transaction> {
        let mut matching: Vec<Transaction> = txns.into_iter().filter(|t| self.matches(t)).collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        if let Some(limit) = self.limit {
            matching.truncate(limit);
        }
        matching
    }
}
