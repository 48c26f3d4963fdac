//! Transaction model
//!
//! A single income or expense movement owned by one user.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::category::{category_key, normalize_category};
use super::ids::{TransactionId, UserId};
use super::money::Money;
use super::period::BudgetPeriod;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn is_expense(&self) -> bool {
        matches!(self, Self::Expense)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = ();

    /// Exact match only; "Expense" or " expense" are not kinds
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(()),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Owner
    pub user_id: UserId,

    /// Always positive; the kind carries the direction
    pub amount: Money,

    /// Normalized category label
    pub category: String,

    /// Transaction date
    pub date: NaiveDate,

    /// Memo/notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub kind: TransactionKind,

    /// When the transaction was created
    pub created_at: DateTime<Utc>,

    /// When the transaction was last modified
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction, normalizing the category label
    pub fn new(
        user_id: UserId,
        kind: TransactionKind,
        amount: Money,
        category: &str,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            user_id,
            amount,
            category: normalize_category(category),
            date,
            description: None,
            kind,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description; blank text clears it
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self
    }

    pub fn is_expense(&self) -> bool {
        self.kind.is_expense()
    }

    /// Lower-cased category used to match budgets
    pub fn category_key(&self) -> String {
        category_key(&self.category)
    }

    /// The monthly period this transaction falls into
    pub fn period(&self) -> BudgetPeriod {
        BudgetPeriod::of(self.date)
    }

    /// Whether this row counts toward `user`'s budget for `key` in `period`
    pub fn counts_toward(&self, user_id: UserId, key: &str, period: Option<BudgetPeriod>) -> bool {
        self.is_expense()
            && self.user_id == user_id
            && self.category_key() == key
            && period.map_or(true, |p| p.contains(self.date))
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.kind,
            self.category,
            self.amount
        )
    }
}
