//! Budget model
//!
//! A per-category spending limit, and the status derived from it for one
//! period. Statuses are computed on every read and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::{category_key, normalize_category};
use super::ids::{BudgetId, UserId};
use super::money::Money;

/// A spending limit for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,

    pub user_id: UserId,

    /// Normalized category label, unique per user
    pub category: String,

    /// Monthly limit, always positive
    pub limit: Money,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(user_id: UserId, category: &str, limit: Money) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            user_id,
            category: normalize_category(category),
            limit,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn category_key(&self) -> String {
        category_key(&self.category)
    }
}

/// Consumption band of a budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetState {
    /// Under 50% consumed
    Safe,
    /// 50% to under 80%
    Caution,
    /// 80% to under 100%
    Alert,
    /// 100% or more
    Exceeded,
}

impl BudgetState {
    /// ALERT or EXCEEDED
    pub fn needs_attention(&self) -> bool {
        matches!(self, Self::Alert | Self::Exceeded)
    }
}

impl fmt::Display for BudgetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => write!(f, "SAFE"),
            Self::Caution => write!(f, "CAUTION"),
            Self::Alert => write!(f, "ALERT"),
            Self::Exceeded => write!(f, "EXCEEDED"),
        }
    }
}

/// Derived consumption figures for one budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub budget_id: BudgetId,
    pub category: String,
    pub limit: Money,
    pub spent: Money,
    /// `limit - spent`; negative once the budget is exceeded
    pub available: Money,
    /// Rounded to two decimals
    pub percentage: f64,
    pub state: BudgetState,
}

impl BudgetStatus {
    /// Amount spent beyond the limit, zero when within it
    pub fn overage(&self) -> Money {
        if self.available.is_negative() {
            -self.available
        } else {
            Money::zero()
        }
    }
}

/// Totals across every budget of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub total_limits: Money,
    pub total_spent: Money,
    pub available: Money,
    pub percentage: f64,
    pub budget_count: usize,
}
