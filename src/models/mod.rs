//! Core data models for Ahorra
//!
//! This module contains the records the ledger stores (users, transactions,
//! budgets, notifications) and the value types they are built from.

pub mod budget;
pub mod category;
pub mod ids;
pub mod money;
pub mod notification;
pub mod period;
pub mod transaction;
pub mod user;

pub use budget::{Budget, BudgetState, BudgetStatus, BudgetSummary};
pub use category::{category_key, normalize_category, same_category};
pub use ids::{BudgetId, NotificationId, TransactionId, UserId};
pub use money::Money;
pub use notification::{Notification, Severity};
pub use period::BudgetPeriod;
pub use transaction::{Transaction, TransactionKind};
pub use user::{User, UserProfile};
