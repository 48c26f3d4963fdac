//! Service layer for Ahorra
//!
//! Services borrow the store (and, for writers, the category lock table)
//! from the [`Engine`](crate::engine::Engine) for the duration of a call.
//! Aggregation, status evaluation and alert construction are pure functions
//! over a snapshot; only the services touch the store.

pub mod aggregate;
pub mod alerts;
pub mod budget;
pub mod ledger;
pub mod locks;
pub mod notification;
pub mod report;
pub mod status;
pub mod user;

pub use aggregate::{GroupTotals, PeriodSummary, TransactionFilter};
pub use alerts::AlertPolicy;
pub use budget::BudgetService;
pub use ledger::{LedgerService, LedgerWrite, MutationStage};
pub use locks::CategoryLocks;
pub use notification::NotificationService;
pub use report::ReportService;
pub use user::UserService;
