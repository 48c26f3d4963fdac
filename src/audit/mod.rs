//! Audit trail for ledger writes
//!
//! Every create, update and delete that reaches the JSON store is appended to
//! `audit.log` as one JSON line carrying the before/after values of the row.
//! Password hashes are redacted before an entry is built.
//!
//! ```rust,ignore
//! use ahorra::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(EntityType::Budget, budget.id.to_string(), Some(budget.category.clone()), &budget))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
