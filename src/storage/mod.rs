//! Storage layer for Ahorra
//!
//! [`LedgerStore`] is the persistence boundary the engine talks to. The
//! default implementation, [`Storage`], keeps one JSON file per table under
//! the data directory, rewrites files atomically, and appends every write to
//! the audit log.

pub mod file_io;
pub mod table;

pub use file_io::{read_json, write_json_atomic};
pub use table::{JsonTable, Record};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::LedgerPaths;
use crate::error::LedgerResult;
use crate::models::{
    Budget, BudgetId, Notification, NotificationId, Transaction, TransactionId, User, UserId,
};

/// CRUD over the four ledger tables
///
/// Updates and deletes report the number of rows they touched; `0` means the
/// row did not exist. Listing methods return rows oldest first.
pub trait LedgerStore: Send + Sync {
    fn get_user(&self, id: UserId) -> LedgerResult<Option<User>>;
    fn list_users(&self) -> LedgerResult<Vec<User>>;
    fn insert_user(&self, user: &User) -> LedgerResult<()>;
    fn update_user(&self, user: &User) -> LedgerResult<usize>;

    fn get_transaction(&self, id: TransactionId) -> LedgerResult<Option<Transaction>>;
    fn transactions_for(&self, user_id: UserId) -> LedgerResult<Vec<Transaction>>;
    fn insert_transaction(&self, txn: &Transaction) -> LedgerResult<()>;
    fn update_transaction(&self, txn: &Transaction) -> LedgerResult<usize>;
    fn delete_transaction(&self, id: TransactionId) -> LedgerResult<usize>;

    fn get_budget(&self, id: BudgetId) -> LedgerResult<Option<Budget>>;
    fn budgets_for(&self, user_id: UserId) -> LedgerResult<Vec<Budget>>;
    fn insert_budget(&self, budget: &Budget) -> LedgerResult<()>;
    fn update_budget(&self, budget: &Budget) -> LedgerResult<usize>;
    fn delete_budget(&self, id: BudgetId) -> LedgerResult<usize>;

    fn notifications_for(&self, user_id: UserId) -> LedgerResult<Vec<Notification>>;
    fn insert_notification(&self, notification: &Notification) -> LedgerResult<()>;
    /// Mark the given notifications read; already-read rows are not counted
    fn mark_notifications_read(&self, user_id: UserId, ids: &[NotificationId])
        -> LedgerResult<usize>;
    fn delete_notification(&self, id: NotificationId) -> LedgerResult<usize>;
}

impl Record for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for Transaction {
    type Id = TransactionId;

    fn id(&self) -> TransactionId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for Budget {
    type Id = BudgetId;

    fn id(&self) -> BudgetId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for Notification {
    type Id = NotificationId;

    fn id(&self) -> NotificationId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// JSON file store
pub struct Storage {
    paths: LedgerPaths,
    audit: AuditLogger,
    users: JsonTable<User>,
    transactions: JsonTable<Transaction>,
    budgets: JsonTable<Budget>,
    notifications: JsonTable<Notification>,
}

impl Storage {
    /// Open the store under `paths`, creating directories and loading every
    /// table that already exists on disk
    pub fn open(paths: LedgerPaths) -> LedgerResult<Self> {
        paths.ensure_directories()?;

        let storage = Self {
            audit: AuditLogger::new(paths.audit_log()),
            users: JsonTable::new(paths.users_file()),
            transactions: JsonTable::new(paths.transactions_file()),
            budgets: JsonTable::new(paths.budgets_file()),
            notifications: JsonTable::new(paths.notifications_file()),
            paths,
        };
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Reload every table from disk
    pub fn load_all(&self) -> LedgerResult<()> {
        self.users.load()?;
        self.transactions.load()?;
        self.budgets.load()?;
        self.notifications.load()?;
        Ok(())
    }

    /// The row is already on disk; a lost audit line is logged, not raised
    fn record(&self, entry: AuditEntry) {
        if let Err(e) = self.audit.log(&entry) {
            warn!(error = %e, entity = %entry.entity_type, id = %entry.entity_id, "audit write failed");
        }
    }

    fn log_create<T: Serialize>(&self, kind: EntityType, id: String, name: String, row: &T) {
        self.record(AuditEntry::create(kind, id, Some(name), row));
    }

    fn log_update<T: Serialize>(&self, kind: EntityType, id: String, name: String, before: &T, after: &T) {
        self.record(AuditEntry::update(kind, id, Some(name), before, after));
    }

    fn log_delete<T: Serialize>(&self, kind: EntityType, id: String, name: String, row: &T) {
        self.record(AuditEntry::delete(kind, id, Some(name), row));
    }
}

impl LedgerStore for Storage {
    fn get_user(&self, id: UserId) -> LedgerResult<Option<User>> {
        self.users.get(id)
    }

    fn list_users(&self) -> LedgerResult<Vec<User>> {
        self.users.select(|_| true)
    }

    fn insert_user(&self, user: &User) -> LedgerResult<()> {
        self.users.insert(user.clone())?;
        self.log_create(EntityType::User, user.id.to_string(), user.username.clone(), user);
        Ok(())
    }

    fn update_user(&self, user: &User) -> LedgerResult<usize> {
        let Some(before) = self.users.replace(user.clone())? else {
            return Ok(0);
        };
        self.log_update(EntityType::User, user.id.to_string(), user.username.clone(), &before, user);
        Ok(1)
    }

    fn get_transaction(&self, id: TransactionId) -> LedgerResult<Option<Transaction>> {
        self.transactions.get(id)
    }

    fn transactions_for(&self, user_id: UserId) -> LedgerResult<Vec<Transaction>> {
        self.transactions.select(|t| t.user_id == user_id)
    }

    fn insert_transaction(&self, txn: &Transaction) -> LedgerResult<()> {
        self.transactions.insert(txn.clone())?;
        self.log_create(EntityType::Transaction, txn.id.to_string(), txn.to_string(), txn);
        Ok(())
    }

    fn update_transaction(&self, txn: &Transaction) -> LedgerResult<usize> {
        let Some(before) = self.transactions.replace(txn.clone())? else {
            return Ok(0);
        };
        self.log_update(EntityType::Transaction, txn.id.to_string(), txn.to_string(), &before, txn);
        Ok(1)
    }

    fn delete_transaction(&self, id: TransactionId) -> LedgerResult<usize> {
        let Some(removed) = self.transactions.remove(id)? else {
            return Ok(0);
        };
        self.log_delete(EntityType::Transaction, id.to_string(), removed.to_string(), &removed);
        Ok(1)
    }

    fn get_budget(&self, id: BudgetId) -> LedgerResult<Option<Budget>> {
        self.budgets.get(id)
    }

    fn budgets_for(&self, user_id: UserId) -> LedgerResult<Vec<Budget>> {
        self.budgets.select(|b| b.user_id == user_id)
    }

    fn insert_budget(&self, budget: &Budget) -> LedgerResult<()> {
        self.budgets.insert(budget.clone())?;
        self.log_create(EntityType::Budget, budget.id.to_string(), budget.category.clone(), budget);
        Ok(())
    }

    fn update_budget(&self, budget: &Budget) -> LedgerResult<usize> {
        let Some(before) = self.budgets.replace(budget.clone())? else {
            return Ok(0);
        };
        self.log_update(EntityType::Budget, budget.id.to_string(), budget.category.clone(), &before, budget);
        Ok(1)
    }

    fn delete_budget(&self, id: BudgetId) -> LedgerResult<usize> {
        let Some(removed) = self.budgets.remove(id)? else {
            return Ok(0);
        };
        self.log_delete(EntityType::Budget, id.to_string(), removed.category.clone(), &removed);
        Ok(1)
    }

    fn notifications_for(&self, user_id: UserId) -> LedgerResult<Vec<Notification>> {
        self.notifications.select(|n| n.user_id == user_id)
    }

    fn insert_notification(&self, notification: &Notification) -> LedgerResult<()> {
        self.notifications.insert(notification.clone())?;
        self.log_create(
            EntityType::Notification,
            notification.id.to_string(),
            notification.title.clone(),
            notification,
        );
        Ok(())
    }

    fn mark_notifications_read(
        &self,
        user_id: UserId,
        ids: &[NotificationId],
    ) -> LedgerResult<usize> {
        let changed = self.notifications.modify_where(
            |n| n.user_id == user_id && ids.contains(&n.id),
            |n| !std::mem::replace(&mut n.is_read, true),
        )?;
        for (before, after) in &changed {
            self.log_update(
                EntityType::Notification,
                after.id.to_string(),
                after.title.clone(),
                before,
                after,
            );
        }
        Ok(changed.len())
    }

    fn delete_notification(&self, id: NotificationId) -> LedgerResult<usize> {
        let Some(removed) = self.notifications.remove(id)? else {
            return Ok(0);
        };
        self.log_delete(EntityType::Notification, id.to_string(), removed.title.clone(), &removed);
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Severity, TransactionKind};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn open() -> (Storage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        (Storage::open(paths).unwrap(), temp_dir)
    }

    fn expense(user_id: UserId, cents: i64) -> Transaction {
        Transaction::new(
            user_id,
            TransactionKind::Expense,
            Money::from_cents(cents),
            "comida",
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
        )
    }

    #[test]
    fn test_storage_creation() {
        let (storage, temp) = open();
        assert!(temp.path().join("data").exists());
        assert!(storage.list_users().unwrap().is_empty());
    }

    #[test]
    fn test_rows_survive_reopen() {
        let (storage, temp) = open();
        let user = User::new("Ana", "ana@example.com", "ana", "hash".into());
        storage.insert_user(&user).unwrap();
        let txn = expense(user.id, 1500);
        storage.insert_transaction(&txn).unwrap();

        let reopened =
            Storage::open(LedgerPaths::with_base_dir(temp.path().to_path_buf())).unwrap();
        assert_eq!(reopened.get_user(user.id).unwrap(), Some(user.clone()));
        assert_eq!(reopened.transactions_for(user.id).unwrap(), vec![txn]);
    }

    #[test]
    fn test_update_and_delete_report_affected_rows() {
        let (storage, _temp) = open();
        let user_id = UserId::new();
        let txn = expense(user_id, 1500);

        assert_eq!(storage.update_transaction(&txn).unwrap(), 0);
        assert_eq!(storage.delete_transaction(txn.id).unwrap(), 0);

        storage.insert_transaction(&txn).unwrap();
        let edited = Transaction {
            amount: Money::from_cents(2000),
            ..txn.clone()
        };
        assert_eq!(storage.update_transaction(&edited).unwrap(), 1);
        assert_eq!(storage.delete_transaction(txn.id).unwrap(), 1);
        assert!(storage.get_transaction(txn.id).unwrap().is_none());
    }

    #[test]
    fn test_mark_read_is_scoped_to_owner() {
        let (storage, _temp) = open();
        let owner = UserId::new();
        let n = Notification::new(owner, Severity::Info, "t", "m");
        storage.insert_notification(&n).unwrap();

        assert_eq!(storage.mark_notifications_read(UserId::new(), &[n.id]).unwrap(), 0);
        assert_eq!(storage.mark_notifications_read(owner, &[n.id]).unwrap(), 1);
        // Already read
        assert_eq!(storage.mark_notifications_read(owner, &[n.id]).unwrap(), 0);
    }

    #[test]
    fn test_writes_are_audited() {
        let (storage, _temp) = open();
        let budget = Budget::new(UserId::new(), "ocio", Money::from_cents(20000));
        storage.insert_budget(&budget).unwrap();
        let raised = Budget {
            limit: Money::from_cents(25000),
            ..budget.clone()
        };
        storage.update_budget(&raised).unwrap();
        storage.delete_budget(budget.id).unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[1].diff_summary.as_deref(),
            Some("limit: 20000 -> 25000")
        );
        assert!(entries.iter().all(|e| e.entity_type == EntityType::Budget));
    }
}
