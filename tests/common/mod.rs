//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use tempfile::TempDir;

use ahorra::config::{EnforcementMode, LedgerPaths, Settings};
use ahorra::error::{LedgerError, LedgerResult};
use ahorra::models::{
    Budget, BudgetId, Notification, NotificationId, Transaction, TransactionId, User, UserId,
};
use ahorra::storage::{LedgerStore, Storage};
use ahorra::validation::{BudgetDraft, TransactionDraft};
use ahorra::Engine;

pub fn settings(enforcement: EnforcementMode) -> Settings {
    Settings {
        enforcement,
        ..Settings::default()
    }
}

pub fn open_storage(dir: &TempDir) -> Storage {
    Storage::open(LedgerPaths::with_base_dir(dir.path().to_path_buf())).unwrap()
}

/// Engine over a fresh JSON store, plus one user
pub fn engine(enforcement: EnforcementMode) -> (Engine, UserId, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(open_storage(&dir));
    let user = add_user(store.as_ref(), "ana");
    (Engine::new(store, settings(enforcement)), user, dir)
}

/// Insert a user directly, skipping password hashing
pub fn add_user(store: &dyn LedgerStore, username: &str) -> UserId {
    let user = User::new(
        username,
        format!("{}@example.com", username),
        username,
        "not-a-real-hash".to_string(),
    );
    store.insert_user(&user).unwrap();
    user.id
}

pub fn expense(user: UserId, amount: f64, category: &str) -> TransactionDraft {
    TransactionDraft {
        amount,
        category: category.to_string(),
        date: Some("2025-01-15".to_string()),
        description: None,
        kind: "expense".to_string(),
        user_id: Some(user),
    }
}

pub fn budget(user: UserId, category: &str, limit: f64) -> BudgetDraft {
    BudgetDraft {
        category: category.to_string(),
        limit,
        user_id: Some(user),
    }
}

/// A store whose notification writes always fail
pub struct FailingNotifications {
    pub inner: Storage,
}

impl LedgerStore for FailingNotifications {
    fn get_user(&self, id: UserId) -> LedgerResult<Option<User>> {
        self.inner.get_user(id)
    }

    fn list_users(&self) -> LedgerResult<Vec<User>> {
        self.inner.list_users()
    }

    fn insert_user(&self, user: &User) -> LedgerResult<()> {
        self.inner.insert_user(user)
    }

    fn update_user(&self, user: &User) -> LedgerResult<usize> {
        self.inner.update_user(user)
    }

    fn get_transaction(&self, id: TransactionId) -> LedgerResult<Option<Transaction>> {
        self.inner.get_transaction(id)
    }

    fn transactions_for(&self, user_id: UserId) -> LedgerResult<Vec<Transaction>> {
        self.inner.transactions_for(user_id)
    }

    fn insert_transaction(&self, txn: &Transaction) -> LedgerResult<()> {
        self.inner.insert_transaction(txn)
    }

    fn update_transaction(&self, txn: &Transaction) -> LedgerResult<usize> {
        self.inner.update_transaction(txn)
    }

    fn delete_transaction(&self, id: TransactionId) -> LedgerResult<usize> {
        self.inner.delete_transaction(id)
    }

    fn get_budget(&self, id: BudgetId) -> LedgerResult<Option<Budget>> {
        self.inner.get_budget(id)
    }

    fn budgets_for(&self, user_id: UserId) -> LedgerResult<Vec<Budget>> {
        self.inner.budgets_for(user_id)
    }

    fn insert_budget(&self, budget: &Budget) -> LedgerResult<()> {
        self.inner.insert_budget(budget)
    }

    fn update_budget(&self, budget: &Budget) -> LedgerResult<usize> {
        self.inner.update_budget(budget)
    }

    fn delete_budget(&self, id: BudgetId) -> LedgerResult<usize> {
        self.inner.delete_budget(id)
    }

    fn notifications_for(&self, user_id: UserId) -> LedgerResult<Vec<Notification>> {
        self.inner.notifications_for(user_id)
    }

    fn insert_notification(&self, _notification: &Notification) -> LedgerResult<()> {
        Err(LedgerError::Storage("notification table unavailable".into()))
    }

    fn mark_notifications_read(&self, user_id: UserId, ids: &[NotificationId]) -> LedgerResult<usize> {
        self.inner.mark_notifications_read(user_id, ids)
    }

    fn delete_notification(&self, id: NotificationId) -> LedgerResult<usize> {
        self.inner.delete_notification(id)
    }
}
