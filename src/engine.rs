//! Engine façade
//!
//! Owns the store handle, the settings and the category lock table, and
//! exposes every operation as a [`Response`]. Callers that prefer typed
//! errors can borrow the services directly.

use std::sync::Arc;

use crate::config::{LedgerPaths, Settings};
use crate::error::LedgerResult;
use crate::models::{
    Budget, BudgetId, BudgetPeriod, BudgetStatus, BudgetSummary, Notification, NotificationId,
    Transaction, TransactionId, UserId, UserProfile,
};
use crate::response::Response;
use crate::services::{
    BudgetService, CategoryLocks, GroupTotals, LedgerService, LedgerWrite, NotificationService,
    PeriodSummary, ReportService, TransactionFilter, UserService,
};
use crate::storage::{LedgerStore, Storage};
use crate::validation::{BudgetDraft, RegistrationDraft, TransactionDraft};

pub struct Engine {
    store: Arc<dyn LedgerStore>,
    settings: Settings,
    locks: CategoryLocks,
}

impl Engine {
    pub fn new(store: Arc<dyn LedgerStore>, settings: Settings) -> Self {
        Self {
            store,
            settings,
            locks: CategoryLocks::new(),
        }
    }

    /// Engine over the JSON file store at `paths`
    pub fn open(paths: LedgerPaths, settings: Settings) -> LedgerResult<Self> {
        let storage = Storage::open(paths)?;
        Ok(Self::new(Arc::new(storage), settings))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &dyn LedgerStore {
        self.store.as_ref()
    }

    pub fn ledger(&self) -> LedgerService<'_> {
        LedgerService::new(self.store.as_ref(), &self.settings, &self.locks)
    }

    pub fn budgets(&self) -> BudgetService<'_> {
        BudgetService::new(self.store.as_ref(), &self.locks)
    }

    pub fn notifications(&self) -> NotificationService<'_> {
        NotificationService::new(self.store.as_ref())
    }

    pub fn users(&self) -> UserService<'_> {
        UserService::new(self.store.as_ref(), &self.locks)
    }

    pub fn reports(&self) -> ReportService<'_> {
        ReportService::new(self.store.as_ref())
    }

    // Transactions

    pub fn create_transaction(&self, draft: &TransactionDraft) -> Response<LedgerWrite> {
        self.ledger().create(draft).into()
    }

    pub fn update_transaction(
        &self,
        user_id: UserId,
        id: TransactionId,
        draft: &TransactionDraft,
    ) -> Response<LedgerWrite> {
        self.ledger().update(user_id, id, draft).into()
    }

    pub fn delete_transaction(&self, user_id: UserId, id: TransactionId) -> Response<Transaction> {
        self.ledger().delete(user_id, id).into()
    }

    pub fn get_transaction(&self, user_id: UserId, id: TransactionId) -> Response<Transaction> {
        self.ledger().get(user_id, id).into()
    }

    pub fn list_transactions(&self, user_id: UserId, filter: &TransactionFilter) -> Response<Vec<Transaction>> {
        self.ledger().list(user_id, filter).into()
    }

    // Budgets

    pub fn create_budget(&self, draft: &BudgetDraft) -> Response<Budget> {
        self.budgets().create(draft).into()
    }

    pub fn update_budget(&self, user_id: UserId, id: BudgetId, draft: &BudgetDraft) -> Response<Budget> {
        self.budgets().update(user_id, id, draft).into()
    }

    pub fn delete_budget(&self, user_id: UserId, id: BudgetId) -> Response<Budget> {
        self.budgets().delete(user_id, id).into()
    }

    pub fn get_budget(&self, user_id: UserId, id: BudgetId) -> Response<Budget> {
        self.budgets().get(user_id, id).into()
    }

    pub fn list_budgets(&self, user_id: UserId) -> Response<Vec<Budget>> {
        self.budgets().list(user_id).into()
    }

    pub fn budget_statuses(&self, user_id: UserId, period: Option<BudgetPeriod>) -> Response<Vec<BudgetStatus>> {
        self.budgets().statuses(user_id, period).into()
    }

    pub fn exceeded_budgets(&self, user_id: UserId, period: Option<BudgetPeriod>) -> Response<Vec<BudgetStatus>> {
        self.budgets().exceeded(user_id, period).into()
    }

    pub fn near_limit_budgets(
        &self,
        user_id: UserId,
        period: Option<BudgetPeriod>,
        threshold: Option<u32>,
    ) -> Response<Vec<BudgetStatus>> {
        self.budgets().near_limit(user_id, period, threshold).into()
    }

    pub fn alerting_budgets(&self, user_id: UserId, period: Option<BudgetPeriod>) -> Response<Vec<BudgetStatus>> {
        self.budgets().alerting(user_id, period).into()
    }

    pub fn budget_summary(&self, user_id: UserId, period: Option<BudgetPeriod>) -> Response<BudgetSummary> {
        self.budgets().summary(user_id, period).into()
    }

    // Notifications

    pub fn list_notifications(&self, user_id: UserId, unread_only: bool) -> Response<Vec<Notification>> {
        self.notifications().list(user_id, unread_only).into()
    }

    pub fn unread_notifications(&self, user_id: UserId) -> Response<usize> {
        self.notifications().unread_count(user_id).into()
    }

    pub fn mark_notification_read(&self, user_id: UserId, id: NotificationId) -> Response<()> {
        self.notifications().mark_read(user_id, id).into()
    }

    pub fn mark_all_notifications_read(&self, user_id: UserId) -> Response<usize> {
        self.notifications().mark_all_read(user_id).into()
    }

    pub fn delete_notification(&self, user_id: UserId, id: NotificationId) -> Response<()> {
        self.notifications().delete(user_id, id).into()
    }

    // Users

    pub fn register(&self, draft: &RegistrationDraft) -> Response<UserProfile> {
        self.users().register(draft).into()
    }

    pub fn login(&self, username: &str, password: &str) -> Response<UserProfile> {
        self.users().login(username, password).into()
    }

    pub fn find_user_by_email(&self, email: &str) -> Response<UserProfile> {
        self.users().find_by_email(email).into()
    }

    pub fn reset_password(&self, user_id: UserId, password: &str, confirm: &str) -> Response<()> {
        self.users().reset_password(user_id, password, confirm).into()
    }

    pub fn update_profile(&self, user_id: UserId, name: &str, email: &str, username: &str) -> Response<UserProfile> {
        self.users().update_profile(user_id, name, email, username).into()
    }

    pub fn get_user(&self, user_id: UserId) -> Response<UserProfile> {
        self.users().get(user_id).into()
    }

    // Reports

    pub fn period_summary(&self, user_id: UserId, period: Option<BudgetPeriod>) -> Response<PeriodSummary> {
        self.reports().period_summary(user_id, period).into()
    }

    pub fn totals_by_category(&self, user_id: UserId, period: Option<BudgetPeriod>) -> Response<Vec<GroupTotals>> {
        self.reports().by_category(user_id, period).into()
    }

    pub fn totals_by_month(&self, user_id: UserId) -> Response<Vec<GroupTotals>> {
        self.reports().by_month(user_id).into()
    }
}
