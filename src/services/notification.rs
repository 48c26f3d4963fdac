//! Notification inbox

use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Notification, NotificationId, UserId};
use crate::storage::LedgerStore;

pub struct NotificationService<'a> {
    store: &'a dyn LedgerStore,
}

impl<'a> NotificationService<'a> {
    pub fn new(store: &'a dyn LedgerStore) -> Self {
        Self { store }
    }

    /// A user's notifications, newest first
    pub fn list(&self, user_id: UserId, unread_only: bool) -> LedgerResult<Vec<Notification>> {
        let mut notifications: Vec<Notification> = self
            .store
            .notifications_for(user_id)?
            .into_iter()
            .filter(|n| !unread_only || !n.is_read)
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    pub fn unread_count(&self, user_id: UserId) -> LedgerResult<usize> {
        Ok(self.list(user_id, true)?.len())
    }

    /// Mark one notification read; marking an already-read one is a no-op
    pub fn mark_read(&self, user_id: UserId, id: NotificationId) -> LedgerResult<()> {
        if self.store.mark_notifications_read(user_id, &[id])? == 0 {
            let owned = self
                .store
                .notifications_for(user_id)?
                .iter()
                .any(|n| n.id == id);
            if !owned {
                return Err(LedgerError::notification_not_found(id.to_string()));
            }
        }
        Ok(())
    }

    /// Mark every unread notification read; returns how many changed
    pub fn mark_all_read(&self, user_id: UserId) -> LedgerResult<usize> {
        let unread: Vec<NotificationId> = self.list(user_id, true)?.iter().map(|n| n.id).collect();
        if unread.is_empty() {
            return Ok(0);
        }
        let changed = self.store.mark_notifications_read(user_id, &unread)?;
        info!(user = %user_id, changed, "notifications marked read");
        Ok(changed)
    }

    pub fn delete(&self, user_id: UserId, id: NotificationId) -> LedgerResult<()> {
        let owned = self
            .store
            .notifications_for(user_id)?
            .iter()
            .any(|n| n.id == id);
        if !owned || self.store.delete_notification(id)? == 0 {
            return Err(LedgerError::notification_not_found(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerPaths;
    use crate::models::Severity;
    use crate::storage::Storage;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn setup() -> (Storage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::open(LedgerPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        (storage, temp_dir)
    }

    fn notify(storage: &Storage, user: UserId, title: &str, minutes_ago: i64) -> Notification {
        let mut n = Notification::new(user, Severity::Warning, title, "m");
        n.created_at = Utc::now() - Duration::minutes(minutes_ago);
        storage.insert_notification(&n).unwrap();
        n
    }

    #[test]
    fn test_list_newest_first_and_unread_filter() {
        let (storage, _temp) = setup();
        let user = UserId::new();
        let old = notify(&storage, user, "old", 10);
        notify(&storage, user, "new", 1);
        notify(&storage, UserId::new(), "foreign", 0);

        let service = NotificationService::new(&storage);
        let titles: Vec<_> = service.list(user, false).unwrap().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["new", "old"]);

        service.mark_read(user, old.id).unwrap();
        assert_eq!(service.list(user, true).unwrap().len(), 1);
        assert_eq!(service.unread_count(user).unwrap(), 1);
    }

    #[test]
    fn test_mark_read_is_idempotent_but_scoped() {
        let (storage, _temp) = setup();
        let user = UserId::new();
        let n = notify(&storage, user, "a", 0);
        let service = NotificationService::new(&storage);

        service.mark_read(user, n.id).unwrap();
        service.mark_read(user, n.id).unwrap();
        assert!(service.mark_read(UserId::new(), n.id).unwrap_err().is_not_found());
        assert!(service.mark_read(user, NotificationId::new()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_mark_all_read_counts_changes() {
        let (storage, _temp) = setup();
        let user = UserId::new();
        notify(&storage, user, "a", 2);
        notify(&storage, user, "b", 1);
        let service = NotificationService::new(&storage);

        assert_eq!(service.mark_all_read(user).unwrap(), 2);
        assert_eq!(service.mark_all_read(user).unwrap(), 0);
    }

    #[test]
    fn test_delete_checks_owner() {
        let (storage, _temp) = setup();
        let user = UserId::new();
        let n = notify(&storage, user, "a", 0);
        let service = NotificationService::new(&storage);

        assert!(service.delete(UserId::new(), n.id).unwrap_err().is_not_found());
        service.delete(user, n.id).unwrap();
        assert!(service.list(user, false).unwrap().is_empty());
        assert!(service.delete(user, n.id).unwrap_err().is_not_found());
    }
}
