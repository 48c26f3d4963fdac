//! Notification display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Notification;

#[derive(Tabled)]
struct NotificationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "")]
    unread: &'static str,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Message")]
    message: String,
}

pub fn format_notification_list(notifications: &[Notification]) -> String {
    if notifications.is_empty() {
        return "No notifications.".to_string();
    }

    let rows = notifications.iter().map(|n| NotificationRow {
        id: n.id.to_string(),
        unread: if n.is_read { "" } else { "●" },
        severity: n.severity.to_string(),
        title: n.title.clone(),
        message: n.message.clone(),
    });
    Table::new(rows).with(Style::psql()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Severity, UserId};

    #[test]
    fn test_unread_marker() {
        let mut read = Notification::new(UserId::new(), Severity::Info, "Leída", "m");
        read.is_read = true;
        let unread = Notification::new(UserId::new(), Severity::Danger, "Nueva", "m");

        let out = format_notification_list(&[unread, read]);
        assert_eq!(out.matches('●').count(), 1);
        assert!(out.contains("danger"));
    }
}
