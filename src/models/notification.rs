//! Notification model
//!
//! Messages raised for a user, mostly by budget threshold crossings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{NotificationId, UserId};
use super::period::BudgetPeriod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Danger,
    Success,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Danger => write!(f, "danger"),
            Self::Success => write!(f, "success"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub severity: Severity,

    /// Category the alert is about, when it came from a budget
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_category: Option<String>,

    /// Month the alert refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<BudgetPeriod>,

    #[serde(default)]
    pub is_read: bool,

    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: UserId,
        severity: Severity,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            user_id,
            title: title.into(),
            message: message.into(),
            severity,
            related_category: None,
            period: None,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    /// Attach the budget category and period this notification refers to
    pub fn about(mut self, category: impl Into<String>, period: BudgetPeriod) -> Self {
        self.related_category = Some(category.into());
        self.period = Some(period);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_notification_is_unread() {
        let n = Notification::new(UserId::new(), Severity::Info, "Hola", "Bienvenido");
        assert!(!n.is_read);
        assert!(n.related_category.is_none());
    }

    #[test]
    fn test_serialization() {
        let period = BudgetPeriod::monthly(2025, 1).unwrap();
        let n = Notification::new(UserId::new(), Severity::Danger, "t", "m").about("Comida", period);
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["severity"], "danger");
        assert_eq!(json["related_category"], "Comida");
        assert_eq!(json["period"], "2025-01");
        assert_eq!(json["is_read"], false);
    }

    #[test]
    fn test_legacy_rows_without_optional_fields() {
        let raw = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "user_id": "550e8400-e29b-41d4-a716-446655440001",
            "title": "t",
            "message": "m",
            "severity": "info",
            "created_at": "2025-01-01T00:00:00Z"
        }"#;
        let n: Notification = serde_json::from_str(raw).unwrap();
        assert!(!n.is_read);
        assert!(n.period.is_none());
    }
}
