//! Display formatting for terminal output
//!
//! Table views for the `ahorra` binary. Amounts use the configured currency
//! symbol and dates the configured strftime format.

pub mod budget;
pub mod notification;
pub mod report;
pub mod transaction;

pub use budget::{format_budget_list, format_budget_summary, format_status_list};
pub use notification::format_notification_list;
pub use report::{format_group_totals, format_period_summary};
pub use transaction::{format_transaction_details, format_transaction_list};

use std::fmt::Write;

use chrono::NaiveDate;

use crate::config::Settings;
use crate::models::Money;

/// Currency and date conventions for rendering
#[derive(Debug, Clone)]
pub struct DisplayFormat {
    pub currency_symbol: String,
    pub date_format: String,
}

impl DisplayFormat {
    pub fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// Falls back to ISO dates when the configured format is invalid
    pub fn date(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        match write!(out, "{}", date.format(&self.date_format)) {
            Ok(()) => out,
            Err(_) => date.format("%Y-%m-%d").to_string(),
        }
    }
}

impl Default for DisplayFormat {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for DisplayFormat {
    fn from(settings: &Settings) -> Self {
        Self {
            currency_symbol: settings.currency_symbol.clone(),
            date_format: settings.date_format.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_symbol_and_date() {
        let fmt = DisplayFormat {
            currency_symbol: "€".into(),
            date_format: "%d/%m/%Y".into(),
        };
        assert_eq!(fmt.money(Money::from_cents(-1050)), "-€10.50");
        assert_eq!(fmt.date(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()), "05/01/2025");
    }

    #[test]
    fn test_bad_date_format_falls_back() {
        let fmt = DisplayFormat {
            date_format: "%Q".into(),
            ..DisplayFormat::default()
        };
        assert_eq!(fmt.date(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()), "2025-01-05");
    }
}
