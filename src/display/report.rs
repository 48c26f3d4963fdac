//! Report formatting
//!
//! Period summaries and grouped totals, plus the small text helpers the
//! budget views share.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::services::{GroupTotals, PeriodSummary};

use super::DisplayFormat;

/// Format a percentage with precision that suits its size
pub fn format_percentage(pct: f64) -> String {
    if pct > 0.0 && pct < 0.1 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// A usage bar `width` cells wide; values past `max_value` fill it
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return "░".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn format_period_summary(summary: &PeriodSummary, fmt: &DisplayFormat) -> String {
    let mut output = String::new();
    output.push_str(&format!("Summary for {}\n", summary.period));
    output.push_str(&format!("{}\n", "─".repeat(32)));
    output.push_str(&format!("Income:       {:>16}\n", fmt.money(summary.income)));
    output.push_str(&format!("Expenses:     {:>16}\n", fmt.money(summary.expense)));
    output.push_str(&format!("Balance:      {:>16}\n", fmt.money(summary.balance)));
    output.push_str(&format!("Transactions: {:>16}\n", summary.count));
    output
}

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Group")]
    key: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Expense")]
    expense: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Count")]
    count: usize,
}

pub fn format_group_totals(groups: &[GroupTotals], fmt: &DisplayFormat) -> String {
    if groups.is_empty() {
        return "No transactions found.".to_string();
    }

    let rows = groups.iter().map(|g| GroupRow {
        key: g.key.clone(),
        income: fmt.money(g.income),
        expense: fmt.money(g.expense),
        total: fmt.money(g.total),
        count: g.count,
    });
    Table::new(rows).with(Style::psql()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetPeriod, Money};

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.05), "0.05%");
        assert_eq!(format_percentage(5.5), "5.5%");
        assert_eq!(format_percentage(87.6), "88%");
    }

    #[test]
    fn test_format_bar() {
        assert_eq!(format_bar(50.0, 100.0, 4), "██░░");
        assert_eq!(format_bar(150.0, 100.0, 4), "████");
        assert_eq!(format_bar(0.0, 100.0, 4), "░░░░");
    }

    #[test]
    fn test_period_summary() {
        let summary = PeriodSummary {
            period: BudgetPeriod::monthly(2025, 1).unwrap(),
            income: Money::from_cents(100000),
            expense: Money::from_cents(25000),
            balance: Money::from_cents(75000),
            count: 3,
        };
        let out = format_period_summary(&summary, &DisplayFormat::default());
        assert!(out.starts_with("Summary for 2025-01"));
        assert!(out.contains("$750.00"));
    }
}
