//! Budget display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Budget, BudgetState, BudgetStatus, BudgetSummary};

use super::report::{format_bar, format_percentage};
use super::DisplayFormat;

const BAR_WIDTH: usize = 10;

fn state_marker(state: BudgetState) -> &'static str {
    match state {
        BudgetState::Safe => "",
        BudgetState::Caution => "~",
        BudgetState::Alert => "!",
        BudgetState::Exceeded => "⚠",
    }
}

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Limit")]
    limit: String,
}

pub fn format_budget_list(budgets: &[Budget], fmt: &DisplayFormat) -> String {
    if budgets.is_empty() {
        return "No budgets found.".to_string();
    }

    let rows = budgets.iter().map(|b| BudgetRow {
        id: b.id.to_string(),
        category: b.category.clone(),
        limit: fmt.money(b.limit),
    });
    Table::new(rows).with(Style::psql()).to_string()
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Available")]
    available: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "State")]
    state: String,
}

pub fn format_status_list(statuses: &[BudgetStatus], fmt: &DisplayFormat) -> String {
    if statuses.is_empty() {
        return "No budgets found.".to_string();
    }

    let rows = statuses.iter().map(|s| StatusRow {
        category: s.category.clone(),
        limit: fmt.money(s.limit),
        spent: fmt.money(s.spent),
        available: fmt.money(s.available),
        used: format!(
            "{} {}",
            format_bar(s.percentage, 100.0, BAR_WIDTH),
            format_percentage(s.percentage)
        ),
        state: format!("{} {}", s.state, state_marker(s.state)).trim_end().to_string(),
    });
    Table::new(rows).with(Style::psql()).to_string()
}

pub fn format_budget_summary(summary: &BudgetSummary, fmt: &DisplayFormat) -> String {
    let mut output = String::new();
    output.push_str(&format!("Budgets:      {:>16}\n", summary.budget_count));
    output.push_str(&format!("Total limits: {:>16}\n", fmt.money(summary.total_limits)));
    output.push_str(&format!("Total spent:  {:>16}\n", fmt.money(summary.total_spent)));
    output.push_str(&format!("Available:    {:>16}\n", fmt.money(summary.available)));
    output.push_str(&format!("Used:         {:>16}\n", format_percentage(summary.percentage)));
    output
}
