//! Transaction display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Transaction;

use super::DisplayFormat;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Description")]
    description: String,
}

/// Format transactions as a table, in the order given
pub fn format_transaction_list(transactions: &[Transaction], fmt: &DisplayFormat) -> String {
    if transactions.is_empty() {
        return "No transactions found.".to_string();
    }

    let rows = transactions.iter().map(|t| TransactionRow {
        id: t.id.to_string(),
        date: fmt.date(t.date),
        kind: t.kind.to_string(),
        category: t.category.clone(),
        amount: fmt.money(t.amount),
        description: t.description.clone().unwrap_or_default(),
    });
    Table::new(rows).with(Style::psql()).to_string()
}

pub fn format_transaction_details(txn: &Transaction, fmt: &DisplayFormat) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", fmt.date(txn.date)));
    output.push_str(&format!("Kind:        {}\n", txn.kind));
    output.push_str(&format!("Category:    {}\n", txn.category));
    output.push_str(&format!("Amount:      {}\n", fmt.money(txn.amount)));
    if let Some(description) = &txn.description {
        output.push_str(&format!("Description: {}\n", description));
    }

    output
}
