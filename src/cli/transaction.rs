//! Transaction CLI commands

use anyhow::{anyhow, Result};
use clap::Subcommand;

use crate::display::{format_transaction_details, format_transaction_list};
use crate::models::{Money, Transaction, TransactionId, TransactionKind};
use crate::services::{LedgerWrite, TransactionFilter};
use crate::validation::{parse_date, TransactionDraft};

use super::CliContext;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record an income or expense
    Add {
        /// Amount (e.g. "120.50")
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Category label
        category: String,
        /// "expense" or "income"
        #[arg(short, long, default_value = "expense")]
        kind: String,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Free-text description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// List transactions, newest first
    List {
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// Only "income" or "expense"
        #[arg(short, long)]
        kind: Option<String>,
        /// Earliest date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<String>,
        /// Latest date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,
        /// Smallest amount (inclusive)
        #[arg(long)]
        min: Option<String>,
        /// Largest amount (inclusive)
        #[arg(long)]
        max: Option<String>,
        /// Number of transactions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show one transaction
    Show {
        /// Transaction ID
        id: String,
    },

    /// Change fields of a transaction; omitted fields keep their value
    Edit {
        /// Transaction ID
        id: String,
        #[arg(short, long, allow_negative_numbers = true)]
        amount: Option<f64>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        kind: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

fn parse_id(id: &str) -> Result<TransactionId> {
    TransactionId::parse(id).map_err(|_| anyhow!("invalid transaction id: {}", id))
}

fn parse_kind(kind: &str) -> Result<TransactionKind> {
    kind.parse()
        .map_err(|_| anyhow!("invalid kind: {} (expected \"income\" or \"expense\")", kind))
}

fn parse_amount(amount: &str) -> Result<Money> {
    Money::parse(amount).map_err(|e| anyhow!("{}", e))
}

fn parse_day(date: &str) -> Result<chrono::NaiveDate> {
    parse_date(date).ok_or_else(|| anyhow!("invalid date: {} (expected YYYY-MM-DD)", date))
}

fn describe_write(ctx: &CliContext<'_>, write: &LedgerWrite) -> String {
    let fmt = &ctx.out.format;
    let txn = &write.transaction;
    let mut output = format!(
        "Recorded {} of {} in {} on {} ({})",
        txn.kind,
        fmt.money(txn.amount),
        txn.category,
        fmt.date(txn.date),
        txn.id
    );
    if let Some(status) = &write.status {
        output.push_str(&format!(
            "\nBudget {}: {} of {} spent ({}%), {}",
            status.category,
            fmt.money(status.spent),
            fmt.money(status.limit),
            status.percentage,
            status.state
        ));
    }
    if let Some(notification) = &write.notification {
        output.push_str(&format!("\n[{}] {}", notification.severity, notification.message));
    }
    output
}

/// Handle a transaction command
pub fn handle_transaction_command(ctx: &CliContext<'_>, cmd: TransactionCommands) -> Result<()> {
    let user = ctx.current_user()?;
    let engine = ctx.engine;

    match cmd {
        TransactionCommands::Add {
            amount,
            category,
            kind,
            date,
            description,
        } => {
            let draft = TransactionDraft {
                amount,
                category,
                date: Some(date.unwrap_or_else(|| chrono::Local::now().date_naive().to_string())),
                description,
                kind,
                user_id: Some(user.id),
            };
            ctx.out
                .emit(engine.create_transaction(&draft), |w| describe_write(ctx, w))
        }

        TransactionCommands::List {
            category,
            kind,
            from,
            to,
            min,
            max,
            limit,
        } => {
            let filter = TransactionFilter {
                category,
                kind: kind.as_deref().map(parse_kind).transpose()?,
                start_date: from.as_deref().map(parse_day).transpose()?,
                end_date: to.as_deref().map(parse_day).transpose()?,
                min_amount: min.as_deref().map(parse_amount).transpose()?,
                max_amount: max.as_deref().map(parse_amount).transpose()?,
                limit,
            };
            ctx.out.emit(engine.list_transactions(user.id, &filter), |txns| {
                format_transaction_list(txns, &ctx.out.format)
            })
        }

        TransactionCommands::Show { id } => {
            let id = parse_id(&id)?;
            ctx.out.emit(engine.get_transaction(user.id, id), |txn| {
                format_transaction_details(txn, &ctx.out.format)
            })
        }

        TransactionCommands::Edit {
            id,
            amount,
            category,
            kind,
            date,
            description,
        } => {
            let id = parse_id(&id)?;
            let current: Transaction = ctx.out.require(engine.get_transaction(user.id, id))?;
            let draft = TransactionDraft {
                amount: amount.unwrap_or_else(|| current.amount.to_decimal()),
                category: category.unwrap_or(current.category),
                date: Some(date.unwrap_or_else(|| current.date.to_string())),
                description: description.or(current.description),
                kind: kind.unwrap_or_else(|| current.kind.to_string()),
                user_id: Some(user.id),
            };
            ctx.out
                .emit(engine.update_transaction(user.id, id, &draft), |w| describe_write(ctx, w))
        }

        TransactionCommands::Delete { id } => {
            let id = parse_id(&id)?;
            ctx.out.emit(engine.delete_transaction(user.id, id), |txn| {
                format!("Deleted transaction {}", txn.id)
            })
        }
    }
}
