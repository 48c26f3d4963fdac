//! Budget CLI commands
//!
//! Category limits and their status for a month. Periods accept "2025-01",
//! "current", "last" or "next" and default to the current month.

use anyhow::{anyhow, Result};
use clap::Subcommand;

use crate::display::{format_budget_list, format_budget_summary, format_status_list};
use crate::models::{Budget, BudgetId};
use crate::validation::BudgetDraft;

use super::{parse_period, CliContext};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set a monthly limit for a category
    Add {
        /// Category label
        category: String,
        /// Monthly limit (e.g. "400" or "400.00")
        #[arg(allow_negative_numbers = true)]
        limit: f64,
    },

    /// List budgets
    List,

    /// Change the category or limit of a budget
    Edit {
        /// Budget ID
        id: String,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<f64>,
    },

    /// Delete a budget
    Delete {
        /// Budget ID
        id: String,
    },

    /// Show the status of every budget
    Status {
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Show exceeded budgets
    Exceeded {
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Show budgets close to their limit
    Near {
        #[arg(short, long)]
        period: Option<String>,
        /// Lower bound in percent
        #[arg(short, long)]
        threshold: Option<u32>,
    },

    /// Show budgets in the ALERT or EXCEEDED band
    Alerts {
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Show totals across all budgets
    Summary {
        #[arg(short, long)]
        period: Option<String>,
    },
}

fn parse_id(id: &str) -> Result<BudgetId> {
    BudgetId::parse(id).map_err(|_| anyhow!("invalid budget id: {}", id))
}

/// Handle a budget command
pub fn handle_budget_command(ctx: &CliContext<'_>, cmd: BudgetCommands) -> Result<()> {
    let user = ctx.current_user()?;
    let engine = ctx.engine;
    let fmt = &ctx.out.format;

    match cmd {
        BudgetCommands::Add { category, limit } => {
            let draft = BudgetDraft {
                category,
                limit,
                user_id: Some(user.id),
            };
            ctx.out.emit(engine.create_budget(&draft), |b| {
                format!("Created budget {} of {} ({})", b.category, fmt.money(b.limit), b.id)
            })
        }

        BudgetCommands::List => ctx
            .out
            .emit(engine.list_budgets(user.id), |budgets| format_budget_list(budgets, fmt)),

        BudgetCommands::Edit { id, category, limit } => {
            let id = parse_id(&id)?;
            let current: Budget = ctx.out.require(engine.get_budget(user.id, id))?;
            let draft = BudgetDraft {
                category: category.unwrap_or(current.category),
                limit: limit.unwrap_or_else(|| current.limit.to_decimal()),
                user_id: Some(user.id),
            };
            ctx.out.emit(engine.update_budget(user.id, id, &draft), |b| {
                format!("Updated budget {}: limit {}", b.category, fmt.money(b.limit))
            })
        }

        BudgetCommands::Delete { id } => {
            let id = parse_id(&id)?;
            ctx.out.emit(engine.delete_budget(user.id, id), |b| {
                format!("Deleted budget {}", b.category)
            })
        }

        BudgetCommands::Status { period } => {
            let period = parse_period(period.as_deref())?;
            ctx.out
                .emit(engine.budget_statuses(user.id, period), |s| format_status_list(s, fmt))
        }

        BudgetCommands::Exceeded { period } => {
            let period = parse_period(period.as_deref())?;
            ctx.out
                .emit(engine.exceeded_budgets(user.id, period), |s| format_status_list(s, fmt))
        }

        BudgetCommands::Near { period, threshold } => {
            let period = parse_period(period.as_deref())?;
            ctx.out.emit(engine.near_limit_budgets(user.id, period, threshold), |s| {
                format_status_list(s, fmt)
            })
        }

        BudgetCommands::Alerts { period } => {
            let period = parse_period(period.as_deref())?;
            ctx.out
                .emit(engine.alerting_budgets(user.id, period), |s| format_status_list(s, fmt))
        }

        BudgetCommands::Summary { period } => {
            let period = parse_period(period.as_deref())?;
            ctx.out
                .emit(engine.budget_summary(user.id, period), |s| format_budget_summary(s, fmt))
        }
    }
}
