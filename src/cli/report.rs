//! CLI commands for reports

use anyhow::Result;
use clap::Subcommand;

use crate::display::{format_group_totals, format_period_summary};

use super::{parse_period, CliContext};

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Income, expenses and balance for a month
    Summary {
        /// Month ("2025-01", "current", "last"), defaults to the current month
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Totals per category
    Categories {
        /// Restrict to one month
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Totals per month, newest first
    Months,
}

/// Handle a report command
pub fn handle_report_command(ctx: &CliContext<'_>, cmd: ReportCommands) -> Result<()> {
    let user = ctx.current_user()?;
    let engine = ctx.engine;
    let fmt = &ctx.out.format;

    match cmd {
        ReportCommands::Summary { period } => {
            let period = parse_period(period.as_deref())?;
            ctx.out
                .emit(engine.period_summary(user.id, period), |s| format_period_summary(s, fmt))
        }
        ReportCommands::Categories { period } => {
            let period = parse_period(period.as_deref())?;
            ctx.out
                .emit(engine.totals_by_category(user.id, period), |g| format_group_totals(g, fmt))
        }
        ReportCommands::Months => ctx
            .out
            .emit(engine.totals_by_month(user.id), |g| format_group_totals(g, fmt)),
    }
}
