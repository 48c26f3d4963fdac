//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the
//! clap argument parsing with the [`Engine`]. Every handler goes through
//! [`Output::emit`], so `--json` prints the raw response envelope and the
//! default mode prints a table or a short confirmation.

pub mod audit;
pub mod budget;
pub mod config;
pub mod notify;
pub mod report;
pub mod transaction;
pub mod user;

pub use audit::handle_audit_command;
pub use budget::{handle_budget_command, BudgetCommands};
pub use config::{handle_config_command, ConfigCommands};
pub use notify::{handle_notify_command, NotifyCommands};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};
pub use user::{handle_user_command, UserCommands};

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use zeroize::Zeroizing;

use crate::display::DisplayFormat;
use crate::engine::Engine;
use crate::models::{BudgetPeriod, UserProfile};
use crate::response::Response;

/// How results are printed
#[derive(Debug, Clone)]
pub struct Output {
    pub json: bool,
    pub format: DisplayFormat,
}

impl Output {
    /// Print `response`, rendering its data with `render` in table mode
    ///
    /// A failed response becomes an error so the process exits non-zero.
    pub fn emit<T: Serialize>(&self, response: Response<T>, render: impl FnOnce(&T) -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        match response.into_result() {
            Ok(data) => {
                if !self.json {
                    println!("{}", render(&data));
                }
                Ok(())
            }
            Err(message) => Err(anyhow!(message)),
        }
    }

    /// Unwrap a response an operation depends on; failures are printed like
    /// [`emit`](Self::emit) would
    pub fn require<T: Serialize>(&self, response: Response<T>) -> Result<T> {
        if self.json && !response.success {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        response.into_result().map_err(|message| anyhow!(message))
    }
}

/// Everything a handler needs besides its own arguments
pub struct CliContext<'a> {
    pub engine: &'a Engine,
    pub out: Output,
    /// Username from `--user` / `AHORRA_USER`
    pub username: Option<String>,
    /// Password from `--password` / `AHORRA_PASSWORD`
    pub password: Option<Zeroizing<String>>,
}

impl<'a> CliContext<'a> {
    /// The preset password, or a hidden prompt
    pub fn password(&self, prompt: &str) -> Result<Zeroizing<String>> {
        match &self.password {
            Some(password) => Ok(password.clone()),
            None => prompt_password(prompt),
        }
    }

    /// Log in as the `--user` account
    pub fn current_user(&self) -> Result<UserProfile> {
        let Some(username) = self.username.as_deref() else {
            bail!("no user selected; pass --user or set AHORRA_USER");
        };
        let password = self.password(&format!("Password for {}: ", username))?;
        self.out.require(self.engine.login(username, &password))
    }
}

/// Prompt for a password (hidden input)
pub fn prompt_password(prompt: &str) -> Result<Zeroizing<String>> {
    rpassword::prompt_password(prompt)
        .map(Zeroizing::new)
        .context("Failed to read password")
}

/// Parse an optional period argument ("2025-01", "current", "last", "next")
pub fn parse_period(period: Option<&str>) -> Result<Option<BudgetPeriod>> {
    period
        .map(|p| BudgetPeriod::parse(p).map_err(|e| anyhow!("{}: {}", p, e)))
        .transpose()
}
