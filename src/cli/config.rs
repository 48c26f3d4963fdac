//! Configuration CLI commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use crate::config::{LedgerPaths, Settings};
use crate::response::Response;

use super::Output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show paths and settings
    Show,

    /// Change a setting: enforcement, dedup, currency or date-format
    Set { key: String, value: String },
}

#[derive(Serialize)]
struct ConfigView<'a> {
    base_dir: String,
    data_dir: String,
    audit_log: String,
    settings: &'a Settings,
}

fn render(view: &ConfigView<'_>) -> String {
    let s = view.settings;
    format!(
        "Ahorra Configuration\n\
         ====================\n\
         Base directory: {}\n\
         Data directory: {}\n\
         Audit log:      {}\n\n\
         Settings:\n  \
         Enforcement:     {}\n  \
         Deduplicate:     {}\n  \
         Currency symbol: {}\n  \
         Date format:     {}",
        view.base_dir,
        view.data_dir,
        view.audit_log,
        s.enforcement,
        s.alerts.deduplicate_per_period,
        s.currency_symbol,
        s.date_format
    )
}

/// Handle a config command; `Set` persists the file
pub fn handle_config_command(
    paths: &LedgerPaths,
    settings: &mut Settings,
    out: &Output,
    cmd: ConfigCommands,
) -> Result<()> {
    if let ConfigCommands::Set { key, value } = &cmd {
        let applied = settings.set(key, value).and_then(|()| settings.save(paths));
        if let Err(e) = applied {
            return out.emit(Response::<()>::error(e.to_string()), |_| String::new());
        }
    }

    let view = ConfigView {
        base_dir: paths.base_dir().display().to_string(),
        data_dir: paths.data_dir().display().to_string(),
        audit_log: paths.audit_log().display().to_string(),
        settings,
    };
    out.emit(Response::ok(view), render)
}
