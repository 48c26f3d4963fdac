use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use zeroize::Zeroizing;

use ahorra::audit::AuditLogger;
use ahorra::cli::{
    handle_audit_command, handle_budget_command, handle_config_command, handle_notify_command,
    handle_report_command, handle_transaction_command, handle_user_command, CliContext, Output,
};
use ahorra::config::{EnforcementMode, LedgerPaths, Settings};
use ahorra::display::DisplayFormat;
use ahorra::Engine;

#[derive(Parser)]
#[command(
    name = "ahorra",
    version,
    about = "Personal income/expense ledger with per-category budgets",
    long_about = "Ahorra records income and expenses, tracks monthly budgets per \
                  category and raises alerts when spending reaches 80% or 100% \
                  of a budget."
)]
struct Cli {
    /// Print the raw JSON response envelope
    #[arg(long, global = true)]
    json: bool,

    /// Account to act as
    #[arg(long, global = true, env = "AHORRA_USER")]
    user: Option<String>,

    /// Password for --user (prompted when omitted)
    #[arg(long, global = true, env = "AHORRA_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Override the enforcement mode from the settings file
    #[arg(long, global = true, env = "AHORRA_ENFORCEMENT")]
    enforcement: Option<EnforcementMode>,

    /// Base directory for settings and data (defaults to AHORRA_DATA_DIR or
    /// the platform config directory)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and settings file
    Init,

    /// Show or change configuration
    #[command(subcommand)]
    Config(ahorra::cli::ConfigCommands),

    /// Account commands
    #[command(subcommand)]
    User(ahorra::cli::UserCommands),

    /// Transaction commands
    #[command(subcommand, alias = "transaction")]
    Txn(ahorra::cli::TransactionCommands),

    /// Budget commands
    #[command(subcommand)]
    Budget(ahorra::cli::BudgetCommands),

    /// Notification commands
    #[command(subcommand, alias = "notifications")]
    Notify(ahorra::cli::NotifyCommands),

    /// Reports
    #[command(subcommand)]
    Report(ahorra::cli::ReportCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        count: usize,
    },
}

fn main() -> Result<()> {
    ahorra::init_tracing();
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => LedgerPaths::with_base_dir(dir),
        None => LedgerPaths::new()?,
    };
    let mut settings = Settings::load_or_create(&paths)?;
    let out = Output {
        json: cli.json,
        format: DisplayFormat::from(&settings),
    };

    let Some(command) = cli.command else {
        println!("Ahorra - income/expense ledger with budgets");
        println!();
        println!("Run 'ahorra --help' for usage information.");
        println!("Run 'ahorra init' to set up a new ledger.");
        return Ok(());
    };

    match command {
        Commands::Init => {
            paths.ensure_directories()?;
            if !paths.settings_file().exists() {
                settings.save(&paths)?;
            }
            println!("Initialized Ahorra at: {}", paths.base_dir().display());
            println!("Run 'ahorra user register --name <NAME> --email <EMAIL> --user <USERNAME>' to create an account.");
            Ok(())
        }
        Commands::Config(cmd) => handle_config_command(&paths, &mut settings, &out, cmd),
        Commands::Audit { count } => {
            handle_audit_command(&AuditLogger::new(paths.audit_log()), &out, count)
        }
        command => {
            if let Some(mode) = cli.enforcement {
                settings.enforcement = mode;
            }
            let engine = Engine::open(paths, settings)?;
            let ctx = CliContext {
                engine: &engine,
                out,
                username: cli.user,
                password: cli.password.map(Zeroizing::new),
            };
            match command {
                Commands::User(cmd) => handle_user_command(&ctx, cmd),
                Commands::Txn(cmd) => handle_transaction_command(&ctx, cmd),
                Commands::Budget(cmd) => handle_budget_command(&ctx, cmd),
                Commands::Notify(cmd) => handle_notify_command(&ctx, cmd),
                Commands::Report(cmd) => handle_report_command(&ctx, cmd),
                Commands::Init | Commands::Config(_) | Commands::Audit { .. } => Ok(()),
            }
        }
    }
}
