//! Ahorra - personal income/expense ledger with per-category budgets
//!
//! The engine records transactions, derives a status for every monthly
//! category budget (SAFE, CAUTION, ALERT, EXCEEDED) and raises a notification
//! when an expense pushes a budget past 80% or 100% of its limit.
//!
//! # Architecture
//!
//! - `config`: data directory and settings
//! - `error`: error and validation types
//! - `models`: records and value types (money, periods, ids)
//! - `validation`: field checks for incoming drafts
//! - `storage`: the `LedgerStore` boundary and its JSON file implementation
//! - `audit`: append-only log of every store write
//! - `services`: aggregation, status evaluation, alerting and the services
//! - `engine`: façade answering every operation with a `Response`
//! - `cli`, `display`: the `ahorra` binary's commands and table output
//!
//! # Example
//!
//! ```rust,ignore
//! use ahorra::config::{LedgerPaths, Settings};
//! use ahorra::engine::Engine;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let engine = Engine::open(paths, settings)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod models;
pub mod response;
pub mod services;
pub mod storage;
pub mod validation;

pub use engine::Engine;
pub use error::{LedgerError, LedgerResult};
pub use response::Response;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the stderr tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise only warnings from this crate are
/// shown. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ahorra=warn"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
