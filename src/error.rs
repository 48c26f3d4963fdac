//! Custom error types for Ahorra
//!
//! This module defines the error hierarchy for the engine using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::models::Money;

/// Field-level validation failures
///
/// The display strings are the short, user-facing reasons reported back to
/// the presentation layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error("amount must not exceed {}", Money::MAX_AMOUNT)]
    AmountTooLarge,

    #[error("category required")]
    MissingCategory,

    #[error("date required")]
    MissingDate,

    #[error("invalid kind")]
    InvalidKind,

    #[error("missing user")]
    MissingUser,

    #[error("limit must be positive")]
    NonPositiveLimit,

    #[error("limit must not exceed {}", Money::MAX_AMOUNT)]
    LimitTooLarge,

    #[error("name required")]
    MissingName,

    #[error("email must be valid")]
    InvalidEmail,

    #[error("username required")]
    MissingUsername,

    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("passwords do not match")]
    PasswordMismatch,
}

/// Coarse classification of a [`LedgerError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Auth,
    Store,
}

/// The main error type for Ahorra operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for candidate records
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Strict enforcement rejected an expense
    #[error("budget exceeded for '{category}': limit {limit}, would reach {prospective}")]
    BudgetExceeded {
        category: String,
        limit: Money,
        prospective: Money,
    },

    /// Bad username/password pair
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Password hashing errors
    #[error("Credential error: {0}")]
    Credential(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// A total over stored rows left the representable cent range
    #[error("Amount overflow: {0}")]
    Overflow(String),
}

impl LedgerError {
    /// Create a "not found" error for users
    pub fn user_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "User",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for notifications
    pub fn notification_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Notification",
            identifier: identifier.into(),
        }
    }

    pub fn overflow(context: impl Into<String>) -> Self {
        Self::Overflow(context.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Duplicate { .. } | Self::BudgetExceeded { .. } => ErrorKind::Conflict,
            Self::InvalidCredentials => ErrorKind::Auth,
            Self::Config(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Credential(_)
            | Self::Storage(_)
            | Self::Overflow(_) => ErrorKind::Store,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a conflict (duplicate or strict-mode overage)
    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }

    /// Short message safe to show to an end user.
    ///
    /// Store failures carry paths and OS details; those stay in the logs.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Store => "could not access ledger storage".to_string(),
            _ => self.to_string(),
        }
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Ahorra operations
pub type LedgerResult<T> = Result<T, LedgerError>;
