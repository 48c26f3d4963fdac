//! Record validators
//!
//! Free functions that turn loosely-typed drafts (as they arrive from the
//! presentation layer) into checked values. They never touch the store and
//! report the first failing field only.

use chrono::{DateTime, NaiveDate};
use zeroize::Zeroizing;

use crate::error::ValidationError;
use crate::models::{normalize_category, Money, TransactionKind, UserId};

/// Minimum password length accepted at registration and reset
pub const MIN_PASSWORD_LEN: usize = 6;

/// Unchecked transaction fields
#[derive(Debug, Clone, Default)]
pub struct TransactionDraft {
    pub amount: f64,
    pub category: String,
    pub date: Option<String>,
    pub description: Option<String>,
    pub kind: String,
    pub user_id: Option<UserId>,
}

/// A transaction draft that passed every field check
#[derive(Debug, Clone, PartialEq)]
pub struct ValidTransaction {
    pub amount: Money,
    pub category: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub kind: TransactionKind,
    pub user_id: UserId,
}

/// Unchecked budget fields
#[derive(Debug, Clone, Default)]
pub struct BudgetDraft {
    pub category: String,
    pub limit: f64,
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidBudget {
    pub category: String,
    pub limit: Money,
    pub user_id: UserId,
}

/// Unchecked registration form
///
/// Not `Debug`, so the passwords cannot end up in a log line.
#[derive(Clone, Default)]
pub struct RegistrationDraft {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: Zeroizing<String>,
    pub confirm_password: Zeroizing<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub name: String,
    pub email: String,
    pub username: String,
}

/// Parse a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|ts| ts.date_naive())
}

/// Amount in cents within `(0, Money::MAX_AMOUNT]`
fn bounded_money(
    value: f64,
    non_positive: ValidationError,
    too_large: ValidationError,
) -> Result<Money, ValidationError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(non_positive);
    }
    match Money::from_decimal(value) {
        Some(amount) if amount > Money::MAX_AMOUNT => Err(too_large),
        Some(amount) if amount.is_positive() => Ok(amount),
        Some(_) => Err(non_positive),
        // finite, positive and past the i64 cent range
        None => Err(too_large),
    }
}

pub fn validate_transaction(draft: &TransactionDraft) -> Result<ValidTransaction, ValidationError> {
    let amount = bounded_money(
        draft.amount,
        ValidationError::NonPositiveAmount,
        ValidationError::AmountTooLarge,
    )?;

    let category = normalize_category(&draft.category);
    if category.is_empty() {
        return Err(ValidationError::MissingCategory);
    }

    let date = draft
        .date
        .as_deref()
        .and_then(parse_date)
        .ok_or(ValidationError::MissingDate)?;

    let kind: TransactionKind = draft
        .kind
        .parse()
        .map_err(|_| ValidationError::InvalidKind)?;

    let user_id = draft.user_id.ok_or(ValidationError::MissingUser)?;

    let description = draft
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    Ok(ValidTransaction {
        amount,
        category,
        date,
        description,
        kind,
        user_id,
    })
}

pub fn validate_budget(draft: &BudgetDraft) -> Result<ValidBudget, ValidationError> {
    let category = normalize_category(&draft.category);
    if category.is_empty() {
        return Err(ValidationError::MissingCategory);
    }

    let limit = bounded_money(
        draft.limit,
        ValidationError::NonPositiveLimit,
        ValidationError::LimitTooLarge,
    )?;
    let user_id = draft.user_id.ok_or(ValidationError::MissingUser)?;

    Ok(ValidBudget {
        category,
        limit,
        user_id,
    })
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
    }
    Ok(())
}

/// Password plus confirmation, as entered on reset and registration
pub fn validate_new_password(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    validate_password(password)
}

/// Profile fields shared by registration and profile edits
pub fn validate_profile(
    name: &str,
    email: &str,
    username: &str,
) -> Result<ValidRegistration, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingName);
    }

    let email = email.trim();
    if !email.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }

    let username = username.trim();
    if username.is_empty() {
        return Err(ValidationError::MissingUsername);
    }

    Ok(ValidRegistration {
        name: name.to_string(),
        email: email.to_string(),
        username: username.to_string(),
    })
}

pub fn validate_registration(
    draft: &RegistrationDraft,
) -> Result<ValidRegistration, ValidationError> {
    let valid = validate_profile(&draft.name, &draft.email, &draft.username)?;
    validate_new_password(&draft.password, &draft.confirm_password)?;
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> TransactionDraft {
        TransactionDraft {
            amount: 120.5,
            category: "  comida ".into(),
            date: Some("2025-01-15".into()),
            description: Some("mercado".into()),
            kind: "expense".into(),
            user_id: Some(UserId::new()),
        }
    }

    #[test]
    fn test_valid_transaction() {
        let valid = validate_transaction(&draft()).unwrap();
        assert_eq!(valid.amount, Money::from_cents(12050));
        assert_eq!(valid.category, "Comida");
        assert_eq!(valid.date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(valid.kind, TransactionKind::Expense);
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        for amount in [0.0, -5.0, 0.001, f64::NAN, f64::INFINITY] {
            let d = TransactionDraft { amount, ..draft() };
            assert_eq!(
                validate_transaction(&d),
                Err(ValidationError::NonPositiveAmount),
                "amount {amount}"
            );
        }
    }

    #[test]
    fn test_amount_ceiling() {
        let at_max = TransactionDraft { amount: 1_000_000_000.0, ..draft() };
        assert_eq!(validate_transaction(&at_max).unwrap().amount, Money::MAX_AMOUNT);

        for amount in [1_000_000_000.01, 5e16, 1e300] {
            let d = TransactionDraft { amount, ..draft() };
            assert_eq!(
                validate_transaction(&d),
                Err(ValidationError::AmountTooLarge),
                "amount {amount}"
            );
        }

        let err = validate_budget(&BudgetDraft {
            category: "Ocio".into(),
            limit: 5e16,
            user_id: Some(UserId::new()),
        });
        assert_eq!(err, Err(ValidationError::LimitTooLarge));
    }

    #[test]
    fn test_first_failure_wins() {
        let d = TransactionDraft {
            amount: -1.0,
            category: "   ".into(),
            date: None,
            kind: "gift".into(),
            user_id: None,
            ..draft()
        };
        assert_eq!(
            validate_transaction(&d),
            Err(ValidationError::NonPositiveAmount)
        );

        let d = TransactionDraft {
            category: "   ".into(),
            date: None,
            ..draft()
        };
        assert_eq!(validate_transaction(&d), Err(ValidationError::MissingCategory));
    }

    #[test]
    fn test_date_checks() {
        let d = TransactionDraft { date: None, ..draft() };
        assert_eq!(validate_transaction(&d), Err(ValidationError::MissingDate));

        let d = TransactionDraft {
            date: Some("15/01/2025".into()),
            ..draft()
        };
        assert_eq!(validate_transaction(&d), Err(ValidationError::MissingDate));

        let d = TransactionDraft {
            date: Some("2025-01-15T23:10:00-03:00".into()),
            ..draft()
        };
        assert_eq!(
            validate_transaction(&d).unwrap().date,
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_kind_and_user_checks() {
        let d = TransactionDraft {
            kind: "Expense".into(),
            ..draft()
        };
        assert_eq!(validate_transaction(&d), Err(ValidationError::InvalidKind));

        let d = TransactionDraft {
            user_id: None,
            ..draft()
        };
        assert_eq!(validate_transaction(&d), Err(ValidationError::MissingUser));
    }

    #[test]
    fn test_budget_validation() {
        let user = Some(UserId::new());
        let ok = validate_budget(&BudgetDraft {
            category: "ocio".into(),
            limit: 200.0,
            user_id: user,
        })
        .unwrap();
        assert_eq!(ok.category, "Ocio");
        assert_eq!(ok.limit, Money::from_cents(20000));

        let err = validate_budget(&BudgetDraft {
            category: "".into(),
            limit: 0.0,
            user_id: None,
        });
        assert_eq!(err, Err(ValidationError::MissingCategory));

        let err = validate_budget(&BudgetDraft {
            category: "Ocio".into(),
            limit: 0.0,
            user_id: user,
        });
        assert_eq!(err, Err(ValidationError::NonPositiveLimit));

        let err = validate_budget(&BudgetDraft {
            category: "Ocio".into(),
            limit: 10.0,
            user_id: None,
        });
        assert_eq!(err, Err(ValidationError::MissingUser));
    }

    #[test]
    fn test_registration_validation() {
        let mut reg = RegistrationDraft {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            username: "ana".into(),
            password: Zeroizing::new("secreto".into()),
            confirm_password: Zeroizing::new("secreto".into()),
        };
        assert!(validate_registration(&reg).is_ok());

        reg.confirm_password = Zeroizing::new("otro".into());
        assert_eq!(
            validate_registration(&reg),
            Err(ValidationError::PasswordMismatch)
        );

        reg.password = Zeroizing::new("abc".into());
        reg.confirm_password = Zeroizing::new("abc".into());
        assert_eq!(
            validate_registration(&reg),
            Err(ValidationError::PasswordTooShort(6))
        );

        reg.email = "ana.example.com".into();
        assert_eq!(validate_registration(&reg), Err(ValidationError::InvalidEmail));
    }
}
