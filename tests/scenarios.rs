//! End-to-end ledger scenarios through the engine façade

mod common;

use std::sync::Arc;
use std::thread;

use tempfile::TempDir;

use ahorra::config::EnforcementMode;
use ahorra::models::{BudgetPeriod, BudgetState, Money, Severity, Transaction, TransactionKind};
use ahorra::services::TransactionFilter;
use ahorra::Engine;

use common::{add_user, budget, engine, expense, open_storage, settings, FailingNotifications};

fn january() -> Option<BudgetPeriod> {
    BudgetPeriod::monthly(2025, 1)
}

#[test]
fn scenario_a_half_spent_is_caution() {
    let (engine, user, _dir) = engine(EnforcementMode::Advisory);
    assert!(engine.create_budget(&budget(user, "Comida", 400.0)).success);

    let write = engine.create_transaction(&expense(user, 200.0, " comida ")).into_result().unwrap();
    assert_eq!(write.transaction.category, "Comida");
    assert!(write.notification.is_none());

    let statuses = engine.budget_statuses(user, january()).into_result().unwrap();
    assert_eq!(statuses.len(), 1);
    let status = &statuses[0];
    assert_eq!(status.spent, Money::from_cents(20000));
    assert_eq!(status.percentage, 50.0);
    assert_eq!(status.state, BudgetState::Caution);
}

#[test]
fn scenario_b_and_c_warning_then_danger() {
    let (engine, user, _dir) = engine(EnforcementMode::Advisory);
    engine.create_budget(&budget(user, "Comida", 400.0));
    engine.create_transaction(&expense(user, 200.0, "comida"));

    // B: $350 of $400
    let write = engine.create_transaction(&expense(user, 150.0, "Comida")).into_result().unwrap();
    let status = write.status.unwrap();
    assert_eq!(status.percentage, 87.5);
    assert_eq!(status.state, BudgetState::Alert);
    let warning = write.notification.unwrap();
    assert_eq!(warning.severity, Severity::Warning);

    // C: $410 of $400
    let write = engine.create_transaction(&expense(user, 60.0, "COMIDA")).into_result().unwrap();
    let status = write.status.unwrap();
    assert_eq!(status.percentage, 102.5);
    assert_eq!(status.state, BudgetState::Exceeded);
    assert_eq!(status.available, Money::from_cents(-1000));
    let danger = write.notification.unwrap();
    assert_eq!(danger.severity, Severity::Danger);
    assert!(danger.message.contains("$10.00"));

    let inbox = engine.list_notifications(user, true).into_result().unwrap();
    assert_eq!(inbox.len(), 2);
    assert_eq!(inbox[0].severity, Severity::Danger);
}

#[test]
fn scenario_d_strict_rejects_before_persisting() {
    let (engine, user, _dir) = engine(EnforcementMode::Strict);
    engine.create_budget(&budget(user, "Comida", 400.0));

    let response = engine.create_transaction(&expense(user, 1000.0, "Comida"));
    assert!(!response.success);
    assert!(response.error.unwrap().contains("budget exceeded"));

    let txns = engine
        .list_transactions(user, &TransactionFilter::new())
        .into_result()
        .unwrap();
    assert!(txns.is_empty());
    assert!(engine.list_notifications(user, false).into_result().unwrap().is_empty());
}

#[test]
fn advisory_mode_records_overspending() {
    let (engine, user, _dir) = engine(EnforcementMode::Advisory);
    engine.create_budget(&budget(user, "Comida", 400.0));

    let write = engine.create_transaction(&expense(user, 1000.0, "Comida")).into_result().unwrap();
    assert_eq!(write.status.unwrap().state, BudgetState::Exceeded);
    assert_eq!(write.notification.unwrap().severity, Severity::Danger);
}

#[test]
fn sequential_writes_accumulate_in_either_order() {
    for amounts in [[150.0, 150.0], [100.0, 200.0], [200.0, 100.0]] {
        let (engine, user, _dir) = engine(EnforcementMode::Advisory);
        engine.create_budget(&budget(user, "Ocio", 200.0));
        for amount in amounts {
            assert!(engine.create_transaction(&expense(user, amount, "ocio")).success);
        }
        let summary = engine.budget_summary(user, january()).into_result().unwrap();
        assert_eq!(summary.total_spent, Money::from_cents(30000));
    }
}

#[test]
fn concurrent_writes_lose_nothing() {
    let (engine, user, _dir) = engine(EnforcementMode::Advisory);
    engine.create_budget(&budget(user, "Ocio", 200.0));

    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..5 {
                    assert!(engine.create_transaction(&expense(user, 10.0, "Ocio")).success);
                }
            });
        }
    });

    let statuses = engine.budget_statuses(user, january()).into_result().unwrap();
    assert_eq!(statuses[0].spent, Money::from_cents(40000));
    let txns = engine.list_transactions(user, &TransactionFilter::new()).into_result().unwrap();
    assert_eq!(txns.len(), 40);
}

#[test]
fn strict_racing_writes_admit_exactly_one() {
    let (engine, user, _dir) = engine(EnforcementMode::Strict);
    engine.create_budget(&budget(user, "Ocio", 200.0));

    let results: Vec<bool> = thread::scope(|s| {
        let handles: Vec<_> = (0..2)
            .map(|_| s.spawn(|| engine.create_transaction(&expense(user, 150.0, "Ocio")).success))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|ok| **ok).count(), 1);
    let statuses = engine.budget_statuses(user, january()).into_result().unwrap();
    assert_eq!(statuses[0].spent, Money::from_cents(15000));
}

#[test]
fn failed_alert_does_not_undo_the_write() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FailingNotifications {
        inner: open_storage(&dir),
    });
    let user = add_user(store.as_ref(), "ana");
    let engine = Engine::new(store, settings(EnforcementMode::Advisory));
    engine.create_budget(&budget(user, "Comida", 100.0));

    let write = engine.create_transaction(&expense(user, 500.0, "Comida")).into_result().unwrap();
    assert!(write.notification.is_none());
    assert_eq!(write.status.unwrap().state, BudgetState::Exceeded);

    let txns = engine.list_transactions(user, &TransactionFilter::new()).into_result().unwrap();
    assert_eq!(txns.len(), 1);
}

#[test]
fn store_failures_are_reported_generically() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FailingNotifications {
        inner: open_storage(&dir),
    });
    let user = add_user(store.as_ref(), "ana");
    let engine = Engine::new(store, settings(EnforcementMode::Advisory));

    // Inserting through the store directly surfaces the raw error
    let raw = engine
        .store()
        .insert_notification(&ahorra::models::Notification::new(user, Severity::Info, "t", "m"))
        .unwrap_err();
    assert!(raw.to_string().contains("notification table unavailable"));
    assert_eq!(
        ahorra::Response::<()>::failure(&raw).error.as_deref(),
        Some("could not access ledger storage")
    );
}

#[test]
fn edits_move_spending_between_months() {
    let (engine, user, _dir) = engine(EnforcementMode::Advisory);
    engine.create_budget(&budget(user, "Comida", 400.0));
    let write = engine.create_transaction(&expense(user, 350.0, "Comida")).into_result().unwrap();

    let mut moved = expense(user, 350.0, "Comida");
    moved.date = Some("2025-02-01".to_string());
    let edited = engine
        .update_transaction(user, write.transaction.id, &moved)
        .into_result()
        .unwrap();
    assert_eq!(edited.transaction.id, write.transaction.id);

    let jan = engine.budget_statuses(user, january()).into_result().unwrap();
    assert_eq!(jan[0].spent, Money::zero());
    let feb = engine.budget_statuses(user, BudgetPeriod::monthly(2025, 2)).into_result().unwrap();
    assert_eq!(feb[0].spent, Money::from_cents(35000));
}

#[test]
fn users_only_see_their_own_ledger() {
    let (engine, ana, _dir) = engine(EnforcementMode::Advisory);
    let beto = add_user(engine.store(), "beto");
    let write = engine.create_transaction(&expense(ana, 10.0, "Comida")).into_result().unwrap();

    let response = engine.delete_transaction(beto, write.transaction.id);
    assert!(!response.success);
    assert!(engine
        .list_transactions(beto, &TransactionFilter::new())
        .into_result()
        .unwrap()
        .is_empty());
}

#[test]
fn deduplication_suppresses_repeat_alerts() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(open_storage(&dir));
    let user = add_user(store.as_ref(), "ana");
    let mut config = settings(EnforcementMode::Advisory);
    config.alerts.deduplicate_per_period = true;
    let engine = Engine::new(store, config);
    engine.create_budget(&budget(user, "Comida", 100.0));

    assert!(engine.create_transaction(&expense(user, 85.0, "Comida")).into_result().unwrap().notification.is_some());
    assert!(engine.create_transaction(&expense(user, 1.0, "Comida")).into_result().unwrap().notification.is_none());
    // Crossing into EXCEEDED is a different severity
    assert!(engine.create_transaction(&expense(user, 20.0, "Comida")).into_result().unwrap().notification.is_some());
    assert_eq!(engine.list_notifications(user, false).into_result().unwrap().len(), 2);
}

#[test]
fn oversized_expenses_are_rejected_up_front() {
    let (engine, user, _dir) = engine(EnforcementMode::Advisory);
    engine.create_budget(&budget(user, "Comida", 400.0));

    for _ in 0..2 {
        let response = engine.create_transaction(&expense(user, 5e16, "Comida"));
        assert!(!response.success);
        assert_eq!(
            response.error.as_deref(),
            Some("amount must not exceed $1000000000.00")
        );
    }
    assert!(!engine.create_budget(&budget(user, "Ocio", 5e16)).success);

    // Two expenses at the ceiling still aggregate exactly
    for _ in 0..2 {
        assert!(engine.create_transaction(&expense(user, 1_000_000_000.0, "Comida")).success);
    }
    let statuses = engine.budget_statuses(user, january()).into_result().unwrap();
    assert_eq!(statuses[0].spent, Money::from_cents(200_000_000_000));
    assert_eq!(statuses[0].state, BudgetState::Exceeded);
}

#[test]
fn out_of_range_totals_fail_without_panicking() {
    let (engine, user, _dir) = engine(EnforcementMode::Advisory);
    engine.create_budget(&budget(user, "Comida", 400.0));

    // Rows past the per-row ceiling can only come from an edited data file
    let huge = Money::from_cents(i64::MAX / 2 + 1);
    let jan = chrono::NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
    for _ in 0..2 {
        let row = Transaction::new(user, TransactionKind::Expense, huge, "Comida", jan);
        engine.store().insert_transaction(&row).unwrap();
    }

    let response = engine.budget_statuses(user, january());
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("could not access ledger storage"));
    assert!(!engine.budget_summary(user, january()).success);
    assert!(!engine.totals_by_category(user, None).success);

    // The write itself still lands; only the follow-up status is missing
    let write = engine.create_transaction(&expense(user, 1.0, "Comida")).into_result().unwrap();
    assert!(write.status.is_none());
    assert!(write.notification.is_none());
}
