//! Budget status evaluation
//!
//! Bands are decided on exact cents: `spent * 100` is compared against
//! `limit * threshold`, so 80.0% is ALERT even where the float division would
//! land at 79.999...

use crate::models::{Budget, BudgetState, BudgetStatus, Money};

/// Lower bound (percent) of each band above SAFE
const CAUTION_AT: i128 = 50;
const ALERT_AT: i128 = 80;
const EXCEEDED_AT: i128 = 100;

/// Whether `spent` is at least `percent`% of `limit`
pub fn reaches(spent: Money, limit: Money, percent: u32) -> bool {
    i128::from(spent.cents()) * 100 >= i128::from(limit.cents()) * i128::from(percent)
}

pub fn state_for(spent: Money, limit: Money) -> BudgetState {
    let scaled = i128::from(spent.cents()) * 100;
    let limit = i128::from(limit.cents());
    if scaled < limit * CAUTION_AT {
        BudgetState::Safe
    } else if scaled < limit * ALERT_AT {
        BudgetState::Caution
    } else if scaled < limit * EXCEEDED_AT {
        BudgetState::Alert
    } else {
        BudgetState::Exceeded
    }
}

/// Derive the status of `budget` given what was spent against it
pub fn evaluate(budget: &Budget, spent: Money) -> BudgetStatus {
    BudgetStatus {
        budget_id: budget.id,
        category: budget.category.clone(),
        limit: budget.limit,
        spent,
        available: budget.limit - spent,
        percentage: spent.percent_of(budget.limit),
        state: state_for(spent, budget.limit),
    }
}
