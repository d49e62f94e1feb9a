//! Period statistics aggregation
//!
//! Pure reduction of a month's transactions into income/expense totals and a
//! per-category expense breakdown. No I/O, no failure modes.

use std::collections::BTreeMap;

use crate::models::{PeriodStatistics, Transaction, TransactionKind};

/// Aggregate a period's transactions into statistics
///
/// The caller is responsible for restricting the input to the target period.
/// Policy: expense rows with a missing or empty category count toward
/// `total_expenses` but are omitted from `by_category`.
pub fn aggregate(transactions: &[Transaction]) -> PeriodStatistics {
    let mut total_income = 0.0;
    let mut total_expenses = 0.0;
    let mut by_category: BTreeMap<String, f64> = BTreeMap::new();

    for tx in transactions {
        match tx.kind {
            TransactionKind::Income => total_income += tx.amount,
            TransactionKind::Expense => {
                total_expenses += tx.amount;
                if let Some(category) = tx.category.as_deref().filter(|c| !c.trim().is_empty()) {
                    *by_category.entry(category.to_string()).or_insert(0.0) += tx.amount;
                }
            }
        }
    }

    PeriodStatistics {
        total_income,
        total_expenses,
        by_category,
    }
}

/// Fixed demo statistics
///
/// Policy: when a month has no transactions, callers substitute this sample
/// data instead of reporting zeros, so the report flow stays demonstrable on
/// an empty database.
pub fn sample_statistics() -> PeriodStatistics {
    let by_category = [
        ("Housing", 1400.0),
        ("Food", 650.0),
        ("Transportation", 450.0),
        ("Entertainment", 320.0),
        ("Utilities", 280.0),
        ("Shopping", 400.0),
        ("Healthcare", 200.0),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    PeriodStatistics {
        total_income: 5800.0,
        total_expenses: 3700.0,
        by_category,
    }
}
