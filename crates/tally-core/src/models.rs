//! Domain models for Tally

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An application user
///
/// Identity is delegated to an external provider; `external_id` is the opaque
/// identifier that provider hands us on each request. The email address may be
/// absent when the provider has no verified address on file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    /// Identifier assigned by the external identity provider
    pub external_id: String,
    pub name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A financial account owned by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    /// The account shown by default on the dashboard and used for budgets
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// Transaction kind: money in or money out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction, immutable once persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    pub kind: TransactionKind,
    /// Category label; expenses may legitimately carry none
    pub category: Option<String>,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A transaction to be inserted
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub category: Option<String>,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: Option<String>,
}

/// A monthly spending budget attached to an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub account_id: i64,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

/// Budget usage for the current calendar month
#[derive(Debug, Clone, Serialize)]
pub struct BudgetStatus {
    pub budget: Budget,
    /// Expenses against the budgeted account so far this month
    pub current_expenses: f64,
}

/// Aggregated income/expense totals for one calendar month
///
/// Derived value, recomputed per request, never persisted. Serialized with
/// camelCase keys to match the dashboard's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStatistics {
    pub total_income: f64,
    pub total_expenses: f64,
    /// Summed expense amounts keyed by category label. Expenses without a
    /// category contribute to `total_expenses` but are omitted here.
    pub by_category: BTreeMap<String, f64>,
}

impl PeriodStatistics {
    pub fn net_income(&self) -> f64 {
        self.total_income - self.total_expenses
    }
}

/// Everything needed to render a financial report
///
/// Constructed per request and consumed once, either by the JSON serializer
/// or by the mail dispatcher.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPayload {
    pub user_name: String,
    /// Month label, e.g. "August"
    pub month: String,
    pub stats: PeriodStatistics,
    /// Natural-language insights, three by convention
    pub insights: Vec<String>,
}
