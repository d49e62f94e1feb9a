//! HTTP request handlers organized by domain

pub mod accounts;
pub mod auth;
pub mod budgets;
pub mod dashboard;
pub mod reports;
pub mod transactions;

// Re-export all handlers for use in router
pub use accounts::*;
pub use auth::*;
pub use budgets::*;
pub use dashboard::*;
pub use reports::*;
pub use transactions::*;
