//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init, seed) and shared utilities (open_db)
//! - `report` - Report generation and dispatch
//! - `serve` - Web server command
//! - `status` - Database and backend status

pub mod core;
pub mod report;
pub mod serve;
pub mod status;

// Re-export command functions for main.rs
pub use core::*;
pub use report::*;
pub use serve::*;
pub use status::*;
