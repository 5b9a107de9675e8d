//! Salary Reports Backend
//!
//! HTTP front for the salary report engine:
//! - Yearly summary and per-year job-title counts
//! - CORS for the browser dashboard
//! - Pass-through question answering ("insights")

pub mod api;
pub mod config;
pub mod insights;

pub use api::*;
pub use config::*;
