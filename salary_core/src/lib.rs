//! Salary Core
//!
//! Loads salary records from a pluggable source and aggregates them:
//! - Record sources: literal, JSON file, spreadsheet workbook
//! - Aggregation engine: yearly summary and per-year job-title histogram
//! - Report service: façade used by the HTTP layer

mod builtin;
pub mod engine;
pub mod service;
pub mod source;
pub mod types;

pub use engine::{job_title_histogram_for_year, summarize_by_year};
pub use service::{QueryError, ReportService};
pub use source::{
    JsonFileSource, LiteralSource, RecordSource, SourceConfig, SourceError, SpreadsheetSource,
};
pub use types::{JobTitleCount, SalaryRecord, YearParam, YearSummary};

