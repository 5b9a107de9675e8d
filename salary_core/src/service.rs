//! Query Service
//!
//! Thin façade over a record source and the aggregation engine. Each call
//! loads a fresh snapshot, so results always reflect the backing store's
//! current contents. Nothing is cached between calls.

use crate::engine;
use crate::source::{RecordSource, SourceError};
use crate::types::{JobTitleCount, SalaryRecord, YearParam, YearSummary};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Record source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),

    #[error("No data found for year {year}")]
    NotFound { year: YearParam },
}

/// Report queries over a shared record source
#[derive(Clone)]
pub struct ReportService {
    source: Arc<dyn RecordSource>,
}

impl ReportService {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// Job count and average salary for every year with valid records
    pub fn yearly_reports(&self) -> Result<Vec<YearSummary>, QueryError> {
        let records = self.load()?;
        let reports = engine::summarize_by_year(&records);
        log::debug!(
            "[REPORTS] Summarized {} records into {} years",
            records.len(),
            reports.len()
        );
        Ok(reports)
    }

    /// Job-title counts for one year
    pub fn job_titles_for_year(&self, year: YearParam) -> Result<Vec<JobTitleCount>, QueryError> {
        let records = self.load()?;
        let histogram = engine::job_title_histogram_for_year(&records, year);
        if histogram.is_err() {
            log::info!("[REPORTS] No records for year {}", year);
        }
        histogram
    }

    fn load(&self) -> Result<Vec<SalaryRecord>, QueryError> {
        self.source.load().map_err(|e| {
            log::error!("[REPORTS] Failed to load records from {}: {}", self.source.describe(), e);
            QueryError::from(e)
        })
    }
}
