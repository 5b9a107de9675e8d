//! Aggregation Engine
//!
//! Pure functions over a record snapshot. Nothing here performs I/O or keeps
//! state between calls, so the same snapshot always yields the same output.

use crate::service::QueryError;
use crate::types::{JobTitleCount, SalaryRecord, YearParam, YearSummary};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default, Clone, Copy)]
struct YearTotals {
    total_jobs: u64,
    total_salary: f64,
}

/// Summarize valid records by `work_year`, ascending by year.
///
/// Records missing either `work_year` or `salary` are skipped. A salary of
/// zero still counts. Empty input yields an empty summary.
pub fn summarize_by_year(records: &[SalaryRecord]) -> Vec<YearSummary> {
    let mut totals: BTreeMap<i64, YearTotals> = BTreeMap::new();

    for record in records {
        if let (Some(year), Some(salary)) = (record.work_year, record.salary) {
            let entry = totals.entry(year).or_default();
            entry.total_jobs += 1;
            entry.total_salary += salary;
        }
    }

    // Every key exists because at least one record landed in it,
    // so total_jobs is never zero here.
    totals
        .into_iter()
        .map(|(year, t)| YearSummary {
            year,
            total_jobs: t.total_jobs,
            average_salary: (t.total_salary / t.total_jobs as f64).round() as i64,
        })
        .collect()
}

/// Count job titles among records whose `work_year` equals `year`.
///
/// Returns `QueryError::NotFound` only when no record at all matches the
/// year. Matching records with an empty or absent title are left out of the
/// counts. Titles appear in order of first occurrence.
pub fn job_title_histogram_for_year(
    records: &[SalaryRecord],
    year: YearParam,
) -> Result<Vec<JobTitleCount>, QueryError> {
    let Some(wanted) = year.as_year() else {
        return Err(QueryError::NotFound { year });
    };

    let mut matched = 0usize;
    let mut counts: Vec<JobTitleCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records.iter().filter(|r| r.work_year == Some(wanted)) {
        matched += 1;

        let Some(title) = record.title() else {
            continue;
        };

        match index.get(title) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                index.insert(title, counts.len());
                counts.push(JobTitleCount {
                    job_title: title.to_string(),
                    count: 1,
                });
            }
        }
    }

    if matched == 0 {
        return Err(QueryError::NotFound { year });
    }

    Ok(counts)
}
