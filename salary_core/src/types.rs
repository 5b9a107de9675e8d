//! Salary Report Types
//!
//! Raw salary records as they come out of a record source, and the
//! derived views computed from them.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================
// RAW RECORDS
// ============================================================

/// One employment-salary observation
///
/// Every field is optional because backing stores routinely carry gaps.
/// Which fields must be present depends on the view being computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryRecord {
    #[serde(default)]
    pub work_year: Option<i64>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub salary: Option<f64>,
}

impl SalaryRecord {
    pub fn new(work_year: i64, job_title: &str, salary: f64) -> Self {
        Self {
            work_year: Some(work_year),
            job_title: Some(job_title.to_string()),
            salary: Some(salary),
        }
    }

    /// Eligible for the yearly summary (year and salary both present)
    pub fn is_valid(&self) -> bool {
        self.work_year.is_some() && self.salary.is_some()
    }

    /// Non-empty job title, if any
    pub fn title(&self) -> Option<&str> {
        self.job_title.as_deref().filter(|t| !t.is_empty())
    }
}

// ============================================================
// DERIVED VIEWS
// ============================================================

/// Per-year job count and average salary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    pub year: i64,
    pub total_jobs: u64,
    pub average_salary: i64,
}

/// Occurrences of one job title within a single year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTitleCount {
    pub job_title: String,
    pub count: u64,
}

// ============================================================
// YEAR PARAMETER
// ============================================================

/// A year as requested by a caller
///
/// `Invalid` is the sentinel for input that holds no leading integer.
/// It never matches a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YearParam {
    Year(i64),
    Invalid,
}

impl YearParam {
    /// Parse a leading base-10 integer, ignoring anything after the digits.
    ///
    /// `"2023"` and `" 2023abc"` both give `Year(2023)`; `"abc"` gives `Invalid`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim_start();
        let (negative, rest) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let digit_len = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
        if digit_len == 0 {
            return YearParam::Invalid;
        }

        match rest[..digit_len].parse::<i64>() {
            Ok(value) if negative => YearParam::Year(-value),
            Ok(value) => YearParam::Year(value),
            Err(_) => YearParam::Invalid,
        }
    }

    pub fn as_year(&self) -> Option<i64> {
        match self {
            YearParam::Year(year) => Some(*year),
            YearParam::Invalid => None,
        }
    }
}

impl From<i64> for YearParam {
    fn from(year: i64) -> Self {
        YearParam::Year(year)
    }
}

impl fmt::Display for YearParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearParam::Year(year) => write!(f, "{}", year),
            YearParam::Invalid => write!(f, "NaN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_param_plain() {
        assert_eq!(YearParam::parse("2023"), YearParam::Year(2023));
        assert_eq!(YearParam::parse("-12"), YearParam::Year(-12));
        assert_eq!(YearParam::parse("+7"), YearParam::Year(7));
    }

    #[test]
    fn test_year_param_leading_digits_only() {
        assert_eq!(YearParam::parse("  2021abc"), YearParam::Year(2021));
        assert_eq!(YearParam::parse("2022.9"), YearParam::Year(2022));
    }

    #[test]
    fn test_year_param_invalid() {
        assert_eq!(YearParam::parse("abc"), YearParam::Invalid);
        assert_eq!(YearParam::parse(""), YearParam::Invalid);
        assert_eq!(YearParam::parse("-"), YearParam::Invalid);
        assert_eq!(YearParam::parse("99999999999999999999"), YearParam::Invalid);
        assert_eq!(YearParam::Invalid.to_string(), "NaN");
        assert_eq!(YearParam::Invalid.as_year(), None);
    }

    #[test]
    fn test_record_json_with_gaps() {
        let json = r#"[
            {"work_year": 2023, "job_title": "Data Scientist", "salary": 150000},
            {"work_year": 2023, "job_title": null},
            {"salary": 90000.5}
        ]"#;

        let records: Vec<SalaryRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].is_valid());
        assert!(!records[1].is_valid());
        assert_eq!(records[1].title(), None);
        assert_eq!(records[2].work_year, None);
        assert_eq!(records[2].salary, Some(90000.5));
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = YearSummary {
            year: 2023,
            total_jobs: 3,
            average_salary: 123333,
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"year": 2023, "totalJobs": 3, "averageSalary": 123333})
        );
    }

    #[test]
    fn test_empty_title_is_no_title() {
        let record = SalaryRecord {
            work_year: Some(2022),
            job_title: Some(String::new()),
            salary: Some(1.0),
        };
        assert_eq!(record.title(), None);
    }
}
