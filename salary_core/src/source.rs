//! Record Sources
//!
//! A record source hands out a full snapshot of salary records on every
//! `load()`. Three backings are provided: an in-process literal set, a JSON
//! file, and a spreadsheet workbook. Which one is used is decided by
//! [`SourceConfig`], never by inspecting the source at runtime.

use crate::builtin::builtin_records;
use crate::types::SalaryRecord;
use calamine::{open_workbook_auto, Data, Reader};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Failure to produce a snapshot. Every variant means the source is unavailable.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record file {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to open workbook {}: {}", .path.display(), .message)]
    Workbook { path: PathBuf, message: String },

    #[error("Workbook {} has no sheets", .path.display())]
    NoSheet { path: PathBuf },
}

/// Anything that can produce a record snapshot
pub trait RecordSource: Send + Sync {
    /// Load the complete record set. No partial results.
    fn load(&self) -> Result<Vec<SalaryRecord>, SourceError>;

    /// Short human-readable label for log lines
    fn describe(&self) -> String;
}

// ============================================================
// LITERAL SOURCE
// ============================================================

/// Records held in process memory
#[derive(Debug, Clone, Default)]
pub struct LiteralSource {
    records: Vec<SalaryRecord>,
}

impl LiteralSource {
    pub fn new(records: Vec<SalaryRecord>) -> Self {
        Self { records }
    }

    /// The bundled sample dataset
    pub fn builtin() -> Self {
        Self::new(builtin_records())
    }
}

impl RecordSource for LiteralSource {
    fn load(&self) -> Result<Vec<SalaryRecord>, SourceError> {
        // Callers own the returned copy; the canonical set is never handed out.
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("literal ({} records)", self.records.len())
    }
}

// ============================================================
// JSON FILE SOURCE
// ============================================================

/// A JSON file holding an array of `{ work_year, job_title, salary }` objects.
/// Re-read on every load.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for JsonFileSource {
    fn load(&self) -> Result<Vec<SalaryRecord>, SourceError> {
        let file = File::open(&self.path).map_err(|source| SourceError::Read {
            path: self.path.clone(),
            source,
        })?;
        let reader = BufReader::new(file);
        let records: Vec<SalaryRecord> =
            serde_json::from_reader(reader).map_err(|source| SourceError::Parse {
                path: self.path.clone(),
                source,
            })?;

        log::debug!("[SOURCE] Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }
}

// ============================================================
// SPREADSHEET SOURCE
// ============================================================

const COL_WORK_YEAR: &str = "work_year";
const COL_JOB_TITLE: &str = "job_title";
const COL_SALARY: &str = "salary";

/// First sheet of a workbook (xlsx, xlsm, xls, ods), header row naming the
/// `work_year`, `job_title` and `salary` columns. Re-read on every load.
#[derive(Debug, Clone)]
pub struct SpreadsheetSource {
    path: PathBuf,
}

/// Column positions resolved from the header row
#[derive(Debug, Default)]
struct ColumnMap {
    work_year: Option<usize>,
    job_title: Option<usize>,
    salary: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &[Data]) -> Self {
        let mut map = ColumnMap::default();
        for (idx, cell) in header.iter().enumerate() {
            let Data::String(name) = cell else {
                continue;
            };
            // First occurrence wins when a header repeats.
            match name.trim() {
                COL_WORK_YEAR if map.work_year.is_none() => map.work_year = Some(idx),
                COL_JOB_TITLE if map.job_title.is_none() => map.job_title = Some(idx),
                COL_SALARY if map.salary.is_none() => map.salary = Some(idx),
                _ => {}
            }
        }
        map
    }

    fn record(&self, row: &[Data]) -> SalaryRecord {
        let cell = |col: Option<usize>| col.and_then(|idx| row.get(idx));
        SalaryRecord {
            work_year: cell(self.work_year).and_then(cell_to_year),
            job_title: cell(self.job_title).and_then(cell_to_text),
            salary: cell(self.salary).and_then(cell_to_number),
        }
    }
}

fn cell_to_year(cell: &Data) -> Option<i64> {
    match cell {
        Data::Int(value) => Some(*value),
        Data::Float(value) if value.is_finite() && value.fract() == 0.0 => Some(*value as i64),
        Data::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn cell_to_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(value) => Some(*value as f64),
        Data::Float(value) => Some(*value),
        Data::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn cell_to_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(text) if !text.is_empty() => Some(text.clone()),
        Data::Int(value) => Some(value.to_string()),
        Data::Float(value) if value.fract() == 0.0 => Some(format!("{}", *value as i64)),
        Data::Float(value) => Some(value.to_string()),
        _ => None,
    }
}

fn is_blank(row: &[Data]) -> bool {
    row.iter().all(|cell| match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    })
}

impl SpreadsheetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn workbook_error(&self, err: impl std::fmt::Display) -> SourceError {
        SourceError::Workbook {
            path: self.path.clone(),
            message: err.to_string(),
        }
    }
}

impl RecordSource for SpreadsheetSource {
    fn load(&self) -> Result<Vec<SalaryRecord>, SourceError> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| self.workbook_error(e))?;

        let range = match workbook.worksheet_range_at(0) {
            Some(Ok(range)) => range,
            Some(Err(e)) => return Err(self.workbook_error(e)),
            None => {
                return Err(SourceError::NoSheet {
                    path: self.path.clone(),
                })
            }
        };

        let mut rows = range.rows().skip_while(|row| is_blank(row));
        let Some(header) = rows.next() else {
            // A sheet with nothing on it holds no records.
            return Ok(Vec::new());
        };

        let columns = ColumnMap::from_header(header);
        let records: Vec<SalaryRecord> = rows
            .filter(|row| !is_blank(row))
            .map(|row| columns.record(row))
            .collect();

        log::debug!("[SOURCE] Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("spreadsheet {}", self.path.display())
    }
}

// ============================================================
// SOURCE SELECTION
// ============================================================

/// Which backing store to read records from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SourceConfig {
    #[default]
    Literal,
    JsonFile(PathBuf),
    Spreadsheet(PathBuf),
}

impl SourceConfig {
    pub fn build(&self) -> Arc<dyn RecordSource> {
        match self {
            SourceConfig::Literal => Arc::new(LiteralSource::builtin()),
            SourceConfig::JsonFile(path) => Arc::new(JsonFileSource::new(path.clone())),
            SourceConfig::Spreadsheet(path) => Arc::new(SpreadsheetSource::new(path.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn save_workbook(dir: &Path, mut workbook: Workbook) -> PathBuf {
        let path = dir.join("sheet.xlsx");
        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn test_literal_source_returns_independent_copies() {
        let source = LiteralSource::new(vec![SalaryRecord::new(2023, "Engineer", 100.0)]);

        let mut first = source.load().unwrap();
        first[0].salary = Some(0.0);
        first.push(SalaryRecord::default());

        let second = source.load().unwrap();
        assert_eq!(second, vec![SalaryRecord::new(2023, "Engineer", 100.0)]);
    }

    #[test]
    fn test_builtin_source_not_empty() {
        let records = LiteralSource::builtin().load().unwrap();
        assert!(!records.is_empty());
        assert!(records.iter().all(|r| r.is_valid()));
    }

    #[test]
    fn test_json_source_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"work_year": 2022, "job_title": "Analyst", "salary": 60000}},
                {{"work_year": 2022}}]"#
        )
        .unwrap();

        let records = JsonFileSource::new(file.path()).load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], SalaryRecord::new(2022, "Analyst", 60000.0));
        assert_eq!(records[1].salary, None);
    }

    #[test]
    fn test_json_source_sees_file_changes() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        let source = JsonFileSource::new(file.path());
        assert!(source.load().unwrap().is_empty());

        std::fs::write(
            file.path(),
            r#"[{"work_year": 2020, "job_title": "X", "salary": 1}]"#,
        )
        .unwrap();
        assert_eq!(source.load().unwrap().len(), 1);
    }

    #[test]
    fn test_json_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonFileSource::new(dir.path().join("nope.json")).load().unwrap_err();
        assert!(matches!(err, SourceError::Read { .. }));
    }

    #[test]
    fn test_json_source_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"work_year": "twenty"}}]"#).unwrap();
        let err = JsonFileSource::new(file.path()).load().unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(JsonFileSource::new(file.path()).load().is_err());
    }

    #[test]
    fn test_json_source_rejects_float_year() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"work_year": 2023.0, "job_title": "A", "salary": 1}}]"#).unwrap();
        let err = JsonFileSource::new(file.path()).load().unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
    }

    #[test]
    fn test_spreadsheet_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SpreadsheetSource::new(dir.path().join("missing.xlsx"))
            .load()
            .unwrap_err();
        assert!(matches!(err, SourceError::Workbook { .. }));
    }

    #[test]
    fn test_spreadsheet_source_garbage_file() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        write!(file, "this is not a zip archive").unwrap();
        assert!(SpreadsheetSource::new(file.path()).load().is_err());
    }

    #[test]
    fn test_spreadsheet_header_below_blank_rows_in_offset_column() {
        let dir = tempfile::tempdir().unwrap();
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();

        // A whitespace cell at A1 pulls rows 1-2 into the used range.
        sheet.write_string(0, 0, "   ").unwrap();
        sheet.write_string(2, 1, "work_year").unwrap();
        sheet.write_string(2, 2, "job_title").unwrap();
        sheet.write_string(2, 3, "salary").unwrap();

        sheet.write_number(3, 1, 2023.0).unwrap();
        sheet.write_string(3, 2, "Engineer").unwrap();
        sheet.write_number(3, 3, 100000.0).unwrap();

        sheet.write_number(5, 1, 2024.0).unwrap();
        sheet.write_string(5, 2, "Manager").unwrap();
        sheet.write_number(5, 3, 150000.0).unwrap();

        let records = SpreadsheetSource::new(save_workbook(dir.path(), workbook))
            .load()
            .unwrap();
        assert_eq!(
            records,
            vec![
                SalaryRecord::new(2023, "Engineer", 100000.0),
                SalaryRecord::new(2024, "Manager", 150000.0),
            ]
        );
    }

    #[test]
    fn test_spreadsheet_empty_sheet_has_no_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut workbook = Workbook::new();
        workbook.add_worksheet();

        let records = SpreadsheetSource::new(save_workbook(dir.path(), workbook))
            .load()
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_spreadsheet_header_only_has_no_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "work_year").unwrap();
        sheet.write_string(0, 1, "job_title").unwrap();
        sheet.write_string(0, 2, "salary").unwrap();

        let records = SpreadsheetSource::new(save_workbook(dir.path(), workbook))
            .load()
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_spreadsheet_reads_first_sheet_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut workbook = Workbook::new();
        let first = workbook.add_worksheet();
        first.write_string(0, 0, "work_year").unwrap();
        first.write_number(1, 0, 2020.0).unwrap();
        let second = workbook.add_worksheet();
        second.write_string(0, 0, "work_year").unwrap();
        second.write_number(1, 0, 2099.0).unwrap();
        second.write_number(2, 0, 2098.0).unwrap();

        let records = SpreadsheetSource::new(save_workbook(dir.path(), workbook))
            .load()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].work_year, Some(2020));
    }

    #[test]
    fn test_blank_rows_include_whitespace_cells() {
        assert!(is_blank(&[]));
        assert!(is_blank(&[Data::Empty, Data::String("  ".to_string())]));
        assert!(!is_blank(&[Data::Empty, Data::Float(0.0)]));
    }

    #[test]
    fn test_column_map_from_header() {
        let header = vec![
            Data::String("salary".to_string()),
            Data::String("other".to_string()),
            Data::String(" work_year ".to_string()),
            Data::String("job_title".to_string()),
        ];
        let columns = ColumnMap::from_header(&header);
        assert_eq!(columns.salary, Some(0));
        assert_eq!(columns.work_year, Some(2));
        assert_eq!(columns.job_title, Some(3));

        let row = vec![
            Data::Float(1234.5),
            Data::Empty,
            Data::Float(2021.0),
            Data::String("Analyst".to_string()),
        ];
        assert_eq!(columns.record(&row), SalaryRecord::new(2021, "Analyst", 1234.5));
    }

    #[test]
    fn test_column_map_missing_columns_and_short_rows() {
        let header = vec![Data::String("work_year".to_string())];
        let columns = ColumnMap::from_header(&header);

        let record = columns.record(&[Data::String(" 2020 ".to_string())]);
        assert_eq!(record.work_year, Some(2020));
        assert_eq!(record.job_title, None);
        assert_eq!(record.salary, None);

        assert_eq!(columns.record(&[]), SalaryRecord::default());
    }

    #[test]
    fn test_cell_conversions() {
        assert_eq!(cell_to_year(&Data::Float(2020.5)), None);
        assert_eq!(cell_to_year(&Data::Int(2019)), Some(2019));
        assert_eq!(cell_to_number(&Data::Bool(true)), None);
        assert_eq!(cell_to_text(&Data::String(String::new())), None);
        assert_eq!(cell_to_text(&Data::Float(42.0)), Some("42".to_string()));
    }

    #[test]
    fn test_source_config_builds_matching_source() {
        let source = SourceConfig::JsonFile(PathBuf::from("data/x.json")).build();
        assert!(source.describe().starts_with("json file"));

        let source = SourceConfig::Spreadsheet(PathBuf::from("x.xlsx")).build();
        assert!(source.describe().starts_with("spreadsheet"));

        let source = SourceConfig::default().build();
        assert!(source.describe().starts_with("literal"));
    }
}
