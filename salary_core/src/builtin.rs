//! Bundled sample dataset used by the literal record source.
//!
//! Kept identical to `data/salaries.json`.

use crate::types::SalaryRecord;

const SALARIES: &[(i64, &str, f64)] = &[
    (2020, "Data Scientist", 79833.0),
    (2020, "Machine Learning Scientist", 260000.0),
    (2020, "Big Data Engineer", 109024.0),
    (2020, "Product Data Analyst", 20000.0),
    (2020, "Data Analyst", 72000.0),
    (2020, "Data Engineer", 41689.0),
    (2020, "Data Scientist", 35735.0),
    (2020, "Lead Data Scientist", 190000.0),
    (2021, "Data Scientist", 135000.0),
    (2021, "Data Engineer", 87000.0),
    (2021, "Machine Learning Engineer", 85000.0),
    (2021, "Data Analyst", 90000.0),
    (2021, "Research Scientist", 42000.0),
    (2021, "Data Scientist", 88000.0),
    (2021, "Data Engineering Manager", 174000.0),
    (2021, "Principal Data Scientist", 151000.0),
    (2022, "Data Engineer", 135000.0),
    (2022, "Data Analyst", 58000.0),
    (2022, "Data Scientist", 176000.0),
    (2022, "Data Engineer", 154000.0),
    (2022, "Analytics Engineer", 205300.0),
    (2022, "Machine Learning Engineer", 124000.0),
    (2022, "Data Scientist", 130000.0),
    (2022, "Data Analyst", 95000.0),
    (2022, "Data Architect", 192400.0),
    (2023, "Principal Data Scientist", 85847.0),
    (2023, "ML Engineer", 30000.0),
    (2023, "Data Scientist", 175000.0),
    (2023, "Applied Scientist", 222200.0),
    (2023, "Data Engineer", 130000.0),
    (2023, "Data Analyst", 100000.0),
    (2023, "Data Scientist", 120000.0),
    (2023, "Research Engineer", 236000.0),
    (2023, "Data Engineer", 147100.0),
    (2024, "AI Engineer", 202730.0),
    (2024, "Data Engineer", 145000.0),
    (2024, "Data Scientist", 165000.0),
    (2024, "Machine Learning Engineer", 210000.0),
    (2024, "Data Analyst", 82000.0),
    (2024, "Data Scientist", 118000.0),
];

/// Fresh owned copy of the bundled records
pub fn builtin_records() -> Vec<SalaryRecord> {
    SALARIES
        .iter()
        .map(|&(year, title, salary)| SalaryRecord::new(year, title, salary))
        .collect()
}
