//! Parsing of Kenneth French data-library CSV files.
//!
//! A file is a sequence of blank-line separated chunks. Short chunks are
//! prose (the dataset description, the copyright trailer). Long chunks are
//! tables: an optional title, a header line starting with a comma, then rows
//! whose first field is the period (`YYYY`, `YYYYMM` or `YYYYMMDD`).

use crate::error::{DataError, Result};
use crate::table::date_column;
use chrono::NaiveDate;
use polars::prelude::*;
use tracing::{debug, warn};

/// Chunks shorter than this are treated as description text.
const PROSE_CHUNK_LEN: usize = 800;

/// Values the library uses for missing observations.
const MISSING_SENTINELS: &[f64] = &[-99.99, -999.0];

/// One table of a dataset.
#[derive(Debug, Clone)]
pub struct FactorTable {
    /// Title line above the table, e.g. `Annual Factors: January-December`
    pub title: String,
    /// `date` column followed by one `f64` column per factor
    pub frame: DataFrame,
}

/// A parsed dataset: description plus its tables in file order.
#[derive(Debug, Clone)]
pub struct FamaFrenchDataset {
    /// Dataset name, e.g. `F-F_Research_Data_Factors`
    pub name: String,
    /// Human-readable description including a table index
    pub description: String,
    /// Tables in the order they appear in the file
    pub tables: Vec<FactorTable>,
}

impl FamaFrenchDataset {
    /// First table; monthly data for the factor datasets.
    pub fn monthly(&self) -> Option<&FactorTable> {
        self.tables.first()
    }

    /// Second table; annual data for the factor datasets.
    pub fn annual(&self) -> Option<&FactorTable> {
        self.tables.get(1)
    }
}

/// Parse the text of a data-library CSV file.
pub fn parse_dataset(name: &str, text: &str) -> Result<FamaFrenchDataset> {
    let text = text.replace("\r\n", "\n");

    let mut prose = Vec::new();
    let mut tables = Vec::new();

    for chunk in split_chunks(&text) {
        if chunk.len() < PROSE_CHUNK_LEN {
            prose.push(chunk.split_whitespace().collect::<Vec<_>>().join(" "));
        } else {
            tables.push(parse_table(chunk)?);
        }
    }

    if tables.is_empty() {
        return Err(DataError::missing(name, "No tables found in dataset"));
    }
    debug!(name, tables = tables.len(), "parsed Fama-French dataset");

    let description = describe(name, &prose, &tables);
    Ok(FamaFrenchDataset {
        name: name.to_string(),
        description,
        tables,
    })
}

fn split_chunks(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let line_end = offset + line.len();
        if line.trim().is_empty() {
            if let Some(s) = start.take() {
                chunks.push(&text[s..end]);
            }
        } else {
            start.get_or_insert(offset);
            end = line_end;
        }
        offset = line_end;
    }
    if let Some(s) = start {
        chunks.push(&text[s..end]);
    }

    chunks.into_iter().map(str::trim_end).collect()
}

fn parse_table(chunk: &str) -> Result<FactorTable> {
    let lines: Vec<&str> = chunk.lines().collect();
    let header_idx = lines
        .iter()
        .position(|l| l.trim_start().starts_with(','))
        .ok_or_else(|| DataError::Parse("table chunk without a header line".to_string()))?;

    let title = lines[..header_idx]
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let names: Vec<String> = lines[header_idx]
        .split(',')
        .skip(1)
        .map(|h| h.trim().to_string())
        .collect();

    let mut dates = Vec::new();
    let mut values: Vec<Vec<Option<f64>>> = vec![Vec::new(); names.len()];

    for line in &lines[header_idx + 1..] {
        let mut fields = line.split(',').map(str::trim);
        let Some(date) = fields.next().and_then(parse_period) else {
            warn!(table = %title, line = %line, "skipping row without a period");
            continue;
        };

        dates.push(date);
        let mut fields = fields.peekable();
        for column in &mut values {
            column.push(fields.next().and_then(parse_value));
        }
        if fields.peek().is_some() {
            return Err(DataError::Parse(format!(
                "row {date} in '{title}' has more fields than the header"
            )));
        }
    }

    let mut columns = Vec::with_capacity(names.len() + 1);
    columns.push(date_column("date", &dates)?);
    for (name, column) in names.iter().zip(values) {
        columns.push(Series::new(name.as_str().into(), column).into());
    }

    Ok(FactorTable {
        title,
        frame: DataFrame::new(columns)?,
    })
}

/// `YYYY` maps to 1 January, `YYYYMM` to the first of the month.
fn parse_period(field: &str) -> Option<NaiveDate> {
    if !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match field.len() {
        4 => NaiveDate::from_ymd_opt(field.parse().ok()?, 1, 1),
        6 => NaiveDate::from_ymd_opt(field[..4].parse().ok()?, field[4..].parse().ok()?, 1),
        8 => NaiveDate::parse_from_str(field, "%Y%m%d").ok(),
        _ => None,
    }
}

fn parse_value(field: &str) -> Option<f64> {
    let value: f64 = field.parse().ok()?;
    if MISSING_SENTINELS.iter().any(|s| (value - s).abs() < 1e-9) {
        None
    } else {
        Some(value)
    }
}

fn describe(name: &str, prose: &[String], tables: &[FactorTable]) -> String {
    let title = name.replace('_', " ");
    let mut out = format!("{title}\n{}\n\n", "-".repeat(name.len()));

    if !prose.is_empty() {
        out.push_str(&prose.join(" "));
        out.push_str("\n\n");
    }

    let index: Vec<String> = tables
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let shape = format!(
                "({} rows x {} cols)",
                t.frame.height(),
                t.frame.width().saturating_sub(1)
            );
            if t.title.is_empty() {
                format!("{i:>3} : {shape}")
            } else {
                format!("{i:>3} : {} {shape}", t.title)
            }
        })
        .collect();
    out.push_str(&index.join("\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_period() {
        assert_eq!(parse_period("1926"), NaiveDate::from_ymd_opt(1926, 1, 1));
        assert_eq!(parse_period("192607"), NaiveDate::from_ymd_opt(1926, 7, 1));
        assert_eq!(parse_period("19260701"), NaiveDate::from_ymd_opt(1926, 7, 1));
        assert_eq!(parse_period("192613"), None);
        assert_eq!(parse_period("Copyright"), None);
        assert_eq!(parse_period(""), None);
    }

    #[test]
    fn test_parse_value_sentinels() {
        assert_eq!(parse_value("-99.99"), None);
        assert_eq!(parse_value("-999"), None);
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("2.96"), Some(2.96));
    }

    #[test]
    fn test_split_chunks() {
        let text = "a\nb\n\n\n  \nc\n\nd";
        assert_eq!(split_chunks(text), vec!["a\nb", "c", "d"]);
    }

    #[test]
    fn test_parse_table_with_title() {
        let chunk = " Annual Factors: January-December \n,Mkt-RF,SMB,HML,RF\n  1927,   29.47,  -2.04,  -4.54,   3.12\n  1928,   35.39,   4.51,  -6.17,   3.56";
        let table = parse_table(chunk).unwrap();

        assert_eq!(table.title, "Annual Factors: January-December");
        assert_eq!(
            table.frame.get_column_names(),
            vec!["date", "Mkt-RF", "SMB", "HML", "RF"]
        );
        assert_eq!(table.frame.height(), 2);

        let rf = table.frame.column("RF").unwrap().f64().unwrap();
        assert_relative_eq!(rf.get(1).unwrap(), 3.56);
    }

    #[test]
    fn test_parse_table_rejects_wide_rows() {
        let chunk = ",A\n192607,1.0,2.0";
        assert!(matches!(parse_table(chunk), Err(DataError::Parse(_))));
    }

    #[test]
    fn test_no_tables() {
        let result = parse_dataset("Empty", "just a description\n\nCopyright");
        assert!(matches!(result, Err(DataError::MissingData { .. })));
    }
}
