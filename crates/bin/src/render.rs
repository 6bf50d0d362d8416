//! Printing of facade results.

use clap::ValueEnum;
use quarry::{Output, OutputType};
use serde_json::Value;
use std::io::Write;

/// Format of the printed tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    /// Pretty-printed table
    Text,
    /// JSON array of row objects
    Json,
    /// Comma-separated values with a header row
    Csv,
}

impl Format {
    /// Output preference matching this format.
    pub(crate) const fn output_type(self) -> OutputType {
        match self {
            Self::Json => OutputType::Records,
            Self::Text | Self::Csv => OutputType::DataFrame,
        }
    }
}

/// Write one result to `out`.
pub(crate) fn render(
    out: &mut impl Write,
    output: &Output,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    match (format, output) {
        (Format::Text, Output::Frame(df)) => writeln!(out, "{df}")?,
        (Format::Csv, Output::Frame(df)) => {
            let header: Vec<String> = df
                .get_column_names()
                .iter()
                .map(|name| name.to_string())
                .collect();
            write_csv(out, &header, &output.to_records()?)?;
        }
        (_, output) => {
            let rows = output.to_records()?;
            serde_json::to_writer_pretty(&mut *out, &rows)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_csv(
    out: &mut impl Write,
    header: &[String],
    rows: &[Value],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(header.iter().map(|name| cell(&row[name.as_str()])))?;
    }
    writer.flush()?;
    Ok(())
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use rstest::rstest;

    fn output(output_type: OutputType) -> Output {
        let df = DataFrame::new(vec![
            Series::new("symbol".into(), vec!["VX/Z4", "VX/F5"]).into(),
            Series::new("price".into(), vec![Some(15.425), None]).into(),
        ])
        .unwrap();
        Output::shape(df, output_type).unwrap()
    }

    fn rendered(output: &Output, format: Format) -> String {
        let mut buf = Vec::new();
        render(&mut buf, output, format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_csv_keeps_column_order() {
        let text = rendered(&output(OutputType::DataFrame), Format::Csv);
        assert_eq!(text, "symbol,price\nVX/Z4,15.425\nVX/F5,\n");
    }

    #[test]
    fn test_json_rows() {
        let text = rendered(&output(OutputType::Records), Format::Json);
        let rows: Vec<Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["symbol"], "VX/Z4");
        assert!(rows[1]["price"].is_null());
    }

    #[test]
    fn test_text_contains_values() {
        let text = rendered(&output(OutputType::DataFrame), Format::Text);
        assert!(text.contains("VX/Z4"));
    }

    #[rstest]
    #[case(Format::Text, OutputType::DataFrame)]
    #[case(Format::Csv, OutputType::DataFrame)]
    #[case(Format::Json, OutputType::Records)]
    fn test_format_output_type(#[case] format: Format, #[case] expected: OutputType) {
        assert_eq!(format.output_type(), expected);
    }
}
