//! Helpers for building and flattening Polars tables.

use crate::error::Result;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde_json::{Map, Number, Value};

/// Days between 0001-01-01 (CE day 1) and the Unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Convert a calendar date to Polars' physical `Date` representation.
pub fn date_to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Inverse of [`date_to_epoch_days`].
pub fn epoch_days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

/// Build a `Date` column from calendar dates.
pub fn date_column(name: &str, dates: &[NaiveDate]) -> Result<Column> {
    let days: Vec<i32> = dates.iter().copied().map(date_to_epoch_days).collect();
    let series = Series::new(name.into(), days).cast(&DataType::Date)?;
    Ok(series.into())
}

/// Flatten a frame into one JSON object per row, keyed by column name.
///
/// Dates are rendered as ISO-8601 strings, non-finite floats as `null`.
pub fn frame_to_records(df: &DataFrame) -> Result<Vec<Value>> {
    let columns = df.get_columns();
    let mut records = Vec::with_capacity(df.height());

    for row in 0..df.height() {
        let mut record = Map::with_capacity(columns.len());
        for column in columns {
            let value = column.as_materialized_series().get(row)?;
            record.insert(column.name().to_string(), any_value_to_json(value));
        }
        records.push(Value::Object(record));
    }

    Ok(records)
}

fn any_value_to_json(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),
        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),
        AnyValue::Int8(v) => Value::from(v),
        AnyValue::Int16(v) => Value::from(v),
        AnyValue::Int32(v) => Value::from(v),
        AnyValue::Int64(v) => Value::from(v),
        AnyValue::UInt8(v) => Value::from(v),
        AnyValue::UInt16(v) => Value::from(v),
        AnyValue::UInt32(v) => Value::from(v),
        AnyValue::UInt64(v) => Value::from(v),
        AnyValue::Float32(v) => float_to_json(f64::from(v)),
        AnyValue::Float64(v) => float_to_json(v),
        AnyValue::Date(days) => epoch_days_to_date(days)
            .map_or(Value::Null, |d| Value::String(d.to_string())),
        other => Value::String(other.to_string()),
    }
}

fn float_to_json(v: f64) -> Value {
    Number::from_f64(v).map_or(Value::Null, Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_days() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(date_to_epoch_days(epoch), 0);

        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(epoch_days_to_date(date_to_epoch_days(date)), Some(date));
    }

    #[test]
    fn test_date_column_dtype() {
        let dates = vec![
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        ];
        let column = date_column("date", &dates).unwrap();
        assert_eq!(column.dtype(), &DataType::Date);
        assert_eq!(column.len(), 2);
    }

    #[test]
    fn test_frame_to_records() {
        let dates = vec![NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(); 2];
        let df = DataFrame::new(vec![
            Series::new("symbol".into(), vec!["VX/F5", "VX/G5"]).into(),
            date_column("expiration", &dates).unwrap(),
            Series::new("price".into(), vec![Some(15.25), None]).into(),
            Series::new("volume".into(), vec![10u64, 20u64]).into(),
        ])
        .unwrap();

        let records = frame_to_records(&df).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["symbol"], "VX/F5");
        assert_eq!(records[0]["expiration"], "2024-01-02");
        assert_eq!(records[0]["price"], 15.25);
        assert_eq!(records[0]["volume"], 10);
        assert!(records[1]["price"].is_null());
    }

    #[test]
    fn test_nan_becomes_null() {
        let df = DataFrame::new(vec![Series::new("x".into(), vec![f64::NAN]).into()]).unwrap();
        let records = frame_to_records(&df).unwrap();
        assert!(records[0]["x"].is_null());
    }
}
