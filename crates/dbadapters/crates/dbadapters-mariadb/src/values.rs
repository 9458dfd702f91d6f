//! Conversion between adapter values and mysql_async values

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use dbadapters_core::{ColumnMeta, Row, Value};
use mysql_async::consts::{ColumnFlags, ColumnType};
use mysql_async::{Column, Row as MySqlRow};
use std::sync::Arc;


/// Character set number MariaDB reports for binary columns
const BINARY_CHARSET: u16 = 63;

/// Convert a bind parameter into the driver's value type
pub fn value_to_param(value: &Value) -> mysql_async::Value {
    use mysql_async::Value as My;

    match value {
        Value::Null => My::NULL,
        Value::Bool(v) => My::Int(*v as i64),
        Value::Int64(v) => My::Int(*v),
        Value::UInt64(v) => My::UInt(*v),
        Value::Float32(v) => My::Float(*v),
        Value::Float64(v) => My::Double(*v),
        Value::Decimal(v) | Value::String(v) => My::Bytes(v.clone().into_bytes()),
        Value::Bytes(v) => My::Bytes(v.clone()),
        // Years outside 0..=65535 don't fit the wire format; the server parses the text
        Value::Date(d) => match u16::try_from(d.year()) {
            Ok(year) => My::Date(year, d.month() as u8, d.day() as u8, 0, 0, 0, 0),
            Err(_) => My::Bytes(d.format("%Y-%m-%d").to_string().into_bytes()),
        },
        Value::Time(t) => My::Time(
            false,
            0,
            t.hour() as u8,
            t.minute() as u8,
            t.second() as u8,
            t.nanosecond() / 1_000,
        ),
        Value::DateTime(dt) => match u16::try_from(dt.year()) {
            Ok(year) => My::Date(
                year,
                dt.month() as u8,
                dt.day() as u8,
                dt.hour() as u8,
                dt.minute() as u8,
                dt.second() as u8,
                dt.nanosecond() / 1_000,
            ),
            Err(_) => My::Bytes(
                dt.format("%Y-%m-%d %H:%M:%S%.f")
                    .to_string()
                    .into_bytes(),
            ),
        },
        Value::Json(v) => My::Bytes(v.to_string().into_bytes()),
    }
}

/// Convert a driver value to our value type, using the column metadata to
/// interpret byte strings from the text protocol.
pub fn mysql_value_to_value(val: mysql_async::Value, column: &Column) -> Value {
    let col_type = column.column_type();
    let unsigned = column.flags().contains(ColumnFlags::UNSIGNED_FLAG);

    match val {
        mysql_async::Value::NULL => Value::Null,
        mysql_async::Value::Bytes(bytes) => text_to_value(bytes, column),
        mysql_async::Value::Int(i) => Value::Int64(i),
        mysql_async::Value::UInt(u) => {
            if !unsigned && u <= i64::MAX as u64 {
                Value::Int64(u as i64)
            } else {
                Value::UInt64(u)
            }
        }
        mysql_async::Value::Float(f) => Value::Float32(f),
        mysql_async::Value::Double(d) => Value::Float64(d),
        mysql_async::Value::Date(year, month, day, hour, min, sec, micro) => {
            let date = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32);
            match (col_type, date) {
                (ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE, Some(date)) => {
                    Value::Date(date)
                }
                (_, Some(date)) => date
                    .and_hms_micro_opt(hour as u32, min as u32, sec as u32, micro)
                    .map(Value::DateTime)
                    .unwrap_or_else(|| {
                        Value::String(format!(
                            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                            year, month, day, hour, min, sec
                        ))
                    }),
                // Zero dates ("0000-00-00") have no chrono representation;
                // render them the way the text protocol sends them
                (ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE, None) => {
                    Value::String(format!("{:04}-{:02}-{:02}", year, month, day))
                }
                (_, None) if micro == 0 => Value::String(format!(
                    "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                    year, month, day, hour, min, sec
                )),
                (_, None) => Value::String(format!(
                    "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:06}",
                    year, month, day, hour, min, sec, micro
                )),
            }
        }
        mysql_async::Value::Time(negative, days, hours, mins, secs, micros) => {
            let time = if !negative && days == 0 {
                NaiveTime::from_hms_micro_opt(hours as u32, mins as u32, secs as u32, micros)
            } else {
                None
            };
            time.map(Value::Time).unwrap_or_else(|| {
                let total_hours = days * 24 + hours as u32;
                let sign = if negative { "-" } else { "" };
                Value::String(format!(
                    "{}{:02}:{:02}:{:02}.{:06}",
                    sign, total_hours, mins, secs, micros
                ))
            })
        }
    }
}

/// Interpret a text-protocol (or binary-protocol string) cell
fn text_to_value(bytes: Vec<u8>, column: &Column) -> Value {
    let col_type = column.column_type();

    if col_type == ColumnType::MYSQL_TYPE_BIT || is_binary_string(column) {
        return Value::Bytes(bytes);
    }

    let s = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => return Value::Bytes(e.into_bytes()),
    };

    match col_type {
        ColumnType::MYSQL_TYPE_TINY
        | ColumnType::MYSQL_TYPE_SHORT
        | ColumnType::MYSQL_TYPE_LONG
        | ColumnType::MYSQL_TYPE_LONGLONG
        | ColumnType::MYSQL_TYPE_INT24
        | ColumnType::MYSQL_TYPE_YEAR => {
            if column.flags().contains(ColumnFlags::UNSIGNED_FLAG) {
                s.parse::<u64>()
                    .map(|u| {
                        if u <= i64::MAX as u64 {
                            Value::Int64(u as i64)
                        } else {
                            Value::UInt64(u)
                        }
                    })
                    .unwrap_or(Value::String(s))
            } else {
                s.parse::<i64>().map(Value::Int64).unwrap_or(Value::String(s))
            }
        }
        ColumnType::MYSQL_TYPE_FLOAT => {
            s.parse::<f32>().map(Value::Float32).unwrap_or(Value::String(s))
        }
        ColumnType::MYSQL_TYPE_DOUBLE => {
            s.parse::<f64>().map(Value::Float64).unwrap_or(Value::String(s))
        }
        ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => Value::Decimal(s),
        ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE => {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map(Value::Date)
                .unwrap_or(Value::String(s))
        }
        ColumnType::MYSQL_TYPE_DATETIME
        | ColumnType::MYSQL_TYPE_DATETIME2
        | ColumnType::MYSQL_TYPE_TIMESTAMP
        | ColumnType::MYSQL_TYPE_TIMESTAMP2 => {
            NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f")
                .map(Value::DateTime)
                .unwrap_or(Value::String(s))
        }
        ColumnType::MYSQL_TYPE_TIME | ColumnType::MYSQL_TYPE_TIME2 => {
            NaiveTime::parse_from_str(&s, "%H:%M:%S%.f")
                .map(Value::Time)
                .unwrap_or(Value::String(s))
        }
        ColumnType::MYSQL_TYPE_JSON => serde_json::from_str(&s)
            .map(Value::Json)
            .unwrap_or(Value::String(s)),
        _ => Value::String(s),
    }
}

/// BINARY/VARBINARY/BLOB columns: string-typed but carrying raw bytes
fn is_binary_string(column: &Column) -> bool {
    matches!(
        column.column_type(),
        ColumnType::MYSQL_TYPE_STRING
            | ColumnType::MYSQL_TYPE_VAR_STRING
            | ColumnType::MYSQL_TYPE_VARCHAR
            | ColumnType::MYSQL_TYPE_TINY_BLOB
            | ColumnType::MYSQL_TYPE_MEDIUM_BLOB
            | ColumnType::MYSQL_TYPE_LONG_BLOB
            | ColumnType::MYSQL_TYPE_BLOB
    ) && column.character_set() == BINARY_CHARSET
}

/// Column metadata for one result-set column
pub fn column_meta(ordinal: usize, column: &Column) -> ColumnMeta {
    ColumnMeta {
        name: column.name_str().into_owned(),
        data_type: format!("{:?}", column.column_type()),
        nullable: !column.flags().contains(ColumnFlags::NOT_NULL_FLAG),
        ordinal,
    }
}

/// Convert a driver result set, keeping row order, column order and every value
pub fn convert_result_set(
    columns: Option<Arc<[Column]>>,
    rows: Vec<MySqlRow>,
) -> (Vec<ColumnMeta>, Vec<Row>) {
    // Statements without a result set (INSERT, UPDATE...) have no columns
    let columns = columns.unwrap_or_else(|| Arc::from(Vec::new()));

    let metas: Vec<ColumnMeta> = columns
        .iter()
        .enumerate()
        .map(|(idx, col)| column_meta(idx, col))
        .collect();
    let names: Arc<[String]> = metas.iter().map(|m| m.name.clone()).collect();

    let rows = rows
        .into_iter()
        .map(|row| {
            let values = row
                .unwrap_raw()
                .into_iter()
                .zip(columns.iter())
                .map(|(val, col)| {
                    mysql_value_to_value(val.unwrap_or(mysql_async::Value::NULL), col)
                })
                .collect();
            Row::new(names.clone(), values)
        })
        .collect();

    (metas, rows)
}
