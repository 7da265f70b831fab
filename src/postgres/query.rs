use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use tokio_postgres::types::FromSql;
use tokio_postgres::{Row as PgRow, SimpleQueryMessage, Statement};

use crate::error::SqlHandleError;
use crate::results::Cursor;
use crate::types::Value;

/// Extracts a handle `Value` from a `tokio_postgres` row at the given index.
///
/// # Errors
/// Returns `SqlHandleError::QueryError` if the column cannot be decoded.
pub fn postgres_extract_value(row: &PgRow, idx: usize) -> Result<Value, SqlHandleError> {
    let type_name = row.columns()[idx].type_().name();
    let value = match type_name {
        "int2" => row
            .try_get::<_, Option<i16>>(idx)
            .map(|v| v.map_or(Value::Null, |v| Value::Int(i64::from(v)))),
        "int4" => row
            .try_get::<_, Option<i32>>(idx)
            .map(|v| v.map_or(Value::Null, |v| Value::Int(i64::from(v)))),
        "int8" => row
            .try_get::<_, Option<i64>>(idx)
            .map(|v| v.map_or(Value::Null, Value::Int)),
        "float4" => row
            .try_get::<_, Option<f32>>(idx)
            .map(|v| v.map_or(Value::Null, |v| Value::Float(f64::from(v)))),
        "float8" => row
            .try_get::<_, Option<f64>>(idx)
            .map(|v| v.map_or(Value::Null, Value::Float)),
        "bool" => row
            .try_get::<_, Option<bool>>(idx)
            .map(|v| v.map_or(Value::Null, Value::Bool)),
        "timestamp" => row
            .try_get::<_, Option<NaiveDateTime>>(idx)
            .map(|v| v.map_or(Value::Null, Value::Timestamp)),
        "timestamptz" => row
            .try_get::<_, Option<DateTime<Utc>>>(idx)
            .map(|v| v.map_or(Value::Null, |v| Value::Timestamp(v.naive_utc()))),
        "date" => row.try_get::<_, Option<NaiveDate>>(idx).map(|v| {
            v.map_or(Value::Null, |d| {
                Value::Timestamp(d.and_time(chrono::NaiveTime::MIN))
            })
        }),
        "json" | "jsonb" => row
            .try_get::<_, Option<JsonValue>>(idx)
            .map(|v| v.map_or(Value::Null, Value::Json)),
        "bytea" => row
            .try_get::<_, Option<Vec<u8>>>(idx)
            .map(|v| v.map_or(Value::Null, Value::Blob)),
        // kept as text so no precision is lost
        "numeric" => row
            .try_get::<_, Option<Decimal>>(idx)
            .map(|v| v.map_or(Value::Null, |d| Value::Text(d.to_string()))),
        "time" => row
            .try_get::<_, Option<NaiveTime>>(idx)
            .map(|v| v.map_or(Value::Null, |t| Value::Text(t.to_string()))),
        "oid" => row
            .try_get::<_, Option<u32>>(idx)
            .map(|v| v.map_or(Value::Null, |o| Value::Int(i64::from(o)))),
        _ if <String as FromSql>::accepts(row.columns()[idx].type_()) => row
            .try_get::<_, Option<String>>(idx)
            .map(|v| v.map_or(Value::Null, Value::Text)),
        _ => {
            return Err(SqlHandleError::QueryError {
                message: format!(
                    "column {:?} has unsupported type {type_name}; cast it to text in the query",
                    row.columns()[idx].name()
                ),
                code: None,
            });
        }
    };
    value.map_err(SqlHandleError::postgres_query)
}

/// Build a cursor from rows, taking the column names from the prepared statement so an
/// empty result still reports its columns.
///
/// # Errors
/// Returns errors from row value extraction.
pub fn build_cursor(stmt: &Statement, rows: &[PgRow]) -> Result<Cursor, SqlHandleError> {
    let column_names: Vec<String> = stmt
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();
    let column_count = column_names.len();

    let mut cursor = Cursor::new(column_names, rows.len());
    for row in rows {
        let mut values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            values.push(postgres_extract_value(row, idx)?);
        }
        cursor.push_values(values);
    }
    Ok(cursor)
}

/// Build a cursor from an unprepared (simple protocol) run.
///
/// Rows come from the first statement that produced a result set, with every value as the
/// text the server rendered. `rows_affected` is the count reported by the last statement
/// that produced no result set.
#[must_use]
pub fn build_cursor_from_simple(messages: &[SimpleQueryMessage]) -> Cursor {
    let mut cursor: Option<Cursor> = None;
    let mut rows_affected = 0_u64;
    let mut collecting = false;
    let mut described = false;

    for message in messages {
        match message {
            SimpleQueryMessage::RowDescription(columns) => {
                described = true;
                if cursor.is_none() {
                    let names = columns.iter().map(|c| c.name().to_string()).collect();
                    cursor = Some(Cursor::new(names, 16));
                    collecting = true;
                }
            }
            SimpleQueryMessage::Row(row) => {
                if let (true, Some(cursor)) = (collecting, cursor.as_mut()) {
                    let values = (0..row.len())
                        .map(|idx| row.get(idx).map_or(Value::Null, |s| Value::Text(s.to_string())))
                        .collect();
                    cursor.push_values(values);
                }
            }
            SimpleQueryMessage::CommandComplete(n) => {
                if !described {
                    rows_affected = *n;
                }
                described = false;
                collecting = false;
            }
            _ => {}
        }
    }

    let mut cursor = cursor.unwrap_or_else(|| Cursor::new(Vec::new(), 0));
    cursor.set_rows_affected(usize::try_from(rows_affected).unwrap_or(usize::MAX));
    cursor
}
