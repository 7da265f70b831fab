use rusqlite::ToSql;
use rusqlite::types::Value as SqliteValue;

use crate::params::Params;
use crate::statement::TIMESTAMP_FORMAT;
use crate::types::Value;

/// Convert a single handle value to a rusqlite `Value`.
#[must_use]
pub fn to_sqlite_value(value: &Value) -> SqliteValue {
    match value {
        Value::Null => SqliteValue::Null,
        Value::Int(i) => SqliteValue::Integer(*i),
        Value::Float(f) => SqliteValue::Real(*f),
        Value::Text(s) => SqliteValue::Text(s.clone()),
        Value::Bool(b) => SqliteValue::Integer(i64::from(*b)),
        Value::Timestamp(dt) => SqliteValue::Text(dt.format(TIMESTAMP_FORMAT).to_string()),
        Value::Json(json) => SqliteValue::Text(json.to_string()),
        Value::Blob(bytes) => SqliteValue::Blob(bytes.clone()),
    }
}

/// Owned `SQLite` parameters, ready to move onto the blocking pool.
#[derive(Debug, Clone)]
pub enum SqliteParams {
    Positional(Vec<SqliteValue>),
    Named(Vec<(String, SqliteValue)>),
}

impl SqliteParams {
    #[must_use]
    pub fn convert(params: &Params) -> Self {
        match params {
            Params::Positional(values) => {
                SqliteParams::Positional(values.iter().map(to_sqlite_value).collect())
            }
            Params::Named(pairs) => SqliteParams::Named(
                pairs
                    .iter()
                    .map(|(name, value)| (bind_name(name), to_sqlite_value(value)))
                    .collect(),
            ),
        }
    }
}

// rusqlite wants the prefix as part of the name
fn bind_name(name: &str) -> String {
    if name.starts_with([':', '@', '$']) {
        name.to_string()
    } else {
        format!(":{name}")
    }
}

pub(crate) fn positional_refs(values: &[SqliteValue]) -> Vec<&dyn ToSql> {
    values.iter().map(|v| v as &dyn ToSql).collect()
}

pub(crate) fn named_refs(pairs: &[(String, SqliteValue)]) -> Vec<(&str, &dyn ToSql)> {
    pairs
        .iter()
        .map(|(name, v)| (name.as_str(), v as &dyn ToSql))
        .collect()
}
