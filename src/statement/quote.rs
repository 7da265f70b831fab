use crate::error::SqlHandleError;
use crate::types::{DatabaseType, Value};

/// Timestamps are embedded in the form both engines parse back.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Quote a string as a literal for `dialect`.
///
/// `SQLite` literals have exactly one escape: an embedded `'` is doubled (the rule behind
/// SQLite's own `quote()` and `%Q`). `PostgreSQL` literals go through
/// `postgres_protocol::escape::escape_literal`, which switches to an `E'...'` literal when
/// backslashes are present.
///
/// The `SQLite` rule is checked against the engine's own `quote()` in the integration tests
/// (`quote_matches_sqlite_builtin`); the builders do not need a connection to quote.
#[must_use]
pub fn quote_str(dialect: DatabaseType, raw: &str) -> String {
    match dialect {
        #[cfg(feature = "sqlite")]
        DatabaseType::Sqlite => {
            let mut quoted = String::with_capacity(raw.len() + 2);
            quoted.push('\'');
            for ch in raw.chars() {
                if ch == '\'' {
                    quoted.push('\'');
                }
                quoted.push(ch);
            }
            quoted.push('\'');
            quoted
        }
        #[cfg(feature = "postgres")]
        DatabaseType::Postgres => postgres_protocol::escape::escape_literal(raw),
    }
}

/// Render a value the way the statement builders embed it.
///
/// `Null` becomes the bare keyword `NULL`; every other scalar is converted to text and
/// quoted with [`quote_str`], so `5` becomes `'5'` and booleans become `'1'` / `'0'`.
///
/// # Errors
/// Returns `SqlHandleError::ValidationError` for JSON and blob values and for NaN or
/// infinite floats, none of which have a portable quoted form.
pub fn quote_value(dialect: DatabaseType, value: &Value) -> Result<String, SqlHandleError> {
    let text = match value {
        Value::Null => return Ok("NULL".to_string()),
        Value::Text(s) => return Ok(quote_str(dialect, s)),
        Value::Int(i) => i.to_string(),
        Value::Float(f) if f.is_finite() => f.to_string(),
        Value::Float(f) => {
            return Err(SqlHandleError::ValidationError(format!(
                "non-finite float {f} cannot be embedded in a statement"
            )));
        }
        Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        Value::Timestamp(ts) => ts.format(TIMESTAMP_FORMAT).to_string(),
        Value::Json(_) | Value::Blob(_) => {
            return Err(SqlHandleError::ValidationError(format!(
                "only scalar values can be embedded in a statement, got {value:?}"
            )));
        }
    };
    Ok(quote_str(dialect, &text))
}
