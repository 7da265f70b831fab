//! Client-side parameter interpolation, used when a handle is opened with
//! `emulate_prepares = true`.
//!
//! Placeholders are only recognised outside quoted strings, quoted identifiers, comments and
//! dollar-quoted blocks. `::` casts are left alone.

mod parsers;
mod scanner;

use std::fmt::Write;

use parsers::{
    is_block_comment_end, is_block_comment_start, is_line_comment_start, matches_tag,
    scan_identifier, try_start_dollar_quote,
};
use scanner::{Placeholder, State, scan_digits};

use crate::error::SqlHandleError;
use crate::params::Params;
use crate::statement::{quote_str, quote_value};
use crate::types::{DatabaseType, Value};

/// Replace every placeholder in `sql` with the literal form of its parameter.
///
/// # Errors
/// Returns `SqlHandleError::ParameterError` when a placeholder has no parameter, a parameter
/// is never referenced, or positional and named styles are mixed; and
/// `SqlHandleError::ValidationError` for values with no literal form (NaN, infinity).
pub fn interpolate_params(
    sql: &str,
    params: &Params,
    dialect: DatabaseType,
) -> Result<String, SqlHandleError> {
    let mut out = String::with_capacity(sql.len() + params.len() * 8);
    let mut used = vec![false; params.len()];
    let mut next_seq = 0usize;
    let mut copied = 0usize;
    let mut state = State::Normal;
    let mut idx = 0;
    let bytes = sql.as_bytes();

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => {
                let found = match b {
                    b'\'' => {
                        state = State::SingleQuoted;
                        None
                    }
                    b'"' => {
                        state = State::DoubleQuoted;
                        None
                    }
                    _ if is_line_comment_start(bytes, idx) => {
                        state = State::LineComment;
                        None
                    }
                    _ if is_block_comment_start(bytes, idx) => {
                        state = State::BlockComment(1);
                        idx += 1;
                        None
                    }
                    b'$' => {
                        if let Some((tag, advance)) = try_start_dollar_quote(bytes, idx) {
                            state = State::DollarQuoted(tag);
                            idx = advance;
                            None
                        } else if let Some((end, digits)) = scan_digits(bytes, idx + 1) {
                            Some((number(digits)?, end))
                        } else {
                            None
                        }
                    }
                    b'?' => match scan_digits(bytes, idx + 1) {
                        Some((end, digits)) => Some((number(digits)?, end)),
                        None => Some((Placeholder::Next, idx + 1)),
                    },
                    b':' if bytes.get(idx + 1) == Some(&b':') => {
                        idx += 1;
                        None
                    }
                    b':' => scan_identifier(bytes, idx + 1)
                        .map(|end| (Placeholder::Named(&sql[idx + 1..end]), end)),
                    _ => None,
                };

                if let Some((placeholder, end)) = found {
                    let value = resolve(&placeholder, params, &mut used, &mut next_seq)?;
                    out.push_str(&sql[copied..idx]);
                    out.push_str(&render_literal(dialect, value)?);
                    copied = end;
                    idx = end;
                    continue;
                }
            }
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if is_block_comment_end(bytes, idx) {
                    idx += 1;
                    if depth == 1 {
                        state = State::Normal;
                    } else {
                        state = State::BlockComment(depth - 1);
                    }
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && matches_tag(bytes, idx, tag) {
                    let tag_len = tag.len();
                    state = State::Normal;
                    idx += tag_len + 1;
                }
            }
        }
        idx += 1;
    }
    out.push_str(&sql[copied..]);

    if let Some(unused) = used.iter().position(|u| !u) {
        return Err(SqlHandleError::ParameterError(format!(
            "{} parameters supplied but parameter {} is never referenced",
            params.len(),
            unused + 1
        )));
    }
    Ok(out)
}

fn number(digits: &str) -> Result<Placeholder<'static>, SqlHandleError> {
    match digits.parse::<usize>() {
        Ok(n) if n > 0 => Ok(Placeholder::Numbered(n)),
        _ => Err(SqlHandleError::ParameterError(format!(
            "invalid placeholder number {digits}"
        ))),
    }
}

fn resolve<'p>(
    placeholder: &Placeholder<'_>,
    params: &'p Params,
    used: &mut [bool],
    next_seq: &mut usize,
) -> Result<&'p Value, SqlHandleError> {
    match (placeholder, params) {
        (Placeholder::Next, Params::Positional(values)) => {
            let idx = *next_seq;
            *next_seq += 1;
            mark(values.get(idx), idx, used)
                .ok_or_else(|| missing(format!("placeholder #{}", idx + 1), params))
        }
        (Placeholder::Numbered(n), Params::Positional(values)) => {
            let idx = n - 1;
            mark(values.get(idx), idx, used)
                .ok_or_else(|| missing(format!("placeholder {n}"), params))
        }
        (Placeholder::Named(name), Params::Named(pairs)) => {
            let idx = pairs
                .iter()
                .position(|(key, _)| key.trim_start_matches(':') == *name);
            idx.and_then(|i| mark(pairs.get(i).map(|(_, v)| v), i, used))
                .ok_or_else(|| missing(format!("named placeholder :{name}"), params))
        }
        (Placeholder::Named(name), Params::Positional(_)) => Err(SqlHandleError::ParameterError(
            format!("named placeholder :{name} used with positional parameters"),
        )),
        (_, Params::Named(_)) => Err(SqlHandleError::ParameterError(
            "positional placeholder used with named parameters".to_string(),
        )),
    }
}

fn mark<'p>(value: Option<&'p Value>, idx: usize, used: &mut [bool]) -> Option<&'p Value> {
    let value = value?;
    used[idx] = true;
    Some(value)
}

fn missing(what: String, params: &Params) -> SqlHandleError {
    SqlHandleError::ParameterError(format!(
        "{what} has no matching parameter ({} supplied)",
        params.len()
    ))
}

/// Literal form of a bound value. Unlike the statement builders, numbers and booleans stay
/// unquoted so the server sees the same types it would have been bound with.
fn render_literal(dialect: DatabaseType, value: &Value) -> Result<String, SqlHandleError> {
    match value {
        // keeps `a - ?` from turning into a `--` comment
        Value::Int(i) if *i < 0 => Ok(format!("({i})")),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) if f.is_finite() && *f < 0.0 => Ok(format!("({f:?})")),
        Value::Float(f) if f.is_finite() => Ok(format!("{f:?}")),
        Value::Bool(b) => Ok(bool_literal(dialect, *b).to_string()),
        Value::Json(json) => Ok(quote_str(dialect, &json.to_string())),
        Value::Blob(bytes) => Ok(blob_literal(dialect, bytes)),
        Value::Null | Value::Text(_) | Value::Timestamp(_) | Value::Float(_) => {
            quote_value(dialect, value)
        }
    }
}

fn bool_literal(dialect: DatabaseType, value: bool) -> &'static str {
    match dialect {
        #[cfg(feature = "sqlite")]
        DatabaseType::Sqlite => {
            if value {
                "1"
            } else {
                "0"
            }
        }
        #[cfg(feature = "postgres")]
        DatabaseType::Postgres => {
            if value {
                "TRUE"
            } else {
                "FALSE"
            }
        }
    }
}

fn blob_literal(dialect: DatabaseType, bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(hex, "{byte:02X}");
    }
    match dialect {
        #[cfg(feature = "sqlite")]
        DatabaseType::Sqlite => format!("X'{hex}'"),
        #[cfg(feature = "postgres")]
        DatabaseType::Postgres => format!("{}::bytea", quote_str(dialect, &format!("\\x{hex}"))),
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;

    const D: DatabaseType = DatabaseType::Sqlite;

    fn positional(values: Vec<Value>) -> Params {
        Params::Positional(values)
    }

    #[test]
    fn fills_sequential_and_numbered_placeholders() {
        let sql = "select * from t where a = ? and b = ?2";
        let out = interpolate_params(
            sql,
            &positional(vec![Value::Int(1), Value::Text("x'y".into())]),
            D,
        )
        .unwrap();
        assert_eq!(out, "select * from t where a = 1 and b = 'x''y'");
    }

    #[test]
    fn skips_literals_comments_and_casts() {
        let sql = "select '?', \"a?\", x::text -- ?\n/* :c ? */ from t where a = :a";
        let out = interpolate_params(sql, &Params::named([(":a", Value::Null)]), D).unwrap();
        assert_eq!(
            out,
            "select '?', \"a?\", x::text -- ?\n/* :c ? */ from t where a = NULL"
        );
    }

    #[test]
    fn skips_dollar_quoted_blocks() {
        let sql = "$foo$ select $1 $foo$ where a = $1";
        let out = interpolate_params(sql, &positional(vec![Value::Int(7)]), D).unwrap();
        assert_eq!(out, "$foo$ select $1 $foo$ where a = 7");
    }

    #[test]
    fn keeps_non_ascii_text_intact() {
        let sql = "insert into t (a, b) values ('héllo', ?)";
        let out = interpolate_params(sql, &positional(vec![Value::Text("wörld".into())]), D)
            .unwrap();
        assert_eq!(out, "insert into t (a, b) values ('héllo', 'wörld')");
    }

    #[test]
    fn renders_typed_literals() {
        let sql = "values (?, ?, ?, ?, ?)";
        let out = interpolate_params(
            sql,
            &positional(vec![
                Value::Int(-3),
                Value::Float(2.5),
                Value::Bool(true),
                Value::Blob(vec![0xde, 0xad]),
                Value::Json(serde_json::json!({"k": 1})),
            ]),
            D,
        )
        .unwrap();
        assert_eq!(out, r#"values ((-3), 2.5, 1, X'DEAD', '{"k":1}')"#);
    }

    #[test]
    fn count_mismatches_are_parameter_errors() {
        let too_few = interpolate_params("select ?, ?", &positional(vec![Value::Int(1)]), D);
        assert!(matches!(too_few, Err(SqlHandleError::ParameterError(_))));

        let too_many = interpolate_params(
            "select ?",
            &positional(vec![Value::Int(1), Value::Int(2)]),
            D,
        );
        assert!(matches!(too_many, Err(SqlHandleError::ParameterError(_))));

        let mixed = interpolate_params("select :a", &positional(vec![Value::Int(1)]), D);
        assert!(matches!(mixed, Err(SqlHandleError::ParameterError(_))));
    }

    #[test]
    fn reused_numbered_placeholder_reads_same_value() {
        let out = interpolate_params("select ?1, ?1", &positional(vec![Value::Int(4)]), D)
            .unwrap();
        assert_eq!(out, "select 4, 4");
    }
}
