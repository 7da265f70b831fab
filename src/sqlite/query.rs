use rusqlite::types::Value as SqliteValue;
use rusqlite::{Connection, Statement, ToSql};

use crate::error::SqlHandleError;
use crate::results::Cursor;
use crate::types::Value;

use super::params::{SqliteParams, named_refs, positional_refs};

/// Extract a handle `Value` from a `SQLite` row.
///
/// # Errors
///
/// Returns `SqlHandleError::QueryError` if the column cannot be read.
pub fn sqlite_extract_value(row: &rusqlite::Row, idx: usize) -> Result<Value, SqlHandleError> {
    let value: SqliteValue = row.get(idx).map_err(SqlHandleError::sqlite_query)?;
    Ok(match value {
        SqliteValue::Null => Value::Null,
        SqliteValue::Integer(i) => Value::Int(i),
        SqliteValue::Real(f) => Value::Float(f),
        SqliteValue::Text(s) => Value::Text(s),
        SqliteValue::Blob(b) => Value::Blob(b),
    })
}

fn build_cursor<P: rusqlite::Params>(
    conn: &Connection,
    stmt: &mut Statement<'_>,
    params: P,
) -> Result<Cursor, SqlHandleError> {
    let column_names: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    let column_count = column_names.len();
    let mut cursor = Cursor::new(column_names, 16);

    let mut rows = stmt.query(params).map_err(SqlHandleError::sqlite_query)?;
    while let Some(row) = rows.next().map_err(SqlHandleError::sqlite_query)? {
        let mut values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            values.push(sqlite_extract_value(row, idx)?);
        }
        cursor.push_values(values);
    }
    drop(rows);

    if !stmt.readonly() {
        cursor.set_rows_affected(changes(conn)?);
    }
    Ok(cursor)
}

/// Run a statement and collect its rows. `None` means no parameters: nothing is bound.
///
/// # Errors
/// Returns `SqlHandleError::QueryError` if preparing or stepping the statement fails.
pub fn select(
    conn: &Connection,
    sql: &str,
    params: Option<&SqliteParams>,
) -> Result<Cursor, SqlHandleError> {
    let mut stmt = conn.prepare(sql).map_err(SqlHandleError::sqlite_query)?;
    match params {
        None => {
            let empty: &[&dyn ToSql] = &[];
            build_cursor(conn, &mut stmt, empty)
        }
        Some(SqliteParams::Positional(values)) => {
            let refs = positional_refs(values);
            build_cursor(conn, &mut stmt, &refs[..])
        }
        Some(SqliteParams::Named(pairs)) => {
            let refs = named_refs(pairs);
            build_cursor(conn, &mut stmt, &refs[..])
        }
    }
}

/// Run a write and return the affected-row count.
///
/// Without parameters the text goes through `execute_batch`, so it may hold several
/// statements; the count is then the one SQLite reports for the last write.
///
/// # Errors
/// Returns `SqlHandleError::QueryError` if the statement fails.
pub fn exec(
    conn: &Connection,
    sql: &str,
    params: Option<&SqliteParams>,
) -> Result<usize, SqlHandleError> {
    let Some(params) = params else {
        conn.execute_batch(sql)
            .map_err(SqlHandleError::sqlite_query)?;
        return changes(conn);
    };

    let mut stmt = conn.prepare(sql).map_err(SqlHandleError::sqlite_query)?;
    let affected = match params {
        SqliteParams::Positional(values) => stmt.execute(&positional_refs(values)[..]),
        SqliteParams::Named(pairs) => stmt.execute(&named_refs(pairs)[..]),
    };
    affected.map_err(SqlHandleError::sqlite_query)
}

fn changes(conn: &Connection) -> Result<usize, SqlHandleError> {
    usize::try_from(conn.changes())
        .map_err(|e| SqlHandleError::Other(format!("sqlite changes conversion error: {e}")))
}
