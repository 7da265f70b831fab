use crate::columns::ColumnValues;
use crate::error::SqlHandleError;
use crate::types::DatabaseType;

use super::quote::quote_value;

/// Build `insert into <table> (<cols>)values(<quoted values>)`.
///
/// The missing space before `values` is part of the output format and stays as is.
///
/// ```rust
/// # use sql_handle::SqlHandleError;
/// # #[cfg(feature = "sqlite")]
/// # {
/// use sql_handle::prelude::*;
/// use sql_handle::statement::make_insert;
///
/// let cols = ColumnValues::new().with("mytext", "Bar").with("mydate", Value::Null);
/// let sql = make_insert(DatabaseType::Sqlite, "foo", &cols)?;
/// assert_eq!(sql, "insert into foo (mytext, mydate)values('Bar', NULL)");
/// # }
/// # Ok::<(), SqlHandleError>(())
/// ```
///
/// # Errors
/// Returns `SqlHandleError::ValidationError` if a value is not a scalar.
pub fn make_insert(
    dialect: DatabaseType,
    table: &str,
    columns: &ColumnValues,
) -> Result<String, SqlHandleError> {
    into_statement("insert", dialect, table, columns)
}

/// Build `replace into <table> (<cols>)values(<quoted values>)`.
///
/// # Errors
/// Returns `SqlHandleError::ValidationError` if a value is not a scalar.
pub fn make_replace(
    dialect: DatabaseType,
    table: &str,
    columns: &ColumnValues,
) -> Result<String, SqlHandleError> {
    into_statement("replace", dialect, table, columns)
}

/// Build `update <table> set <col> = <quoted>, ...`, followed by ` where <condition>`
/// when a non-empty condition is given. The condition is appended verbatim.
///
/// # Errors
/// Returns `SqlHandleError::ValidationError` if a value is not a scalar.
pub fn make_update(
    dialect: DatabaseType,
    table: &str,
    columns: &ColumnValues,
    condition: Option<&str>,
) -> Result<String, SqlHandleError> {
    let assignments = columns
        .iter()
        .map(|(column, value)| Ok(format!("{column} = {}", quote_value(dialect, value)?)))
        .collect::<Result<Vec<_>, SqlHandleError>>()?;

    let mut sql = format!("update {table} set {}", assignments.join(", "));
    if let Some(condition) = condition.filter(|c| !c.is_empty()) {
        sql.push_str(" where ");
        sql.push_str(condition);
    }
    Ok(sql)
}

fn into_statement(
    verb: &str,
    dialect: DatabaseType,
    table: &str,
    columns: &ColumnValues,
) -> Result<String, SqlHandleError> {
    let names = columns.columns().collect::<Vec<_>>().join(", ");
    let values = columns
        .values()
        .map(|value| quote_value(dialect, value))
        .collect::<Result<Vec<_>, _>>()?
        .join(", ");
    Ok(format!("{verb} into {table} ({names})values({values})"))
}
