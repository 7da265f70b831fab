//! The database handle: one connection, opened against the embedded engine or a server.
//!
//! ```rust,no_run
//! use sql_handle::prelude::*;
//!
//! # async fn demo() -> Result<(), SqlHandleError> {
//! let mut db = Database::connect("sqlite", "/tmp/app.db", None, None).await?;
//! db.exec("create table if not exists foo (mytext varchar, mydate datetime)", ()).await?;
//!
//! let cols = column_values! { "mytext" => "Bar", "mydate" => Value::Null };
//! let sql = db.make_insert("foo", &cols)?;
//! db.exec(&sql, ()).await?;
//!
//! for row in db.fetch_all("select * from foo where mytext = ?", "Bar").await? {
//!     println!("{:?}", row.as_assoc().and_then(|r| r.get("mydate")));
//! }
//! # Ok(())
//! # }
//! ```

mod connect;
mod exec;
mod query;

#[cfg(feature = "postgres")]
use crate::postgres::PostgresConnection;
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteConnection;

use crate::columns::ColumnValues;
use crate::config::{ConnectOptions, Dsn};
use crate::error::SqlHandleError;
use crate::statement;
use crate::types::{DatabaseType, ErrorMode};

/// The backend connection behind a [`Database`].
#[derive(Debug)]
pub enum DriverConnection {
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteConnection),
    #[cfg(feature = "postgres")]
    Postgres(PostgresConnection),
}

impl DriverConnection {
    #[must_use]
    pub fn database_type(&self) -> DatabaseType {
        match self {
            #[cfg(feature = "sqlite")]
            DriverConnection::Sqlite(_) => DatabaseType::Sqlite,
            #[cfg(feature = "postgres")]
            DriverConnection::Postgres(_) => DatabaseType::Postgres,
        }
    }
}

/// A single open connection plus the policy it was opened with.
///
/// Every operation takes `&mut self`, so a handle runs one statement at a time. Open more
/// handles for concurrent work.
#[derive(Debug)]
pub struct Database {
    driver: DriverConnection,
    options: ConnectOptions,
    dsn: Dsn,
}

impl Database {
    #[must_use]
    pub fn database_type(&self) -> DatabaseType {
        self.driver.database_type()
    }

    #[must_use]
    pub fn dsn(&self) -> &Dsn {
        &self.dsn
    }

    #[must_use]
    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }

    /// The underlying driver connection, for anything the handle does not wrap.
    pub fn driver_mut(&mut self) -> &mut DriverConnection {
        &mut self.driver
    }

    /// Quote `raw` as a string literal using this connection's dialect.
    #[must_use]
    pub fn quote(&self, raw: &str) -> String {
        statement::quote_str(self.database_type(), raw)
    }

    /// `insert into <table> (<cols>)values(<values>)`; see [`statement::make_insert`].
    ///
    /// # Errors
    /// Returns `SqlHandleError::ValidationError` if a value is not a scalar.
    pub fn make_insert(&self, table: &str, columns: &ColumnValues) -> Result<String, SqlHandleError> {
        statement::make_insert(self.database_type(), table, columns)
    }

    /// `replace into <table> (<cols>)values(<values>)`; see [`statement::make_replace`].
    ///
    /// # Errors
    /// Returns `SqlHandleError::ValidationError` if a value is not a scalar.
    pub fn make_replace(
        &self,
        table: &str,
        columns: &ColumnValues,
    ) -> Result<String, SqlHandleError> {
        statement::make_replace(self.database_type(), table, columns)
    }

    /// `update <table> set ...` with an optional verbatim ` where` condition; see
    /// [`statement::make_update`].
    ///
    /// # Errors
    /// Returns `SqlHandleError::ValidationError` if a value is not a scalar.
    pub fn make_update(
        &self,
        table: &str,
        columns: &ColumnValues,
        condition: Option<&str>,
    ) -> Result<String, SqlHandleError> {
        statement::make_update(self.database_type(), table, columns, condition)
    }

    fn surface<T>(
        &self,
        operation: &'static str,
        result: Result<T, SqlHandleError>,
    ) -> Result<T, SqlHandleError> {
        warn_on_error(self.options.error_mode, operation, result)
    }
}

fn warn_on_error<T>(
    error_mode: ErrorMode,
    operation: &'static str,
    result: Result<T, SqlHandleError>,
) -> Result<T, SqlHandleError> {
    if let (ErrorMode::Warn, Err(err)) = (error_mode, &result) {
        tracing::warn!(operation, code = ?err.code(), error = %err, "database operation failed");
    }
    result
}
