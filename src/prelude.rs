//! Convenient imports for common functionality.
//!
//! This module re-exports the types most callers need, plus the `column_values!` macro.

pub use crate::column_values;
pub use crate::columns::ColumnValues;
pub use crate::config::{ConnectOptions, ConnectParams, DatabaseBuilder, Dsn};
pub use crate::error::SqlHandleError;
pub use crate::handle::{Database, DriverConnection};
pub use crate::params::Params;
pub use crate::results::{Cursor, FetchedRow, Row};
pub use crate::types::{DatabaseType, ErrorMode, FetchMode, Value};

#[cfg(feature = "postgres")]
pub use crate::postgres::PostgresConnection;
#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteConnection;
