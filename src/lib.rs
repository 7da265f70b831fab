//! A small database handle over an embedded `SQLite` file or a `PostgreSQL` server.
//!
//! Open a [`Database`], run SQL through the `query` / `fetch_*` / `exec` / `insert`
//! passthroughs, and generate INSERT, REPLACE and UPDATE text from an ordered
//! [`ColumnValues`] mapping with the `make_*` builders.
//!
//! ```rust,no_run
//! use sql_handle::prelude::*;
//!
//! # async fn demo() -> Result<(), SqlHandleError> {
//! let mut db = Database::builder("localhost", "app")
//!     .user("app")
//!     .password("secret")
//!     .error_mode(ErrorMode::Warn)
//!     .connect()
//!     .await?;
//! let ids = db.fetch_column("select id from foo where mytext = $1", "Bar").await?;
//! # let _ = ids;
//! # Ok(())
//! # }
//! ```

#[cfg(not(any(feature = "sqlite", feature = "postgres")))]
compile_error!("enable at least one backend feature: `sqlite` or `postgres`");

pub mod columns;
pub mod config;
pub mod emulation;
pub mod error;
pub mod handle;
pub mod params;
pub mod prelude;
pub mod results;
pub mod statement;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use columns::ColumnValues;
pub use config::{ConnectOptions, ConnectParams, DatabaseBuilder, Dsn};
pub use error::SqlHandleError;
pub use handle::{Database, DriverConnection};
pub use params::Params;
pub use results::{Cursor, FetchedRow, Row};
pub use types::{DatabaseType, ErrorMode, FetchMode, Value};
