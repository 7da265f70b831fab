use crate::config::{ConnectOptions, ConnectParams, DatabaseBuilder, Dsn};
use crate::error::SqlHandleError;

use super::{Database, DriverConnection, warn_on_error};

impl Database {
    /// Open a handle with the default options.
    ///
    /// A `host` of `"sqlite"` opens `database` as an embedded database file; anything else
    /// connects to a `PostgreSQL` server at `host` (optionally `host:port`).
    ///
    /// # Errors
    /// Returns `SqlHandleError::ConfigError` for unusable parameters and
    /// `SqlHandleError::ConnectionError` if the driver cannot connect.
    pub async fn connect(
        host: &str,
        database: &str,
        user: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, SqlHandleError> {
        let params = ConnectParams {
            host: host.to_string(),
            database: database.to_string(),
            user: user.map(str::to_string),
            password: password.map(str::to_string),
        };
        Self::open(params, ConnectOptions::default()).await
    }

    /// Start a [`DatabaseBuilder`] for credentials and non-default options.
    #[must_use]
    pub fn builder(host: impl Into<String>, database: impl Into<String>) -> DatabaseBuilder {
        DatabaseBuilder::new(host, database)
    }

    /// Open a handle from explicit parameters and options.
    ///
    /// # Errors
    /// Returns `SqlHandleError::ConfigError` for unusable parameters and
    /// `SqlHandleError::ConnectionError` if the driver cannot connect.
    pub async fn open(
        params: ConnectParams,
        options: ConnectOptions,
    ) -> Result<Self, SqlHandleError> {
        let result = Self::open_inner(params, options).await;
        warn_on_error(options.error_mode, "connect", result)
    }

    async fn open_inner(
        params: ConnectParams,
        options: ConnectOptions,
    ) -> Result<Self, SqlHandleError> {
        let dsn = params.dsn()?;
        let driver = match &dsn {
            #[cfg(feature = "sqlite")]
            Dsn::Sqlite { path } => {
                DriverConnection::Sqlite(crate::sqlite::SqliteConnection::open(path).await?)
            }
            #[cfg(feature = "postgres")]
            Dsn::Postgres {
                host,
                port,
                dbname,
                user,
                password,
            } => DriverConnection::Postgres(
                crate::postgres::PostgresConnection::connect(
                    host,
                    *port,
                    dbname,
                    user.as_deref(),
                    password.as_deref(),
                )
                .await?,
            ),
        };

        tracing::debug!(backend = ?driver.database_type(), dsn = %dsn, "database connected");
        Ok(Self {
            driver,
            options,
            dsn,
        })
    }
}
