use crate::error::SqlHandleError;
use crate::params::Params;

use super::{Database, DriverConnection};

impl Database {
    /// Run a write and return the number of rows it affected (0 when nothing matched).
    ///
    /// # Errors
    /// Returns `SqlHandleError::QueryError` for driver failures and
    /// `SqlHandleError::ParameterError` for parameters the backend cannot bind.
    pub async fn exec<P>(&mut self, sql: &str, params: P) -> Result<usize, SqlHandleError>
    where
        P: Into<Params>,
    {
        let params = params.into();
        let result = self.run_exec(sql, params).await;
        self.surface("exec", result)
    }

    /// Run an insert and return the id the connection generated last, as the driver
    /// reports it.
    ///
    /// # Errors
    /// As for [`Database::exec`].
    pub async fn insert<P>(&mut self, sql: &str, params: P) -> Result<String, SqlHandleError>
    where
        P: Into<Params>,
    {
        let params = params.into();
        let result = match self.run_exec(sql, params).await {
            Ok(_) => self.fetch_last_insert_id().await,
            Err(err) => Err(err),
        };
        self.surface("insert", result)
    }

    /// The most recently generated row id (`SQLite`) or sequence value (`PostgreSQL`).
    ///
    /// # Errors
    /// Returns `SqlHandleError::QueryError` if the driver cannot report one, e.g. no
    /// sequence has been used yet in this `PostgreSQL` session.
    pub async fn last_insert_id(&mut self) -> Result<String, SqlHandleError> {
        let result = self.fetch_last_insert_id().await;
        self.surface("last_insert_id", result)
    }

    async fn run_exec(&mut self, sql: &str, params: Params) -> Result<usize, SqlHandleError> {
        let (sql, params) = self.prepare_text(sql, params)?;
        tracing::trace!(sql = %sql, params = params.len(), prepared = !params.is_empty(), "exec");

        match &self.driver {
            #[cfg(feature = "sqlite")]
            DriverConnection::Sqlite(conn) => conn.exec(&sql, &params).await,
            #[cfg(feature = "postgres")]
            DriverConnection::Postgres(conn) => conn.exec(&sql, &params).await,
        }
    }

    async fn fetch_last_insert_id(&mut self) -> Result<String, SqlHandleError> {
        match &self.driver {
            #[cfg(feature = "sqlite")]
            DriverConnection::Sqlite(conn) => conn.last_insert_id().await,
            #[cfg(feature = "postgres")]
            DriverConnection::Postgres(conn) => conn.last_insert_id().await,
        }
    }
}
