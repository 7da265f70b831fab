use crate::emulation::interpolate_params;
use crate::error::SqlHandleError;
use crate::params::Params;
use crate::results::{Cursor, FetchedRow};
use crate::types::{FetchMode, Value};

use super::{Database, DriverConnection};

impl Database {
    /// Run a statement and return a cursor over its rows.
    ///
    /// Without parameters the text runs as given; otherwise it is prepared and the
    /// parameters are bound (or rendered client-side when prepares are emulated). A lone
    /// scalar counts as a one-element parameter list.
    ///
    /// # Errors
    /// Returns `SqlHandleError::QueryError` for driver failures and
    /// `SqlHandleError::ParameterError` for parameters the backend cannot bind.
    pub async fn query<P>(&mut self, sql: &str, params: P) -> Result<Cursor, SqlHandleError>
    where
        P: Into<Params>,
    {
        let params = params.into();
        let result = self.select(sql, params).await;
        self.surface("query", result)
    }

    /// Run a query and collect every row in the handle's default fetch mode.
    ///
    /// # Errors
    /// As for [`Database::query`].
    pub async fn fetch_all<P>(
        &mut self,
        sql: &str,
        params: P,
    ) -> Result<Vec<FetchedRow>, SqlHandleError>
    where
        P: Into<Params>,
    {
        let mode = self.options.default_fetch_mode;
        self.fetch_all_with_mode(sql, params, mode).await
    }

    /// Run a query and collect every row shaped by `mode`.
    ///
    /// # Errors
    /// As for [`Database::query`].
    pub async fn fetch_all_with_mode<P>(
        &mut self,
        sql: &str,
        params: P,
        mode: FetchMode,
    ) -> Result<Vec<FetchedRow>, SqlHandleError>
    where
        P: Into<Params>,
    {
        let cursor = self.query(sql, params).await?;
        Ok(cursor.fetch_all_with_mode(mode))
    }

    /// Run a query and collect the first column of every row.
    ///
    /// # Errors
    /// As for [`Database::query`].
    pub async fn fetch_column<P>(&mut self, sql: &str, params: P) -> Result<Vec<Value>, SqlHandleError>
    where
        P: Into<Params>,
    {
        let cursor = self.query(sql, params).await?;
        Ok(cursor.fetch_column())
    }

    async fn select(&mut self, sql: &str, params: Params) -> Result<Cursor, SqlHandleError> {
        let (sql, params) = self.prepare_text(sql, params)?;
        tracing::trace!(sql = %sql, params = params.len(), prepared = !params.is_empty(), "query");

        let cursor = match &self.driver {
            #[cfg(feature = "sqlite")]
            DriverConnection::Sqlite(conn) => conn.select(&sql, &params).await?,
            #[cfg(feature = "postgres")]
            DriverConnection::Postgres(conn) => conn.select(&sql, &params).await?,
        };
        Ok(cursor.with_default_mode(self.options.default_fetch_mode))
    }

    /// With emulated prepares the parameters are rendered into the text and nothing is
    /// left to bind.
    pub(super) fn prepare_text(
        &self,
        sql: &str,
        params: Params,
    ) -> Result<(String, Params), SqlHandleError> {
        if self.options.emulate_prepares && !params.is_empty() {
            let rendered = interpolate_params(sql, &params, self.database_type())?;
            return Ok((rendered, Params::none()));
        }
        Ok((sql.to_string(), params))
    }
}
