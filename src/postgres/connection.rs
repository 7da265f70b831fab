use std::fmt;

use tokio_postgres::{Client, NoTls, SimpleQueryMessage};

use crate::error::SqlHandleError;
use crate::params::Params;
use crate::results::Cursor;

use super::params::convert;
use super::query::{build_cursor, build_cursor_from_simple};

/// A connected `PostgreSQL` client.
///
/// The wire connection runs on its own tokio task; it ends when the client is dropped.
pub struct PostgresConnection {
    client: Client,
    host: String,
    port: u16,
    dbname: String,
}

impl PostgresConnection {
    /// Connect without TLS.
    ///
    /// # Errors
    /// Returns `SqlHandleError::ConnectionError` if the server is unreachable or rejects
    /// the credentials.
    pub async fn connect(
        host: &str,
        port: u16,
        dbname: &str,
        user: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, SqlHandleError> {
        let mut config = tokio_postgres::Config::new();
        config
            .host(host)
            .port(port)
            .dbname(dbname)
            .application_name(env!("CARGO_PKG_NAME"));
        if let Some(user) = user {
            config.user(user);
        }
        if let Some(password) = password {
            config.password(password);
        }

        let (client, connection) = config
            .connect(NoTls)
            .await
            .map_err(SqlHandleError::postgres_connection)?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "postgres connection closed with error");
            }
        });

        Ok(Self {
            client,
            host: host.to_string(),
            port,
            dbname: dbname.to_string(),
        })
    }

    /// Borrow the underlying client.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut Client {
        &mut self.client
    }

    /// Without parameters the text goes over the simple query protocol unprepared, and the
    /// values come back as the text the server renders. With parameters it is prepared:
    /// statements that return rows are collected into the cursor, the rest report the
    /// server's affected-row count through it.
    pub(crate) async fn select(
        &self,
        sql: &str,
        params: &Params,
    ) -> Result<Cursor, SqlHandleError> {
        if params.is_empty() {
            let messages = self
                .client
                .simple_query(sql)
                .await
                .map_err(SqlHandleError::postgres_query)?;
            return Ok(build_cursor_from_simple(&messages));
        }

        let refs = convert(params)?;
        let stmt = self
            .client
            .prepare(sql)
            .await
            .map_err(SqlHandleError::postgres_query)?;

        if stmt.columns().is_empty() {
            let affected = self
                .client
                .execute(&stmt, &refs)
                .await
                .map_err(SqlHandleError::postgres_query)?;
            let mut cursor = Cursor::new(Vec::new(), 0);
            cursor.set_rows_affected(affected_count(affected)?);
            return Ok(cursor);
        }

        let rows = self
            .client
            .query(&stmt, &refs)
            .await
            .map_err(SqlHandleError::postgres_query)?;
        build_cursor(&stmt, &rows)
    }

    /// Without parameters the text goes over the simple query protocol, so it may hold
    /// several statements; the count is the last one the server reports.
    pub(crate) async fn exec(&self, sql: &str, params: &Params) -> Result<usize, SqlHandleError> {
        if params.is_empty() {
            let messages = self
                .client
                .simple_query(sql)
                .await
                .map_err(SqlHandleError::postgres_query)?;
            let affected = messages
                .iter()
                .rev()
                .find_map(|message| match message {
                    SimpleQueryMessage::CommandComplete(n) => Some(*n),
                    _ => None,
                })
                .unwrap_or(0);
            return affected_count(affected);
        }

        let refs = convert(params)?;
        let stmt = self
            .client
            .prepare(sql)
            .await
            .map_err(SqlHandleError::postgres_query)?;
        let affected = self
            .client
            .execute(&stmt, &refs)
            .await
            .map_err(SqlHandleError::postgres_query)?;
        affected_count(affected)
    }

    /// Value of the session's most recent sequence `nextval`, as text.
    pub(crate) async fn last_insert_id(&self) -> Result<String, SqlHandleError> {
        let row = self
            .client
            .query_one("SELECT LASTVAL()::text", &[])
            .await
            .map_err(SqlHandleError::postgres_query)?;
        row.try_get::<_, String>(0)
            .map_err(SqlHandleError::postgres_query)
    }
}

fn affected_count(n: u64) -> Result<usize, SqlHandleError> {
    usize::try_from(n).map_err(|e| {
        SqlHandleError::Other(format!("postgres affected rows conversion error: {e}"))
    })
}

impl fmt::Debug for PostgresConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConnection")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .finish_non_exhaustive()
    }
}
