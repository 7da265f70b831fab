use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::SqlHandleError;
use crate::params::Params;
use crate::results::Cursor;

use super::params::SqliteParams;
use super::query;

pub type SharedSqliteConnection = Arc<Mutex<rusqlite::Connection>>;

/// An open `SQLite` database.
///
/// rusqlite is blocking, so every call is shipped to tokio's blocking pool. The mutex only
/// exists to move the connection there; the owning handle is `&mut`-exclusive.
pub struct SqliteConnection {
    conn: SharedSqliteConnection,
    path: String,
}

impl SqliteConnection {
    /// Open (or create) the database file at `path`; `:memory:` opens a private in-memory
    /// database.
    ///
    /// # Errors
    /// Returns `SqlHandleError::ConnectionError` if `SQLite` cannot open the file.
    pub async fn open(path: &str) -> Result<Self, SqlHandleError> {
        let path_owned = path.to_owned();
        let conn = tokio::task::spawn_blocking(move || rusqlite::Connection::open(path_owned))
            .await
            .map_err(|e| {
                SqlHandleError::Other(format!("sqlite spawn_blocking join error: {e}"))
            })?
            .map_err(SqlHandleError::sqlite_connection)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: path.to_owned(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Run `func` against the raw rusqlite connection.
    ///
    /// # Errors
    /// Returns whatever `func` returns, or `SqlHandleError::Other` if the blocking task panics.
    pub async fn with_connection<F, R>(&self, func: F) -> Result<R, SqlHandleError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> Result<R, SqlHandleError> + Send + 'static,
        R: Send + 'static,
    {
        run_blocking(Arc::clone(&self.conn), func).await
    }

    pub(crate) async fn select(
        &self,
        sql: &str,
        params: &Params,
    ) -> Result<Cursor, SqlHandleError> {
        let sql_owned = sql.to_owned();
        let params_owned = converted(params);
        self.with_connection(move |conn| query::select(conn, &sql_owned, params_owned.as_ref()))
            .await
    }

    pub(crate) async fn exec(&self, sql: &str, params: &Params) -> Result<usize, SqlHandleError> {
        let sql_owned = sql.to_owned();
        let params_owned = converted(params);
        self.with_connection(move |conn| query::exec(conn, &sql_owned, params_owned.as_ref()))
            .await
    }

    pub(crate) async fn last_insert_id(&self) -> Result<String, SqlHandleError> {
        self.with_connection(|conn| Ok(conn.last_insert_rowid().to_string()))
            .await
    }
}

fn converted(params: &Params) -> Option<SqliteParams> {
    (!params.is_empty()).then(|| SqliteParams::convert(params))
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

pub(crate) async fn run_blocking<F, R>(
    conn: SharedSqliteConnection,
    func: F,
) -> Result<R, SqlHandleError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, SqlHandleError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await
    .map_err(|e| SqlHandleError::Other(format!("sqlite spawn_blocking join error: {e}")))?
}
