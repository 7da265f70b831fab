use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlHandleError {
    #[error("Connection error: {message}")]
    ConnectionError {
        message: String,
        code: Option<String>,
    },

    #[error("Query error: {message}")]
    QueryError {
        message: String,
        code: Option<String>,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Other database error: {0}")]
    Other(String),
}

impl SqlHandleError {
    /// Driver-reported error code (SQLite extended result code or PostgreSQL SQLSTATE).
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            SqlHandleError::ConnectionError { code, .. } | SqlHandleError::QueryError { code, .. } => {
                code.as_deref()
            }
            _ => None,
        }
    }
}

#[cfg(feature = "sqlite")]
fn sqlite_code(err: &rusqlite::Error) -> Option<String> {
    match err {
        rusqlite::Error::SqliteFailure(ffi_err, _) => Some(ffi_err.extended_code.to_string()),
        _ => None,
    }
}

#[cfg(feature = "sqlite")]
impl SqlHandleError {
    pub(crate) fn sqlite_connection(err: rusqlite::Error) -> Self {
        SqlHandleError::ConnectionError {
            code: sqlite_code(&err),
            message: err.to_string(),
        }
    }

    pub(crate) fn sqlite_query(err: rusqlite::Error) -> Self {
        SqlHandleError::QueryError {
            code: sqlite_code(&err),
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "postgres")]
fn postgres_parts(err: &tokio_postgres::Error) -> (String, Option<String>) {
    let code = err.code().map(|state| state.code().to_string());
    let message = match err.as_db_error() {
        Some(db_err) => db_err.message().to_string(),
        None => err.to_string(),
    };
    (message, code)
}

#[cfg(feature = "postgres")]
impl SqlHandleError {
    pub(crate) fn postgres_connection(err: tokio_postgres::Error) -> Self {
        let (message, code) = postgres_parts(&err);
        SqlHandleError::ConnectionError { message, code }
    }

    pub(crate) fn postgres_query(err: tokio_postgres::Error) -> Self {
        let (message, code) = postgres_parts(&err);
        SqlHandleError::QueryError { message, code }
    }
}
