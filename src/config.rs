use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SqlHandleError;
use crate::handle::Database;
use crate::types::{DatabaseType, ErrorMode, FetchMode};

/// Host value that selects the embedded `SQLite` engine; the database name is then a file path.
pub const EMBEDDED_HOST: &str = "sqlite";

/// Character set every server connection is opened with.
pub const SERVER_CHARSET: &str = "utf8";

pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// Connection-wide policy applied to every handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectOptions {
    pub error_mode: ErrorMode,
    pub default_fetch_mode: FetchMode,
    /// Render bind parameters into the SQL text instead of letting the server bind them.
    pub emulate_prepares: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Raise,
            default_fetch_mode: FetchMode::Assoc,
            emulate_prepares: false,
        }
    }
}

impl ConnectOptions {
    #[must_use]
    pub fn with_error_mode(mut self, error_mode: ErrorMode) -> Self {
        self.error_mode = error_mode;
        self
    }

    #[must_use]
    pub fn with_fetch_mode(mut self, fetch_mode: FetchMode) -> Self {
        self.default_fetch_mode = fetch_mode;
        self
    }

    #[must_use]
    pub fn with_emulated_prepares(mut self, emulate_prepares: bool) -> Self {
        self.emulate_prepares = emulate_prepares;
        self
    }
}

/// What the caller hands over to open a handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectParams {
    pub host: String,
    pub database: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl ConnectParams {
    #[must_use]
    pub fn new(host: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            database: database.into(),
            user: None,
            password: None,
        }
    }

    /// Read `DB_HOST`, `DB_NAME`, `DB_USER` and `DB_PASSWORD` from the environment.
    ///
    /// # Errors
    /// Returns `SqlHandleError::ConfigError` if `DB_HOST` or `DB_NAME` is unset.
    pub fn from_env() -> Result<Self, SqlHandleError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, SqlHandleError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("DB_HOST")
            .ok_or_else(|| SqlHandleError::ConfigError("DB_HOST is required".to_string()))?;
        let database = lookup("DB_NAME")
            .ok_or_else(|| SqlHandleError::ConfigError("DB_NAME is required".to_string()))?;
        Ok(Self {
            host,
            database,
            user: lookup("DB_USER"),
            password: lookup("DB_PASSWORD"),
        })
    }

    /// True when the host names the embedded engine.
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        self.host == EMBEDDED_HOST
    }

    /// Compose the connection descriptor.
    ///
    /// # Errors
    /// Returns `SqlHandleError::ConfigError` if the port is not a number or the selected
    /// backend was not compiled in.
    pub fn dsn(&self) -> Result<Dsn, SqlHandleError> {
        if self.is_embedded() {
            return embedded_dsn(&self.database);
        }
        server_dsn(self)
    }
}

#[cfg(feature = "sqlite")]
fn embedded_dsn(path: &str) -> Result<Dsn, SqlHandleError> {
    Ok(Dsn::Sqlite {
        path: path.to_string(),
    })
}

#[cfg(not(feature = "sqlite"))]
fn embedded_dsn(_path: &str) -> Result<Dsn, SqlHandleError> {
    Err(SqlHandleError::ConfigError(
        "sqlite support is not compiled in (enable the `sqlite` feature)".to_string(),
    ))
}

#[cfg(feature = "postgres")]
fn server_dsn(params: &ConnectParams) -> Result<Dsn, SqlHandleError> {
    let (host, port) = split_host_port(&params.host)?;
    if host.is_empty() {
        return Err(SqlHandleError::ConfigError("host is required".to_string()));
    }
    Ok(Dsn::Postgres {
        host: host.to_string(),
        port,
        dbname: params.database.clone(),
        user: params.user.clone(),
        password: params.password.clone(),
    })
}

/// `host`, `host:port`, a bare IPv6 literal, or `[v6]:port`.
#[cfg(feature = "postgres")]
fn split_host_port(raw: &str) -> Result<(&str, u16), SqlHandleError> {
    let parse_port = |port: &str| {
        port.parse::<u16>().map_err(|e| {
            SqlHandleError::ConfigError(format!("invalid port in host {raw:?}: {e}"))
        })
    };

    if let Some(rest) = raw.strip_prefix('[') {
        let (host, after) = rest.split_once(']').ok_or_else(|| {
            SqlHandleError::ConfigError(format!("unclosed '[' in host {raw:?}"))
        })?;
        return match after {
            "" => Ok((host, DEFAULT_POSTGRES_PORT)),
            _ => match after.strip_prefix(':') {
                Some(port) => Ok((host, parse_port(port)?)),
                None => Err(SqlHandleError::ConfigError(format!(
                    "unexpected text after ']' in host {raw:?}"
                ))),
            },
        };
    }

    match raw.rsplit_once(':') {
        // more than one colon without brackets is an IPv6 literal
        Some((host, port)) if !host.contains(':') => Ok((host, parse_port(port)?)),
        _ => Ok((raw, DEFAULT_POSTGRES_PORT)),
    }
}

#[cfg(not(feature = "postgres"))]
fn server_dsn(_params: &ConnectParams) -> Result<Dsn, SqlHandleError> {
    Err(SqlHandleError::ConfigError(
        "postgres support is not compiled in (enable the `postgres` feature)".to_string(),
    ))
}

/// Connection descriptor composed from [`ConnectParams`].
#[derive(Clone, PartialEq, Eq)]
pub enum Dsn {
    #[cfg(feature = "sqlite")]
    Sqlite { path: String },
    #[cfg(feature = "postgres")]
    Postgres {
        host: String,
        port: u16,
        dbname: String,
        user: Option<String>,
        password: Option<String>,
    },
}

impl Dsn {
    #[must_use]
    pub fn database_type(&self) -> DatabaseType {
        match self {
            #[cfg(feature = "sqlite")]
            Dsn::Sqlite { .. } => DatabaseType::Sqlite,
            #[cfg(feature = "postgres")]
            Dsn::Postgres { .. } => DatabaseType::Postgres,
        }
    }
}

impl fmt::Display for Dsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "sqlite")]
            Dsn::Sqlite { path } => write!(f, "sqlite:{path}"),
            #[cfg(feature = "postgres")]
            Dsn::Postgres {
                host, port, dbname, ..
            } => write!(
                f,
                "pgsql:host={host};port={port};dbname={dbname};charset={SERVER_CHARSET}"
            ),
        }
    }
}

// Manual Debug so the password never ends up in logs
impl fmt::Debug for Dsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "sqlite")]
            Dsn::Sqlite { path } => f.debug_struct("Sqlite").field("path", path).finish(),
            #[cfg(feature = "postgres")]
            Dsn::Postgres {
                host,
                port,
                dbname,
                user,
                password,
            } => f
                .debug_struct("Postgres")
                .field("host", host)
                .field("port", port)
                .field("dbname", dbname)
                .field("user", user)
                .field("password", &password.as_ref().map(|_| "<redacted>"))
                .finish(),
        }
    }
}

/// Fluent builder for a [`Database`].
#[derive(Debug, Clone)]
pub struct DatabaseBuilder {
    params: ConnectParams,
    options: ConnectOptions,
}

impl DatabaseBuilder {
    #[must_use]
    pub fn new(host: impl Into<String>, database: impl Into<String>) -> Self {
        Self::from_params(ConnectParams::new(host, database))
    }

    #[must_use]
    pub fn from_params(params: ConnectParams) -> Self {
        Self {
            params,
            options: ConnectOptions::default(),
        }
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.params.user = Some(user.into());
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.params.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn options(mut self, options: ConnectOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn error_mode(mut self, error_mode: ErrorMode) -> Self {
        self.options.error_mode = error_mode;
        self
    }

    #[must_use]
    pub fn fetch_mode(mut self, fetch_mode: FetchMode) -> Self {
        self.options.default_fetch_mode = fetch_mode;
        self
    }

    #[must_use]
    pub fn emulate_prepares(mut self, emulate_prepares: bool) -> Self {
        self.options.emulate_prepares = emulate_prepares;
        self
    }

    #[must_use]
    pub fn finish(self) -> (ConnectParams, ConnectOptions) {
        (self.params, self.options)
    }

    /// Open the handle.
    ///
    /// # Errors
    /// Returns `SqlHandleError::ConfigError` for an unusable descriptor or
    /// `SqlHandleError::ConnectionError` if the driver cannot connect.
    pub async fn connect(self) -> Result<Database, SqlHandleError> {
        Database::open(self.params, self.options).await
    }
}
