#![allow(dead_code)]

use sql_handle::prelude::*;
use tempfile::TempDir;

pub const FOO_SCHEMA: &str = "create table foo (
    id integer primary key autoincrement,
    mytext varchar,
    mydate datetime,
    qty integer
)";

/// A fresh file-backed database with the `foo` table. Keep the `TempDir` alive for the
/// duration of the test.
pub async fn sqlite_foo() -> Result<(TempDir, Database), Box<dyn std::error::Error>> {
    sqlite_foo_with(ConnectOptions::default()).await
}

pub async fn sqlite_foo_with(
    options: ConnectOptions,
) -> Result<(TempDir, Database), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("test.db");
    let path = path.to_str().ok_or("temp path is not utf-8")?;
    let mut db = Database::builder("sqlite", path).options(options).connect().await?;
    db.exec(FOO_SCHEMA, ()).await?;
    Ok((dir, db))
}

pub fn assoc(row: &FetchedRow) -> &Row {
    row.as_assoc().expect("row fetched in assoc mode")
}
