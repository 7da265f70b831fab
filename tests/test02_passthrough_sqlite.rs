#![cfg(feature = "sqlite")]

mod common;

use common::{assoc, sqlite_foo, sqlite_foo_with};
use sql_handle::prelude::*;

#[tokio::test]
async fn query_returns_inserted_values_unchanged() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, mut db) = sqlite_foo().await?;
    db.exec(
        "insert into foo (mytext, mydate) values (?, ?)",
        vec![Value::from("Bar"), Value::from("2011-03-04 05:06:07")],
    )
    .await?;

    let mut cursor = db.query("select * from foo", ()).await?;
    assert_eq!(cursor.column_names(), ["id", "mytext", "mydate", "qty"]);
    assert_eq!(cursor.remaining(), 1);

    let row = cursor.fetch().expect("one row");
    let row = row.as_assoc().expect("assoc is the default mode");
    assert_eq!(row["mytext"], Value::Text("Bar".into()));
    assert_eq!(row["mydate"], Value::Text("2011-03-04 05:06:07".into()));
    assert_eq!(row["qty"], Value::Null);
    assert!(cursor.fetch().is_none());
    Ok(())
}

#[tokio::test]
async fn scalar_param_is_bound_as_single_value() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, mut db) = sqlite_foo().await?;
    db.exec("insert into foo (mytext) values ('x'), ('y'), ('z')", ())
        .await?;

    let texts = db
        .fetch_column("select mytext from foo where id > ? order by id", 1_i64)
        .await?;
    assert_eq!(texts, vec![Value::Text("y".into()), Value::Text("z".into())]);
    Ok(())
}

#[tokio::test]
async fn named_params_bind_with_or_without_colon() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, mut db) = sqlite_foo().await?;
    db.exec(
        "insert into foo (mytext, qty) values (:text, :qty)",
        Params::named([(":text", Value::from("named")), ("qty", Value::from(7_i64))]),
    )
    .await?;

    let rows = db
        .fetch_all("select mytext, qty from foo where mytext = :t", Params::named([("t", "named")]))
        .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(assoc(&rows[0]).get("qty"), Some(&Value::Int(7)));
    Ok(())
}

#[tokio::test]
async fn exec_reports_affected_rows() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, mut db) = sqlite_foo().await?;
    db.exec("insert into foo (mytext) values ('a'), ('a'), ('b')", ())
        .await?;

    assert_eq!(
        db.exec("update foo set qty = 1 where mytext = 'none'", ()).await?,
        0
    );
    assert_eq!(
        db.exec("update foo set qty = 1 where mytext = ?", "a").await?,
        2
    );
    assert_eq!(db.exec("delete from foo where mytext = ?", "zzz").await?, 0);
    assert_eq!(db.exec("delete from foo", ()).await?, 3);
    Ok(())
}

#[tokio::test]
async fn exec_without_params_runs_a_batch() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, mut db) = sqlite_foo().await?;
    let affected = db
        .exec(
            "insert into foo (mytext) values ('a'); insert into foo (mytext) values ('b'), ('c');",
            (),
        )
        .await?;
    assert_eq!(affected, 2);
    assert_eq!(
        db.fetch_column("select count(*) from foo", ()).await?,
        vec![Value::Int(3)]
    );
    Ok(())
}

#[tokio::test]
async fn insert_returns_generated_id() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, mut db) = sqlite_foo().await?;
    let first = db.insert("insert into foo (mytext) values (?)", "one").await?;
    let second = db.insert("insert into foo (mytext) values (?)", "two").await?;
    assert_eq!(first, "1");
    assert_eq!(second, "2");
    assert_eq!(db.last_insert_id().await?, "2");
    Ok(())
}

#[tokio::test]
async fn fetch_modes_shape_rows() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, mut db) = sqlite_foo_with(ConnectOptions::default().with_fetch_mode(FetchMode::Num))
        .await?;
    db.exec("insert into foo (mytext, qty) values ('a', 1), ('b', 2)", ())
        .await?;

    let rows = db.fetch_all("select mytext, qty from foo order by id", ()).await?;
    assert_eq!(rows[1].as_num(), Some(&[Value::Text("b".into()), Value::Int(2)][..]));

    let rows = db
        .fetch_all_with_mode("select qty, mytext from foo order by id", (), FetchMode::Column)
        .await?;
    assert_eq!(rows[0].as_column(), Some(&Value::Int(1)));

    let mut cursor = db.query("select mytext from foo order by id", ()).await?;
    let first = cursor.fetch_with_mode(FetchMode::Assoc).expect("first row");
    assert_eq!(assoc(&first).get("mytext"), Some(&Value::Text("a".into())));
    let rest: Vec<Row> = cursor.collect();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].get_by_index(0), Some(&Value::Text("b".into())));
    Ok(())
}

#[tokio::test]
async fn query_reports_changes_for_writes() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, mut db) = sqlite_foo().await?;
    let cursor = db
        .query("insert into foo (mytext) values (?) returning id", "r")
        .await?;
    assert_eq!(cursor.rows_affected(), 1);
    assert_eq!(cursor.fetch_column(), vec![Value::Int(1)]);

    let cursor = db.query("select * from foo", ()).await?;
    assert_eq!(cursor.rows_affected(), 0);
    Ok(())
}

#[tokio::test]
async fn driver_errors_surface_as_query_errors() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, mut db) = sqlite_foo_with(ConnectOptions::default().with_error_mode(ErrorMode::Warn))
        .await?;

    let err = db.query("select * from missing_table", ()).await.unwrap_err();
    assert!(matches!(err, SqlHandleError::QueryError { .. }));

    db.exec("insert into foo (id, mytext) values (?, ?)", vec![Value::Int(1), Value::from("a")])
        .await?;
    let err = db
        .exec("insert into foo (id, mytext) values (?, ?)", vec![Value::Int(1), Value::from("b")])
        .await
        .unwrap_err();
    assert!(matches!(err, SqlHandleError::QueryError { .. }));
    assert!(err.code().is_some());
    Ok(())
}

#[tokio::test]
async fn unreachable_path_fails_to_connect() {
    let err = Database::connect("sqlite", "/definitely/not/a/dir/test.db", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SqlHandleError::ConnectionError { .. }), "{err:?}");
}

#[tokio::test]
async fn in_memory_handle_exposes_its_descriptor() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::connect("sqlite", ":memory:", None, None).await?;
    assert_eq!(db.database_type(), DatabaseType::Sqlite);
    assert_eq!(db.dsn().to_string(), "sqlite::memory:");
    assert_eq!(*db.options(), ConnectOptions::default());

    let DriverConnection::Sqlite(conn) = db.driver_mut() else {
        panic!("expected sqlite driver");
    };
    let version: String = conn
        .with_connection(|c| {
            c.query_row("select sqlite_version()", [], |row| row.get(0))
                .map_err(|e| SqlHandleError::Other(e.to_string()))
        })
        .await?;
    assert!(version.starts_with('3'));
    Ok(())
}
