#![cfg(feature = "sqlite")]

mod common;

use common::{assoc, sqlite_foo};
use sql_handle::prelude::*;

#[tokio::test]
async fn insert_text_matches_literal_shape_and_round_trips() -> Result<(), Box<dyn std::error::Error>>
{
    let (_dir, mut db) = sqlite_foo().await?;

    let cols = column_values! { "mytext" => "Bar", "mydate" => Value::Null };
    let sql = db.make_insert("foo", &cols)?;
    assert_eq!(sql, "insert into foo (mytext, mydate)values('Bar', NULL)");
    assert_eq!(db.exec(&sql, ()).await?, 1);

    let rows = db.fetch_all("select mytext, mydate from foo", ()).await?;
    assert_eq!(rows.len(), 1);
    let row = assoc(&rows[0]);
    assert_eq!(row.get("mytext"), Some(&Value::Text("Bar".into())));
    assert_eq!(row.get("mydate"), Some(&Value::Null));
    Ok(())
}

#[tokio::test]
async fn replace_overwrites_existing_row() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, mut db) = sqlite_foo().await?;

    let cols = column_values! { "mytext" => "Bar", "mydate" => Value::Null };
    let sql = db.make_replace("foo", &cols)?;
    assert_eq!(sql, "replace into foo (mytext, mydate)values('Bar', NULL)");
    db.exec(&sql, ()).await?;

    let again = column_values! { "id" => 1_i64, "mytext" => "Baz", "mydate" => "2021-06-01 12:00:00" };
    let sql = db.make_replace("foo", &again)?;
    db.exec(&sql, ()).await?;

    let rows = db.fetch_all("select id, mytext, mydate from foo", ()).await?;
    assert_eq!(rows.len(), 1);
    let row = assoc(&rows[0]);
    assert_eq!(row.get("id"), Some(&Value::Int(1)));
    assert_eq!(row.get("mytext"), Some(&Value::Text("Baz".into())));
    assert_eq!(row.get("mydate"), Some(&Value::Text("2021-06-01 12:00:00".into())));
    Ok(())
}

#[tokio::test]
async fn null_and_empty_string_stay_distinct() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, mut db) = sqlite_foo().await?;

    let cols = column_values! { "mytext" => "", "mydate" => Value::Null };
    let sql = db.make_insert("foo", &cols)?;
    assert_eq!(sql, "insert into foo (mytext, mydate)values('', NULL)");
    db.exec(&sql, ()).await?;

    let rows = db
        .fetch_all_with_mode("select mytext, mydate from foo", (), FetchMode::Num)
        .await?;
    assert_eq!(
        rows[0].as_num(),
        Some(&[Value::Text(String::new()), Value::Null][..])
    );
    Ok(())
}

#[tokio::test]
async fn quoted_numbers_are_coerced_by_column_affinity() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, mut db) = sqlite_foo().await?;

    let cols = column_values! { "mytext" => "O'Brien", "qty" => 5_i64 };
    let sql = db.make_insert("foo", &cols)?;
    assert_eq!(sql, "insert into foo (mytext, qty)values('O''Brien', '5')");
    db.exec(&sql, ()).await?;

    let rows = db.fetch_all("select mytext, qty from foo", ()).await?;
    let row = assoc(&rows[0]);
    assert_eq!(row.get("mytext"), Some(&Value::Text("O'Brien".into())));
    assert_eq!(row.get("qty"), Some(&Value::Int(5)));
    Ok(())
}

#[tokio::test]
async fn update_with_and_without_condition() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, mut db) = sqlite_foo().await?;
    for text in ["a", "b", "c"] {
        db.exec("insert into foo (mytext) values (?)", text).await?;
    }

    let cols = column_values! { "mydate" => "2020-01-01" };
    let targeted = db.make_update("foo", &cols, Some("mytext = 'b'"))?;
    assert_eq!(
        targeted,
        "update foo set mydate = '2020-01-01' where mytext = 'b'"
    );
    assert_eq!(db.exec(&targeted, ()).await?, 1);

    let everything = db.make_update("foo", &column_values! { "qty" => Value::Null }, Some(""))?;
    assert_eq!(everything, "update foo set qty = NULL");
    assert_eq!(db.exec(&everything, ()).await?, 3);

    let dates = db
        .fetch_column("select mydate from foo order by id", ())
        .await?;
    assert_eq!(
        dates,
        vec![Value::Null, Value::Text("2020-01-01".into()), Value::Null]
    );
    Ok(())
}

#[tokio::test]
async fn builders_reject_non_scalar_values() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, db) = sqlite_foo().await?;
    let cols = column_values! { "mytext" => Value::Blob(vec![0xde, 0xad]) };
    let err = db.make_insert("foo", &cols).unwrap_err();
    assert!(matches!(err, SqlHandleError::ValidationError(_)));
    Ok(())
}

#[tokio::test]
async fn quote_matches_sqlite_builtin() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, mut db) = sqlite_foo().await?;
    for raw in ["Bar", "", "it's", "''", "back\\slash", "ünïcödé"] {
        let native = db.fetch_column("select quote(?)", raw).await?;
        assert_eq!(native, vec![Value::Text(db.quote(raw))], "quoting {raw:?}");
    }
    Ok(())
}
