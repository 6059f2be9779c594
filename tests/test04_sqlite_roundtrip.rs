#![cfg(feature = "sqlite")]

use rusqlite::Connection;
use sql_binder::impl_record;
use sql_binder::prelude::*;
use sql_binder::sqlite::Params as SqliteParams;

#[derive(Debug, Default, Clone, PartialEq)]
struct Book {
    id: i64,
    title: String,
    pages: Option<i32>,
    in_print: bool,
}
impl_record!(Book { id, title, pages = "page_count", in_print });

fn books() -> Vec<Book> {
    vec![
        Book {
            id: 1,
            title: "Dune".into(),
            pages: Some(412),
            in_print: true,
        },
        Book {
            id: 2,
            title: "Solaris".into(),
            pages: None,
            in_print: false,
        },
        Book {
            id: 3,
            title: "Roadside Picnic".into(),
            pages: Some(145),
            in_print: true,
        },
    ]
}

fn setup(conn: &Connection) -> Result<(), Box<dyn std::error::Error>> {
    conn.execute_batch(
        "CREATE TABLE book (id INTEGER PRIMARY KEY, title TEXT NOT NULL, page_count INTEGER, in_print INTEGER NOT NULL);",
    )?;

    let ctx = BindContext::for_driver("sqlite3");
    let bound = bind_records(
        &ctx,
        "INSERT INTO book (id, title, page_count, in_print) VALUES (:id, :title, :page_count, :in_print)",
        &books(),
    )?;
    assert_eq!(bound.params.len(), 12);

    let params = SqliteParams::convert(&bound.params)?;
    let inserted = conn.execute(&bound.query, rusqlite::params_from_iter(params.as_values()))?;
    assert_eq!(inserted, 3);
    Ok(())
}

#[test]
fn bulk_insert_then_scan_records() -> Result<(), Box<dyn std::error::Error>> {
    let conn = Connection::open_in_memory()?;
    setup(&conn)?;

    let mut stmt = conn.prepare("SELECT id, title, page_count, in_print FROM book ORDER BY id")?;
    let mut cursor = SqliteCursor::new(&mut stmt, &[])?;
    let found: Vec<Book> = select_records(&mut cursor, &BindContext::default())?;
    assert_eq!(found, books());
    Ok(())
}

#[test]
fn named_lookup_with_streaming_cursor() -> Result<(), Box<dyn std::error::Error>> {
    let conn = Connection::open_in_memory()?;
    setup(&conn)?;

    let args = std::collections::HashMap::from([("min".to_string(), RowValues::Int(200))]);
    let bound = bind_map(
        &BindContext::for_driver("sqlite"),
        "SELECT title FROM book WHERE page_count > :min",
        &args,
    )?;
    assert_eq!(bound.query, "SELECT title FROM book WHERE page_count > ?");

    let mut stmt = conn.prepare(&bound.query)?;
    let mut cursor = SqliteCursor::new(&mut stmt, &bound.params)?;
    let title: String = get_value(&mut cursor)?;
    assert_eq!(title, "Dune");

    let mut stmt = conn.prepare("SELECT id FROM book WHERE id = ?")?;
    let mut cursor = SqliteCursor::new(&mut stmt, &[RowValues::Int(99)])?;
    let err = get_record::<Book, _>(&mut cursor, &BindContext::default()).unwrap_err();
    assert!(err.is_no_rows());
    Ok(())
}

#[test]
fn materialized_results_on_disk() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("books.db");
    {
        let conn = Connection::open(&path)?;
        setup(&conn)?;
    }

    let conn = Connection::open(&path)?;
    let mut stmt = conn.prepare("SELECT id, title, page_count, in_print, 0 AS score FROM book")?;
    let rs = sqlite_build_result_set(&mut stmt, &[])?;
    assert_eq!(rs.len(), 3);
    assert_eq!(rs.results[2].get("title"), Some(&RowValues::Text("Roadside Picnic".into())));

    let err = select_records::<Book, _>(&mut rs.cursor(), &BindContext::default()).unwrap_err();
    assert!(matches!(err, SqlBinderError::UnmappedColumn { .. }));

    let tolerant = BindContext::default().with_tolerant(true);
    let found: Vec<Book> = select_records(&mut rs.cursor(), &tolerant)?;
    assert_eq!(found.len(), 3);
    Ok(())
}

#[test]
fn config_file_drives_the_context() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("binder.json");
    std::fs::write(
        &path,
        r#"{ "driver": "embedded-books", "drivers": { "embedded-books": "generic" }, "tolerant": true }"#,
    )?;

    let ctx = BinderConfig::from_path(&path)?.apply()?;
    assert_eq!(ctx.dialect, Dialect::Generic);
    assert!(ctx.tolerant);

    let missing = BinderConfig::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(missing, SqlBinderError::IoError(_)));
    Ok(())
}
