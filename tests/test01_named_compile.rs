use sql_binder::prelude::*;

const NUMBERED: [Dialect; 3] = [Dialect::Dollar, Dialect::NamedColon, Dialect::At];

#[test]
fn rebind_emits_one_marker_per_occurrence() {
    for n in 0..12 {
        let query = vec!["?"; n].join(", ");
        for dialect in NUMBERED {
            let rebound = rebind(dialect, &query);
            let expected: Vec<String> = (1..=n).map(|i| dialect.placeholder(i)).collect();
            assert_eq!(rebound, expected.join(", "), "{dialect} with {n} markers");
        }
        assert_eq!(rebind(Dialect::Generic, &query), query);
    }
}

#[test]
fn generic_rebind_is_idempotent() {
    let query = "SELECT * FROM t WHERE a = ? AND b IN (?, ?)";
    let once = rebind(Dialect::Generic, query);
    let twice = rebind(Dialect::Generic, &once);
    assert_eq!(twice, query);
}

#[test]
fn generic_compile_output_rebinds_cleanly() -> Result<(), Box<dyn std::error::Error>> {
    let template = "SELECT * FROM person WHERE first_name = :first AND age > :age AND ok = :first";
    let compiled = compile(Dialect::Generic, template)?;
    assert_eq!(compiled.names(), ["first", "age", "first"]);
    assert!(!compiled.query().contains(':'));

    let direct = compile(Dialect::Dollar, template)?;
    assert_eq!(rebind(Dialect::Dollar, compiled.query()), direct.query());
    Ok(())
}

#[test]
fn double_colon_never_starts_a_name() -> Result<(), Box<dyn std::error::Error>> {
    let compiled = compile(
        Dialect::Dollar,
        "SELECT created::::date, '::not_a_name' FROM t WHERE id = :id",
    )?;
    assert_eq!(
        compiled.query(),
        "SELECT created::date, ':not_a_name' FROM t WHERE id = $1"
    );
    assert_eq!(compiled.names(), ["id"]);
    Ok(())
}

#[test]
fn assignment_passes_through() -> Result<(), Box<dyn std::error::Error>> {
    let compiled = compile(Dialect::At, "SET @total := :start + 1")?;
    assert_eq!(compiled.query(), "SET @total := @p1 + 1");
    assert_eq!(compiled.names(), ["start"]);
    Ok(())
}

#[test]
fn malformed_template_reports_position() {
    let err = compile(Dialect::Dollar, "WHERE a = :first:last").unwrap_err();
    match err {
        SqlBinderError::MalformedTemplate { position } => assert_eq!(position, 16),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn compiled_queries_are_shareable() -> Result<(), Box<dyn std::error::Error>> {
    let compiled = compile(Dialect::Dollar, "SELECT :a, :b")?;
    let copy = compiled.clone();
    let handle = std::thread::spawn(move || copy.query().to_string());
    assert_eq!(handle.join().expect("thread panicked"), compiled.query());
    assert_eq!(compiled.dialect(), Dialect::Dollar);
    Ok(())
}

#[test]
fn dialect_names_round_trip_through_serde() -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(&Dialect::NamedColon)?;
    assert_eq!(json, "\"sequential-named-colon\"");
    let back: Dialect = serde_json::from_str("\"sequential-at\"")?;
    assert_eq!(back, Dialect::At);
    Ok(())
}
