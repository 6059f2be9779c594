use std::collections::HashMap;

use sql_binder::impl_record;
use sql_binder::prelude::*;

#[derive(Debug, Default, Clone)]
struct Pair {
    x: i64,
    y: i64,
}
impl_record!(Pair { x, y });

#[derive(Debug, Default, Clone)]
struct Person {
    age: i32,
    email: Option<String>,
    first_name: String,
    cache: Vec<u64>,
}
impl_record!(Person {
    age,
    email = "mail",
    first_name,
    cache = "-",
});

#[derive(Debug, Default)]
struct Audit {
    created_by: String,
    id: i64,
}
impl_record!(Audit { created_by, id = "audit_id" });

#[derive(Debug, Default)]
struct Place {
    name: String,
}
impl_record!(Place { name });

#[derive(Debug, Default)]
struct Employee {
    id: i64,
    audit: Audit,
    office: Place,
}
impl_record!(Employee {
    id,
    #[embed] audit: Audit,
    #[nested] office: Place,
});

#[test]
fn two_records_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let rows = [Pair { x: 1, y: 2 }, Pair { x: 3, y: 4 }];
    let ctx = BindContext::new(Dialect::Dollar);
    let bound = bind_records(&ctx, "INSERT INTO foo (a,b) VALUES (:x, :y)", &rows)?;

    assert_eq!(bound.query, "INSERT INTO foo (a,b) VALUES ($1, $2),($3, $4)");
    assert_eq!(
        bound.params,
        vec![
            RowValues::Int(1),
            RowValues::Int(2),
            RowValues::Int(3),
            RowValues::Int(4)
        ]
    );
    Ok(())
}

#[test]
fn three_records_number_six_markers() -> Result<(), Box<dyn std::error::Error>> {
    let rows = [
        Pair { x: 1, y: 10 },
        Pair { x: 2, y: 20 },
        Pair { x: 3, y: 30 },
    ];
    let bound = bind_records(
        &BindContext::new(Dialect::Dollar),
        "INSERT INTO foo (a,b) VALUES (:x, :y) ON CONFLICT DO NOTHING",
        &rows,
    )?;

    assert_eq!(
        bound.query,
        "INSERT INTO foo (a,b) VALUES ($1, $2),($3, $4),($5, $6) ON CONFLICT DO NOTHING"
    );
    let ints: Vec<i64> = bound.params.iter().filter_map(|v| v.as_int().copied()).collect();
    assert_eq!(ints, [1, 10, 2, 20, 3, 30]);
    Ok(())
}

#[test]
fn record_binding_follows_placeholder_order() -> Result<(), Box<dyn std::error::Error>> {
    let person = Person {
        age: 41,
        email: None,
        first_name: "Ada".into(),
        cache: vec![1, 2, 3],
    };
    let bound = bind_record(
        &BindContext::new(Dialect::At),
        "SELECT * FROM person WHERE first_name = :first_name AND age = :age AND mail = :mail",
        &person,
    )?;

    assert_eq!(
        bound.query,
        "SELECT * FROM person WHERE first_name = @p1 AND age = @p2 AND mail = @p3"
    );
    assert_eq!(
        bound.params,
        [
            RowValues::Text("Ada".into()),
            RowValues::Int(41),
            RowValues::Null
        ]
    );
    Ok(())
}

#[test]
fn excluded_and_renamed_fields_do_not_resolve() {
    let ctx = BindContext::default();
    for template in ["SELECT :cache", "SELECT :email"] {
        let err = bind_record(&ctx, template, &Person::default()).unwrap_err();
        assert!(
            matches!(err, SqlBinderError::UnresolvableName { ref within, .. } if within == "Person"),
            "{template}: {err}"
        );
    }
}

#[test]
fn embedded_fields_are_transparent_and_nested_are_prefixed() -> Result<(), Box<dyn std::error::Error>>
{
    let employee = Employee {
        id: 5,
        audit: Audit {
            created_by: "ops".into(),
            id: 77,
        },
        office: Place {
            name: "HQ".into(),
        },
    };
    let bound = bind_record(
        &BindContext::new(Dialect::Dollar),
        "VALUES (:id, :created_by, :audit_id, :office.name)",
        &employee,
    )?;
    assert_eq!(bound.query, "VALUES ($1, $2, $3, $4)");
    assert_eq!(
        bound.params,
        [
            RowValues::Int(5),
            RowValues::Text("ops".into()),
            RowValues::Int(77),
            RowValues::Text("HQ".into())
        ]
    );
    Ok(())
}

#[test]
fn compiled_query_binds_many_times() -> Result<(), Box<dyn std::error::Error>> {
    let compiled = compile(Dialect::Dollar, "UPDATE t SET x = :x WHERE y = :y")?;
    let ctx = BindContext::new(Dialect::Dollar);
    for pair in [Pair { x: 1, y: 2 }, Pair { x: 9, y: 8 }] {
        let bound = compiled.bind_record(&ctx, &pair)?;
        assert_eq!(bound.query, "UPDATE t SET x = $1 WHERE y = $2");
        assert_eq!(bound.params, [RowValues::Int(pair.x), RowValues::Int(pair.y)]);
    }

    let args = HashMap::from([
        ("x".to_string(), RowValues::Int(0)),
        ("y".to_string(), RowValues::Null),
    ]);
    assert_eq!(compiled.bind_map(&args)?.params, [RowValues::Int(0), RowValues::Null]);
    Ok(())
}

#[test]
fn mixed_bulk_sources_and_naming() -> Result<(), Box<dyn std::error::Error>> {
    let a = Pair { x: 1, y: 2 };
    let b = Pair { x: 3, y: 4 };
    let sources: [&dyn Fields; 2] = [&a, &b];
    let bound = bind_named(
        &BindContext::new(Dialect::At),
        "INSERT INTO foo (a,b) VALUES (:x, :y)",
        BindSource::Records(&sources),
    )?;
    assert_eq!(bound.query, "INSERT INTO foo (a,b) VALUES (@p1, @p2),(@p3, @p4)");

    let maps = vec![
        HashMap::from([("k".to_string(), RowValues::Text("a".into()))]),
        HashMap::from([("k".to_string(), RowValues::Text("b".into()))]),
    ];
    let bound = bind_maps(&BindContext::default(), "INSERT INTO t VALUES (:k)", &maps)?;
    assert_eq!(bound.query, "INSERT INTO t VALUES (?),(?)");
    assert_eq!(bound.params.len(), 2);
    Ok(())
}

#[test]
fn naming_conventions_change_resolution() -> Result<(), Box<dyn std::error::Error>> {
    let person = Person {
        first_name: "Grace".into(),
        ..Person::default()
    };
    let camel = BindContext::default().with_naming(Naming::CamelCase);
    let bound = bind_record(&camel, "SELECT :firstName", &person)?;
    assert_eq!(bound.params, [RowValues::Text("Grace".into())]);

    let err = bind_record(&BindContext::default(), "SELECT :firstName", &person).unwrap_err();
    assert!(matches!(err, SqlBinderError::UnresolvableName { .. }));
    Ok(())
}

#[test]
fn explain_renders_bound_query() -> Result<(), Box<dyn std::error::Error>> {
    let bound = bind_record(
        &BindContext::new(Dialect::Dollar),
        "SELECT * FROM person WHERE first_name = :first_name AND age = :age",
        &Person {
            age: 30,
            first_name: "O'Brien".into(),
            ..Person::default()
        },
    )?;
    assert_eq!(
        bound.explain(Dialect::Dollar, 0),
        "SELECT * FROM person WHERE first_name = 'O''Brien' AND age = 30"
    );
    Ok(())
}
