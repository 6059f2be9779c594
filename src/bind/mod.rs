//! Resolution of placeholder names against maps, records and collections of either.

use std::collections::HashMap;

use crate::config::BindContext;
use crate::dialect::Dialect;
use crate::error::SqlBinderError;
use crate::named::{bulk, compile};
use crate::query::QueryAndParams;
use crate::shape::{self, Fields};
use crate::translation::rebind;
use crate::types::RowValues;

/// Where argument values come from.
#[derive(Clone, Copy)]
pub enum BindSource<'a> {
    /// Name → value lookup.
    Map(&'a HashMap<String, RowValues>),
    /// Field lookup through the record's shape.
    Record(&'a dyn Fields),
    /// One row per record; the template is expanded into a multi-row insert.
    Records(&'a [&'a dyn Fields]),
    /// One row per map; the template is expanded into a multi-row insert.
    Maps(&'a [HashMap<String, RowValues>]),
}

/// Compile `query` and bind it against `source`.
///
/// Arguments come back in placeholder order, repeating values for repeated names. Collection
/// sources are bound element by element, their `VALUES (...)` tuple repeated once per element,
/// and the result is rebound to `ctx.dialect` at the end.
///
/// ```rust
/// use std::collections::HashMap;
/// use sql_binder::prelude::*;
///
/// let args = HashMap::from([("id".to_string(), RowValues::Int(4))]);
/// let ctx = BindContext::new(Dialect::Dollar);
/// let qp = bind_named(&ctx, "SELECT * FROM t WHERE id = :id", BindSource::Map(&args)).unwrap();
/// assert_eq!(qp.query, "SELECT * FROM t WHERE id = $1");
/// assert_eq!(qp.params, [RowValues::Int(4)]);
/// ```
///
/// # Errors
///
/// `MalformedTemplate` from compilation, `UnresolvableName` for names the source cannot
/// answer, `EmptyBulkSource` for an empty collection.
pub fn bind_named(
    ctx: &BindContext,
    query: &str,
    source: BindSource<'_>,
) -> Result<QueryAndParams, SqlBinderError> {
    match source {
        BindSource::Map(args) => compile(ctx.dialect, query)?.bind_map(args),
        BindSource::Record(record) => compile(ctx.dialect, query)?.bind_record(ctx, record),
        BindSource::Records(records) => bind_rows(ctx, query, records, |names, record| {
            record_args(ctx, names, *record)
        }),
        BindSource::Maps(maps) => bind_rows(ctx, query, maps, |names, args| map_args(names, args)),
    }
}

/// # Errors
///
/// See [`bind_named`].
pub fn bind_map(
    ctx: &BindContext,
    query: &str,
    args: &HashMap<String, RowValues>,
) -> Result<QueryAndParams, SqlBinderError> {
    bind_named(ctx, query, BindSource::Map(args))
}

/// # Errors
///
/// See [`bind_named`].
pub fn bind_record<R: Fields>(
    ctx: &BindContext,
    query: &str,
    record: &R,
) -> Result<QueryAndParams, SqlBinderError> {
    bind_named(ctx, query, BindSource::Record(record))
}

/// Bind a slice of same-typed records as one multi-row statement.
///
/// # Errors
///
/// See [`bind_named`].
pub fn bind_records<R: Fields>(
    ctx: &BindContext,
    query: &str,
    records: &[R],
) -> Result<QueryAndParams, SqlBinderError> {
    let erased: Vec<&dyn Fields> = records.iter().map(|r| r as &dyn Fields).collect();
    bind_named(ctx, query, BindSource::Records(&erased))
}

/// # Errors
///
/// See [`bind_named`].
pub fn bind_maps(
    ctx: &BindContext,
    query: &str,
    rows: &[HashMap<String, RowValues>],
) -> Result<QueryAndParams, SqlBinderError> {
    bind_named(ctx, query, BindSource::Maps(rows))
}

fn bind_rows<T>(
    ctx: &BindContext,
    query: &str,
    rows: &[T],
    mut args_for: impl FnMut(&[String], &T) -> Result<Vec<RowValues>, SqlBinderError>,
) -> Result<QueryAndParams, SqlBinderError> {
    if rows.is_empty() {
        return Err(SqlBinderError::EmptyBulkSource);
    }

    // `?` until every row is in, then one rebind over the expanded text
    let compiled = compile(Dialect::Generic, query)?;
    let mut params = Vec::with_capacity(compiled.names().len() * rows.len());
    for row in rows {
        params.extend(args_for(compiled.names(), row)?);
    }

    let expanded = bulk::expand_values(compiled.query(), rows.len());
    let sql = rebind(ctx.dialect, &expanded).into_owned();
    tracing::trace!(rows = rows.len(), params = params.len(), "bound bulk source");

    Ok(QueryAndParams::new(sql, params))
}

fn describe_map(args: &HashMap<String, RowValues>) -> String {
    let mut entries: Vec<_> = args.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
    let body: Vec<String> = entries
        .into_iter()
        .map(|(key, value)| format!("{key}: {value:?}"))
        .collect();
    format!("map {{{}}}", body.join(", "))
}

pub(crate) fn map_args(
    names: &[String],
    args: &HashMap<String, RowValues>,
) -> Result<Vec<RowValues>, SqlBinderError> {
    names
        .iter()
        .map(|name| {
            args.get(name)
                .cloned()
                .ok_or_else(|| SqlBinderError::UnresolvableName {
                    name: name.clone(),
                    within: describe_map(args),
                })
        })
        .collect()
}

pub(crate) fn record_args(
    ctx: &BindContext,
    names: &[String],
    record: &dyn Fields,
) -> Result<Vec<RowValues>, SqlBinderError> {
    let record_shape = record.shape();
    let descriptor = shape::resolve_paths(record_shape, ctx.naming, names);

    descriptor
        .paths()
        .iter()
        .zip(names)
        .map(|(path, name)| {
            shape::read_path(record, path).ok_or_else(|| SqlBinderError::UnresolvableName {
                name: name.clone(),
                within: record_shape.name.to_string(),
            })
        })
        .collect()
}
