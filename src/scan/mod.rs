//! Decoding cursor rows into atomic values, maps and records.
//!
//! The scanner only sees a [`Cursor`]: column names, advance, and "copy the current row into
//! these slots". How the destination is filled is decided once per call, from the column list
//! and the destination kind, before any value is decoded.

use std::collections::HashMap;
use std::mem;

use crate::config::BindContext;
use crate::error::SqlBinderError;
use crate::shape::{self, FieldPath, Fields, Record, Shape};
use crate::types::{FromRowValue, RowValues};

/// What the scanner needs from a driver's result stream.
pub trait Cursor {
    /// Column names of the current result, in order.
    ///
    /// # Errors
    ///
    /// Driver failures, passed through untouched.
    fn columns(&self) -> Result<Vec<String>, SqlBinderError>;

    /// Move to the next row; `false` once the data is exhausted.
    ///
    /// # Errors
    ///
    /// Driver failures, passed through untouched.
    fn advance(&mut self) -> Result<bool, SqlBinderError>;

    /// Copy the current row into `slots`, one per column.
    ///
    /// # Errors
    ///
    /// Driver failures, or a call with no current row.
    fn read_row(&mut self, slots: &mut [RowValues]) -> Result<(), SqlBinderError>;
}

/// A single decodable value (the blanket impl covers every [`FromRowValue`] type).
pub trait AtomicSlot {
    /// # Errors
    ///
    /// `ConversionError` when the value does not fit.
    fn store(&mut self, value: RowValues) -> Result<(), SqlBinderError>;
}

impl<T: FromRowValue> AtomicSlot for T {
    fn store(&mut self, value: RowValues) -> Result<(), SqlBinderError> {
        *self = T::from_row_value(value)?;
        Ok(())
    }
}

/// A growable list of decodable values.
pub trait AtomicList {
    fn clear(&mut self);

    /// # Errors
    ///
    /// `ConversionError` when the value does not fit.
    fn push_value(&mut self, value: RowValues) -> Result<(), SqlBinderError>;
}

impl<T: FromRowValue> AtomicList for Vec<T> {
    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn push_value(&mut self, value: RowValues) -> Result<(), SqlBinderError> {
        self.push(T::from_row_value(value)?);
        Ok(())
    }
}

/// A growable list of records, all of one shape.
pub trait RecordList {
    fn element_shape(&self) -> &'static Shape;

    fn clear(&mut self);

    /// Start a default element, let `fill` populate it, and keep it only if `fill` succeeds.
    ///
    /// # Errors
    ///
    /// Whatever `fill` returns.
    fn push_with(
        &mut self,
        fill: &mut dyn FnMut(&mut dyn Fields) -> Result<(), SqlBinderError>,
    ) -> Result<(), SqlBinderError>;
}

impl<R: Record> RecordList for Vec<R> {
    fn element_shape(&self) -> &'static Shape {
        R::describe()
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn push_with(
        &mut self,
        fill: &mut dyn FnMut(&mut dyn Fields) -> Result<(), SqlBinderError>,
    ) -> Result<(), SqlBinderError> {
        let mut element = R::default();
        fill(&mut element)?;
        self.push(element);
        Ok(())
    }
}

/// Target of a single-row scan.
pub enum Destination<'a> {
    /// Exactly one column, decoded into the slot.
    Atomic(&'a mut dyn AtomicSlot),
    /// Exactly one column, stored under its name. The map is cleared first.
    Mapping(&'a mut HashMap<String, RowValues>),
    /// Columns matched to fields by name.
    Record(&'a mut dyn Fields),
}

/// Target of a whole-result scan. Existing contents are discarded.
pub enum Collection<'a> {
    Atomic(&'a mut dyn AtomicList),
    Mapping(&'a mut Vec<HashMap<String, RowValues>>),
    Record(&'a mut dyn RecordList),
}

/// How one row lands in the destination, settled before rows are decoded.
enum ScanPlan {
    /// Single column, atomic or keyed by its name.
    SingleColumn,
    /// One entry per column; `None` drops the column.
    Fields(Vec<Option<FieldPath>>),
}

impl ScanPlan {
    fn single_column(columns: &[String]) -> Result<Self, SqlBinderError> {
        if columns.len() == 1 {
            Ok(ScanPlan::SingleColumn)
        } else {
            Err(SqlBinderError::ShapeMismatch(format!(
                "scannable destination expects 1 column, query returned {}: {columns:?}",
                columns.len()
            )))
        }
    }

    fn record(
        element: &'static Shape,
        columns: &[String],
        ctx: &BindContext,
    ) -> Result<Self, SqlBinderError> {
        let descriptor = shape::resolve_paths(element, ctx.naming, columns);
        let mut paths = Vec::with_capacity(columns.len());
        for (column, path) in columns.iter().zip(descriptor.paths()) {
            if path.is_empty() {
                if !ctx.tolerant {
                    return Err(SqlBinderError::UnmappedColumn {
                        column: column.clone(),
                        shape: element.name.to_string(),
                    });
                }
                paths.push(None);
            } else {
                paths.push(Some(path.clone()));
            }
        }
        Ok(ScanPlan::Fields(paths))
    }

    fn fields(&self) -> &[Option<FieldPath>] {
        match self {
            ScanPlan::Fields(paths) => paths,
            ScanPlan::SingleColumn => &[],
        }
    }
}

fn take(slot: &mut RowValues) -> RowValues {
    mem::replace(slot, RowValues::Null)
}

fn fill_record(
    record: &mut dyn Fields,
    paths: &[Option<FieldPath>],
    slots: &mut [RowValues],
) -> Result<(), SqlBinderError> {
    for (path, slot) in paths.iter().zip(slots.iter_mut()) {
        let value = take(slot);
        if let Some(path) = path {
            shape::write_path(record, path, value)?;
        }
    }
    Ok(())
}

/// Read one row into `dest`.
///
/// # Errors
///
/// `NoRows` if the cursor is already exhausted, `ShapeMismatch` for an atomic or mapping
/// destination and a result wider than one column, `UnmappedColumn` for a record destination
/// and a column with no field (unless `ctx.tolerant`), plus conversion and cursor errors.
pub fn scan_one<C: Cursor + ?Sized>(
    cursor: &mut C,
    dest: Destination<'_>,
    ctx: &BindContext,
) -> Result<(), SqlBinderError> {
    let columns = cursor.columns()?;
    if !cursor.advance()? {
        return Err(SqlBinderError::NoRows);
    }

    let plan = match &dest {
        Destination::Atomic(_) | Destination::Mapping(_) => ScanPlan::single_column(&columns)?,
        Destination::Record(record) => ScanPlan::record(record.shape(), &columns, ctx)?,
    };

    let mut slots = vec![RowValues::Null; columns.len()];
    cursor.read_row(&mut slots)?;

    match dest {
        Destination::Atomic(slot) => slot.store(take(&mut slots[0])),
        Destination::Mapping(map) => {
            map.clear();
            map.insert(columns[0].clone(), take(&mut slots[0]));
            Ok(())
        }
        Destination::Record(record) => fill_record(record, plan.fields(), &mut slots),
    }
}

/// Read every remaining row into `dest`, replacing what it held.
///
/// An exhausted cursor leaves `dest` empty and is not an error.
///
/// # Errors
///
/// The column checks of [`scan_one`], made before the first row is read, plus conversion and
/// cursor errors.
pub fn scan_all<C: Cursor + ?Sized>(
    cursor: &mut C,
    dest: Collection<'_>,
    ctx: &BindContext,
) -> Result<(), SqlBinderError> {
    let columns = cursor.columns()?;
    let plan = match &dest {
        Collection::Atomic(_) | Collection::Mapping(_) => ScanPlan::single_column(&columns)?,
        Collection::Record(list) => ScanPlan::record(list.element_shape(), &columns, ctx)?,
    };

    let mut slots = vec![RowValues::Null; columns.len()];
    let mut rows = 0usize;

    match dest {
        Collection::Atomic(list) => {
            list.clear();
            while cursor.advance()? {
                cursor.read_row(&mut slots)?;
                list.push_value(take(&mut slots[0]))?;
                rows += 1;
            }
        }
        Collection::Mapping(maps) => {
            maps.clear();
            while cursor.advance()? {
                cursor.read_row(&mut slots)?;
                maps.push(HashMap::from([(columns[0].clone(), take(&mut slots[0]))]));
                rows += 1;
            }
        }
        Collection::Record(list) => {
            list.clear();
            let paths = plan.fields();
            while cursor.advance()? {
                cursor.read_row(&mut slots)?;
                list.push_with(&mut |record: &mut dyn Fields| {
                    fill_record(record, paths, &mut slots)
                })?;
                rows += 1;
            }
        }
    }

    tracing::trace!(rows, columns = columns.len(), "scanned result");
    Ok(())
}

/// Every column of the next row as a name → value map.
///
/// # Errors
///
/// `NoRows` on an exhausted cursor, plus cursor errors.
pub fn map_scan<C: Cursor + ?Sized>(
    cursor: &mut C,
) -> Result<HashMap<String, RowValues>, SqlBinderError> {
    let columns = cursor.columns()?;
    let values = slice_scan(cursor)?;
    Ok(columns.into_iter().zip(values).collect())
}

/// Every column of the next row, in column order.
///
/// # Errors
///
/// `NoRows` on an exhausted cursor, plus cursor errors.
pub fn slice_scan<C: Cursor + ?Sized>(cursor: &mut C) -> Result<Vec<RowValues>, SqlBinderError> {
    let width = cursor.columns()?.len();
    if !cursor.advance()? {
        return Err(SqlBinderError::NoRows);
    }
    let mut slots = vec![RowValues::Null; width];
    cursor.read_row(&mut slots)?;
    Ok(slots)
}

/// Every remaining row as a full name → value map.
///
/// # Errors
///
/// Cursor errors.
pub fn select_maps<C: Cursor + ?Sized>(
    cursor: &mut C,
) -> Result<Vec<HashMap<String, RowValues>>, SqlBinderError> {
    let columns = cursor.columns()?;
    let mut slots = vec![RowValues::Null; columns.len()];
    let mut out = Vec::new();
    while cursor.advance()? {
        cursor.read_row(&mut slots)?;
        out.push(
            columns
                .iter()
                .cloned()
                .zip(slots.iter_mut().map(take))
                .collect(),
        );
    }
    Ok(out)
}

/// Decode the single column of the next row.
///
/// # Errors
///
/// See [`scan_one`].
pub fn get_value<T: FromRowValue, C: Cursor + ?Sized>(cursor: &mut C) -> Result<T, SqlBinderError> {
    let mut raw = RowValues::Null;
    scan_one(cursor, Destination::Atomic(&mut raw), &BindContext::default())?;
    T::from_row_value(raw)
}

/// Decode the next row into a fresh record.
///
/// # Errors
///
/// See [`scan_one`].
pub fn get_record<R: Record, C: Cursor + ?Sized>(
    cursor: &mut C,
    ctx: &BindContext,
) -> Result<R, SqlBinderError> {
    let mut record = R::default();
    scan_one(cursor, Destination::Record(&mut record), ctx)?;
    Ok(record)
}

/// Decode the single column of every remaining row.
///
/// # Errors
///
/// See [`scan_all`].
pub fn select_values<T: FromRowValue, C: Cursor + ?Sized>(
    cursor: &mut C,
) -> Result<Vec<T>, SqlBinderError> {
    let mut out: Vec<T> = Vec::new();
    scan_all(cursor, Collection::Atomic(&mut out), &BindContext::default())?;
    Ok(out)
}

/// Decode every remaining row into records.
///
/// # Errors
///
/// See [`scan_all`].
pub fn select_records<R: Record, C: Cursor + ?Sized>(
    cursor: &mut C,
    ctx: &BindContext,
) -> Result<Vec<R>, SqlBinderError> {
    let mut out: Vec<R> = Vec::new();
    scan_all(cursor, Collection::Record(&mut out), ctx)?;
    Ok(out)
}
