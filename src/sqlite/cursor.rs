use rusqlite::{Rows, Statement};

use super::params::Params;
use super::query::sqlite_extract_value;
use crate::error::SqlBinderError;
use crate::scan::Cursor;
use crate::types::RowValues;

/// Streaming [`Cursor`] over a prepared rusqlite statement.
///
/// Rows are decoded one at a time as the scanner advances; nothing beyond the current row
/// is held.
/// ```rust
/// use rusqlite::Connection;
/// use sql_binder::prelude::*;
///
/// let conn = Connection::open_in_memory().unwrap();
/// let mut stmt = conn.prepare("SELECT ?1 AS n").unwrap();
/// let mut cursor = SqliteCursor::new(&mut stmt, &[RowValues::Int(41)]).unwrap();
/// let n: i64 = get_value(&mut cursor).unwrap();
/// assert_eq!(n, 41);
/// ```
pub struct SqliteCursor<'s> {
    columns: Vec<String>,
    rows: Rows<'s>,
    current: Option<Vec<RowValues>>,
}

impl<'s> SqliteCursor<'s> {
    /// Bind `params` and start executing `stmt`.
    ///
    /// # Errors
    ///
    /// Returns `SqlBinderError::SqliteError` if binding fails.
    pub fn new(stmt: &'s mut Statement<'_>, params: &[RowValues]) -> Result<Self, SqlBinderError> {
        let columns = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let converted = Params::convert(params)?;
        let rows = stmt.query(rusqlite::params_from_iter(converted.as_values()))?;
        Ok(Self {
            columns,
            rows,
            current: None,
        })
    }
}

impl Cursor for SqliteCursor<'_> {
    fn columns(&self) -> Result<Vec<String>, SqlBinderError> {
        Ok(self.columns.clone())
    }

    fn advance(&mut self) -> Result<bool, SqlBinderError> {
        let width = self.columns.len();
        self.current = match self.rows.next()? {
            Some(row) => {
                let mut values = Vec::with_capacity(width);
                for idx in 0..width {
                    values.push(sqlite_extract_value(row, idx)?);
                }
                Some(values)
            }
            None => None,
        };
        Ok(self.current.is_some())
    }

    fn read_row(&mut self, slots: &mut [RowValues]) -> Result<(), SqlBinderError> {
        let Some(values) = self.current.as_ref() else {
            return Err(SqlBinderError::CursorError(
                "read_row called without a current row".to_string(),
            ));
        };
        if slots.len() != values.len() {
            return Err(SqlBinderError::CursorError(format!(
                "expected {} slots, got {}",
                values.len(),
                slots.len()
            )));
        }
        slots.clone_from_slice(values);
        Ok(())
    }
}
