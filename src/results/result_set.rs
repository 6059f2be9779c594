use std::collections::HashMap;
use std::sync::Arc;

use super::row::{CustomDbRow, index_columns};
use crate::error::SqlBinderError;
use crate::scan::Cursor;
use crate::types::RowValues;

/// A fully materialized query result.
///
/// Driver bridges collect rows into one of these; [`ResultSet::cursor`] then feeds them to the
/// scanner like any streaming cursor.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<CustomDbRow>,
    /// Column names shared by all rows (to avoid duplicating in each row)
    column_names: Option<Arc<Vec<String>>>,
    column_index: Arc<HashMap<String, usize>>,
}

impl ResultSet {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            column_names: None,
            column_index: Arc::default(),
        }
    }

    /// Build a result set from column names and row values in one go.
    ///
    /// # Errors
    ///
    /// Returns `SqlBinderError::ShapeMismatch` when a row's width differs from the column count.
    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<RowValues>>,
    ) -> Result<ResultSet, SqlBinderError> {
        let mut result_set = ResultSet::with_capacity(rows.len());
        result_set.set_column_names(Arc::new(columns.into_iter().map(Into::into).collect()));
        let width = result_set.column_count();
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(SqlBinderError::ShapeMismatch(format!(
                    "row {i} has {} values for {width} columns",
                    row.len()
                )));
            }
            result_set.add_row_values(row);
        }
        Ok(result_set)
    }

    /// Set the column names for this result set (to be shared by all rows)
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_index = Arc::new(index_columns(&column_names));
        self.column_names = Some(column_names);
    }

    #[must_use]
    pub fn get_column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    fn column_count(&self) -> usize {
        self.column_names.as_ref().map_or(0, |names| names.len())
    }

    /// Add a row to the result set. Rows added before column names are set are dropped.
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        if let Some(column_names) = &self.column_names {
            self.results.push(CustomDbRow {
                column_names: Arc::clone(column_names),
                rows: row_values,
                column_index: Arc::clone(&self.column_index),
            });
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// A scanner cursor over the rows, front to back.
    #[must_use]
    pub fn cursor(&self) -> ResultSetCursor<'_> {
        ResultSetCursor {
            columns: self.column_names.clone().unwrap_or_default(),
            rows: self.results.iter(),
            current: None,
        }
    }
}

/// Borrowing [`Cursor`] over a [`ResultSet`].
#[derive(Debug)]
pub struct ResultSetCursor<'a> {
    columns: Arc<Vec<String>>,
    rows: std::slice::Iter<'a, CustomDbRow>,
    current: Option<&'a CustomDbRow>,
}

impl Cursor for ResultSetCursor<'_> {
    fn columns(&self) -> Result<Vec<String>, SqlBinderError> {
        Ok(self.columns.as_ref().clone())
    }

    fn advance(&mut self) -> Result<bool, SqlBinderError> {
        self.current = self.rows.next();
        Ok(self.current.is_some())
    }

    fn read_row(&mut self, slots: &mut [RowValues]) -> Result<(), SqlBinderError> {
        let row = self.current.ok_or_else(|| {
            SqlBinderError::CursorError("read_row called without a current row".to_string())
        })?;
        if slots.len() != row.rows.len() {
            return Err(SqlBinderError::CursorError(format!(
                "expected {} slots, got {}",
                row.rows.len(),
                slots.len()
            )));
        }
        slots.clone_from_slice(&row.rows);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_share_column_metadata() {
        let rs = ResultSet::from_rows(
            ["id", "name", "id"],
            vec![
                vec![RowValues::Int(1), RowValues::Text("a".into()), RowValues::Int(9)],
                vec![RowValues::Int(2), RowValues::Null, RowValues::Int(8)],
            ],
        )
        .unwrap();
        assert_eq!(rs.len(), 2);
        assert!(Arc::ptr_eq(
            &rs.results[0].column_names,
            &rs.results[1].column_names
        ));
        assert_eq!(rs.results[1].get("id"), Some(&RowValues::Int(2)));
        assert_eq!(rs.results[0].get("name"), Some(&RowValues::Text("a".into())));
        assert_eq!(rs.results[0].get("missing"), None);
        assert_eq!(rs.results[0].get_by_index(2), Some(&RowValues::Int(9)));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = ResultSet::from_rows(["a", "b"], vec![vec![RowValues::Null]]).unwrap_err();
        assert!(matches!(err, SqlBinderError::ShapeMismatch(_)));
    }

    #[test]
    fn cursor_walks_rows_once() {
        let rs = ResultSet::from_rows(["n"], vec![vec![RowValues::Int(1)], vec![RowValues::Int(2)]])
            .unwrap();
        let mut cursor = rs.cursor();
        let mut slot = [RowValues::Null];

        assert!(cursor.read_row(&mut slot).is_err());
        assert!(cursor.advance().unwrap());
        cursor.read_row(&mut slot).unwrap();
        assert_eq!(slot[0], RowValues::Int(1));
        assert!(cursor.advance().unwrap());
        assert!(!cursor.advance().unwrap());
        assert_eq!(cursor.columns().unwrap(), ["n"]);
    }
}
