use crate::types::RowValues;

/// A SQL string and its bound parameters bundled together.
///
/// This is what every binding entry point hands back: the rewritten query text plus the
/// arguments in placeholder order, ready for a driver.
/// ```rust
/// use sql_binder::prelude::*;
///
/// let qp = QueryAndParams::new(
///     "INSERT INTO t (id, name) VALUES ($1, $2)",
///     vec![RowValues::Int(1), RowValues::Text("alice".into())],
/// );
/// assert_eq!(qp.params.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAndParams {
    /// The SQL query string
    pub query: String,
    /// The parameters to be bound to the query
    pub params: Vec<RowValues>,
}

impl QueryAndParams {
    /// Create a new `QueryAndParams` with the given query string and parameters
    pub fn new(query: impl Into<String>, params: Vec<RowValues>) -> Self {
        Self {
            query: query.into(),
            params,
        }
    }

    /// Create a new `QueryAndParams` with no parameters
    pub fn new_without_params(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: Vec::new(),
        }
    }

    /// Render the query with its arguments inlined, for log lines.
    ///
    /// See [`crate::explain::explain`]; the output is never meant to be executed.
    #[must_use]
    pub fn explain(&self, dialect: crate::dialect::Dialect, max_arg_len: usize) -> String {
        crate::explain::explain(dialect, &self.query, max_arg_len, &self.params)
    }
}
