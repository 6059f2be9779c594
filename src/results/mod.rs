//! Materialized query results.

mod result_set;
mod row;

pub use result_set::{ResultSet, ResultSetCursor};
pub use row::CustomDbRow;
