// SQLite bridge - connects the binder and scanner to rusqlite
//
// - params: argument conversion from RowValues to SQLite values
// - query: value extraction and materialized result sets
// - cursor: streaming scanner cursor over a prepared statement

pub mod cursor;
pub mod params;
pub mod query;

pub use cursor::SqliteCursor;
pub use params::Params;
pub use query::{build_result_set, sqlite_extract_value};
