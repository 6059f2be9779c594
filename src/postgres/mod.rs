// PostgreSQL bridge - connects the binder and scanner to tokio-postgres
//
// - params: RowValues as tokio-postgres arguments
// - query: value extraction and materialized result sets

pub mod params;
pub mod query;

pub use params::Params;
pub use query::{build_result_set_from_rows, build_result_set_from_statement, postgres_extract_value};
