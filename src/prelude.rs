//! Convenient imports for common functionality.

pub use crate::bind::{BindSource, bind_map, bind_maps, bind_named, bind_record, bind_records};
pub use crate::builder::{Builder, Quoter, in_clause, not_in_clause};
pub use crate::config::{BindContext, BinderConfig, NamingStyle};
pub use crate::dialect::{Dialect, dialect_for, register_driver};
pub use crate::error::SqlBinderError;
pub use crate::explain::explain;
pub use crate::named::bulk::expand_values;
pub use crate::named::{CompiledQuery, compile};
pub use crate::query::QueryAndParams;
pub use crate::results::{CustomDbRow, ResultSet, ResultSetCursor};
pub use crate::scan::{
    Collection, Cursor, Destination, get_record, get_value, map_scan, scan_all, scan_one,
    select_maps, select_records, select_values, slice_scan,
};
pub use crate::shape::{Fields, Naming, Record, cache_stats, resolve_paths};
pub use crate::translation::{
    PlaceholderStyle, RebindMode, rebind, rebind_with, translate_placeholders,
};
pub use crate::types::{FromRowValue, RowValues, ToRowValue};

#[cfg(feature = "postgres")]
pub use crate::postgres::{Params as PostgresParams, build_result_set_from_rows as postgres_build_result_set};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{
    Params as SqliteParams, SqliteCursor, build_result_set as sqlite_build_result_set,
};
