//! Named-parameter SQL compilation and result binding.
//!
//! Write queries once with `:name` placeholders, compile them for whatever placeholder
//! grammar the driver speaks, bind arguments from maps or records, and scan rows back into
//! records:
//!
//! ```rust
//! use sql_binder::prelude::*;
//! use sql_binder::impl_record;
//!
//! #[derive(Debug, Default)]
//! struct Point {
//!     x: i64,
//!     y: i64,
//! }
//! impl_record!(Point { x, y });
//!
//! let ctx = BindContext::for_driver("postgres");
//! let rows = [Point { x: 1, y: 2 }, Point { x: 3, y: 4 }];
//! let bound = bind_records(&ctx, "INSERT INTO foo (a,b) VALUES (:x, :y)", &rows).unwrap();
//! assert_eq!(bound.query, "INSERT INTO foo (a,b) VALUES ($1, $2),($3, $4)");
//! assert_eq!(bound.params.len(), 4);
//! ```

pub mod bind;
pub mod builder;
pub mod config;
pub mod dialect;
pub mod error;
pub mod explain;
pub mod named;
pub mod prelude;
pub mod query;
pub mod results;
pub mod scan;
pub mod shape;
pub mod translation;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use error::SqlBinderError;
pub use query::QueryAndParams;
pub use types::RowValues;
