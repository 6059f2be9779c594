use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlBinderError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// A `:` showed up while a placeholder name was still being read.
    #[error("unexpected `:` while reading named param at {position}")]
    MalformedTemplate { position: usize },

    /// A placeholder name could not be found in the bound value.
    #[error("could not find name {name} in {within}")]
    UnresolvableName { name: String, within: String },

    #[error("bulk bind source is empty, nothing to bind")]
    EmptyBulkSource,

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("missing destination name {column} in {shape}")]
    UnmappedColumn { column: String, shape: String },

    /// A single-row scan found no row. Callers branch on this for "not found".
    #[error("no rows in result set")]
    NoRows,

    #[error("Value conversion error: {0}")]
    ConversionError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Cursor error: {0}")]
    CursorError(String),

    /// Opaque failure raised by a driver-backed cursor.
    #[error(transparent)]
    Driver(Box<dyn std::error::Error + Send + Sync>),
}

impl SqlBinderError {
    /// True when a single-row scan came back empty.
    #[must_use]
    pub fn is_no_rows(&self) -> bool {
        matches!(self, Self::NoRows)
    }

    /// Wrap an arbitrary driver error without reinterpreting it.
    pub fn driver<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Driver(Box::new(err))
    }
}
