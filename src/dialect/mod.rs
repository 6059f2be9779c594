//! Placeholder dialects and the process-wide driver → dialect registry.

use std::collections::HashMap;
use std::sync::{LazyLock, RwLock};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Placeholder grammar expected by a database driver.
///
/// ```rust
/// use sql_binder::prelude::*;
///
/// assert_eq!(Dialect::Dollar.placeholder(3), "$3");
/// assert_eq!(Dialect::At.placeholder(1), "@p1");
/// assert_eq!(Dialect::Generic.placeholder(9), "?");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
pub enum Dialect {
    /// A single repeated `?` token; queries pass through untouched.
    #[default]
    #[serde(rename = "generic")]
    #[value(name = "generic")]
    Generic,
    /// `$1, $2, ...` (`PostgreSQL`, `CockroachDB`).
    #[serde(rename = "sequential-dollar")]
    #[value(name = "sequential-dollar")]
    Dollar,
    /// `:arg1, :arg2, ...` when rebinding, `:name` when compiling (Oracle).
    #[serde(rename = "sequential-named-colon")]
    #[value(name = "sequential-named-colon")]
    NamedColon,
    /// `@p1, @p2, ...` (SQL Server).
    #[serde(rename = "sequential-at")]
    #[value(name = "sequential-at")]
    At,
}

impl Dialect {
    /// The `n`th (1-based) positional marker for this dialect.
    #[must_use]
    pub fn placeholder(self, n: usize) -> String {
        let mut out = String::with_capacity(6);
        self.push_placeholder(&mut out, n);
        out
    }

    pub(crate) fn push_placeholder(self, out: &mut String, n: usize) {
        match self {
            Dialect::Generic => out.push('?'),
            Dialect::Dollar => {
                out.push('$');
                out.push_str(&n.to_string());
            }
            Dialect::NamedColon => {
                out.push_str(":arg");
                out.push_str(&n.to_string());
            }
            Dialect::At => {
                out.push_str("@p");
                out.push_str(&n.to_string());
            }
        }
    }

    /// Drivers speaking `$N` report inserted ids through `RETURNING` instead.
    #[must_use]
    pub fn supports_last_insert_id(self) -> bool {
        self != Dialect::Dollar
    }

    /// External identifier, as accepted by config files and `--dialect`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::Dollar => "sequential-dollar",
            Dialect::NamedColon => "sequential-named-colon",
            Dialect::At => "sequential-at",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const WELL_KNOWN_DRIVERS: &[(&str, Dialect)] = &[
    ("postgres", Dialect::Dollar),
    ("pgx", Dialect::Dollar),
    ("pq-timeouts", Dialect::Dollar),
    ("cloudsqlpostgres", Dialect::Dollar),
    ("ql", Dialect::Dollar),
    ("nrpostgres", Dialect::Dollar),
    ("cockroach", Dialect::Dollar),
    ("tokio-postgres", Dialect::Dollar),
    ("mysql", Dialect::Generic),
    ("sqlite3", Dialect::Generic),
    ("sqlite", Dialect::Generic),
    ("rusqlite", Dialect::Generic),
    ("nrmysql", Dialect::Generic),
    ("nrsqlite3", Dialect::Generic),
    ("oci8", Dialect::NamedColon),
    ("ora", Dialect::NamedColon),
    ("goracle", Dialect::NamedColon),
    ("godror", Dialect::NamedColon),
    ("sqlserver", Dialect::At),
    ("azuresql", Dialect::At),
    ("tiberius", Dialect::At),
];

static REGISTRY: LazyLock<RwLock<HashMap<String, Dialect>>> = LazyLock::new(|| {
    RwLock::new(
        WELL_KNOWN_DRIVERS
            .iter()
            .map(|(name, dialect)| ((*name).to_string(), *dialect))
            .collect(),
    )
});

/// Associate `driver` with `dialect`, replacing any previous association.
pub fn register_driver(driver: impl Into<String>, dialect: Dialect) {
    let driver = driver.into();
    tracing::debug!(driver = %driver, %dialect, "registering driver dialect");
    let mut map = match REGISTRY.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    map.insert(driver, dialect);
}

/// Look up the dialect for `driver`; unknown drivers get [`Dialect::Generic`].
#[must_use]
pub fn dialect_for(driver: &str) -> Dialect {
    let map = match REGISTRY.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    map.get(driver).copied().unwrap_or_default()
}
