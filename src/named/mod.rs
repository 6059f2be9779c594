//! Compilation of `:name` templates into dialect-specific positional SQL.
//!
//! The compiler does not parse SQL. It recognises three things:
//! - `:ident` where `ident` is letters, digits, `_` and `.`, which becomes a placeholder;
//! - `::`, which is a literal `:` (write `::::` for a Postgres `::` cast);
//! - `:=` with nothing in between, copied through for assignment idioms like `@v := 1`.

use std::collections::HashMap;
use std::sync::Arc;

pub mod bulk;

use crate::bind;
use crate::config::BindContext;
use crate::dialect::Dialect;
use crate::error::SqlBinderError;
use crate::query::QueryAndParams;
use crate::shape::Fields;
use crate::types::RowValues;

/// A template rewritten for one dialect, plus the placeholder names in occurrence order.
///
/// Build it once and reuse it for every execution: the name list tells the binder which value
/// goes in which argument slot.
/// ```rust
/// use sql_binder::prelude::*;
///
/// let compiled = compile(Dialect::Dollar, "SELECT * FROM t WHERE a = :a OR b = :a").unwrap();
/// assert_eq!(compiled.query(), "SELECT * FROM t WHERE a = $1 OR b = $2");
/// assert_eq!(compiled.names(), ["a", "a"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    dialect: Dialect,
    query: Arc<str>,
    names: Arc<[String]>,
}

impl CompiledQuery {
    /// Compile `template` for `dialect`. Same as [`compile`].
    ///
    /// # Errors
    ///
    /// Returns `SqlBinderError::MalformedTemplate` on an unescaped `:` inside a name.
    pub fn new(dialect: Dialect, template: &str) -> Result<Self, SqlBinderError> {
        compile(dialect, template)
    }

    /// The rewritten SQL.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Placeholder names, left to right, duplicates kept.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Resolve arguments from a name/value map without recompiling.
    ///
    /// # Errors
    ///
    /// Returns `SqlBinderError::UnresolvableName` for a name missing from `args`.
    pub fn bind_map(&self, args: &HashMap<String, RowValues>) -> Result<QueryAndParams, SqlBinderError> {
        let params = bind::map_args(&self.names, args)?;
        Ok(QueryAndParams::new(self.query.as_ref(), params))
    }

    /// Resolve arguments from a record without recompiling.
    ///
    /// # Errors
    ///
    /// Returns `SqlBinderError::UnresolvableName` for a name with no matching field.
    pub fn bind_record(
        &self,
        ctx: &BindContext,
        record: &dyn Fields,
    ) -> Result<QueryAndParams, SqlBinderError> {
        let params = bind::record_args(ctx, &self.names, record)?;
        Ok(QueryAndParams::new(self.query.as_ref(), params))
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Compile a `:name` template for `dialect`.
///
/// Generic emits `?`, `NamedColon` keeps `:name`, `Dollar` and `At` number every occurrence,
/// so a repeated name takes a new number each time.
///
/// # Errors
///
/// Returns `SqlBinderError::MalformedTemplate` with the byte offset of a `:` found while a
/// name was being read (e.g. `:a:b`).
pub fn compile(dialect: Dialect, template: &str) -> Result<CompiledQuery, SqlBinderError> {
    let mut names: Vec<String> = Vec::with_capacity(template.matches(':').count());
    let mut rebound = String::with_capacity(template.len());
    let mut name = String::with_capacity(16);
    let mut in_name = false;
    let mut prev: Option<char> = None;

    let emit = |rebound: &mut String, names: &mut Vec<String>, name: &str| {
        names.push(name.to_string());
        match dialect {
            Dialect::NamedColon => {
                rebound.push(':');
                rebound.push_str(name);
            }
            other => other.push_placeholder(rebound, names.len()),
        }
    };

    for (idx, c) in template.char_indices() {
        let last = prev.replace(c);

        if c == ':' {
            if in_name {
                if last == Some(':') {
                    // second half of a `::` escape
                    rebound.push(':');
                    in_name = false;
                    continue;
                }
                return Err(SqlBinderError::MalformedTemplate { position: idx });
            }
            name.clear();
            in_name = true;
            continue;
        }

        if in_name {
            if c == '=' && name.is_empty() {
                rebound.push_str(":=");
                in_name = false;
                continue;
            }
            if is_name_char(c) {
                name.push(c);
                continue;
            }
            in_name = false;
            emit(&mut rebound, &mut names, &name);
        }

        rebound.push(c);
    }

    if in_name {
        emit(&mut rebound, &mut names, &name);
    }

    tracing::trace!(%dialect, placeholders = names.len(), "compiled named query");

    Ok(CompiledQuery {
        dialect,
        query: Arc::from(rebound),
        names: Arc::from(names),
    })
}
