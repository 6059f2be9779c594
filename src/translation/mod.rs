use std::borrow::Cow;

mod parsers;
mod scanner;

use parsers::scan_digits;
use scanner::literal_end;

use crate::dialect::Dialect;

/// How [`rebind_with`] treats `?` characters inside SQL literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RebindMode {
    /// Every `?` is a placeholder, wherever it appears.
    #[default]
    Lexical,
    /// Skip quoted strings, comments and dollar-quoted bodies.
    SkipLiterals,
}

/// Rewrite a `?`-placeholder query into `dialect`'s positional syntax.
///
/// The scan is purely lexical: a `?` inside a string literal is rewritten like any other. Write
/// `??` for a literal `?` (e.g. the `jsonb` operator); it comes out as a single `?` and does not
/// consume a number.
///
/// ```rust
/// use sql_binder::prelude::*;
///
/// let sql = rebind(Dialect::Dollar, "SELECT * FROM t WHERE a = ? AND b = ?");
/// assert_eq!(sql, "SELECT * FROM t WHERE a = $1 AND b = $2");
/// ```
#[must_use]
pub fn rebind(dialect: Dialect, query: &str) -> Cow<'_, str> {
    rebind_with(dialect, query, RebindMode::Lexical)
}

/// [`rebind`] with an explicit [`RebindMode`].
///
/// Returns a borrowed `Cow` when nothing needs rewriting.
#[must_use]
pub fn rebind_with(dialect: Dialect, query: &str, mode: RebindMode) -> Cow<'_, str> {
    if dialect == Dialect::Generic || !query.contains('?') {
        return Cow::Borrowed(query);
    }

    let bytes = query.as_bytes();
    // room for ten or so markers before we reallocate
    let mut out = String::with_capacity(query.len() + 10);
    let mut copied = 0;
    let mut n = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        if mode == RebindMode::SkipLiterals
            && let Some(end) = literal_end(bytes, idx)
        {
            idx = end;
            continue;
        }

        if bytes[idx] == b'?' {
            out.push_str(&query[copied..idx]);
            if bytes.get(idx + 1) == Some(&b'?') {
                out.push('?');
                idx += 2;
            } else {
                n += 1;
                dialect.push_placeholder(&mut out, n);
                idx += 1;
            }
            copied = idx;
            continue;
        }

        idx += 1;
    }

    out.push_str(&query[copied..]);
    Cow::Owned(out)
}

/// Target numbered placeholder style for [`translate_placeholders`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// PostgreSQL-style placeholders like `$1`.
    Postgres,
    /// SQLite-style placeholders like `?1`.
    Sqlite,
}

/// Translate numbered placeholders between Postgres-style `$N` and SQLite-style `?N`.
///
/// Unlike [`rebind`], this skips quoted strings, comments and dollar-quoted blocks. It only
/// touches markers that already carry a number; bare `?` is left alone.
/// Returns a borrowed `Cow` when no changes are needed.
#[must_use]
pub fn translate_placeholders(sql: &str, target: PlaceholderStyle, enabled: bool) -> Cow<'_, str> {
    if !enabled {
        return Cow::Borrowed(sql);
    }

    let (from, to) = match target {
        PlaceholderStyle::Postgres => (b'?', '$'),
        PlaceholderStyle::Sqlite => (b'$', '?'),
    };

    let bytes = sql.as_bytes();
    let mut out: Option<String> = None;
    let mut copied = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        if let Some(end) = literal_end(bytes, idx) {
            idx = end;
            continue;
        }

        if bytes[idx] == from
            && let Some(digits_end) = scan_digits(bytes, idx + 1)
        {
            let buf = out.get_or_insert_with(|| String::with_capacity(sql.len()));
            buf.push_str(&sql[copied..idx]);
            buf.push(to);
            buf.push_str(&sql[idx + 1..digits_end]);
            copied = digits_end;
            idx = digits_end;
            continue;
        }

        idx += 1;
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&sql[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(sql),
    }
}
