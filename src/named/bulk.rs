//! Multi-row expansion of single-row `INSERT ... VALUES (...)` templates.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref VALUES_CLAUSE: Regex = Regex::new(r"(?i)\bVALUES\s*\(").expect("valid VALUES regex");
}

/// Index of the `)` closing the `(` at the start of `s`, by depth counting.
fn matching_close(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in s.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Repeat the first `VALUES (...)` tuple so the statement inserts `rows` rows.
///
/// Copies are joined with `,` and spliced in right after the original tuple, so anything after
/// it (`ON DUPLICATE KEY UPDATE a=VALUES(a)`, `;--`) stays where it was. Parentheses inside
/// string literals are counted like any other. A template without a `VALUES (` clause, or with
/// an unbalanced tuple, comes back unchanged, as does any `rows <= 1`.
///
/// ```rust
/// use sql_binder::named::bulk::expand_values;
///
/// let sql = expand_values("INSERT INTO foo (a,b) VALUES (?, ?) ON CONFLICT DO NOTHING", 3);
/// assert_eq!(
///     sql,
///     "INSERT INTO foo (a,b) VALUES (?, ?),(?, ?),(?, ?) ON CONFLICT DO NOTHING"
/// );
/// ```
#[must_use]
pub fn expand_values(query: &str, rows: usize) -> Cow<'_, str> {
    if rows <= 1 {
        return Cow::Borrowed(query);
    }

    let Some(found) = VALUES_CLAUSE.find(query) else {
        return Cow::Borrowed(query);
    };
    let open = found.end() - 1;
    let Some(close_offset) = matching_close(&query[open..]) else {
        return Cow::Borrowed(query);
    };
    let close = open + close_offset + 1;
    let tuple = &query[open..close];

    let mut out = String::with_capacity(query.len() + (tuple.len() + 1) * (rows - 1));
    out.push_str(&query[..close]);
    for _ in 1..rows {
        out.push(',');
        out.push_str(tuple);
    }
    out.push_str(&query[close..]);

    tracing::trace!(rows, tuple_len = tuple.len(), "expanded VALUES tuple");
    Cow::Owned(out)
}
