//! Human-readable rendering of bound statements, for log lines only.

use std::fmt::Write;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::dialect::Dialect;
use crate::types::RowValues;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

lazy_static! {
    static ref DOLLAR: Regex = Regex::new(r"\$(\d+)").expect("valid dollar regex");
    static ref NAMED_COLON: Regex = Regex::new(r":arg(\d+)").expect("valid colon regex");
    static ref AT: Regex = Regex::new(r"@p(\d+)").expect("valid at regex");
}

fn quote(text: &str, limit: usize) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    let cut = if limit > 0 { text.char_indices().nth(limit) } else { None };
    let body = cut.map_or(text, |(end, _)| &text[..end]);
    out.push_str(&body.replace('\'', "''"));
    if cut.is_some() {
        out.push_str("...");
    }
    out.push('\'');
    out
}

fn hex_literal(bytes: &[u8], limit: usize) -> String {
    if bytes.is_empty() {
        return "''".to_string();
    }
    let shown = if limit > 0 && bytes.len() > limit { &bytes[..limit] } else { bytes };
    let mut out = String::with_capacity(shown.len() * 2 + 6);
    out.push_str("'\\x");
    for b in shown {
        let _ = write!(out, "{b:02x}");
    }
    if shown.len() < bytes.len() {
        out.push_str("...");
    }
    out.push('\'');
    out
}

fn is_printable(text: &str) -> bool {
    text.chars().all(|c| !c.is_control() || c == '\n' || c == '\r' || c == '\t')
}

/// Render one argument as a SQL literal.
#[must_use]
pub fn literal(value: &RowValues, max_arg_len: usize) -> String {
    match value {
        RowValues::Null => "NULL".to_string(),
        RowValues::Int(i) => i.to_string(),
        RowValues::Float(f) => f.to_string(),
        RowValues::Bool(b) => b.to_string(),
        RowValues::Text(s) => quote(s, max_arg_len),
        RowValues::Timestamp(ts) => format!("'{}'", ts.format(TIMESTAMP_FORMAT)),
        RowValues::JSON(json) => quote(&json.to_string(), max_arg_len),
        RowValues::Blob(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) if is_printable(text) => quote(text, max_arg_len),
            _ => hex_literal(bytes, max_arg_len),
        },
    }
}

/// Inline `args` into `sql` for logging. Never execute the result.
///
/// Text longer than `max_arg_len` characters (blobs: bytes) is cut and marked with `...`;
/// `0` disables the cut. Generic `?` markers are filled left to right and extra markers are
/// left alone. Numbered markers pick their argument by number; out-of-range numbers stay as
/// written.
///
/// ```rust
/// use sql_binder::prelude::*;
///
/// let sql = explain(
///     Dialect::Dollar,
///     "SELECT * FROM t WHERE name = $2 AND id = $1",
///     0,
///     &[RowValues::Int(3), RowValues::Text("o'neil".into())],
/// );
/// assert_eq!(sql, "SELECT * FROM t WHERE name = 'o''neil' AND id = 3");
/// ```
#[must_use]
pub fn explain(dialect: Dialect, sql: &str, max_arg_len: usize, args: &[RowValues]) -> String {
    if args.is_empty() {
        return sql.to_string();
    }

    let rendered: Vec<String> = args.iter().map(|a| literal(a, max_arg_len)).collect();

    let pattern: &Regex = match dialect {
        Dialect::Generic => {
            let mut out = String::with_capacity(sql.len() + rendered.len() * 8);
            let mut next = rendered.iter();
            for c in sql.chars() {
                if c == '?'
                    && let Some(arg) = next.next()
                {
                    out.push_str(arg);
                } else {
                    out.push(c);
                }
            }
            return out;
        }
        Dialect::Dollar => &DOLLAR,
        Dialect::NamedColon => &NAMED_COLON,
        Dialect::At => &AT,
    };

    pattern
        .replace_all(sql, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=rendered.len()).contains(n))
                .map_or_else(|| caps[0].to_string(), |n| rendered[n - 1].clone())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn generic_fills_left_to_right() {
        let sql = explain(
            Dialect::Generic,
            "INSERT INTO t VALUES (?, ?, ?)",
            0,
            &[RowValues::Int(1), RowValues::Null],
        );
        assert_eq!(sql, "INSERT INTO t VALUES (1, NULL, ?)");
    }

    #[test]
    fn numbered_markers_pick_by_number() {
        let args = [RowValues::Bool(true), RowValues::Float(1.5)];
        assert_eq!(
            explain(Dialect::At, "SELECT @p2, @p1, @p3", 0, &args),
            "SELECT 1.5, true, @p3"
        );
        assert_eq!(
            explain(Dialect::NamedColon, "SELECT :arg1, :arg0", 0, &args),
            "SELECT true, :arg0"
        );
    }

    #[test]
    fn truncates_long_values() {
        let args = [RowValues::Text("abcdefgh".into())];
        assert_eq!(explain(Dialect::Dollar, "$1", 3, &args), "'abc...'");

        let args = [RowValues::Blob(vec![0x00, 0xff, 0x10])];
        assert_eq!(explain(Dialect::Dollar, "$1", 2, &args), "'\\x00ff...'");
        assert_eq!(explain(Dialect::Dollar, "$1", 0, &args), "'\\x00ff10'");
    }

    #[test]
    fn renders_other_kinds() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(8, 5, 1, 250)
            .unwrap();
        assert_eq!(literal(&RowValues::Timestamp(ts), 0), "'2024-03-09 08:05:01.250'");
        assert_eq!(
            literal(&RowValues::JSON(serde_json::json!({"k": "v"})), 0),
            "'{\"k\":\"v\"}'"
        );
        assert_eq!(literal(&RowValues::Blob(b"hi".to_vec()), 0), "'hi'");
        assert_eq!(literal(&RowValues::Blob(Vec::new()), 0), "''");
    }

    #[test]
    fn no_args_returns_input() {
        assert_eq!(explain(Dialect::Dollar, "SELECT $1", 0, &[]), "SELECT $1");
    }
}
