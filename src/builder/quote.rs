use std::borrow::Cow;

/// Identifier quoting applied by [`Builder`](super::Builder) to table and column names.
///
/// Only plain identifiers are quoted: ASCII word characters, optionally dotted (`t.id`), with
/// `*` allowed as the last part. Anything else (`COUNT(*)`, `lower(name)`, text that is already
/// quoted) is emitted as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quoter {
    /// `"name"` (PostgreSQL, SQLite, ANSI)
    #[default]
    Ansi,
    /// `` `name` `` (MySQL, MariaDB)
    Backtick,
    /// `[name]` (SQL Server)
    Bracket,
    /// Names pass through untouched.
    Verbatim,
}

impl Quoter {
    fn delimiters(self) -> Option<(char, char)> {
        match self {
            Quoter::Ansi => Some(('"', '"')),
            Quoter::Backtick => Some(('`', '`')),
            Quoter::Bracket => Some(('[', ']')),
            Quoter::Verbatim => None,
        }
    }

    /// Quote `ident` if it is a plain (possibly dotted) identifier.
    ///
    /// ```rust
    /// use sql_binder::builder::Quoter;
    ///
    /// assert_eq!(Quoter::Ansi.quote("users.id"), r#""users"."id""#);
    /// assert_eq!(Quoter::Bracket.quote("u.*"), "[u].*");
    /// assert_eq!(Quoter::Ansi.quote("COUNT(*)"), "COUNT(*)");
    /// ```
    #[must_use]
    pub fn quote(self, ident: &str) -> Cow<'_, str> {
        let Some((open, close)) = self.delimiters() else {
            return Cow::Borrowed(ident);
        };
        if !is_plain(ident) {
            return Cow::Borrowed(ident);
        }

        let mut out = String::with_capacity(ident.len() + 4);
        for (i, part) in ident.split('.').enumerate() {
            if i > 0 {
                out.push('.');
            }
            if part == "*" {
                out.push('*');
            } else {
                out.push(open);
                out.push_str(part);
                out.push(close);
            }
        }
        Cow::Owned(out)
    }
}

fn is_plain(ident: &str) -> bool {
    let parts: Vec<&str> = ident.split('.').collect();
    let last = parts.len() - 1;
    parts.iter().enumerate().all(|(i, part)| {
        if *part == "*" {
            // a lone `*` stays bare; `t.*` quotes the table
            return i == last && i > 0;
        }
        !part.is_empty() && part.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_are_quoted_per_part() {
        assert_eq!(Quoter::Ansi.quote("id"), "\"id\"");
        assert_eq!(Quoter::Backtick.quote("s.users"), "`s`.`users`");
        assert_eq!(Quoter::Ansi.quote("u.*"), "\"u\".*");
    }

    #[test]
    fn expressions_pass_through() {
        for raw in ["*", "COUNT(*)", "lower(name)", "\"id\"", "a b", "", "a..b"] {
            assert_eq!(Quoter::Ansi.quote(raw), raw, "{raw}");
        }
        assert_eq!(Quoter::Verbatim.quote("id"), "id");
    }
}
