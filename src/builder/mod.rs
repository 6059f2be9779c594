//! Fluent construction of SELECT, INSERT, UPDATE and DELETE statements.
//!
//! The builder writes `?` markers and collects arguments in the order the markers appear, then
//! [`Builder::build`] rebinds the text to the builder's dialect. Arguments must therefore be
//! supplied in statement order: joins before where clauses, and so on.

use std::fmt::Write;

mod quote;

pub use quote::Quoter;

use crate::dialect::{self, Dialect};
use crate::query::QueryAndParams;
use crate::translation::rebind;
use crate::types::{RowValues, ToRowValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Select,
    Insert,
    Update,
    Delete,
}

/// Statement builder producing dialect-ready SQL and its arguments.
///
/// ```rust
/// use sql_binder::builder::Builder;
/// use sql_binder::prelude::*;
///
/// let qp = Builder::new(Dialect::Dollar)
///     .select(["id", "name"])
///     .from("users")
///     .eq("status", "active")
///     .in_list("team", [3, 5])
///     .order_desc("id")
///     .limit(10)
///     .build();
/// assert_eq!(
///     qp.query,
///     r#"SELECT "id", "name" FROM "users" WHERE "status" = $1 AND "team" IN ($2,$3) ORDER BY "id" DESC LIMIT 10"#
/// );
/// assert_eq!(qp.params.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    dialect: Dialect,
    quoter: Quoter,
    command: Option<Command>,
    distinct: bool,
    table: String,
    columns: Vec<String>,
    values: Vec<String>,
    joins: Vec<String>,
    wheres: Vec<String>,
    orders: Vec<String>,
    returns: Vec<String>,
    params: Vec<RowValues>,
    offset: usize,
    limit: usize,
}

impl Builder {
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Builder for the dialect registered for `driver`.
    #[must_use]
    pub fn for_driver(driver: &str) -> Self {
        Self::new(dialect::dialect_for(driver))
    }

    #[must_use]
    pub fn with_quoter(mut self, quoter: Quoter) -> Self {
        self.quoter = quoter;
        self
    }

    /// Clear the statement, keeping dialect and quoter.
    #[must_use]
    pub fn reset(self) -> Self {
        Self::new(self.dialect).with_quoter(self.quoter)
    }

    /// `SELECT` the given columns; `*` when none are given.
    #[must_use]
    pub fn select<S: Into<String>>(mut self, cols: impl IntoIterator<Item = S>) -> Self {
        self.command = Some(Command::Select);
        let before = self.columns.len();
        self.columns.extend(cols.into_iter().map(Into::into));
        if self.columns.len() == before {
            self.columns.push("*".to_string());
        }
        self
    }

    #[must_use]
    pub fn select_distinct<S: Into<String>>(self, cols: impl IntoIterator<Item = S>) -> Self {
        self.select(cols).distinct()
    }

    /// `SELECT COUNT(cols)`, or `COUNT(*)` when none are given.
    #[must_use]
    pub fn count<S: AsRef<str>>(self, cols: impl IntoIterator<Item = S>) -> Self {
        let cols = join(cols);
        let expr = if cols.is_empty() {
            "COUNT(*)".to_string()
        } else {
            format!("COUNT({cols})")
        };
        self.select([expr])
    }

    #[must_use]
    pub fn count_distinct<S: AsRef<str>>(self, cols: impl IntoIterator<Item = S>) -> Self {
        let cols = join(cols);
        let expr = if cols.is_empty() {
            "COUNT(distinct *)".to_string()
        } else {
            format!("COUNT(distinct {cols})")
        };
        self.select([expr])
    }

    /// Only affects SELECT.
    #[must_use]
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    #[must_use]
    pub fn insert(mut self, table: impl Into<String>) -> Self {
        self.command = Some(Command::Insert);
        self.table = table.into();
        self
    }

    #[must_use]
    pub fn update(mut self, table: impl Into<String>) -> Self {
        self.command = Some(Command::Update);
        self.table = table.into();
        self
    }

    #[must_use]
    pub fn delete(mut self, table: impl Into<String>) -> Self {
        self.command = Some(Command::Delete);
        self.table = table.into();
        self
    }

    #[must_use]
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    #[must_use]
    pub fn columns<S: Into<String>>(mut self, cols: impl IntoIterator<Item = S>) -> Self {
        self.columns.extend(cols.into_iter().map(Into::into));
        self
    }

    /// Raw value expressions for INSERT / UPDATE, matched to columns by position.
    #[must_use]
    pub fn values<S: Into<String>>(mut self, vals: impl IntoIterator<Item = S>) -> Self {
        self.values.extend(vals.into_iter().map(Into::into));
        self
    }

    /// Append a join clause written out in full, with arguments for its markers.
    ///
    /// `.join("JOIN emails e ON e.user_id = users.id AND e.email = ?", &[email])`
    #[must_use]
    pub fn join(mut self, clause: impl Into<String>, args: &[RowValues]) -> Self {
        self.joins.push(clause.into());
        self.params.extend_from_slice(args);
        self
    }

    /// Append a raw condition; conditions are joined with `AND`.
    #[must_use]
    pub fn and_where(mut self, condition: impl Into<String>, args: &[RowValues]) -> Self {
        self.wheres.push(condition.into());
        self.params.extend_from_slice(args);
        self
    }

    /// `col = expr` for UPDATE (or a column/value pair for INSERT), with arguments for `expr`.
    #[must_use]
    pub fn set_expr(
        mut self,
        col: impl Into<String>,
        expr: impl Into<String>,
        args: &[RowValues],
    ) -> Self {
        self.columns.push(col.into());
        self.values.push(expr.into());
        self.params.extend_from_slice(args);
        self
    }

    /// `col = ?` bound to `value`.
    #[must_use]
    pub fn set(self, col: impl Into<String>, value: impl ToRowValue) -> Self {
        self.set_expr(col, "?", &[value.to_row_value()])
    }

    /// Column paired with the named placeholder `:col`, for use with [`Builder::template`] and
    /// the named binder.
    #[must_use]
    pub fn name(mut self, col: &str) -> Self {
        self.columns.push(col.to_string());
        self.values.push(format!(":{col}"));
        self
    }

    #[must_use]
    pub fn names<S: AsRef<str>>(self, cols: impl IntoIterator<Item = S>) -> Self {
        cols.into_iter().fold(self, |b, col| b.name(col.as_ref()))
    }

    /// Drop columns added by [`Builder::name`] / [`Builder::names`].
    #[must_use]
    pub fn omit<S: AsRef<str>>(mut self, cols: impl IntoIterator<Item = S>) -> Self {
        for col in cols {
            let col = col.as_ref();
            let named = format!(":{col}");
            let keep: Vec<bool> = self
                .columns
                .iter()
                .zip(self.values.iter().map(Some).chain(std::iter::repeat(None)))
                .map(|(c, v)| !(c == col && v == Some(&named)))
                .collect();
            let mut flags = keep.iter();
            self.columns.retain(|_| flags.next().copied().unwrap_or(true));
            let mut flags = keep.iter();
            self.values.retain(|_| flags.next().copied().unwrap_or(true));
        }
        self
    }

    fn compare(self, col: &str, op: &str, value: impl ToRowValue) -> Self {
        let condition = format!("{} {op} ?", self.quoter.quote(col));
        self.and_where(condition, &[value.to_row_value()])
    }

    #[must_use]
    pub fn is_null(self, col: &str) -> Self {
        let condition = format!("{} IS NULL", self.quoter.quote(col));
        self.and_where(condition, &[])
    }

    #[must_use]
    pub fn not_null(self, col: &str) -> Self {
        let condition = format!("{} IS NOT NULL", self.quoter.quote(col));
        self.and_where(condition, &[])
    }

    #[must_use]
    pub fn eq(self, col: &str, value: impl ToRowValue) -> Self {
        self.compare(col, "=", value)
    }

    #[must_use]
    pub fn neq(self, col: &str, value: impl ToRowValue) -> Self {
        self.compare(col, "<>", value)
    }

    #[must_use]
    pub fn gt(self, col: &str, value: impl ToRowValue) -> Self {
        self.compare(col, ">", value)
    }

    #[must_use]
    pub fn gte(self, col: &str, value: impl ToRowValue) -> Self {
        self.compare(col, ">=", value)
    }

    #[must_use]
    pub fn lt(self, col: &str, value: impl ToRowValue) -> Self {
        self.compare(col, "<", value)
    }

    #[must_use]
    pub fn lte(self, col: &str, value: impl ToRowValue) -> Self {
        self.compare(col, "<=", value)
    }

    #[must_use]
    pub fn like(self, col: &str, value: impl ToRowValue) -> Self {
        self.compare(col, "LIKE", value)
    }

    #[must_use]
    pub fn ilike(self, col: &str, value: impl ToRowValue) -> Self {
        self.compare(col, "ILIKE", value)
    }

    #[must_use]
    pub fn not_like(self, col: &str, value: impl ToRowValue) -> Self {
        self.compare(col, "NOT LIKE", value)
    }

    #[must_use]
    pub fn not_ilike(self, col: &str, value: impl ToRowValue) -> Self {
        self.compare(col, "NOT ILIKE", value)
    }

    #[must_use]
    pub fn between(self, col: &str, low: impl ToRowValue, high: impl ToRowValue) -> Self {
        let condition = format!("{} BETWEEN ? AND ?", self.quoter.quote(col));
        self.and_where(condition, &[low.to_row_value(), high.to_row_value()])
    }

    #[must_use]
    pub fn not_between(self, col: &str, low: impl ToRowValue, high: impl ToRowValue) -> Self {
        let condition = format!("{} NOT BETWEEN ? AND ?", self.quoter.quote(col));
        self.and_where(condition, &[low.to_row_value(), high.to_row_value()])
    }

    /// `col IN (?,?,...)`, one marker per value. See [`in_clause`] for the empty case.
    #[must_use]
    pub fn in_list<V: ToRowValue>(self, col: &str, values: impl IntoIterator<Item = V>) -> Self {
        let (condition, args) = in_clause(&self.quoter.quote(col), values);
        self.and_where(condition, &args)
    }

    #[must_use]
    pub fn not_in<V: ToRowValue>(self, col: &str, values: impl IntoIterator<Item = V>) -> Self {
        let (condition, args) = not_in_clause(&self.quoter.quote(col), values);
        self.and_where(condition, &args)
    }

    /// `ORDER BY col` with no direction.
    #[must_use]
    pub fn order(mut self, col: &str) -> Self {
        self.orders.push(self.quoter.quote(col).into_owned());
        self
    }

    #[must_use]
    pub fn order_asc(mut self, col: &str) -> Self {
        self.orders.push(format!("{} ASC", self.quoter.quote(col)));
        self
    }

    #[must_use]
    pub fn order_desc(mut self, col: &str) -> Self {
        self.orders.push(format!("{} DESC", self.quoter.quote(col)));
        self
    }

    /// Comma-separated sort list: `"-id,name"` sorts by `id` descending, then `name` ascending.
    #[must_use]
    pub fn orders(self, list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .fold(self, |b, item| match item.strip_prefix('-') {
                Some(col) => b.order_desc(col.trim()),
                None => b.order_asc(item.strip_prefix('+').unwrap_or(item).trim()),
            })
    }

    /// Zero means no `OFFSET`.
    #[must_use]
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Zero means no `LIMIT`.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// `RETURNING cols`, or `RETURNING *` when none are given.
    #[must_use]
    pub fn returns<S: Into<String>>(mut self, cols: impl IntoIterator<Item = S>) -> Self {
        let before = self.returns.len();
        self.returns.extend(cols.into_iter().map(Into::into));
        if self.returns.len() == before {
            self.returns.push("*".to_string());
        }
        self
    }

    /// Arguments collected so far, in marker order.
    #[must_use]
    pub fn params(&self) -> &[RowValues] {
        &self.params
    }

    /// Statement text with `?` markers (and any `:name` values) as written, before rebinding.
    /// Empty when no statement kind was chosen.
    #[must_use]
    pub fn template(&self) -> String {
        let mut sql = String::with_capacity(64);
        match self.command {
            Some(Command::Select) => self.write_select(&mut sql),
            Some(Command::Insert) => self.write_insert(&mut sql),
            Some(Command::Update) => self.write_update(&mut sql),
            Some(Command::Delete) => self.write_delete(&mut sql),
            None => {}
        }
        sql
    }

    /// [`Builder::template`] rebound to the builder's dialect.
    #[must_use]
    pub fn sql(&self) -> String {
        rebind(self.dialect, &self.template()).into_owned()
    }

    #[must_use]
    pub fn build(&self) -> QueryAndParams {
        let sql = self.sql();
        tracing::trace!(dialect = %self.dialect, params = self.params.len(), "built statement");
        QueryAndParams::new(sql, self.params.clone())
    }

    fn write_list(&self, sql: &mut String, items: &[String]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&self.quoter.quote(item));
        }
    }

    fn write_select(&self, sql: &mut String) {
        sql.push_str("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        self.write_list(sql, &self.columns);
        sql.push_str(" FROM ");
        sql.push_str(&self.quoter.quote(&self.table));

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }

        self.write_where(sql);

        for (i, order) in self.orders.iter().enumerate() {
            sql.push_str(if i == 0 { " ORDER BY " } else { ", " });
            sql.push_str(order);
        }

        // writing to a String cannot fail
        if self.limit > 0 {
            let _ = write!(sql, " LIMIT {}", self.limit);
        }
        if self.offset > 0 {
            let _ = write!(sql, " OFFSET {}", self.offset);
        }
    }

    fn write_insert(&self, sql: &mut String) {
        sql.push_str("INSERT INTO ");
        sql.push_str(&self.quoter.quote(&self.table));
        if !self.columns.is_empty() {
            sql.push_str(" (");
            self.write_list(sql, &self.columns);
            sql.push(')');
        }

        sql.push_str(" VALUES (");
        sql.push_str(&self.values.join(", "));
        sql.push(')');

        self.write_returning(sql);
    }

    fn write_update(&self, sql: &mut String) {
        sql.push_str("UPDATE ");
        sql.push_str(&self.quoter.quote(&self.table));
        sql.push_str(" SET ");

        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&self.quoter.quote(col));
            sql.push_str(" = ");
            sql.push_str(self.values.get(i).map_or("?", String::as_str));
        }

        self.write_where(sql);
        self.write_returning(sql);
    }

    fn write_delete(&self, sql: &mut String) {
        sql.push_str("DELETE FROM ");
        sql.push_str(&self.quoter.quote(&self.table));

        self.write_where(sql);
        self.write_returning(sql);
    }

    fn write_where(&self, sql: &mut String) {
        for (i, condition) in self.wheres.iter().enumerate() {
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            sql.push_str(condition);
        }
    }

    fn write_returning(&self, sql: &mut String) {
        if !self.returns.is_empty() {
            sql.push_str(" RETURNING ");
            self.write_list(sql, &self.returns);
        }
    }
}

fn join<S: AsRef<str>>(items: impl IntoIterator<Item = S>) -> String {
    items
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn membership<V: ToRowValue>(
    col: &str,
    op: &str,
    empty: &str,
    values: impl IntoIterator<Item = V>,
) -> (String, Vec<RowValues>) {
    let args: Vec<RowValues> = values.into_iter().map(|v| v.to_row_value()).collect();
    if args.is_empty() {
        return (empty.to_string(), args);
    }
    (format!("{col} {op} ({})", question(args.len())), args)
}

/// `col IN (?,?,...)` and its arguments.
///
/// An empty list matches nothing and renders as `1 = 0`, since `IN ()` is not valid SQL.
///
/// ```rust
/// use sql_binder::builder::in_clause;
/// use sql_binder::RowValues;
///
/// let (sql, args) = in_clause("id", [1, 2, 3]);
/// assert_eq!(sql, "id IN (?,?,?)");
/// assert_eq!(args[2], RowValues::Int(3));
/// ```
pub fn in_clause<V: ToRowValue>(
    col: &str,
    values: impl IntoIterator<Item = V>,
) -> (String, Vec<RowValues>) {
    membership(col, "IN", "1 = 0", values)
}

/// `col NOT IN (?,?,...)` and its arguments. An empty list matches everything (`1 = 1`).
pub fn not_in_clause<V: ToRowValue>(
    col: &str,
    values: impl IntoIterator<Item = V>,
) -> (String, Vec<RowValues>) {
    membership(col, "NOT IN", "1 = 1", values)
}

/// `n` comma-separated `?` markers.
#[must_use]
pub fn question(n: usize) -> String {
    vec!["?"; n].join(",")
}

/// `n` separate `?` markers, e.g. for [`Builder::values`].
#[must_use]
pub fn questions(n: usize) -> Vec<String> {
    vec!["?".to_string(); n]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generic() -> Builder {
        Builder::new(Dialect::Generic)
    }

    #[test]
    fn select_with_every_clause() {
        let b = generic()
            .select(["id", "name"])
            .from("users")
            .and_where("\"id\" = ?", &[RowValues::Int(10)])
            .orders("-id,name")
            .limit(10)
            .offset(5);

        assert_eq!(
            b.sql(),
            r#"SELECT "id", "name" FROM "users" WHERE "id" = ? ORDER BY "id" DESC, "name" ASC LIMIT 10 OFFSET 5"#
        );
        assert_eq!(b.params(), [RowValues::Int(10)]);
    }

    #[test]
    fn empty_select_is_star() {
        let b = generic().select(Vec::<String>::new()).distinct().from("t.x");
        assert_eq!(b.sql(), r#"SELECT DISTINCT * FROM "t"."x""#);
    }

    #[test]
    fn insert_with_returning() {
        let b = generic()
            .insert("users")
            .columns(["id", "name"])
            .values(questions(2))
            .returns(["id"]);
        assert_eq!(
            b.sql(),
            r#"INSERT INTO "users" ("id", "name") VALUES (?, ?) RETURNING "id""#
        );
    }

    #[test]
    fn update_fills_missing_values_with_markers() {
        let b = Builder::new(Dialect::Dollar)
            .update("users")
            .set("name", "Alice")
            .columns(["age"])
            .eq("id", 1i64)
            .returns(Vec::<String>::new());
        assert_eq!(
            b.sql(),
            r#"UPDATE "users" SET "name" = $1, "age" = $2 WHERE "id" = $3 RETURNING *"#
        );
        assert_eq!(
            b.params(),
            [RowValues::Text("Alice".into()), RowValues::Int(1)]
        );
    }

    #[test]
    fn delete_and_count() {
        let b = Builder::new(Dialect::At).delete("users").eq("id", 99i64);
        assert_eq!(b.sql(), r#"DELETE FROM "users" WHERE "id" = @p1"#);

        let b = generic().count_distinct(["name"]).from("users");
        assert_eq!(b.sql(), r#"SELECT COUNT(distinct name) FROM "users""#);
        let b = generic().count(Vec::<&str>::new()).from("users").is_null("deleted_at");
        assert_eq!(
            b.sql(),
            r#"SELECT COUNT(*) FROM "users" WHERE "deleted_at" IS NULL"#
        );
    }

    #[test]
    fn membership_lists_expand() {
        let (sql, args) = in_clause("id", [1, 2, 3]);
        assert_eq!(sql, "id IN (?,?,?)");
        assert_eq!(args, [1, 2, 3].map(RowValues::Int));

        let (sql, args) = not_in_clause("id", Vec::<i64>::new());
        assert_eq!(sql, "1 = 1");
        assert!(args.is_empty());
        assert_eq!(in_clause("id", Vec::<i64>::new()).0, "1 = 0");

        // a blob is one value, not a list of bytes
        let (sql, args) = in_clause("hash", [vec![0u8, 1, 2]]);
        assert_eq!(sql, "hash IN (?)");
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn names_build_a_named_template() {
        let b = generic()
            .update("a")
            .names(["name", "value", "note"])
            .omit(["note"])
            .and_where("id = :id", &[]);
        assert_eq!(
            b.template(),
            r#"UPDATE "a" SET "name" = :name, "value" = :value WHERE id = :id"#
        );
    }

    #[test]
    fn reset_keeps_dialect_and_quoter() {
        let b = Builder::new(Dialect::Dollar)
            .with_quoter(Quoter::Backtick)
            .select(["id"])
            .from("users")
            .eq("x", 1i64)
            .reset();
        assert!(b.params().is_empty());
        assert_eq!(b.template(), "");
        let b = b.select(["id"]).from("users").eq("x", 2i64);
        assert_eq!(b.sql(), "SELECT `id` FROM `users` WHERE `x` = $1");
    }

    #[test]
    fn helpers_count_markers() {
        assert_eq!(question(3), "?,?,?");
        assert_eq!(question(0), "");
        assert_eq!(questions(2), ["?", "?"]);
    }
}
