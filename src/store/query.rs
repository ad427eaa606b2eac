//! Query builder for the backing store
//!
//! `Select` collects the only predicates the dashboard needs (equality,
//! case-insensitive `LIKE`, ranges and null checks), an ordering and a limit,
//! and renders them into parameterized SQL. Column names are checked against
//! the table's column list, so nothing user-supplied is ever spliced into
//! the statement text.

use super::Table;
use crate::model::SortOrder;
use anyhow::{Result, bail};
use chrono::NaiveDate;
use rusqlite::types::Value;

#[derive(Debug, Clone, PartialEq)]
enum Predicate {
    Eq(&'static str, Value),
    ILike(&'static str, String),
    Gte(&'static str, Value),
    Lte(&'static str, Value),
    Lt(&'static str, Value),
    IsNull(&'static str),
}

impl Predicate {
    fn column(&self) -> &'static str {
        match self {
            Predicate::Eq(c, _)
            | Predicate::ILike(c, _)
            | Predicate::Gte(c, _)
            | Predicate::Lte(c, _)
            | Predicate::Lt(c, _)
            | Predicate::IsNull(c) => c,
        }
    }
}

/// A filtered, ordered, limited read of one table
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    table: Table,
    predicates: Vec<Predicate>,
    order: Vec<(&'static str, SortOrder)>,
    limit: Option<usize>,
}

/// Calendar day as stored in date columns
pub fn day(date: NaiveDate) -> Value {
    Value::Text(date.format("%Y-%m-%d").to_string())
}

/// `LIKE` pattern matching `needle` anywhere, with wildcards in the needle
/// escaped
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl Select {
    pub fn from(table: Table) -> Self {
        Self {
            table,
            predicates: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::Eq(column, value.into()));
        self
    }

    /// Case-insensitive `LIKE` with `\` as the escape character
    pub fn ilike(mut self, column: &'static str, pattern: impl Into<String>) -> Self {
        self.predicates.push(Predicate::ILike(column, pattern.into()));
        self
    }

    pub fn gte(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::Gte(column, value.into()));
        self
    }

    pub fn lte(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::Lte(column, value.into()));
        self
    }

    pub fn lt(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::Lt(column, value.into()));
        self
    }

    pub fn is_null(mut self, column: &'static str) -> Self {
        self.predicates.push(Predicate::IsNull(column));
        self
    }

    /// Add a sort key; earlier keys take precedence
    pub fn order_by(mut self, column: &'static str, order: SortOrder) -> Self {
        self.order.push((column, order));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn check_column(&self, column: &str) -> Result<()> {
        if !self.table.columns().contains(&column) {
            bail!(
                "Unknown column '{}' on table '{}'",
                column,
                self.table.name()
            );
        }
        Ok(())
    }

    fn where_clause(&self, values: &mut Vec<Value>) -> Result<String> {
        if self.predicates.is_empty() {
            return Ok(String::new());
        }

        let mut parts = Vec::with_capacity(self.predicates.len());
        for predicate in &self.predicates {
            self.check_column(predicate.column())?;
            let part = match predicate {
                Predicate::Eq(c, v) => {
                    values.push(v.clone());
                    format!("{} = ?{}", c, values.len())
                }
                Predicate::ILike(c, p) => {
                    values.push(Value::Text(p.clone()));
                    format!("{} LIKE ?{} ESCAPE '\\'", c, values.len())
                }
                Predicate::Gte(c, v) => {
                    values.push(v.clone());
                    format!("{} >= ?{}", c, values.len())
                }
                Predicate::Lte(c, v) => {
                    values.push(v.clone());
                    format!("{} <= ?{}", c, values.len())
                }
                Predicate::Lt(c, v) => {
                    values.push(v.clone());
                    format!("{} < ?{}", c, values.len())
                }
                Predicate::IsNull(c) => format!("{} IS NULL", c),
            };
            parts.push(part);
        }
        Ok(format!(" WHERE {}", parts.join(" AND ")))
    }

    /// Render `SELECT <all columns> ...` with its positional parameters
    pub fn to_sql(&self) -> Result<(String, Vec<Value>)> {
        let mut values = Vec::new();
        let mut sql = format!(
            "SELECT {} FROM {}",
            self.table.columns().join(", "),
            self.table.name()
        );
        sql.push_str(&self.where_clause(&mut values)?);

        if !self.order.is_empty() {
            let mut keys = Vec::with_capacity(self.order.len());
            for (column, order) in &self.order {
                self.check_column(column)?;
                let dir = match order {
                    SortOrder::Asc => "ASC",
                    SortOrder::Desc => "DESC",
                };
                keys.push(format!("{} {}", column, dir));
            }
            sql.push_str(" ORDER BY ");
            sql.push_str(&keys.join(", "));
        }

        if let Some(limit) = self.limit {
            values.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
            sql.push_str(&format!(" LIMIT ?{}", values.len()));
        }

        Ok((sql, values))
    }

    /// Render `SELECT count(*) ...`; ordering and limit are ignored
    pub fn to_count_sql(&self) -> Result<(String, Vec<Value>)> {
        let mut values = Vec::new();
        let mut sql = format!("SELECT count(*) FROM {}", self.table.name());
        sql.push_str(&self.where_clause(&mut values)?);
        Ok((sql, values))
    }
}
