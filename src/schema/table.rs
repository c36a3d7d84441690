use crate::error::{Error, Result};
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};

/// Column data kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    Text,
    Number,
    Date,
}

impl DataKind {
    /// SQLite type affinity for this kind. Dates are stored as ISO-8601 text.
    pub fn sql_type(&self) -> &'static str {
        match self {
            DataKind::Text => "TEXT",
            DataKind::Number => "NUMERIC",
            DataKind::Date => "TEXT",
        }
    }
}

/// Value-level constraint on a column, rendered as a CHECK clause
#[derive(Debug, Clone, PartialEq)]
pub enum ValueConstraint {
    /// Inclusive numeric range; either bound may be open
    Range {
        min: Option<f64>,
        max: Option<f64>,
    },
    /// Enumerated set of allowed text values
    OneOf(Vec<String>),
}

impl ValueConstraint {
    pub fn at_least(min: f64) -> Self {
        ValueConstraint::Range {
            min: Some(min),
            max: None,
        }
    }

    pub fn between(min: f64, max: f64) -> Self {
        ValueConstraint::Range {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn one_of(values: &[&str]) -> Self {
        ValueConstraint::OneOf(values.iter().map(|v| v.to_string()).collect())
    }
}

/// A single column of a table definition. Immutable once registered.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub kind: DataKind,
    pub nullable: bool,
    pub unique: bool,
    pub default: Option<Value>,
    pub constraint: Option<ValueConstraint>,
}

impl Column {
    pub fn new<S: Into<String>>(name: S, kind: DataKind) -> Self {
        Column {
            name: name.into(),
            kind,
            nullable: true,
            unique: false,
            default: None,
            constraint: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn check(mut self, constraint: ValueConstraint) -> Self {
        self.constraint = Some(constraint);
        self
    }
}

/// Action applied to dependent rows when a referenced row is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    Cascade,
    SetNull,
    Restrict,
}

impl OnDelete {
    pub fn as_sql(&self) -> &'static str {
        match self {
            OnDelete::Cascade => "CASCADE",
            OnDelete::SetNull => "SET NULL",
            OnDelete::Restrict => "RESTRICT",
        }
    }
}

/// A foreign-key reference from one column to another table's column.
/// Defines a directed edge from the owning table to the referenced table
/// in the dependency graph.
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub column: String,
    pub references_table: String,
    pub references_column: String,
    pub on_delete: OnDelete,
}

/// Structural metadata for one table: ordered columns, primary key,
/// foreign keys, and multi-column unique groups.
#[derive(Debug, Clone)]
pub struct TableDefinition {
    name: String,
    columns: Vec<Column>,
    primary_key: Vec<String>,
    foreign_keys: Vec<ForeignKey>,
    unique_groups: Vec<Vec<String>>,
}

impl TableDefinition {
    pub fn new<S: Into<String>>(name: S) -> Self {
        TableDefinition {
            name: name.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
            unique_groups: Vec::new(),
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Designate the primary-key column(s). The key is always named
    /// explicitly, never inferred from column position.
    pub fn key(mut self, columns: &[&str]) -> Self {
        self.primary_key = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn references(
        mut self,
        column: &str,
        table: &str,
        referenced_column: &str,
        on_delete: OnDelete,
    ) -> Self {
        self.foreign_keys.push(ForeignKey {
            column: column.to_string(),
            references_table: table.to_string(),
            references_column: referenced_column.to_string(),
            on_delete,
        });
        self
    }

    pub fn unique_together(mut self, columns: &[&str]) -> Self {
        self.unique_groups
            .push(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    pub fn unique_groups(&self) -> &[Vec<String>] {
        &self.unique_groups
    }

    /// Columns not part of the primary key, in declared order
    pub fn non_key_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| !self.primary_key.iter().any(|k| k == &c.name))
            .collect()
    }

    /// The single primary-key column, for the by-key CRUD surface.
    /// Composite keys are representable in metadata but not addressable
    /// through update/delete-by-key.
    pub fn single_key(&self) -> Result<&str> {
        match self.primary_key.as_slice() {
            [key] => Ok(key),
            [] => Err(Error::invalid_definition(&self.name, "no primary key")),
            _ => Err(Error::invalid_definition(
                &self.name,
                "composite primary key is not addressable by single key",
            )),
        }
    }

    /// Structural validation applied at registration time
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::invalid_definition(&self.name, "no columns"));
        }
        let mut seen = std::collections::HashSet::new();
        for col in &self.columns {
            if !seen.insert(col.name.as_str()) {
                return Err(Error::invalid_definition(
                    &self.name,
                    format!("duplicate column '{}'", col.name),
                ));
            }
        }
        if self.primary_key.is_empty() {
            return Err(Error::invalid_definition(&self.name, "no primary key"));
        }
        let has_column = |name: &str| self.columns.iter().any(|c| c.name == name);
        for key in &self.primary_key {
            if !has_column(key) {
                return Err(Error::invalid_definition(
                    &self.name,
                    format!("primary-key column '{key}' is not defined"),
                ));
            }
        }
        for fk in &self.foreign_keys {
            if !has_column(&fk.column) {
                return Err(Error::invalid_definition(
                    &self.name,
                    format!("foreign-key column '{}' is not defined", fk.column),
                ));
            }
        }
        for group in &self.unique_groups {
            for col in group {
                if !has_column(col) {
                    return Err(Error::invalid_definition(
                        &self.name,
                        format!("unique-group column '{col}' is not defined"),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// A runtime cell value, positionally aligned to a table's columns.
/// Untagged so JSON datasets read naturally (strings, numbers, null).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Real(f64),
    Text(String),
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
            Value::Int(i) => ToSqlOutput::Owned(rusqlite::types::Value::Integer(*i)),
            Value::Real(r) => ToSqlOutput::Owned(rusqlite::types::Value::Real(*r)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(v: ValueRef<'_>) -> Self {
        match v {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Int(i),
            ValueRef::Real(r) => Value::Real(r),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            // Blobs are outside the data model
            ValueRef::Blob(_) => Value::Null,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Value::Real(r)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}
