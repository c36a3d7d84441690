//! Statement synthesis from table metadata. Everything here renders text
//! and parameter layout only; nothing executes.

use crate::error::{Error, Result};
use crate::schema::table::{TableDefinition, Value, ValueConstraint};

/// `INSERT INTO t (a, b) VALUES (?1, ?2)` — one positional parameter per
/// column, order preserved.
pub fn insert(table: &str, columns: &[&str]) -> String {
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// `UPDATE t SET a = ?1, b = ?2 WHERE key = ?3` — the SET clause covers
/// all non-key columns in table order, and the key value is always the
/// last positional parameter.
pub fn update_by_key(table: &str, columns: &[&str], key_column: &str) -> Result<String> {
    let non_key: Vec<&str> = columns
        .iter()
        .copied()
        .filter(|c| *c != key_column)
        .collect();
    if non_key.is_empty() {
        return Err(Error::EmptyColumnSet {
            table: table.to_string(),
        });
    }

    let assignments: Vec<String> = non_key
        .iter()
        .enumerate()
        .map(|(i, col)| format!("{} = ?{}", col, i + 1))
        .collect();

    Ok(format!(
        "UPDATE {} SET {} WHERE {} = ?{}",
        table,
        assignments.join(", "),
        key_column,
        non_key.len() + 1
    ))
}

/// `DELETE FROM t WHERE key = ?1` — exactly one parameter
pub fn delete_by_key(table: &str, key_column: &str) -> String {
    format!("DELETE FROM {table} WHERE {key_column} = ?1")
}

/// `SELECT a, b FROM t` with an explicit column list, so row values come
/// back in declared order
pub fn select_all(table: &str, columns: &[&str]) -> String {
    format!("SELECT {} FROM {}", columns.join(", "), table)
}

/// Render the full CREATE TABLE statement for a definition: column
/// clauses with type/NOT NULL/DEFAULT/UNIQUE/CHECK, then the PRIMARY KEY,
/// FOREIGN KEY and multi-column UNIQUE clauses.
///
/// Deliberately no IF NOT EXISTS: the create pass reports per-table
/// duplicate failures instead of hiding them.
pub fn create_table(def: &TableDefinition) -> String {
    let mut clauses: Vec<String> = def
        .columns()
        .iter()
        .map(|col| {
            let mut clause = format!("{} {}", col.name, col.kind.sql_type());
            if !col.nullable {
                clause.push_str(" NOT NULL");
            }
            if let Some(default) = &col.default {
                clause.push_str(&format!(" DEFAULT {}", sql_literal(default)));
            }
            if col.unique {
                clause.push_str(" UNIQUE");
            }
            if let Some(constraint) = &col.constraint {
                clause.push_str(&format!(" CHECK ({})", check_expr(&col.name, constraint)));
            }
            clause
        })
        .collect();

    clauses.push(format!("PRIMARY KEY ({})", def.primary_key().join(", ")));

    for fk in def.foreign_keys() {
        clauses.push(format!(
            "FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE {}",
            fk.column,
            fk.references_table,
            fk.references_column,
            fk.on_delete.as_sql()
        ));
    }

    for group in def.unique_groups() {
        clauses.push(format!("UNIQUE ({})", group.join(", ")));
    }

    format!(
        "CREATE TABLE {} (\n    {}\n)",
        def.name(),
        clauses.join(",\n    ")
    )
}

/// `DROP TABLE t`. Teardown order, not a CASCADE clause, is what keeps
/// this safe on SQLite.
pub fn drop_table(table: &str) -> String {
    format!("DROP TABLE {table}")
}

fn check_expr(column: &str, constraint: &ValueConstraint) -> String {
    match constraint {
        ValueConstraint::Range { min, max } => {
            let mut parts = Vec::new();
            if let Some(min) = min {
                parts.push(format!("{column} >= {min}"));
            }
            if let Some(max) = max {
                parts.push(format!("{column} <= {max}"));
            }
            parts.join(" AND ")
        }
        ValueConstraint::OneOf(values) => {
            let quoted: Vec<String> = values.iter().map(|v| quote_text(v)).collect();
            format!("{} IN ({})", column, quoted.join(", "))
        }
    }
}

fn sql_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Int(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(s) => quote_text(s),
    }
}

fn quote_text(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
