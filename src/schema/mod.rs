pub mod clinic;
pub mod table;

use crate::error::{Error, Result};
use crate::graph;
use std::collections::HashMap;

pub use table::{
    Column, DataKind, ForeignKey, OnDelete, TableDefinition, Value, ValueConstraint,
};

/// Holds the set of table definitions and derives the foreign-key
/// dependency graph. Definitions are registered once at startup and
/// immutable afterwards.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    tables: Vec<TableDefinition>,
    index: HashMap<String, usize>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        SchemaRegistry::default()
    }

    /// Register a table definition. Fails on duplicate names and on
    /// structurally invalid definitions; both are fatal to startup.
    pub fn register(&mut self, table: TableDefinition) -> Result<()> {
        table.validate()?;
        if self.index.contains_key(table.name()) {
            return Err(Error::duplicate_table(table.name()));
        }
        self.index.insert(table.name().to_string(), self.tables.len());
        self.tables.push(table);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TableDefinition> {
        self.index.get(name).map(|&i| &self.tables[i])
    }

    /// Like `get` but with the not-found case mapped to an error,
    /// for callers acting on a request naming a table.
    pub fn require(&self, name: &str) -> Result<&TableDefinition> {
        self.get(name).ok_or_else(|| Error::unknown_table(name))
    }

    /// All definitions in registration order
    pub fn tables(&self) -> &[TableDefinition] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Creation-safe ordering: every table appears after all tables it
    /// foreign-keys to. Deterministic; ties follow registration order.
    pub fn dependency_order(&self) -> Result<Vec<String>> {
        graph::dependency_order(self)
    }

    /// Teardown-safe ordering: the exact reverse of `dependency_order`,
    /// so dependents are removed before their dependencies.
    pub fn reverse_dependency_order(&self) -> Result<Vec<String>> {
        let mut order = self.dependency_order()?;
        order.reverse();
        Ok(order)
    }
}
