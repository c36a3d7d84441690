use crate::error::{Error, Result};
use crate::query;
use crate::schema::table::Value;
use crate::schema::SchemaRegistry;
use crate::session::ConnectionSession;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::{error, info, warn};

/// Seed rows keyed by table name. Row tuples are positionally aligned to
/// the table's column order; the seeder never reorders them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeedDataset(HashMap<String, Vec<Vec<Value>>>);

impl SeedDataset {
    pub fn new() -> Self {
        SeedDataset::default()
    }

    pub fn insert<S: Into<String>>(&mut self, table: S, rows: Vec<Vec<Value>>) {
        self.0.insert(table.into(), rows);
    }

    pub fn get(&self, table: &str) -> Option<&Vec<Vec<Value>>> {
        self.0.get(table)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}

/// Populates tables in dependency order from an external dataset
pub struct Seeder<'a> {
    registry: &'a SchemaRegistry,
    session: &'a mut ConnectionSession,
}

impl<'a> Seeder<'a> {
    pub fn new(registry: &'a SchemaRegistry, session: &'a mut ConnectionSession) -> Self {
        Seeder { registry, session }
    }

    /// Seed every table that has dataset rows, referenced tables first.
    /// A missing dataset entry is a warning, not a failure. A per-table
    /// insert failure is logged and that table is skipped; the pass
    /// continues and commits once at the end. Returns true iff every
    /// attempted table succeeded.
    pub fn populate_all(&mut self, dataset: &SeedDataset) -> Result<bool> {
        let order = self.registry.dependency_order()?;

        self.session.begin_phase()?;
        let mut all_ok = true;
        for name in &order {
            let Some(rows) = dataset.get(name) else {
                warn!(table = %name, "no seed data for table");
                continue;
            };
            match self.seed_table(name, rows) {
                Ok(count) => info!(table = %name, rows = count, "populated table"),
                Err(e) => {
                    error!(table = %name, error = %e, "seeding failed, skipping table");
                    all_ok = false;
                }
            }
        }
        self.session.commit()?;

        Ok(all_ok)
    }

    fn seed_table(&mut self, table: &str, rows: &[Vec<Value>]) -> Result<usize> {
        // Live column order, not the static definition: stays correct
        // even if the executed DDL ordered columns differently.
        let columns = self.session.describe_columns(table)?;
        for row in rows {
            if row.len() != columns.len() {
                return Err(Error::MissingColumnData {
                    table: table.to_string(),
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }

        let column_refs: Vec<&str> = columns.iter().map(String::as_str).collect();
        let sql = query::insert(table, &column_refs);
        self.session.execute_many(&sql, rows)
    }
}
