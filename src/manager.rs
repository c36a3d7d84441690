use crate::error::Result;
use crate::query;
use crate::schema::SchemaRegistry;
use crate::session::ConnectionSession;
use tracing::{error, info, warn};

/// Executes DDL for the whole registry in dependency-safe order.
/// Registry and session are passed in explicitly; nothing here reads
/// ambient state.
pub struct SchemaManager<'a> {
    registry: &'a SchemaRegistry,
    session: &'a mut ConnectionSession,
}

impl<'a> SchemaManager<'a> {
    pub fn new(registry: &'a SchemaRegistry, session: &'a mut ConnectionSession) -> Self {
        SchemaManager { registry, session }
    }

    /// Create every table, dependencies first. A table whose DDL fails is
    /// logged and skipped so independently creatable tables still get
    /// their chance; one commit closes the pass. Returns true iff every
    /// table succeeded, which makes re-runs against a partially
    /// initialized database safe to interpret.
    pub fn create_all(&mut self) -> Result<bool> {
        let order = self.registry.dependency_order()?;

        self.session.begin_phase()?;
        let mut all_ok = true;
        for name in &order {
            let def = self.registry.require(name)?;
            match self.session.execute(&query::create_table(def), &[]) {
                Ok(_) => info!(table = %name, "created table"),
                Err(e) => {
                    error!(table = %name, error = %e, "table creation failed, skipping");
                    all_ok = false;
                }
            }
        }
        self.session.commit()?;

        Ok(all_ok)
    }

    /// Drop every table, dependents first, with the same skip-and-log
    /// policy and a single commit. Missing tables are a normal starting
    /// state, so failures here are warnings.
    pub fn drop_all(&mut self) -> Result<bool> {
        let order = self.registry.reverse_dependency_order()?;

        self.session.begin_phase()?;
        let mut all_ok = true;
        for name in &order {
            match self.session.execute(&query::drop_table(name), &[]) {
                Ok(_) => info!(table = %name, "dropped table"),
                Err(e) => {
                    warn!(table = %name, error = %e, "table drop failed, skipping");
                    all_ok = false;
                }
            }
        }
        self.session.commit()?;

        Ok(all_ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::table::{Column, DataKind, OnDelete, TableDefinition, Value};

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                TableDefinition::new("Staff_Role")
                    .column(Column::new("RoleID", DataKind::Text).not_null())
                    .column(Column::new("RoleName", DataKind::Text).not_null().unique())
                    .key(&["RoleID"]),
            )
            .unwrap();
        registry
            .register(
                TableDefinition::new("Staff")
                    .column(Column::new("StaffID", DataKind::Text).not_null())
                    .column(Column::new("Name", DataKind::Text).not_null())
                    .column(Column::new("RoleID", DataKind::Text).not_null())
                    .key(&["StaffID"])
                    .references("RoleID", "Staff_Role", "RoleID", OnDelete::Cascade),
            )
            .unwrap();
        registry
    }

    #[test]
    fn create_all_creates_every_table() {
        let registry = registry();
        let mut session = ConnectionSession::in_memory().unwrap();

        let ok = SchemaManager::new(&registry, &mut session)
            .create_all()
            .unwrap();
        assert!(ok);
        assert_eq!(
            session.describe_columns("Staff").unwrap(),
            vec!["StaffID", "Name", "RoleID"]
        );
    }

    #[test]
    fn create_all_twice_reports_failure_without_corruption() {
        let registry = registry();
        let mut session = ConnectionSession::in_memory().unwrap();

        let mut manager = SchemaManager::new(&registry, &mut session);
        assert!(manager.create_all().unwrap());

        session
            .execute(
                "INSERT INTO Staff_Role (RoleID, RoleName) VALUES (?1, ?2)",
                &[Value::from("R001"), Value::from("Dentist")],
            )
            .unwrap();

        // Second pass: every CREATE fails on the existing table, but the
        // pass completes and existing data survives.
        let ok = SchemaManager::new(&registry, &mut session)
            .create_all()
            .unwrap();
        assert!(!ok);

        let rows = session
            .query_rows("SELECT RoleID FROM Staff_Role", &[])
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn drop_all_removes_dependents_first() {
        let registry = registry();
        let mut session = ConnectionSession::in_memory().unwrap();

        let mut manager = SchemaManager::new(&registry, &mut session);
        assert!(manager.create_all().unwrap());
        assert!(manager.drop_all().unwrap());

        // Both gone; a fresh create pass succeeds again
        assert!(manager.create_all().unwrap());
    }

    #[test]
    fn drop_all_on_empty_database_is_non_fatal() {
        let registry = registry();
        let mut session = ConnectionSession::in_memory().unwrap();

        let ok = SchemaManager::new(&registry, &mut session)
            .drop_all()
            .unwrap();
        assert!(!ok);
    }
}
