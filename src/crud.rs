//! Per-record operations synthesized from table metadata. Unlike the
//! bulk phases, every failure here surfaces to the caller: a
//! single-record operation has no "continue with the next" semantics.

use crate::error::{Error, Result};
use crate::query;
use crate::schema::table::Value;
use crate::schema::SchemaRegistry;
use crate::session::ConnectionSession;

/// Values for an update plus the key identifying the row. Carrying the
/// key in its own field (rather than by position in a parameter array)
/// is what keeps the builder's key-last binding convention out of
/// caller code.
#[derive(Debug, Clone)]
pub struct KeyedUpdate {
    /// New values for the non-key columns, in table order
    pub values: Vec<Value>,
    /// Primary-key value of the row to update
    pub key: Value,
}

/// Insert one row, positionally aligned to the table's declared columns
pub fn insert(
    registry: &SchemaRegistry,
    session: &mut ConnectionSession,
    table: &str,
    values: &[Value],
) -> Result<()> {
    let def = registry.require(table)?;
    if values.len() != def.columns().len() {
        return Err(Error::MissingColumnData {
            table: table.to_string(),
            expected: def.columns().len(),
            actual: values.len(),
        });
    }

    let sql = query::insert(table, &def.column_names());
    session.execute(&sql, values)?;
    Ok(())
}

/// Update the row with the given primary key. The key column comes from
/// the declared primary key, never from column position.
pub fn update_by_key(
    registry: &SchemaRegistry,
    session: &mut ConnectionSession,
    table: &str,
    update: &KeyedUpdate,
) -> Result<()> {
    let def = registry.require(table)?;
    let key_column = def.single_key()?;
    let non_key_count = def.non_key_columns().len();
    if update.values.len() != non_key_count {
        return Err(Error::MissingColumnData {
            table: table.to_string(),
            expected: non_key_count,
            actual: update.values.len(),
        });
    }

    let sql = query::update_by_key(table, &def.column_names(), key_column)?;
    let mut params = update.values.clone();
    params.push(update.key.clone());

    let affected = session.execute(&sql, &params)?;
    if affected == 0 {
        return Err(Error::not_found(table, update.key.to_string()));
    }
    Ok(())
}

/// Delete the row with the given primary key. Cascade behavior follows
/// the on-delete actions declared on referencing tables.
pub fn delete_by_key(
    registry: &SchemaRegistry,
    session: &mut ConnectionSession,
    table: &str,
    key: &Value,
) -> Result<()> {
    let def = registry.require(table)?;
    let key_column = def.single_key()?;

    let sql = query::delete_by_key(table, key_column);
    let affected = session.execute(&sql, std::slice::from_ref(key))?;
    if affected == 0 {
        return Err(Error::not_found(table, key.to_string()));
    }
    Ok(())
}

/// All rows of a table, in declared column order
pub fn list_all(
    registry: &SchemaRegistry,
    session: &ConnectionSession,
    table: &str,
) -> Result<Vec<Vec<Value>>> {
    let def = registry.require(table)?;
    let sql = query::select_all(table, &def.column_names());
    session.query_rows(&sql, &[])
}

/// Ordered column names of the live table
pub fn describe_columns(
    registry: &SchemaRegistry,
    session: &ConnectionSession,
    table: &str,
) -> Result<Vec<String>> {
    registry.require(table)?;
    session.describe_columns(table)
}
