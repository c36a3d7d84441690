use crate::error::{Error, Result};
use crate::schema::table::Value;
use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

/// Owns the single database connection. All mutation flows through this
/// type; exclusive ownership by one caller at a time is a documented
/// precondition, guarded only by the `&mut self` receivers.
pub struct ConnectionSession {
    conn: Option<Connection>,
}

impl ConnectionSession {
    /// Open a file-backed session. Creates the database file if it does
    /// not exist. Foreign-key enforcement is switched on here because
    /// SQLite leaves it off per connection.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let _ = conn.execute("PRAGMA journal_mode=WAL", []);
        conn.execute("PRAGMA foreign_keys=ON", [])?;
        debug!("session opened");
        Ok(ConnectionSession { conn: Some(conn) })
    }

    /// Open an in-memory session for testing
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys=ON", [])?;
        Ok(ConnectionSession { conn: Some(conn) })
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or_else(|| Error::Statement {
            message: "session is closed".to_string(),
        })
    }

    /// Execute one statement with positionally bound values. Driver
    /// errors come back as typed failures rather than panics, so bulk
    /// callers can apply their skip-and-log policy.
    pub fn execute(&mut self, sql: &str, values: &[Value]) -> Result<usize> {
        let conn = self.conn()?;
        conn.execute(sql, rusqlite::params_from_iter(values.iter()))
            .map_err(translate)
    }

    /// Execute one statement template once per row, reusing the prepared
    /// statement. Rows are bound positionally as supplied.
    pub fn execute_many(&mut self, sql: &str, rows: &[Vec<Value>]) -> Result<usize> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql).map_err(translate)?;
        let mut affected = 0;
        for row in rows {
            affected += stmt
                .execute(rusqlite::params_from_iter(row.iter()))
                .map_err(translate)?;
        }
        Ok(affected)
    }

    /// Run a query and materialize every row in column order
    pub fn query_rows(&self, sql: &str, values: &[Value]) -> Result<Vec<Vec<Value>>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql).map_err(translate)?;
        let column_count = stmt.column_count();

        let rows = stmt
            .query_map(rusqlite::params_from_iter(values.iter()), |row| {
                let mut record = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    record.push(Value::from(row.get_ref(i)?));
                }
                Ok(record)
            })
            .map_err(translate)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(translate)?;

        Ok(rows)
    }

    /// Ordered column names of the live table, read from statement
    /// metadata rather than the static definition. Stays correct even if
    /// the executed DDL ordered columns differently.
    pub fn describe_columns(&self, table: &str) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let stmt = conn
            .prepare(&format!("SELECT * FROM {table} WHERE 1=0"))
            .map_err(translate)?;
        Ok(stmt.column_names().iter().map(|c| c.to_string()).collect())
    }

    /// Start a logical phase. One commit per phase, not per statement.
    pub fn begin_phase(&mut self) -> Result<()> {
        self.conn()?.execute_batch("BEGIN").map_err(translate)
    }

    pub fn commit(&mut self) -> Result<()> {
        self.conn()?.execute_batch("COMMIT").map_err(translate)
    }

    pub fn rollback(&mut self) -> Result<()> {
        self.conn()?.execute_batch("ROLLBACK").map_err(translate)
    }

    /// Release the underlying connection. Idempotent.
    pub fn close(&mut self) {
        if self.conn.take().is_some() {
            debug!("session closed");
        }
    }
}

/// Map driver errors into the taxonomy: SQLite constraint failures become
/// `ConstraintViolation`, everything else a statement-level failure.
fn translate(err: rusqlite::Error) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(code, message)
            if code.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Error::ConstraintViolation {
                message: message
                    .clone()
                    .unwrap_or_else(|| "constraint violation".to_string()),
            }
        }
        _ => Error::Statement {
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_table() -> ConnectionSession {
        let mut session = ConnectionSession::in_memory().unwrap();
        session
            .execute(
                "CREATE TABLE Role (RoleID TEXT PRIMARY KEY, RoleName TEXT NOT NULL UNIQUE)",
                &[],
            )
            .unwrap();
        session
    }

    #[test]
    fn execute_and_query_round_trip() {
        let mut session = session_with_table();
        let inserted = session
            .execute(
                "INSERT INTO Role (RoleID, RoleName) VALUES (?1, ?2)",
                &[Value::from("R001"), Value::from("Dentist")],
            )
            .unwrap();
        assert_eq!(inserted, 1);

        let rows = session
            .query_rows("SELECT RoleID, RoleName FROM Role", &[])
            .unwrap();
        assert_eq!(
            rows,
            vec![vec![Value::from("R001"), Value::from("Dentist")]]
        );
    }

    #[test]
    fn unique_violation_is_typed() {
        let mut session = session_with_table();
        let row = vec![Value::from("R001"), Value::from("Dentist")];
        session
            .execute("INSERT INTO Role (RoleID, RoleName) VALUES (?1, ?2)", &row)
            .unwrap();
        let err = session
            .execute("INSERT INTO Role (RoleID, RoleName) VALUES (?1, ?2)", &row)
            .unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation { .. }));
    }

    #[test]
    fn describe_columns_reports_live_order() {
        let session = session_with_table();
        assert_eq!(
            session.describe_columns("Role").unwrap(),
            vec!["RoleID", "RoleName"]
        );
    }

    #[test]
    fn rollback_discards_the_phase() {
        let mut session = session_with_table();
        session.begin_phase().unwrap();
        session
            .execute(
                "INSERT INTO Role (RoleID, RoleName) VALUES (?1, ?2)",
                &[Value::from("R001"), Value::from("Dentist")],
            )
            .unwrap();
        session.rollback().unwrap();

        let rows = session.query_rows("SELECT RoleID FROM Role", &[]).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn failed_statement_does_not_abort_the_phase() {
        let mut session = session_with_table();
        session.begin_phase().unwrap();
        let dup = vec![Value::from("R001"), Value::from("Dentist")];
        session
            .execute("INSERT INTO Role (RoleID, RoleName) VALUES (?1, ?2)", &dup)
            .unwrap();
        // Constraint failure inside the phase is recoverable
        assert!(session
            .execute("INSERT INTO Role (RoleID, RoleName) VALUES (?1, ?2)", &dup)
            .is_err());
        session
            .execute(
                "INSERT INTO Role (RoleID, RoleName) VALUES (?1, ?2)",
                &[Value::from("R002"), Value::from("Receptionist")],
            )
            .unwrap();
        session.commit().unwrap();

        let rows = session.query_rows("SELECT RoleID FROM Role", &[]).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn close_is_idempotent() {
        let mut session = session_with_table();
        session.close();
        session.close();
        assert!(session.execute("SELECT 1", &[]).is_err());
    }
}
