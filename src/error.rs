use std::io;
use thiserror::Error;

/// Error type for clinicdb operations
#[derive(Error, Debug)]
pub enum Error {
    /// A table with the same name is already registered
    #[error("Table '{name}' is already registered")]
    DuplicateTable { name: String },

    /// The foreign-key graph contains a cycle
    #[error("Foreign-key cycle detected: {}", path.join(" -> "))]
    CyclicDependency { path: Vec<String> },

    /// A table name that is not in the registry (FK target or CRUD request)
    #[error("Unknown table '{name}'")]
    UnknownTable { name: String },

    /// A table definition that is structurally invalid
    #[error("Invalid definition for table '{table}': {reason}")]
    InvalidDefinition { table: String, reason: String },

    /// An update was requested for a table with no non-key columns
    #[error("Table '{table}' has no non-key columns to update")]
    EmptyColumnSet { table: String },

    /// Row arity does not match the table's column count
    #[error("Table '{table}' expects {expected} values, got {actual}")]
    MissingColumnData {
        table: String,
        expected: usize,
        actual: usize,
    },

    /// Unique/check/foreign-key violation surfaced by the database
    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    /// Update/delete by key matched no row
    #[error("No row in '{table}' with key '{key}'")]
    NotFound { table: String, key: String },

    /// Driver-level statement failure
    #[error("Statement failed: {message}")]
    Statement { message: String },

    /// Database error
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for clinicdb operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn duplicate_table<S: Into<String>>(name: S) -> Self {
        Error::DuplicateTable { name: name.into() }
    }

    pub fn unknown_table<S: Into<String>>(name: S) -> Self {
        Error::UnknownTable { name: name.into() }
    }

    pub fn invalid_definition<S: Into<String>, R: Into<String>>(table: S, reason: R) -> Self {
        Error::InvalidDefinition {
            table: table.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found<S: Into<String>, K: Into<String>>(table: S, key: K) -> Self {
        Error::NotFound {
            table: table.into(),
            key: key.into(),
        }
    }
}
