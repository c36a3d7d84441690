pub mod cli;
pub mod crud;
pub mod error;
pub mod graph;
pub mod manager;
pub mod query;
pub mod schema;
pub mod seeder;
pub mod session;

pub use error::{Error, Result};
pub use manager::SchemaManager;
pub use schema::{SchemaRegistry, TableDefinition, Value};
pub use seeder::{SeedDataset, Seeder};
pub use session::ConnectionSession;
