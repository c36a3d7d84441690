use crate::crud::{self, KeyedUpdate};
use crate::error::Result;
use crate::manager::SchemaManager;
use crate::schema::clinic;
use crate::schema::table::Value;
use crate::seeder::{SeedDataset, Seeder};
use crate::session::ConnectionSession;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// clinicdb — schema manager and seeder for the clinic database
#[derive(Parser)]
#[command(name = "clinicdb")]
#[command(about = "Metadata-driven schema manager for a dental clinic database", long_about = None)]
struct Cli {
    /// Path to the database file
    #[arg(long, global = true, default_value = "clinic.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create all tables in dependency order
    Init,

    /// Populate tables from a dataset (bundled sample data by default)
    Seed {
        /// JSON file mapping table names to row tuples
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Drop all tables, dependents first
    Drop,

    /// Drop, recreate and seed in one go
    Reset {
        /// JSON file mapping table names to row tuples
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Print table names in dependency order
    Tables,

    /// Print the live column order of a table
    Columns {
        /// Table name
        table: String,
    },

    /// Print all rows of a table
    List {
        /// Table name
        table: String,
    },

    /// Insert one row, given as a JSON array aligned to the column order
    Insert {
        /// Table name
        table: String,
        /// Row values, e.g. '["R003", "Hygienist"]'
        row: String,
    },

    /// Update the row with the given primary key
    Update {
        /// Table name
        table: String,
        /// Primary-key value
        key: String,
        /// Non-key column values as a JSON array, in table order
        values: String,
    },

    /// Delete the row with the given primary key
    Delete {
        /// Table name
        table: String,
        /// Primary-key value
        key: String,
    },
}

fn load_dataset(data: Option<PathBuf>) -> Result<SeedDataset> {
    match data {
        Some(path) => SeedDataset::from_json_file(path),
        None => Ok(clinic::sample_dataset()),
    }
}

fn report_phase(name: &str, all_ok: bool) {
    if all_ok {
        println!("{name}: ok");
    } else {
        println!("{name}: completed with errors (some tables skipped)");
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let registry = clinic::clinic_registry()?;
    let mut session = ConnectionSession::open(&cli.db)?;

    match cli.command {
        Commands::Init => {
            let ok = SchemaManager::new(&registry, &mut session).create_all()?;
            report_phase("create", ok);
        }
        Commands::Seed { data } => {
            let dataset = load_dataset(data)?;
            let ok = Seeder::new(&registry, &mut session).populate_all(&dataset)?;
            report_phase("populate", ok);
        }
        Commands::Drop => {
            let ok = SchemaManager::new(&registry, &mut session).drop_all()?;
            report_phase("drop", ok);
        }
        Commands::Reset { data } => {
            let mut manager = SchemaManager::new(&registry, &mut session);
            manager.drop_all()?;
            let ok = manager.create_all()?;
            report_phase("create", ok);
            let dataset = load_dataset(data)?;
            let ok = Seeder::new(&registry, &mut session).populate_all(&dataset)?;
            report_phase("populate", ok);
        }
        Commands::Tables => {
            for name in registry.dependency_order()? {
                println!("{name}");
            }
        }
        Commands::Columns { table } => {
            for column in crud::describe_columns(&registry, &session, &table)? {
                println!("{column}");
            }
        }
        Commands::List { table } => {
            for row in crud::list_all(&registry, &session, &table)? {
                let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
                println!("{}", cells.join(" | "));
            }
        }
        Commands::Insert { table, row } => {
            let values: Vec<Value> = serde_json::from_str(&row)?;
            crud::insert(&registry, &mut session, &table, &values)?;
            println!("inserted 1 row into {table}");
        }
        Commands::Update { table, key, values } => {
            let values: Vec<Value> = serde_json::from_str(&values)?;
            crud::update_by_key(
                &registry,
                &mut session,
                &table,
                &KeyedUpdate {
                    values,
                    key: Value::from(key.as_str()),
                },
            )?;
            println!("updated 1 row in {table}");
        }
        Commands::Delete { table, key } => {
            crud::delete_by_key(&registry, &mut session, &table, &Value::from(key.as_str()))?;
            println!("deleted 1 row from {table}");
        }
    }

    session.close();
    Ok(())
}
