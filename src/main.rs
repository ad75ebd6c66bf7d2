//! FoodLog
//!
//! An MCP server for personal food intake logging.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use foodlog::build_info;
use foodlog::config::Config;
use foodlog::db::{self, Database};
use foodlog::mcp::FoodLogService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("foodlog=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();
    for line in build_info::startup_banner(&config) {
        eprintln!("{}", line);
    }
    eprintln!("Starting MCP server on stdio...");

    let db_path = config.database_path.clone();

    // Ensure data directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    eprintln!("Initializing database...");
    let database = Database::new(&db_path)?;

    database.with_conn(|conn| {
        if db::migrations::needs_migration(conn)? {
            tracing::info!("Applying database migrations");
            db::migrations::run_migrations(conn)?;
        }
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    let service = FoodLogService::new(config, database);

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
