//! Muninn Portal CLI application
//!
//! This module provides the command-line interface for the Muninn portal.
//! It includes functionality for running the scheduler and triggering a
//! single manual sync pass.

use clap::{Parser, Subcommand};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use muninn_portal::connector::OpenStackConnectorBuilder;
use muninn_portal::dal::DAL;
use muninn_portal::db::create_shared_connection_pool;
use muninn_portal::sync::{flavors, inventory};
use muninn_portal::utils::background_tasks::{
    start_audit_log_cleanup_task, start_flavor_sync_task, start_hardware_poll_task,
    start_inventory_sync_task, start_ome_sync_task, AuditLogCleanupConfig, FlavorSyncConfig,
    HardwarePollConfig, OmeSyncConfig,
};
use muninn_portal::utils::encryption;
use muninn_utils::config::Settings;
use muninn_utils::logging::prelude::*;
use tokio::signal;

/// Embedded migrations for the database
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../muninn-models/migrations");

/// Command-line interface structure
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Optional path to a configuration file
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the CLI
#[derive(Subcommand)]
enum Commands {
    /// Run the scheduler with all periodic jobs
    Serve,
    /// Run one inventory and flavor sync pass, then exit
    SyncOnce,
}

/// Main function to run the Muninn portal application
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Settings::new(cli.config).expect("Failed to load configuration");

    // Initialize logger
    muninn_utils::logging::init_with_format(&config.log.level, &config.log.format)
        .expect("Failed to initialize logger");

    // Initialize the credential encryption key
    encryption::init_encryption_key(config.portal.secret_key.as_deref())
        .expect("Failed to initialize encryption key");

    // Execute the appropriate command
    match cli.command {
        Commands::Serve => serve(&config).await?,
        Commands::SyncOnce => sync_once(&config).await?,
    }
    Ok(())
}

fn setup(config: &Settings) -> DAL {
    info!("Creating database connection pool");
    let connection_pool = create_shared_connection_pool(
        &config.database.url,
        "muninn",
        config.database.max_connections,
    );

    info!("Running pending database migrations");
    let mut conn = connection_pool
        .pool
        .get()
        .expect("Failed to get DB connection");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");
    info!("Database migrations completed successfully");

    let dal = DAL::new(connection_pool.pool.clone());

    // Materialize the settings singleton so every later reader sees one row.
    dal.portal_settings()
        .get_or_create()
        .expect("Failed to initialize portal settings");

    dal
}

/// Starts all periodic jobs and runs until interrupted.
async fn serve(config: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Muninn portal scheduler");

    let dal = setup(config);
    let builder = OpenStackConnectorBuilder::new(config)?;

    start_inventory_sync_task(dal.clone(), builder.clone());
    start_flavor_sync_task(
        dal.clone(),
        builder.clone(),
        FlavorSyncConfig::from_settings(config),
    );
    start_hardware_poll_task(
        dal.clone(),
        config.clone(),
        HardwarePollConfig::from_settings(config),
    );
    start_ome_sync_task(
        dal.clone(),
        config.clone(),
        OmeSyncConfig::from_settings(config),
    );
    start_audit_log_cleanup_task(dal.clone(), AuditLogCleanupConfig::from_settings(config));

    info!("Scheduler running; press Ctrl-C to stop");
    signal::ctrl_c().await?;
    info!("Shutting down");

    Ok(())
}

/// Runs one inventory and one flavor pass, then exits.
async fn sync_once(config: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let dal = setup(config);
    let builder = OpenStackConnectorBuilder::new(config)?;

    inventory::run_inventory_sync(&dal, &builder).await;
    flavors::run_flavor_sync(&dal, &builder).await;

    Ok(())
}
