//! CampusHub backend worker
//!
//! Entry point wiring configuration, logging, the database pool, and the
//! periodic reconciler sweeps. Runs until interrupted.

use std::time::Duration;

use tracing::{error, info};

use CampusHub::{
    config::Settings,
    database::connection::{create_pool, run_migrations, PoolConfig},
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting CampusHub backend...");

    // Initialize database connection
    info!("Connecting to database...");
    let pool_config = PoolConfig {
        url: settings.database.url.clone(),
        max_connections: settings.database.max_connections,
        min_connections: settings.database.min_connections,
        ..PoolConfig::default()
    };
    let pool = create_pool(&pool_config).await?;

    // Run database migrations
    run_migrations(&pool).await?;

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(pool, &settings)?;

    // Spawn the periodic sweeps
    let status_interval = Duration::from_secs(settings.scheduler.status_interval_secs);
    let reminder_interval = Duration::from_secs(settings.scheduler.reminder_interval_secs);

    let reconciler = services.reconciler.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(status_interval);
        loop {
            ticker.tick().await;
            if let Err(err) = reconciler.advance_event_statuses().await {
                error!(error = %err, "Event status sweep failed");
            }
        }
    });

    let reconciler = services.reconciler.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(reminder_interval);
        loop {
            ticker.tick().await;
            if let Err(err) = reconciler.send_h1_reminders().await {
                error!(error = %err, "Reminder sweep failed");
            }
        }
    });

    info!(
        status_interval_secs = settings.scheduler.status_interval_secs,
        reminder_interval_secs = settings.scheduler.reminder_interval_secs,
        "Scheduler started"
    );

    tokio::signal::ctrl_c().await?;
    info!("Shutting down CampusHub backend");

    Ok(())
}
