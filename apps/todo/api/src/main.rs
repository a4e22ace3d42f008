use axum_helpers::server::create_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_tasks::{PgTaskRepository, TaskService};
use domain_users::UserDirectory;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use todo_api::config::Config;
use todo_api::state::AppState;
use todo_api::{api, build_app};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map(Arc::new)
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    let repository = PgTaskRepository::new(Arc::clone(&db));
    repository
        .ensure_schema()
        .await
        .map_err(|e| eyre::eyre!("Failed to provision tasks table: {}", e))?;

    let tasks = TaskService::new(repository);
    let seeded = tasks
        .seed_if_empty()
        .await
        .map_err(|e| eyre::eyre!("Failed to seed tasks: {}", e))?;
    if seeded > 0 {
        info!(seeded, "Seeded empty task store");
    }

    let directory = UserDirectory::new(config.admin_users.clone());
    info!(admins = ?config.admin_users, "Configured admin users");

    let app = build_app(&config, api::routes(tasks, directory))
        .merge(api::ready_router(AppState::new(Arc::clone(&db))));

    info!("Starting todo API with graceful shutdown (30s timeout)");

    create_app(
        app,
        &config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing database connections");
            // The router holds the other handles and is gone once serving stops.
            match Arc::try_unwrap(db) {
                Ok(db) => match db.close().await {
                    Ok(_) => info!("PostgreSQL connection closed successfully"),
                    Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
                },
                Err(_) => info!("PostgreSQL pool still shared; released on drop"),
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Todo API shutdown complete");
    Ok(())
}
