use axum::Router;
use domain_tasks::{TaskRepository, TaskService};
use domain_users::UserDirectory;

pub mod health;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix, sessions and CSRF are added by `create_router`.
///
/// Returns a stateless Router (all sub-routers have state already applied).
pub fn routes<R: TaskRepository + 'static>(
    tasks: TaskService<R>,
    directory: UserDirectory,
) -> Router {
    Router::new()
        .merge(domain_users::handlers::router(directory))
        .merge(domain_tasks::handlers::router(tasks))
}

/// Creates a router with the /ready endpoint that checks the database.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
