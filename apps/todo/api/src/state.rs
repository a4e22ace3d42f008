//! Application state management.
//!
//! Shared state for handlers that sit outside the domain routers, currently
//! the readiness probe.

use database::postgres::DatabaseConnection;
use std::sync::Arc;

/// Shared application state.
///
/// The connection is shared with the task repository, so it lives behind an
/// `Arc` rather than relying on `DatabaseConnection: Clone`.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}
