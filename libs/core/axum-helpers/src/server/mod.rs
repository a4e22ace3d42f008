//! Server infrastructure module.
//!
//! - Router assembly: `/api` with sessions and CSRF, OpenAPI JSON, SPA fallback
//! - Liveness and readiness endpoints
//! - Graceful shutdown coordination

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{RouterOptions, create_app, create_router};
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
