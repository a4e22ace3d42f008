//! # Axum Helpers
//!
//! Shared building blocks for the HTTP layer.
//!
//! ## Modules
//!
//! - **[`server`]**: Router assembly, health checks, graceful shutdown
//! - **[`session`]**: Signed cookie sessions
//! - **[`http`]**: HTTP middleware (CSRF, security headers, HTTPS redirect)
//! - **[`errors`]**: Structured error responses with error codes
//! - **[`extractors`]**: Custom extractors (UUID path, validated JSON)
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::time::Duration;
//!
//! use axum::Router;
//! use axum_helpers::server::{RouterOptions, create_app, create_router};
//! use core_config::{FromEnv, server::ServerConfig, session::SessionConfig};
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_routes = Router::new(); // Add your routes
//!     let options = RouterOptions::new(SessionConfig::from_env()?);
//!     let router = create_router::<ApiDoc>(api_routes, options);
//!
//!     create_app(router, &ServerConfig::default(), Duration::from_secs(30), async {}).await?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;
pub mod session;

// Re-export server types
pub use server::{
    HealthCheckFuture, HealthResponse, RouterOptions, ShutdownCoordinator, create_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};

// Re-export HTTP middleware
pub use http::{csrf_protection, https_redirect, security_headers};

// Re-export session helpers
pub use session::{SESSION_COOKIE_NAME, SessionMemoryStore, with_sessions};

// Re-export error types
pub use errors::{AppError, ErrorCode, ErrorResponse};

// Re-export extractors
pub use extractors::{UuidPath, ValidatedJson};
