//! Todo API
//!
//! Library half of the `todo_api` binary, so the fully assembled router can
//! be driven from integration tests.

pub mod api;
pub mod config;
pub mod openapi;
pub mod state;

use axum::Router;
use axum_helpers::server::{RouterOptions, create_router, health_router};

use config::Config;

/// Assemble the application around `api_routes`.
///
/// Adds `/api` nesting, sessions, CSRF, the OpenAPI document, static client
/// serving and `/health`. The readiness route is merged by the caller since
/// it needs a live database.
pub fn build_app(config: &Config, api_routes: Router) -> Router {
    let options = RouterOptions::new(config.session.clone())
        .with_static_dir(config.static_dir.clone())
        .with_https_redirect(config.environment.use_https());

    create_router::<openapi::ApiDoc>(api_routes, options).merge(health_router(config.app))
}
