//! Readiness check with a real database ping.

use crate::state::AppState;
use axum::{extract::State, response::Response};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};

/// Readiness check endpoint that pings PostgreSQL.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            database::postgres::check_health(&state.db)
                .await
                .map_err(|e| format!("Database ping failed: {}", e))
        }),
    )];

    run_health_checks(checks).await
}

#[cfg(test)]
mod tests {
    use crate::state::AppState;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_ready_pings_shared_connection() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let state = AppState::new(Arc::clone(&db));
        let app = crate::api::ready_router(state.clone());

        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(Arc::ptr_eq(&state.db, &db));
    }
}
