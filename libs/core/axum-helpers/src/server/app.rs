use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{csrf_protection, https_redirect, security_headers};
use crate::session::with_sessions;
use axum::{Json, Router, middleware, routing::get};
use core_config::server::ServerConfig;
use core_config::session::SessionConfig;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

/// Cross-cutting options for [`create_router`].
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Session cookie settings for everything under `/api`.
    pub session: SessionConfig,
    /// Directory holding the built single-page client. Unmatched non-API
    /// paths fall back to its `index.html`.
    pub static_dir: Option<PathBuf>,
    /// Redirect `X-Forwarded-Proto: http` requests to HTTPS.
    pub redirect_https: bool,
}

impl RouterOptions {
    pub fn new(session: SessionConfig) -> Self {
        Self {
            session,
            static_dir: None,
            redirect_https: false,
        }
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    pub fn with_https_redirect(mut self, enabled: bool) -> Self {
        self.redirect_https = enabled;
        self
    }
}

/// Creates the application router with common middleware and documentation.
///
/// This function sets up:
/// - API routes nested under `/api`, wrapped in sessions and CSRF protection
/// - A JSON 404 for unknown `/api/*` paths
/// - The OpenAPI document at `/api-docs/openapi.json`
/// - Static client files with `index.html` fallback
/// - Tracing, security headers, compression and the optional HTTPS redirect
///
/// Health endpoints (`/health`, `/ready`) are merged by the app.
///
/// # Example
/// ```ignore
/// let router = create_router::<ApiDoc>(api_routes, RouterOptions::new(session_config));
/// ```
pub fn create_router<T>(apis: Router, options: RouterOptions) -> Router
where
    T: OpenApi + 'static,
{
    let api = apis
        .fallback(not_found)
        .layer(middleware::from_fn(csrf_protection));
    let api = with_sessions(api, &options.session);

    let openapi = T::openapi();
    let router = Router::new()
        .route(
            "/api-docs/openapi.json",
            get(move || {
                let doc = openapi.clone();
                async move { Json(doc) }
            }),
        )
        .nest("/api", api);

    let router = match options.static_dir {
        Some(dir) => {
            info!("Serving static files from {}", dir.display());
            let index = dir.join("index.html");
            router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        None => router.fallback(not_found),
    };

    let router = router
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(CompressionLayer::new());

    if options.redirect_https {
        router.layer(middleware::from_fn(https_redirect))
    } else {
        router
    }
}

/// Production server with coordinated shutdown and cleanup.
///
/// Serves `router` until SIGINT/SIGTERM, then runs `cleanup` bounded by
/// `shutdown_timeout`.
///
/// # Example
/// ```ignore
/// let cleanup = async move {
///     db.close().await.ok();
/// };
///
/// create_app(router, &config, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn create_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let (coordinator, mut shutdown_rx) = ShutdownCoordinator::new();
    let signal_handle = coordinator.clone();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        signal_handle.wait_for_signal().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(_) => info!("Cleanup completed successfully"),
            Err(_) => {
                tracing::warn!(
                    "Cleanup exceeded timeout of {:?}, forcing shutdown",
                    shutdown_timeout
                );
            }
        }
    });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    cleanup_handle.await.ok();

    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "test"))]
    struct TestDoc;

    fn app(options: RouterOptions) -> Router {
        let api = Router::new().route("/ping", get(|| async { "pong" }));
        create_router::<TestDoc>(api, options)
    }

    fn options() -> RouterOptions {
        RouterOptions::new(SessionConfig::new("test secret".to_string(), false))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_anonymous_api_request_gets_csrf_cookie_but_no_session() {
        let response = app(options())
            .oneshot(Request::builder().uri("/api/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookies: Vec<_> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        assert!(cookies.iter().any(|c| c.starts_with("XSRF-TOKEN=")));
        assert!(!cookies.iter().any(|c| c.starts_with("todo.sid=")));
    }

    #[tokio::test]
    async fn test_unknown_api_path_is_json_404() {
        let response = app(options().with_static_dir(env!("CARGO_MANIFEST_DIR")))
            .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let response = app(options())
            .oneshot(
                Request::builder()
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["info"]["title"], "test");
    }

    #[tokio::test]
    async fn test_static_files_are_served() {
        let response = app(options().with_static_dir(env!("CARGO_MANIFEST_DIR")))
            .oneshot(Request::builder().uri("/Cargo.toml").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_https_redirect_when_enabled() {
        let response = app(options().with_https_redirect(true))
            .oneshot(
                Request::builder()
                    .uri("/api/ping")
                    .header("x-forwarded-proto", "http")
                    .header(header::HOST, "todo.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://todo.example.com/api/ping"
        );
    }
}
