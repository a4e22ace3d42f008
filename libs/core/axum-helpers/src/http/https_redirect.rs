use axum::{
    extract::Request,
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Redirects plain-HTTP requests to HTTPS when running behind a proxy.
///
/// Only requests whose `X-Forwarded-Proto` is `http` are redirected; direct
/// connections without the header pass through untouched.
pub async fn https_redirect(request: Request, next: Next) -> Response {
    let forwarded_http = request
        .headers()
        .get(FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|proto| proto.eq_ignore_ascii_case("http"));

    if !forwarded_http {
        return next.run(request).await;
    }

    let Some(host) = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
    else {
        return next.run(request).await;
    };

    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    match HeaderValue::from_str(&format!("https://{}{}", host, path)) {
        Ok(location) => {
            tracing::debug!(location = ?location, "Redirecting to HTTPS");
            (StatusCode::PERMANENT_REDIRECT, [(header::LOCATION, location)]).into_response()
        }
        Err(_) => next.run(request).await,
    }
}
