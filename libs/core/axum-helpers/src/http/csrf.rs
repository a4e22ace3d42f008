//! Double-submit CSRF protection.
//!
//! Every response carries an `XSRF-TOKEN` cookie. State-changing requests
//! must echo its value back in the `X-XSRF-TOKEN` header, which is what
//! Angular's `HttpClient` and axios do by default. A page on another origin
//! can send the cookie but cannot read it, so it cannot forge the header.
//!
//! The token lives only in the cookie; no server-side state is created for
//! anonymous visitors.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue, Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_sessions::cookie::{Cookie, SameSite};
use uuid::Uuid;

use crate::errors::AppError;

pub const CSRF_COOKIE_NAME: &str = "XSRF-TOKEN";
pub const CSRF_HEADER_NAME: &str = "x-xsrf-token";

/// Length of a token: a simple-formatted UUID.
const TOKEN_LEN: usize = 32;

fn is_state_changing(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_LEN && token.bytes().all(|b| b.is_ascii_hexdigit())
}

/// The token from the request's `XSRF-TOKEN` cookie, if present and well formed.
fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == CSRF_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .filter(|token| is_well_formed(token))
}

/// Middleware validating the CSRF header on state-changing requests.
pub async fn csrf_protection(request: Request, next: Next) -> Response {
    let existing = cookie_token(request.headers());

    let mut response = if is_state_changing(request.method()) {
        let supplied = request
            .headers()
            .get(CSRF_HEADER_NAME)
            .and_then(|v| v.to_str().ok());

        match (&existing, supplied) {
            (Some(expected), Some(supplied)) if expected == supplied => next.run(request).await,
            _ => {
                tracing::warn!(
                    method = %request.method(),
                    path = %request.uri().path(),
                    cookie_present = existing.is_some(),
                    header_present = supplied.is_some(),
                    "CSRF token mismatch"
                );
                AppError::CsrfTokenMismatch.into_response()
            }
        }
    } else {
        next.run(request).await
    };

    let token = existing.unwrap_or_else(|| {
        tracing::debug!("Issued new CSRF token");
        Uuid::new_v4().simple().to_string()
    });
    let cookie = Cookie::build((CSRF_COOKIE_NAME, token))
        .path("/")
        .same_site(SameSite::Strict)
        .build();
    if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }

    response
}
