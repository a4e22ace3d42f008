//! HTTP middleware module.
//!
//! - CSRF protection (double-submit `XSRF-TOKEN` cookie)
//! - Security headers
//! - HTTPS redirect behind a TLS-terminating proxy

pub mod csrf;
pub mod https_redirect;
pub mod security;

pub use csrf::{CSRF_COOKIE_NAME, CSRF_HEADER_NAME, csrf_protection};
pub use https_redirect::https_redirect;
pub use security::security_headers;
