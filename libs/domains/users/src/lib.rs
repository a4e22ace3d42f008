//! Users Domain
//!
//! Session-scoped users for the todo application.
//!
//! # Features
//!
//! - Username-only sign-in, sign-out and current-user endpoints
//! - Stateless user directory: name-derived ids and a configurable admin list
//! - `CurrentUser` extractor reading the signed-in user from the session
//! - `require_admin` guard for admin-only operations
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /signIn, /signOut, /currentUser
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Directory  │  ← name → UserInfo, admin roles
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Session   │  ← UserInfo stored under "user"
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{UserDirectory, handlers};
//!
//! let directory = UserDirectory::new(["Jane"]);
//! let router = handlers::router(directory);
//! ```

pub mod directory;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod session;

pub use directory::UserDirectory;
pub use error::{UserError, UserResult};
pub use guard::require_admin;
pub use handlers::ApiDoc;
pub use models::{Role, SignInRequest, UserInfo};
pub use session::{CurrentUser, USER_SESSION_KEY};
