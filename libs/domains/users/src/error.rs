use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Admin role required")]
    Forbidden,

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Forbidden => AppError::Forbidden(err.to_string()),
            UserError::Session(e) => AppError::Session(e),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
