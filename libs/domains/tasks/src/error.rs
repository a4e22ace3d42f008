use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_users::UserError;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    User(#[from] UserError),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type TaskResult<T> = Result<T, TaskError>;

/// Convert TaskError to AppError for standardized error responses
impl From<TaskError> for AppError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound(id) => AppError::NotFound(format!("Task {} not found", id)),
            TaskError::Validation(e) => AppError::ValidationError(e),
            TaskError::User(e) => e.into(),
            TaskError::Database(e) => AppError::Database(e),
            TaskError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
