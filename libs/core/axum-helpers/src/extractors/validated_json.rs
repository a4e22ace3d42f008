//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor that runs `Validate::validate` after deserializing.
///
/// Malformed bodies surface as `JSON_EXTRACTION` errors, failed validation as
/// `VALIDATION_ERROR` with per-field details.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct SignIn {
///     #[validate(length(min = 1))]
///     username: String,
/// }
///
/// async fn sign_in(ValidatedJson(payload): ValidatedJson<SignIn>) -> String {
///     payload.username
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}
