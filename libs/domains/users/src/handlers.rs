use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_helpers::ValidatedJson;
use axum_helpers::errors::responses::{BadRequestValidationResponse, InternalServerErrorResponse};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_sessions::Session;
use utoipa::OpenApi;

use crate::directory::UserDirectory;
use crate::error::UserResult;
use crate::models::{Role, SignInRequest, UserInfo};
use crate::session::{CurrentUser, sign_in_session, sign_out_session};

pub const TAG: &str = "auth";

/// OpenAPI documentation for the auth endpoints
#[derive(OpenApi)]
#[openapi(
    paths(sign_in, sign_out, current_user),
    components(
        schemas(UserInfo, Role, SignInRequest),
        responses(BadRequestValidationResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = TAG, description = "Session sign-in endpoints")
    )
)]
pub struct ApiDoc;

/// Create the auth router. Routes are mounted at the API root.
pub fn router(directory: UserDirectory) -> Router {
    Router::new()
        .route("/signIn", post(sign_in))
        .route("/signOut", post(sign_out))
        .route("/currentUser", get(current_user))
        .with_state(Arc::new(directory))
}

/// Sign in by username
///
/// No password is checked; any non-blank name is accepted.
#[utoipa::path(
    post,
    path = "/signIn",
    tag = TAG,
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = UserInfo),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn sign_in(
    State(directory): State<Arc<UserDirectory>>,
    session: Session,
    ValidatedJson(input): ValidatedJson<SignInRequest>,
) -> UserResult<Json<UserInfo>> {
    let user = directory.user(input.username.trim());
    sign_in_session(&session, &user).await?;

    tracing::info!(user = %user.name, "Signed in");
    Ok(Json(user))
}

/// Sign out
#[utoipa::path(
    post,
    path = "/signOut",
    tag = TAG,
    responses(
        (status = 200, description = "Signed out; body is an empty object"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn sign_out(session: Session) -> UserResult<Json<Value>> {
    if let Some(user) = sign_out_session(&session).await? {
        tracing::info!(user = %user.name, "Signed out");
    }
    Ok(Json(json!({})))
}

/// Current user, or `null` when nobody is signed in
#[utoipa::path(
    get,
    path = "/currentUser",
    tag = TAG,
    responses(
        (status = 200, description = "Signed-in user or null", body = Option<UserInfo>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn current_user(CurrentUser(user): CurrentUser) -> Json<Option<UserInfo>> {
    Json(user)
}
