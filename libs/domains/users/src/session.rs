use axum::{extract::FromRequestParts, http::request::Parts};
use axum_helpers::AppError;
use tower_sessions::Session;

use crate::error::UserResult;
use crate::models::UserInfo;

/// Session key holding the signed-in [`UserInfo`].
pub const USER_SESSION_KEY: &str = "user";

/// The user signed in on this request's session, if any.
///
/// Requires the session layer; without it extraction fails with a 500.
///
/// ```ignore
/// async fn handler(CurrentUser(user): CurrentUser) -> String {
///     user.map(|u| u.name).unwrap_or_default()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<UserInfo>);

impl CurrentUser {
    pub fn as_ref(&self) -> Option<&UserInfo> {
        self.0.as_ref()
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::InternalServerError(msg.to_string()))?;

        let user = session.get::<UserInfo>(USER_SESSION_KEY).await?;
        Ok(CurrentUser(user))
    }
}

/// Store `user` in a freshly cycled session.
pub async fn sign_in_session(session: &Session, user: &UserInfo) -> UserResult<()> {
    session.cycle_id().await?;
    session.insert(USER_SESSION_KEY, user).await?;
    Ok(())
}

/// Drop the user from the session, keeping everything else.
pub async fn sign_out_session(session: &Session) -> UserResult<Option<UserInfo>> {
    Ok(session.remove::<UserInfo>(USER_SESSION_KEY).await?)
}
