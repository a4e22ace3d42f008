use crate::error::{UserError, UserResult};
use crate::models::UserInfo;

/// Allow only signed-in admins through.
///
/// Anonymous callers and signed-in non-admins both get `Forbidden`.
pub fn require_admin(user: Option<&UserInfo>) -> UserResult<&UserInfo> {
    match user {
        Some(user) if user.is_admin() => Ok(user),
        Some(user) => {
            tracing::info!(user = %user.name, "Rejected non-admin caller");
            Err(UserError::Forbidden)
        }
        None => {
            tracing::info!("Rejected anonymous caller");
            Err(UserError::Forbidden)
        }
    }
}
