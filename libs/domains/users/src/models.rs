use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// User roles
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Admin,
}

/// The signed-in user as kept in the session and returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    /// Stable id for the lifetime of the process
    pub id: String,
    /// Username
    pub name: String,
    /// Granted roles
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl UserInfo {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

/// Sign-in request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignInRequest {
    #[validate(
        length(max = 100, message = "Username is too long"),
        custom(function = "not_blank", message = "Username is required")
    )]
    pub username: String,
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
