use std::collections::HashSet;
use uuid::Uuid;

use crate::models::{Role, UserInfo};

/// Namespace for name-derived user ids.
const USER_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a0e_8d3b_4c57_9e41_b2d8_5a7f_0c13);

/// Resolves sign-in names to users.
///
/// Nothing is stored per user: the id is a UUID v5 of the name and the admin
/// role comes from the configured list, so the same name always resolves to
/// the same record.
#[derive(Debug, Default)]
pub struct UserDirectory {
    admins: HashSet<String>,
}

impl UserDirectory {
    pub fn new<I, S>(admins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            admins: admins.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_admin_name(&self, name: &str) -> bool {
        self.admins.contains(name)
    }

    pub fn user(&self, name: &str) -> UserInfo {
        let roles = if self.is_admin_name(name) {
            vec![Role::Admin]
        } else {
            Vec::new()
        };

        UserInfo {
            id: Uuid::new_v5(&USER_ID_NAMESPACE, name.as_bytes()).to_string(),
            name: name.to_string(),
            roles,
        }
    }
}
