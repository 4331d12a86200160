use serde::{Deserialize, Serialize};

use crate::config::AdminConfig;

/// The single administrator record kept under `adminUser`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub name: String,
    pub role: String,
    pub email: String,
    /// Plain text or an Argon2 PHC string, depending on the credential backend.
    pub password: String,
    #[serde(default)]
    pub avatar: String,
}

impl AdminUser {
    /// Seed record from config, with the password already prepared for storage.
    #[must_use]
    pub fn seed(config: &AdminConfig, stored_password: String) -> Self {
        Self {
            name: config.name.clone(),
            role: config.role.clone(),
            email: config.email.clone(),
            password: stored_password,
            avatar: config.avatar.clone(),
        }
    }

    #[must_use]
    pub fn public_info(&self) -> AdminInfo {
        AdminInfo {
            name: self.name.clone(),
            role: self.role.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Admin record without the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminInfo {
    pub name: String,
    pub role: String,
    pub email: String,
    pub avatar: String,
}
