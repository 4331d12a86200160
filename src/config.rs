use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub storage: StorageConfig,

    pub server: ServerConfig,

    pub admin: AdminConfig,

    pub inquiry: InquiryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Path of the key-value store file. `:memory:` keeps everything in process.
    pub data_path: String,

    /// Directory served for sample profile images and other static files.
    pub public_path: String,

    pub log_level: String,

    /// "pretty" or "json"
    pub log_format: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_path: "data/storage.json".to_string(),
            public_path: "public".to_string(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Upper bound on the total size of stored keys and values, in bytes.
    /// Mirrors the per-origin quota browsers put on local storage. 0 disables it.
    pub quota_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            quota_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Whether to set the Secure flag on session cookies.
    /// Leave off for local development without HTTPS.
    pub secure_cookies: bool,

    /// Minutes of inactivity before the cookie session is dropped.
    pub session_idle_minutes: i64,

    /// Request body limit, mostly relevant for profile image uploads.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 3000,
            cors_allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            secure_cookies: false,
            session_idle_minutes: 60,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialBackend {
    /// Stored password compared as-is.
    #[default]
    Plain,
    /// Stored password is an Argon2 PHC string.
    Argon2,
}

/// Seed for the `adminUser` record, used only when the store has none yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub name: String,

    pub role: String,

    pub email: String,

    pub password: String,

    pub avatar: String,

    pub credential_backend: CredentialBackend,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            name: "Admin User".to_string(),
            role: "Super Admin".to_string(),
            email: "admin@gmail.com".to_string(),
            password: "123456".to_string(),
            avatar: "/admin-avatar.png".to_string(),
            credential_backend: CredentialBackend::Plain,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InquiryConfig {
    /// Pause between persisting an inquiry and acknowledging it.
    pub ack_delay_ms: u64,

    /// Country recorded when the form does not send one.
    pub default_country: String,
}

impl Default for InquiryConfig {
    fn default() -> Self {
        Self {
            ack_delay_ms: 1000,
            default_country: crate::models::inquiry::DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("matchcrm").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".matchcrm").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.admin.email.trim().is_empty() {
            anyhow::bail!("admin.email cannot be empty");
        }

        if self.admin.password.is_empty() {
            anyhow::bail!("admin.password cannot be empty");
        }

        if self.server.port == 0 {
            anyhow::bail!("server.port must be > 0");
        }

        Ok(())
    }

    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.general.data_path == ":memory:"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.admin.email, "admin@gmail.com");
        assert_eq!(config.admin.credential_backend, CredentialBackend::Plain);
        assert_eq!(config.inquiry.ack_delay_ms, 1000);
        assert_eq!(config.storage.quota_bytes, 5 * 1024 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[admin]"));
        assert!(toml_str.contains("credential_backend = \"plain\""));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [admin]
            email = "owner@example.com"
            credential_backend = "argon2"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.admin.email, "owner@example.com");
        assert_eq!(config.admin.credential_backend, CredentialBackend::Argon2);

        assert_eq!(config.admin.password, "123456");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_validate_rejects_blank_admin_email() {
        let mut config = Config::default();
        config.admin.email = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
