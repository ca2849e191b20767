// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    7080
}

fn default_workers() -> usize {
    4
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_app_description")]
    pub description: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            description: default_app_description(),
        }
    }
}

fn default_app_name() -> String {
    "Inklet".to_string()
}

fn default_app_description() -> String {
    "A minimal blogging platform".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    Bearer,
    Basic,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_auth_mode")]
    pub mode: AuthMode,
    /// HS256 signing key for session tokens. Empty means not configured.
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_session_ttl_days")]
    pub session_ttl_days: u64,
    #[serde(default)]
    pub basic_username: Option<String>,
    #[serde(default)]
    pub basic_password: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: default_auth_mode(),
            secret: String::new(),
            session_ttl_days: default_session_ttl_days(),
            basic_username: None,
            basic_password: None,
        }
    }
}

fn default_auth_mode() -> AuthMode {
    AuthMode::Bearer
}

fn default_session_ttl_days() -> u64 {
    7
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_file")]
    pub file: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            file: default_database_file(),
        }
    }
}

fn default_database_file() -> String {
    "blog.db".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AssetsConfig {
    #[serde(default = "default_assets_dir")]
    pub dir: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: default_assets_dir(),
        }
    }
}

fn default_assets_dir() -> String {
    "assets".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration after validation and environment resolution. Secrets are
/// resolved once here and passed around as explicit values.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub auth: AuthConfig,
    pub database: DatabaseConfig,
    pub assets: AssetsConfig,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join("config.yaml");
        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to read {}: {}",
                config_path.display(),
                e
            ))
        })?;
        Self::from_yaml(&config_content)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(contents)
            .map_err(|e| ConfigError::LoadError(format!("Failed to parse config.yaml: {}", e)))
    }

    pub fn load_and_validate(root: &Path) -> Result<ValidatedConfig, ConfigError> {
        let mut config = Self::load(root)?;
        apply_env_overrides(&mut config, |name| std::env::var(name).ok());
        config.validate()
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        if self.server.workers == 0 {
            return Err(ConfigError::ValidationError(
                "server.workers must be at least 1".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must not be 0".to_string(),
            ));
        }
        if self.database.file.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "database.file must not be empty".to_string(),
            ));
        }
        if self.assets.dir.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "assets.dir must not be empty".to_string(),
            ));
        }
        if self.auth.mode == AuthMode::Basic
            && (self.auth.basic_username.is_none() || self.auth.basic_password.is_none())
        {
            return Err(ConfigError::ValidationError(
                "auth.basic_username and auth.basic_password are required in basic mode"
                    .to_string(),
            ));
        }

        Ok(ValidatedConfig {
            server: self.server,
            app: self.app,
            auth: self.auth,
            database: self.database,
            assets: self.assets,
            logging: self.logging,
        })
    }
}

/// `SECRET`, `USERNAME` and `PASSWORD` override their config.yaml
/// counterparts. Resolved once at startup, never read per request.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(secret) = lookup("SECRET") {
        config.auth.secret = secret;
    }
    if let Some(username) = lookup("USERNAME") {
        config.auth.basic_username = Some(username);
    }
    if let Some(password) = lookup("PASSWORD") {
        config.auth.basic_password = Some(password);
    }
}
