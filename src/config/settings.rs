use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

use crate::auth::credentials::Credentials;
use crate::cache::file_store::FileTokenStore;
use crate::cache::store::{MemoryTokenStore, TokenStoreKind};
use crate::errors::{ConfigError, StoreError};
use crate::utils::constants::{DEFAULT_API_BASE_URL, DEFAULT_TOKEN_CACHE_DIR, DEFAULT_TOKEN_URL};

/// ================================
/// Full client configuration
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub token_cache: TokenCacheConfig,
    pub logging: Option<LoggingConfig>,
}

/// ================================
/// API transport
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub timeout_ms: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: None,
        }
    }
}

/// ================================
/// Credentials
/// ================================
#[derive(Deserialize, Clone)]
pub struct AuthConfig {
    pub api_key: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    #[serde(default)]
    pub grant: GrantKind,
    /// required for the password grant
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default = "default_token_url")]
    pub token_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            client_id: None,
            client_secret: None,
            grant: GrantKind::default(),
            username: None,
            password: None,
            token_url: default_token_url(),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "***");
        f.debug_struct("AuthConfig")
            .field("api_key", &redact(&self.api_key))
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("grant", &self.grant)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("token_url", &self.token_url)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GrantKind {
    #[default]
    ClientCredentials,
    Password,
}

impl AuthConfig {
    /// Resolve the configured credentials. Empty strings count as absent, so
    /// `${VAR:}` placeholders for unset variables disable a field.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let api_key = present(&self.api_key);
        let client_id = present(&self.client_id);

        match (api_key, client_id) {
            (Some(_), Some(_)) => Err(ConfigError::AmbiguousCredentials),
            (Some(key), None) => Ok(Credentials::api_key(key)),
            (None, None) => Err(ConfigError::MissingCredentials),
            (None, Some(client_id)) => {
                let mut errors = Vec::new();
                let client_secret = present(&self.client_secret);
                if client_secret.is_none() {
                    errors.push("auth.client_secret is required with auth.client_id".to_owned());
                }
                let username = present(&self.username);
                let password = present(&self.password);
                if self.grant == GrantKind::Password {
                    if username.is_none() {
                        errors.push("auth.username is required for the password grant".to_owned());
                    }
                    if password.is_none() {
                        errors.push("auth.password is required for the password grant".to_owned());
                    }
                }

                match (client_secret, self.grant, username, password) {
                    (Some(secret), GrantKind::ClientCredentials, _, _) => {
                        Ok(Credentials::client_credentials(client_id, secret))
                    }
                    (Some(secret), GrantKind::Password, Some(username), Some(password)) => {
                        Ok(Credentials::password(client_id, secret, username, password))
                    }
                    _ => Err(ConfigError::Invalid(errors)),
                }
            }
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// ================================
/// Token cache
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct TokenCacheConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
}

impl Default for TokenCacheConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            dir: default_cache_dir(),
        }
    }
}

impl TokenCacheConfig {
    pub fn build_store(&self) -> Result<TokenStoreKind, StoreError> {
        Ok(match self.backend {
            StoreBackend::File => TokenStoreKind::File(FileTokenStore::new(&self.dir)?),
            StoreBackend::Memory => TokenStoreKind::Memory(MemoryTokenStore::new()),
        })
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    File,
    Memory,
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("info".to_owned(), LogFormat::Compact)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Compact,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(DEFAULT_TOKEN_CACHE_DIR)
}
