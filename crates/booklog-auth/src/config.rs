//! Authentication configuration.
//!
//! Token lifetimes and signing key settings for the token authority.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::token::jwt::{JwtError, SigningAlgorithm, SigningKeyPair};

/// Longest accepted access or refresh token lifetime.
pub const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(366 * 24 * 3600);

/// Root authentication configuration.
///
/// # Example (TOML)
///
/// ```toml
/// [auth]
/// issuer = "https://booklog.example.com"
/// access_token_lifetime = "30m"
/// refresh_token_lifetime = "14d"
///
/// [auth.signing]
/// algorithm = "RS256"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Server issuer URL (used in token `iss` claim).
    pub issuer: String,

    /// Access token lifetime.
    #[serde(with = "humantime_serde")]
    pub access_token_lifetime: Duration,

    /// Refresh token lifetime.
    #[serde(with = "humantime_serde")]
    pub refresh_token_lifetime: Duration,

    /// Token signing configuration.
    pub signing: SigningConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: "http://localhost:8080".to_string(),
            access_token_lifetime: Duration::from_secs(30 * 60), // 30 minutes
            refresh_token_lifetime: Duration::from_secs(14 * 24 * 3600), // 14 days
            signing: SigningConfig::default(),
        }
    }
}

/// Token signing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SigningConfig {
    /// Signing algorithm.
    /// Supported: "RS256", "RS384", "ES384"
    pub algorithm: String,

    /// PKCS#8 PEM private key. When unset, a key pair is generated at startup
    /// and tokens do not survive a restart.
    pub private_key_path: Option<PathBuf>,

    /// PEM public key. Required for RSA when `private_key_path` is set.
    pub public_key_path: Option<PathBuf>,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            algorithm: "RS256".to_string(),
            private_key_path: None,
            public_key_path: None,
        }
    }
}

impl SigningConfig {
    /// Returns the parsed signing algorithm.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an unsupported algorithm.
    pub fn algorithm(&self) -> Result<SigningAlgorithm, ConfigError> {
        self.algorithm.parse().map_err(|_| {
            ConfigError::InvalidValue(format!(
                "Invalid signing algorithm: '{}'. Must be RS256, RS384, or ES384",
                self.algorithm
            ))
        })
    }

    /// Loads the configured key pair, or generates one if no key is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if a key file cannot be read or parsed, or key
    /// generation fails.
    pub fn load_key_pair(&self) -> Result<SigningKeyPair, ConfigError> {
        let algorithm = self.algorithm()?;

        let Some(private_path) = &self.private_key_path else {
            tracing::warn!(
                algorithm = %algorithm,
                "No signing key configured, generating an ephemeral key pair"
            );
            return SigningKeyPair::generate(algorithm).map_err(key_error);
        };

        let private_pem = read_pem(private_path)?;
        let public_pem = match &self.public_key_path {
            Some(path) => read_pem(path)?,
            None => String::new(),
        };

        let kid = private_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "default".to_string());

        SigningKeyPair::from_pem(kid, algorithm, &private_pem, &public_pem).map_err(key_error)
    }
}

fn read_pem(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| {
        ConfigError::InvalidValue(format!("Cannot read key file {}: {}", path.display(), e))
    })
}

fn key_error(err: JwtError) -> ConfigError {
    ConfigError::InvalidValue(format!("Signing key error: {}", err))
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// A required configuration value is missing.
    #[error("Missing required configuration: {0}")]
    Missing(String),
}

impl AuthConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The issuer URL is empty
    /// - A token lifetime is zero or longer than [`MAX_TOKEN_LIFETIME`]
    /// - The access token outlives the refresh token
    /// - The signing algorithm is not supported
    /// - An RSA private key is configured without its public key
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.issuer.is_empty() {
            return Err(ConfigError::InvalidValue(
                "issuer cannot be empty".to_string(),
            ));
        }

        if self.access_token_lifetime.is_zero() || self.refresh_token_lifetime.is_zero() {
            return Err(ConfigError::InvalidValue(
                "token lifetimes must be > 0".to_string(),
            ));
        }

        if self.access_token_lifetime > MAX_TOKEN_LIFETIME
            || self.refresh_token_lifetime > MAX_TOKEN_LIFETIME
        {
            return Err(ConfigError::InvalidValue(format!(
                "token lifetimes must not exceed {} days",
                MAX_TOKEN_LIFETIME.as_secs() / 86_400
            )));
        }

        if self.access_token_lifetime > self.refresh_token_lifetime {
            return Err(ConfigError::InvalidValue(
                "access_token_lifetime must not exceed refresh_token_lifetime".to_string(),
            ));
        }

        let algorithm = self.signing.algorithm()?;

        if algorithm.is_rsa()
            && self.signing.private_key_path.is_some()
            && self.signing.public_key_path.is_none()
        {
            return Err(ConfigError::Missing(
                "signing.public_key_path (required with an RSA private key)".to_string(),
            ));
        }

        Ok(())
    }
}
