//! Provider configuration.
//!
//! A [`ProviderConfig`] is constructed once, at host-framework startup, and
//! stays immutable for the provider's lifetime. The secret key is wrapped in
//! [`SecretKey`] so it cannot leak through `Debug` or log output.

use std::env;
use std::fmt;
use std::fmt::Debug;

use serde::Deserialize;
use url::Url;

/// A merchant secret key, redacted in all diagnostic output.
///
/// The inner value is only reachable through [`SecretKey::expose`], which
/// keeps accidental logging (`{:?}` on a config, tracing fields) from
/// printing the credential.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(key: impl Into<String>) -> Self {
        SecretKey(key.into())
    }

    /// Reads the key from an environment variable.
    pub fn from_env(var: &str) -> Result<Self, ConfigError> {
        let value = env::var(var).map_err(|_| ConfigError::MissingEnv(var.to_string()))?;
        Ok(SecretKey(value))
    }

    /// Returns the raw key for use in request authentication headers.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

impl From<String> for SecretKey {
    fn from(value: String) -> Self {
        SecretKey(value)
    }
}

/// Errors that can occur while assembling a provider configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A referenced environment variable is unset.
    #[error("Environment variable {0} is not set")]
    MissingEnv(String),
    /// A URL field failed to parse.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Static configuration shared by both provider kinds.
///
/// `merchant_id` doubles as the public key for networks that call it that;
/// `image` is an optional branding logo shown on hosted payment forms.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the remote network API.
    pub api_url: Url,
    /// Merchant identifier (public key) assigned by the network.
    pub merchant_id: String,
    /// Secret key assigned by the network. Never logged, never sent to the
    /// payer-facing client.
    pub secret_key: SecretKey,
    /// Optional merchant logo URL for hosted forms.
    #[serde(default)]
    pub image: Option<Url>,
}

impl ProviderConfig {
    pub fn new(api_url: Url, merchant_id: impl Into<String>, secret_key: SecretKey) -> Self {
        ProviderConfig {
            api_url,
            merchant_id: merchant_id.into(),
            secret_key,
            image: None,
        }
    }

    /// Attaches a branding image shown on hosted payment forms.
    pub fn with_image(mut self, image: Url) -> Self {
        self.image = Some(image);
        self
    }
}
