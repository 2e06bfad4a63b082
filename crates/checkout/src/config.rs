//! Checkout configuration, read from the environment.

use thiserror::Error;

/// Provider credential. Required; never has a default.
pub const PAYMENT_KEY_VAR: &str = "STOREFRONT_PAYMENT_KEY";
/// Hosted-checkout session endpoint. Required.
pub const PAYMENT_ENDPOINT_VAR: &str = "STOREFRONT_PAYMENT_ENDPOINT";
/// Public origin of the storefront, used to build return URLs.
pub const ORIGIN_VAR: &str = "STOREFRONT_ORIGIN";

pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{0} is blank")]
    Blank(&'static str),
}

#[derive(Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    payment_key: String,
    endpoint: String,
    origin: String,
}

impl CheckoutConfig {
    pub fn new(
        payment_key: impl Into<String>,
        endpoint: impl Into<String>,
        origin: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let payment_key = non_blank(PAYMENT_KEY_VAR, payment_key.into())?;
        let endpoint = non_blank(PAYMENT_ENDPOINT_VAR, endpoint.into())?;
        let origin = non_blank(ORIGIN_VAR, origin.into())?
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            payment_key,
            endpoint,
            origin,
        })
    }

    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup (environment, map, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let payment_key = lookup(PAYMENT_KEY_VAR).ok_or(ConfigError::Missing(PAYMENT_KEY_VAR))?;
        let endpoint =
            lookup(PAYMENT_ENDPOINT_VAR).ok_or(ConfigError::Missing(PAYMENT_ENDPOINT_VAR))?;
        let origin = lookup(ORIGIN_VAR).unwrap_or_else(|| DEFAULT_ORIGIN.to_string());

        Self::new(payment_key, endpoint, origin)
    }

    pub fn payment_key(&self) -> &str {
        &self.payment_key
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn success_url(&self) -> String {
        format!("{}/success", self.origin)
    }

    pub fn cancel_url(&self) -> String {
        format!("{}/cancel", self.origin)
    }
}

// Keeps the credential out of logs.
impl core::fmt::Debug for CheckoutConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CheckoutConfig")
            .field("payment_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("origin", &self.origin)
            .finish()
    }
}

fn non_blank(var: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ConfigError::Blank(var))
    } else {
        Ok(trimmed.to_string())
    }
}
