//! Connection configuration for an R2 account

use crate::error::{R2Error, R2Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Region sentinel R2 expects; the service picks the location itself.
pub const DEFAULT_REGION: &str = "auto";

/// Buckets listed at once while computing storage usage
pub const DEFAULT_USAGE_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct R2Config {
    #[serde(default, alias = "ACCOUNT_ID", alias = "accountId")]
    pub account_id: String,
    #[serde(default, alias = "CLIENT_ACCESS_KEY", alias = "accessKey")]
    pub access_key_id: String,
    #[serde(default, alias = "CLIENT_SECRET", alias = "secret")]
    pub secret_access_key: String,
    #[serde(default = "default_region", alias = "REGION")]
    pub region: String,
    /// Overrides the endpoint derived from `account_id`
    #[serde(default, alias = "ENDPOINT_URL", alias = "endpointUrl")]
    pub endpoint_url: Option<String>,
    #[serde(default = "default_usage_concurrency")]
    pub usage_concurrency: usize,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_usage_concurrency() -> usize {
    DEFAULT_USAGE_CONCURRENCY
}

impl R2Config {
    pub fn new(
        account_id: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: default_region(),
            endpoint_url: None,
            usage_concurrency: DEFAULT_USAGE_CONCURRENCY,
        }
    }

    pub fn with_endpoint(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> R2Result<Self> {
        let config: R2Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file.
    pub fn from_file(path: &Path) -> R2Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            R2Error::configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    /// Build from `R2_*` environment variables.
    pub fn from_env() -> R2Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> R2Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(
            lookup("R2_ACCOUNT_ID").unwrap_or_default(),
            lookup("R2_ACCESS_KEY_ID").unwrap_or_default(),
            lookup("R2_SECRET_ACCESS_KEY").unwrap_or_default(),
        );
        if let Some(region) = lookup("R2_REGION") {
            config.region = region;
        }
        config.endpoint_url = lookup("R2_ENDPOINT_URL");
        config.validate()?;
        Ok(config)
    }

    /// Check that every field needed to sign requests is present.
    pub fn validate(&self) -> R2Result<()> {
        if self.access_key_id.trim().is_empty() {
            return Err(R2Error::configuration("missing access key"));
        }
        if self.secret_access_key.trim().is_empty() {
            return Err(R2Error::configuration("missing secret access key"));
        }
        if self.region.trim().is_empty() {
            return Err(R2Error::configuration("missing region"));
        }
        self.endpoint().map(|_| ())
    }

    /// Endpoint the transport talks to.
    pub fn endpoint(&self) -> R2Result<String> {
        if let Some(url) = self.endpoint_url.as_deref().map(str::trim) {
            if !url.is_empty() {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(R2Error::configuration(format!(
                        "endpoint must be an http(s) URL: {}",
                        url
                    )));
                }
                return Ok(url.trim_end_matches('/').to_string());
            }
        }

        let account_id = self.account_id.trim();
        if account_id.is_empty() {
            return Err(R2Error::configuration("missing account id"));
        }
        Ok(format!("https://{}.r2.cloudflarestorage.com", account_id))
    }

    pub fn usage_concurrency(&self) -> usize {
        self.usage_concurrency.max(1)
    }
}
