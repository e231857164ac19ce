use crate::error::Result;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration, layered: defaults, then an optional file, then
/// `SIKA_`-prefixed environment variables (e.g. `SIKA_GATEWAY__SECRET_KEY`).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token for outbound gateway calls.
    pub secret_key: String,
    /// Shared secret for inbound webhook signature verification.
    pub webhook_secret: String,
    /// Upper bound on each gateway call; operations are synchronous and must
    /// not block unboundedly.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
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

fn default_base_url() -> String {
    crate::infrastructure::paystack::DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(Environment::with_prefix("SIKA").separator("__"));

        Ok(builder.build()?.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_file_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sika.toml");
        std::fs::write(
            &path,
            "[gateway]\nsecret_key = \"sk_test_x\"\nwebhook_secret = \"whsec_x\"\n",
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.gateway.secret_key, "sk_test_x");
        assert_eq!(config.gateway.base_url, "https://api.paystack.co");
        assert_eq!(config.gateway.timeout_ms, 30_000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_required_key_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sika.toml");
        std::fs::write(&path, "[gateway]\nsecret_key = \"sk_test_x\"\n").unwrap();

        assert!(AppConfig::load(Some(&path)).is_err());
    }
}
