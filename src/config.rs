use serde::Deserialize;
use url::Url;

/// Production API environment.
pub const LIVE_BASE_URL: &str = "https://api.salsalabs.org/";
/// Sandbox API environment, the default.
pub const SANDBOX_BASE_URL: &str = "https://sandbox.salsalabs.com/";

/// Transport timeout applied when none is configured, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub token: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Config {
    /// Sandbox configuration with default timeout.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: SANDBOX_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Production configuration with default timeout.
    pub fn live(token: impl Into<String>) -> Self {
        Self {
            base_url: LIVE_BASE_URL.to_string(),
            ..Self::new(token)
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let token = std::env::var("ENGAGE_TOKEN")
            .map_err(|_| anyhow::anyhow!("ENGAGE_TOKEN environment variable required"))
            .and_then(|token| {
                if token.trim().is_empty() {
                    anyhow::bail!("ENGAGE_TOKEN cannot be empty");
                }
                Ok(token)
            })?;

        // ENGAGE_BASE_URL overrides both environments; otherwise ENGAGE_ENV
        // picks live or sandbox.
        let base_url = match std::env::var("ENGAGE_BASE_URL") {
            Ok(url) if !url.trim().is_empty() => {
                Url::parse(&url)
                    .map_err(|e| anyhow::anyhow!("ENGAGE_BASE_URL is not a valid URL: {}", e))?;
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    anyhow::bail!("ENGAGE_BASE_URL must start with http:// or https://");
                }
                url
            }
            _ => match std::env::var("ENGAGE_ENV").as_deref() {
                Ok("live") => LIVE_BASE_URL.to_string(),
                _ => SANDBOX_BASE_URL.to_string(),
            },
        };

        let timeout_secs = std::env::var("ENGAGE_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("ENGAGE_TIMEOUT_SECS must be a positive number"))?;

        let config = Self {
            token,
            base_url,
            timeout_secs,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("API base URL: {}", config.base_url);
        tracing::debug!("Transport timeout: {}s", config.timeout_secs);

        Ok(config)
    }
}
