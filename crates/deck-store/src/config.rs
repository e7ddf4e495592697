use std::time::Duration;

/// Environment variable holding the backend base URL.
pub const ENV_BACKEND_URL: &str = "DECK_BACKEND_URL";
/// Environment variable holding the bearer credential.
pub const ENV_TOKEN: &str = "DECK_TOKEN";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "DECK_TIMEOUT_SECS";

/// Connection settings for `HttpStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Backend origin, e.g. `http://localhost:5005`. Default: **localhost:5005**.
    pub base_url: String,

    /// Bearer credential obtained at login. Requests without one fail with
    /// `StoreError::Auth` before touching the network.
    pub token: Option<String>,

    /// Per-request timeout. Default: **10 s**.
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5005".into(),
            token: None,
            timeout: Duration::from_secs(10),
        }
    }
}

impl StoreConfig {
    /// Defaults overridden by `DECK_*` variables, after loading `.env` if
    /// one exists.
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("no .env loaded: {e}");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_BACKEND_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = url;
        }
        config.token = lookup(ENV_TOKEN).filter(|v| !v.trim().is_empty());
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            match secs.trim().parse::<u64>() {
                Ok(n) => config.timeout = Duration::from_secs(n),
                Err(_) => log::warn!("ignoring {ENV_TIMEOUT_SECS}={secs}: not a number"),
            }
        }
        config
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Full URL of the store endpoint.
    pub fn store_url(&self) -> String {
        format!("{}/store", self.base_url.trim_end_matches('/'))
    }
}
