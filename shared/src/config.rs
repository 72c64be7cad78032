use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:7860";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);
pub const LIVE_TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Where the inference API lives and how long we are willing to wait for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    base_url: String,
    pub timeout: Duration,
    pub live_interval: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            live_interval: LIVE_TICK_INTERVAL,
        }
    }

    /// Settings baked in at compile time. `WASTELENS_API_BASE` and
    /// `WASTELENS_API_TIMEOUT_SECS` override the defaults when set during the build.
    pub fn compiled() -> Self {
        let mut config = Self::new(option_env!("WASTELENS_API_BASE").unwrap_or(DEFAULT_API_BASE));
        if let Some(secs) = option_env!("WASTELENS_API_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn predict_url(&self) -> String {
        self.endpoint("/predict")
    }

    pub fn health_url(&self) -> String {
        self.endpoint("/health")
    }

    /// Joins an absolute path (leading `/`) onto the base.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
