//! Pipeline configuration.

use std::time::Duration;

use centris_api::{SessionConfig, DEFAULT_BASE_URL};

/// Share of first-page cards that must match the query before results are
/// trusted, on each of the location and category axes.
pub const DEFAULT_VALIDATION_THRESHOLD: f64 = 0.70;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(500);

/// Settings for a [`crate::pipeline::SearchPipeline`].
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Portal origin, e.g. `https://www.centris.ca`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Pause between consecutive result-page fetches.
    pub page_delay: Duration,
    /// Minimum per-axis match ratio for first-page validation.
    pub validation_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            page_delay: DEFAULT_PAGE_DELAY,
            validation_threshold: DEFAULT_VALIDATION_THRESHOLD,
        }
    }
}

impl PipelineConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Zero disables the pause entirely, which tests rely on.
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    pub fn with_validation_threshold(mut self, threshold: f64) -> Self {
        self.validation_threshold = threshold;
        self
    }

    /// The session settings this configuration implies.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            base_url: self.base_url.clone(),
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_the_live_portal() {
        let config = PipelineConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.validation_threshold, 0.70);
        assert_eq!(config.page_delay, Duration::from_millis(500));
    }

    #[test]
    fn builder_style_overrides() {
        let config = PipelineConfig::default()
            .with_base_url("http://127.0.0.1:9000")
            .with_page_delay(Duration::ZERO)
            .with_validation_threshold(0.5);
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.page_delay, Duration::ZERO);
        assert_eq!(config.validation_threshold, 0.5);
        assert_eq!(config.session_config().base_url, "http://127.0.0.1:9000");
    }
}
