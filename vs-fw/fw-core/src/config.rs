//! Engine configuration resolved at construction time.

use vs_protocol::DEFAULT_SAMPLE_PERIOD_MS;

/// Runtime options for an [`Engine`](crate::Engine)
///
/// # Example
///
/// ```
/// use fw_core::EngineConfig;
///
/// let config = EngineConfig::new()
///     .with_default_sample_period_ms(20)
///     .with_error_reports(true);
/// assert_eq!(config.default_sample_period_ms(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    default_sample_period_ms: u32,
    error_reports: bool,
}

impl EngineConfig {
    pub const fn new() -> Self {
        Self {
            default_sample_period_ms: DEFAULT_SAMPLE_PERIOD_MS,
            error_reports: false,
        }
    }

    /// Period used at start-up and after a rate-0 request.
    ///
    /// Zero is not a valid period and falls back to [`DEFAULT_SAMPLE_PERIOD_MS`].
    pub const fn with_default_sample_period_ms(mut self, period_ms: u32) -> Self {
        self.default_sample_period_ms = if period_ms == 0 {
            DEFAULT_SAMPLE_PERIOD_MS
        } else {
            period_ms
        };
        self
    }

    /// Enable the device-initiated error report frame (0x8F)
    pub const fn with_error_reports(mut self, enabled: bool) -> Self {
        self.error_reports = enabled;
        self
    }

    pub const fn default_sample_period_ms(&self) -> u32 {
        self.default_sample_period_ms
    }

    pub const fn error_reports(&self) -> bool {
        self.error_reports
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
