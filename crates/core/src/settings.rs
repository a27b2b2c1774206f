//! Pool configuration knobs.

use std::time::Duration;

/// Read-only pool configuration.
///
/// Values come from the embedding harness; the pool never reads config files
/// or the environment itself.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Maximum live sessions per scope (one worker's own sessions plus the
    /// suite-level ones it can see).
    pub max_session_count: usize,
    /// Extra creation attempts after the first failure. Zero means exactly
    /// one attempt.
    pub init_retry_count: u32,
    /// Pause between creation attempts.
    pub init_retry_interval: Duration,
    /// Bound on the close/quit sequence during teardown.
    pub close_timeout: Duration,
    /// Issues a soft close before quit. Works around browsers that leave
    /// profile data on disk when quit directly.
    pub close_before_quit: bool,
    /// Connects a device's remote channel as part of registering it.
    pub connect_device_on_register: bool,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_session_count: 3,
            init_retry_count: 1,
            init_retry_interval: Duration::from_secs(1),
            close_timeout: Duration::from_secs(30),
            close_before_quit: false,
            connect_device_on_register: false,
        }
    }
}

impl PoolSettings {
    /// Creates settings with the defaults above.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-scope session capacity.
    pub fn with_max_session_count(mut self, max: usize) -> Self {
        self.max_session_count = max;
        self
    }

    /// Sets the number of extra creation attempts.
    pub fn with_init_retry_count(mut self, count: u32) -> Self {
        self.init_retry_count = count;
        self
    }

    /// Sets the pause between creation attempts.
    pub fn with_init_retry_interval(mut self, interval: Duration) -> Self {
        self.init_retry_interval = interval;
        self
    }

    /// Sets the teardown shutdown bound.
    pub fn with_close_timeout(mut self, timeout: Duration) -> Self {
        self.close_timeout = timeout;
        self
    }

    /// Enables or disables the soft-close-before-quit workaround.
    pub fn with_close_before_quit(mut self, enabled: bool) -> Self {
        self.close_before_quit = enabled;
        self
    }

    /// Enables or disables connecting devices on registration.
    pub fn with_connect_device_on_register(mut self, enabled: bool) -> Self {
        self.connect_device_on_register = enabled;
        self
    }
}
