use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

/// Settings for one [`Arping`](crate::Arping) handle.
///
/// Each handle owns its copy, so two callers with different timeouts never see each other's
/// settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    timeout: Duration,
    verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            timeout: DEFAULT_TIMEOUT,
            verbose: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// How long a ping listens for replies, counted from the start of the call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.set_timeout(timeout);
        self
    }

    /// Whether every received frame is logged, matched or not.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.set_verbose(verbose);
        self
    }
}
