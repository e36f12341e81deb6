use log::{info, warn};

/// Shared logging surface for the pipeline stages.
pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    /// Stage progress / result lines.
    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    /// Data-quality advisories that do not abort the run.
    pub fn advise(&self, message: &str) {
        warn!("{}", message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
