//! Intake session settings

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct IntakeConfig {
    /// Seconds without input before an open session is cancelled; 0 disables expiry
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Seconds between idle-session sweeps
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Directory for YAML transcripts; unset keeps transcripts in memory
    pub transcript_dir: Option<PathBuf>,
}

impl IntakeConfig {
    pub fn expiry_enabled(&self) -> bool {
        self.idle_timeout_secs > 0
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.expiry_enabled() && self.sweep_interval_secs == 0 {
            return Err(ValidationError::InvalidSweepInterval);
        }
        Ok(())
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout(),
            sweep_interval_secs: default_sweep_interval(),
            transcript_dir: None,
        }
    }
}

fn default_idle_timeout() -> u64 {
    1800
}

fn default_sweep_interval() -> u64 {
    60
}
