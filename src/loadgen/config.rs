/// Configuration for the load runner.
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Randomized pause between task launches, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTime {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl WaitTime {
    /// Draw a pause duration from the configured interval.
    pub fn sample(&self) -> Duration {
        let ms = if self.min_ms == self.max_ms {
            self.min_ms
        } else {
            fastrand::u64(self.min_ms..=self.max_ms)
        };
        Duration::from_millis(ms)
    }
}

/// Runner configuration.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Number of simulated users (concurrency cap)
    pub users: usize,
    /// Total number of task executions
    pub runs: usize,
    /// Pause between task launches; defaults to 1-3 seconds
    pub wait_time: Option<WaitTime>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Plan and classify without any network I/O
    pub dry_run: bool,
    /// Seed for the task-selection RNG
    pub seed: Option<u64>,
}

impl LoadConfig {
    /// Create a config with the given concurrency and run count.
    pub fn new(users: usize, runs: usize) -> Self {
        Self {
            users,
            runs,
            wait_time: Some(WaitTime {
                min_ms: 1000,
                max_ms: 3000,
            }),
            timeout: Duration::from_secs(30),
            dry_run: false,
            seed: None,
        }
    }

    /// Parse a wait-time spec such as "1-3s", "500ms", or "2s".
    pub fn parse_wait_time(spec: &str) -> Result<WaitTime, String> {
        let spec = spec.trim();

        let (number_part, unit_ms) = if let Some(stripped) = spec.strip_suffix("ms") {
            (stripped, 1u64)
        } else if let Some(stripped) = spec.strip_suffix('s') {
            (stripped, 1000u64)
        } else {
            return Err(format!(
                "Invalid wait time '{}': expected a unit of 'ms' or 's'",
                spec
            ));
        };

        let parse_value = |v: &str| -> Result<u64, String> {
            v.trim()
                .parse::<u64>()
                .map_err(|_| format!("Invalid wait time '{}': '{}' is not an integer", spec, v))
        };

        let (min, max) = match number_part.split_once('-') {
            Some((lo, hi)) => (parse_value(lo)?, parse_value(hi)?),
            None => {
                let v = parse_value(number_part)?;
                (v, v)
            }
        };

        if min > max {
            return Err(format!(
                "Invalid wait time '{}': lower bound exceeds upper bound",
                spec
            ));
        }

        Ok(WaitTime {
            min_ms: min * unit_ms,
            max_ms: max * unit_ms,
        })
    }
}

/// Optional TOML load profile; CLI flags take precedence over its values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoadProfile {
    pub runs: Option<usize>,
    pub users: Option<usize>,
    pub wait_time: Option<String>,
    pub seed: Option<u64>,
}

impl LoadProfile {
    /// Load a profile from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read profile {}: {}", path.display(), e))?;
        toml::from_str(&raw).map_err(|e| format!("Invalid profile {}: {}", path.display(), e))
    }
}
