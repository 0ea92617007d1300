//! Configuration for the image codec.

use serde::{Deserialize, Serialize};

/// Configuration for the `image`-crate codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Upper bound for a single inspect or encode call, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// rav1e speed preset for AVIF output (1 = slowest/best, 10 = fastest).
    #[serde(default = "default_avif_speed")]
    pub avif_speed: u8,

    /// Codec calls allowed to run on the blocking pool at once.
    ///
    /// A call that times out keeps its slot until the worker actually
    /// finishes, so slow inputs cannot pile up blocking threads.
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,
}

fn default_timeout() -> u64 {
    120
}

fn default_avif_speed() -> u8 {
    6
}

fn default_max_concurrent_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            avif_speed: default_avif_speed(),
            max_concurrent_jobs: default_max_concurrent_jobs(),
        }
    }
}

impl CodecConfig {
    /// Sets the per-call timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Sets the AVIF encoder speed.
    pub fn with_avif_speed(mut self, speed: u8) -> Self {
        self.avif_speed = speed;
        self
    }

    /// Sets how many codec calls may run at once.
    pub fn with_max_concurrent_jobs(mut self, jobs: usize) -> Self {
        self.max_concurrent_jobs = jobs;
        self
    }
}
