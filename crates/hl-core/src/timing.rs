//! Lightweight performance timing utilities.
//!
//! Measures where runtime goes between network assembly (response-factor
//! synthesis included) and the time-march loop. Enabled via the `HL_TIMING` environment
//! variable or programmatically.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);

/// Enable performance timing globally.
pub fn enable_timing() {
    ENABLED.store(true, Ordering::Relaxed);
}

/// Disable performance timing globally.
pub fn disable_timing() {
    ENABLED.store(false, Ordering::Relaxed);
}

/// Check if timing is enabled.
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed) || std::env::var("HL_TIMING").is_ok()
}

/// A simple timer that measures elapsed time.
pub struct Timer {
    start: Instant,
    enabled: bool,
}

impl Timer {
    /// Create and start a new timer.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            enabled: is_enabled(),
        }
    }

    /// Stop the timer and return elapsed time in seconds.
    /// If timing is disabled, returns None.
    pub fn stop(self) -> Option<f64> {
        if self.enabled {
            Some(self.start.elapsed().as_secs_f64())
        } else {
            None
        }
    }
}

/// Accumulating timer for tracking total time across multiple calls.
pub struct AccumulatingTimer {
    total_ns: AtomicU64,
    count: AtomicU64,
}

impl Default for AccumulatingTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl AccumulatingTimer {
    pub const fn new() -> Self {
        Self {
            total_ns: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Record a timing measurement.
    pub fn record(&self, duration_s: f64) {
        let nanos = (duration_s * 1e9) as u64;
        self.total_ns.fetch_add(nanos, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total time spent (in seconds).
    pub fn total_seconds(&self) -> f64 {
        self.total_ns.load(Ordering::Relaxed) as f64 / 1e9
    }

    /// Get number of calls.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Get average time per call (in seconds).
    pub fn average_seconds(&self) -> f64 {
        let count = self.count();
        if count > 0 {
            self.total_seconds() / count as f64
        } else {
            0.0
        }
    }

    pub fn reset(&self) {
        self.total_ns.store(0, Ordering::Relaxed);
        self.count.store(0, Ordering::Relaxed);
    }
}

/// Per-phase wall-clock statistics for one simulation run.
#[derive(Debug, Default, Clone)]
pub struct PerfStats {
    pub assembly_time_s: f64,
    pub march_time_s: f64,
    pub steps: usize,
}

impl PerfStats {
    /// Average wall-clock time per step, zero before any step ran.
    pub fn avg_step_s(&self) -> f64 {
        if self.steps > 0 {
            self.march_time_s / self.steps as f64
        } else {
            0.0
        }
    }

    /// Render a formatted summary; `None` when timing is disabled.
    pub fn summary(&self) -> Option<String> {
        if !is_enabled() {
            return None;
        }
        let mut out = String::from("=== Performance Summary ===\n");
        out.push_str(&format!("Network assembly:    {:.3}s\n", self.assembly_time_s));
        out.push_str(&format!("Time march:          {:.3}s\n", self.march_time_s));
        if self.steps > 0 {
            out.push_str(&format!("  Steps:             {}\n", self.steps));
            out.push_str(&format!(
                "  Avg step time:     {:.6}s\n",
                self.avg_step_s()
            ));
        }
        Some(out)
    }
}
