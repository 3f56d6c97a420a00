use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Cumulative OS counters captured at one instant.
///
/// This is also the on-disk format of the per-session state file, so the
/// field names are part of the file format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    /// Wall-clock capture time, seconds since the Unix epoch.
    pub time: f64,
    /// Cumulative seconds spent in each CPU mode since boot.
    pub cpu_times: BTreeMap<String, f64>,
    pub disk_read: u64,
    pub disk_write: u64,
    pub net_sent: u64,
    pub net_recv: u64,
}

impl Snapshot {
    /// Checks what the type system cannot: the capture time and every CPU
    /// mode must be finite and non-negative.
    pub fn is_valid(&self) -> bool {
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;
        non_negative(self.time) && self.cpu_times.values().copied().all(non_negative)
    }
}

/// Instantaneous memory reading. A gauge, so it is never delta'd.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryGauge {
    pub total: u64,
    pub available: u64,
}

impl MemoryGauge {
    pub fn used_fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.total.saturating_sub(self.available) as f64 / self.total as f64
    }
}

/// Rates derived from one sampling interval. Never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stats {
    /// Busy fraction of CPU time, scaled per second of interval.
    pub cpu: f64,
    /// Fraction of total memory in use.
    pub mem: f64,
    /// Bytes per second.
    pub disk_read: f64,
    pub disk_write: f64,
    pub net_sent: f64,
    pub net_recv: f64,
}
