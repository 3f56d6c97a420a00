//! Converts a pair of snapshots into per-second rates.

use std::collections::BTreeMap;

use crate::system::platform;
use crate::system::snapshot::{MemoryGauge, Snapshot, Stats};

/// How the platform books virtualization guest time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CpuAccounting {
    /// `guest`/`guest_nice` are also counted inside `user`/`nice` (Linux).
    GuestInUser,
    Separate,
}

impl CpuAccounting {
    pub fn native() -> Self {
        if platform::GUEST_TIME_IN_USER {
            CpuAccounting::GuestInUser
        } else {
            CpuAccounting::Separate
        }
    }
}

pub fn measure(older: &Snapshot, newer: &Snapshot, memory: MemoryGauge) -> Stats {
    measure_with(older, newer, memory, CpuAccounting::native())
}

pub fn measure_with(
    older: &Snapshot,
    newer: &Snapshot,
    memory: MemoryGauge,
    accounting: CpuAccounting,
) -> Stats {
    let time_adjust = time_adjust(newer.time - older.time);
    let per_second = |old: u64, new: u64| counter_delta(old, new) as f64 * time_adjust;

    let cpu_delta = cpu_deltas(&older.cpu_times, &newer.cpu_times);

    Stats {
        cpu: busy_fraction(&cpu_delta, accounting) * time_adjust,
        mem: memory.used_fraction(),
        disk_read: per_second(older.disk_read, newer.disk_read),
        disk_write: per_second(older.disk_write, newer.disk_write),
        net_sent: per_second(older.net_sent, newer.net_sent),
        net_recv: per_second(older.net_recv, newer.net_recv),
    }
}

/// `1 / elapsed`, or zero when no time has passed.
fn time_adjust(elapsed: f64) -> f64 {
    if elapsed > 0.0 && elapsed.is_finite() {
        1.0 / elapsed
    } else {
        0.0
    }
}

/// A counter that went backwards was reset or wrapped; report no change.
pub fn counter_delta(old: u64, new: u64) -> u64 {
    new.saturating_sub(old)
}

/// Per-mode deltas for the modes present in both readings.
pub fn cpu_deltas<'a>(
    older: &BTreeMap<String, f64>,
    newer: &'a BTreeMap<String, f64>,
) -> BTreeMap<&'a str, f64> {
    newer
        .iter()
        .filter_map(|(mode, new)| {
            let old = older.get(mode)?;
            Some((mode.as_str(), (new - old).max(0.0)))
        })
        .collect()
}

/// Fraction of the interval's CPU time spent outside `idle` and `iowait`.
pub fn busy_fraction(delta: &BTreeMap<&str, f64>, accounting: CpuAccounting) -> f64 {
    let mode = |name: &str| delta.get(name).copied().unwrap_or(0.0);

    let mut total: f64 = delta.values().sum();
    if accounting == CpuAccounting::GuestInUser {
        total -= mode("guest") + mode("guest_nice");
    }
    let busy = (total - mode("idle") - mode("iowait")).max(0.0);

    if total > 0.0 { busy / total } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(time: f64, cpu: &[(&str, f64)], disk: (u64, u64), net: (u64, u64)) -> Snapshot {
        Snapshot {
            time,
            cpu_times: cpu.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            disk_read: disk.0,
            disk_write: disk.1,
            net_sent: net.0,
            net_recv: net.1,
        }
    }

    const HALF_USED: MemoryGauge = MemoryGauge {
        total: 8_000,
        available: 4_000,
    };

    #[test]
    fn identical_snapshots_yield_zero_rates() {
        let s = snap(100.0, &[("user", 5.0), ("idle", 5.0)], (10, 20), (30, 40));
        let stats = measure(&s, &s, HALF_USED);
        assert_eq!(stats.cpu, 0.0);
        assert_eq!(stats.disk_read, 0.0);
        assert_eq!(stats.disk_write, 0.0);
        assert_eq!(stats.net_sent, 0.0);
        assert_eq!(stats.net_recv, 0.0);
    }

    #[test]
    fn byte_rates_are_per_second() {
        let older = snap(10.0, &[], (0, 0), (0, 0));
        let newer = snap(12.0, &[], (2_000_000, 500), (4_000, 1_000));
        let stats = measure(&older, &newer, HALF_USED);
        assert_eq!(stats.disk_read, 1_000_000.0);
        assert_eq!(stats.disk_write, 250.0);
        assert_eq!(stats.net_sent, 2_000.0);
        assert_eq!(stats.net_recv, 500.0);
    }

    #[test]
    fn counter_reset_reports_zero() {
        let older = snap(10.0, &[("user", 50.0), ("idle", 50.0)], (5_000, 5_000), (9, 9));
        let newer = snap(11.0, &[("user", 1.0), ("idle", 1.0)], (100, 6_000), (0, 10));
        let stats = measure(&older, &newer, HALF_USED);
        assert_eq!(stats.disk_read, 0.0);
        assert_eq!(stats.disk_write, 1_000.0);
        assert_eq!(stats.net_sent, 0.0);
        assert_eq!(stats.net_recv, 1.0);
        assert_eq!(stats.cpu, 0.0);
    }

    #[test]
    fn clock_stepping_backwards_reports_zero() {
        let older = snap(20.0, &[("user", 0.0)], (0, 0), (0, 0));
        let newer = snap(19.0, &[("user", 1.0)], (100, 100), (100, 100));
        let stats = measure(&older, &newer, HALF_USED);
        assert_eq!(stats.cpu, 0.0);
        assert_eq!(stats.disk_read, 0.0);
    }

    #[test]
    fn cpu_busy_excludes_idle_and_iowait() {
        let older = snap(0.0, &[("user", 0.0), ("system", 0.0), ("idle", 0.0), ("iowait", 0.0)], (0, 0), (0, 0));
        let newer = snap(1.0, &[("user", 2.0), ("system", 1.0), ("idle", 4.0), ("iowait", 1.0)], (0, 0), (0, 0));
        let stats = measure_with(&older, &newer, HALF_USED, CpuAccounting::Separate);
        assert!((stats.cpu - 3.0 / 8.0).abs() < 1e-12);
    }

    #[test]
    fn cpu_fraction_scales_with_interval() {
        let older = snap(0.0, &[("user", 0.0), ("idle", 0.0)], (0, 0), (0, 0));
        let newer = snap(2.0, &[("user", 1.0), ("idle", 1.0)], (0, 0), (0, 0));
        let stats = measure_with(&older, &newer, HALF_USED, CpuAccounting::Separate);
        assert!((stats.cpu - 0.25).abs() < 1e-12);
    }

    #[test]
    fn guest_time_is_not_double_counted() {
        let delta = BTreeMap::from([
            ("user", 4.0),
            ("guest", 2.0),
            ("guest_nice", 1.0),
            ("idle", 4.0),
        ]);
        let linux = busy_fraction(&delta, CpuAccounting::GuestInUser);
        assert!((linux - 0.5).abs() < 1e-12);

        let other = busy_fraction(&delta, CpuAccounting::Separate);
        assert!((other - 7.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn missing_idle_counts_as_zero() {
        let delta = BTreeMap::from([("user", 1.0), ("system", 1.0)]);
        assert_eq!(busy_fraction(&delta, CpuAccounting::Separate), 1.0);
    }

    #[test]
    fn zero_total_cpu_is_zero() {
        let delta = BTreeMap::from([("user", 0.0), ("idle", 0.0)]);
        assert_eq!(busy_fraction(&delta, CpuAccounting::GuestInUser), 0.0);
        assert_eq!(busy_fraction(&BTreeMap::new(), CpuAccounting::Separate), 0.0);
    }

    #[test]
    fn modes_missing_from_either_side_are_ignored() {
        let older = BTreeMap::from([("user".to_string(), 1.0), ("steal".to_string(), 3.0)]);
        let newer = BTreeMap::from([("user".to_string(), 2.0), ("idle".to_string(), 9.0)]);
        let delta = cpu_deltas(&older, &newer);
        assert_eq!(delta, BTreeMap::from([("user", 1.0)]));
    }

    #[test]
    fn memory_is_a_gauge_not_a_rate() {
        let older = snap(0.0, &[], (0, 0), (0, 0));
        let newer = snap(4.0, &[], (0, 0), (0, 0));
        let stats = measure(&older, &newer, HALF_USED);
        assert_eq!(stats.mem, 0.5);
        let same = measure(&older, &older, HALF_USED);
        assert_eq!(same.mem, 0.5);
    }
}
