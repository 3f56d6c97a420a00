use std::collections::BTreeMap;
use std::io;

pub trait PlatformExtensions {
    /// Whether guest time is already counted inside `user`/`nice`.
    const GUEST_TIME_IN_USER: bool;

    /// Cumulative seconds per CPU mode, aggregated over all cores.
    fn cpu_times() -> io::Result<BTreeMap<String, f64>>;
    fn battery_percent() -> Option<f64>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
mod unsupported;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
use unsupported as platform_impl;
#[cfg(target_os = "windows")]
use windows as platform_impl;

pub const GUEST_TIME_IN_USER: bool =
    <platform_impl::Platform as PlatformExtensions>::GUEST_TIME_IN_USER;

pub fn cpu_times() -> io::Result<BTreeMap<String, f64>> {
    platform_impl::Platform::cpu_times()
}

pub fn battery_percent() -> Option<f64> {
    platform_impl::Platform::battery_percent()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrappers_do_not_panic() {
        let _ = cpu_times();
        let _ = battery_percent();
    }

    #[test]
    fn cpu_times_are_non_negative_when_available() {
        if let Ok(times) = cpu_times() {
            assert!(!times.is_empty());
            assert!(times.values().all(|v| v.is_finite() && *v >= 0.0));
        }
    }
}
