use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use super::PlatformExtensions;

pub struct Platform;

/// Column order of the aggregate `cpu` line in `/proc/stat`.
const CPU_MODES: [&str; 10] = [
    "user",
    "nice",
    "system",
    "idle",
    "iowait",
    "irq",
    "softirq",
    "steal",
    "guest",
    "guest_nice",
];

const POWER_SUPPLY: &str = "/sys/class/power_supply";

impl PlatformExtensions for Platform {
    const GUEST_TIME_IN_USER: bool = true;

    fn cpu_times() -> io::Result<BTreeMap<String, f64>> {
        let contents = fs::read_to_string("/proc/stat")?;
        let line = contents
            .lines()
            .find(|line| line.split_whitespace().next() == Some("cpu"))
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "no cpu line in /proc/stat"))?;
        parse_cpu_line(line, clock_ticks_per_second())
    }

    fn battery_percent() -> Option<f64> {
        // Laptops expose one or more supplies; AC adapters report type "Mains".
        let mut entries: Vec<_> = fs::read_dir(POWER_SUPPLY)
            .ok()?
            .flatten()
            .map(|entry| entry.path())
            .collect();
        entries.sort();
        entries.iter().find_map(|supply| battery_capacity(supply))
    }
}

fn battery_capacity(supply: &Path) -> Option<f64> {
    let kind = fs::read_to_string(supply.join("type")).ok()?;
    if kind.trim() != "Battery" {
        return None;
    }
    fs::read_to_string(supply.join("capacity"))
        .ok()?
        .trim()
        .parse()
        .ok()
}

fn clock_ticks_per_second() -> f64 {
    // SAFETY: sysconf has no preconditions.
    let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if ticks > 0 { ticks as f64 } else { 100.0 }
}

/// Parses `cpu  10132153 290696 ...` into seconds per mode. Older kernels
/// report fewer columns; missing trailing modes are simply absent.
fn parse_cpu_line(line: &str, ticks_per_second: f64) -> io::Result<BTreeMap<String, f64>> {
    let mut fields = line.split_whitespace();
    if fields.next() != Some("cpu") {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("not an aggregate cpu line: {line:?}"),
        ));
    }

    let mut times = BTreeMap::new();
    for (mode, field) in CPU_MODES.iter().zip(fields) {
        let ticks: u64 = field.parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("bad {mode} time {field:?}: {e}"),
            )
        })?;
        times.insert((*mode).to_string(), ticks as f64 / ticks_per_second);
    }

    if !times.contains_key("idle") {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("cpu line is missing the idle column: {line:?}"),
        ));
    }
    Ok(times)
}
