use std::collections::BTreeMap;
use std::io;

use super::PlatformExtensions;

pub struct Platform;

impl PlatformExtensions for Platform {
    const GUEST_TIME_IN_USER: bool = false;

    fn cpu_times() -> io::Result<BTreeMap<String, f64>> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "per-mode cpu times are not available on this platform",
        ))
    }

    fn battery_percent() -> Option<f64> {
        None
    }
}
