use std::collections::BTreeMap;
use std::io;

use super::PlatformExtensions;

pub struct Platform;

#[cfg(target_os = "windows")]
use windows_sys::Win32::{
    Foundation::FILETIME,
    System::{
        Power::{GetSystemPowerStatus, SYSTEM_POWER_STATUS},
        Threading::GetSystemTimes,
    },
};

/// FILETIME ticks are 100ns.
const FILETIME_TICKS_PER_SECOND: f64 = 10_000_000.0;

/// `BatteryLifePercent` when the charge is unknown.
const UNKNOWN_BATTERY: u8 = 255;

#[cfg(target_os = "windows")]
fn filetime_seconds(time: FILETIME) -> f64 {
    let ticks = (u64::from(time.dwHighDateTime) << 32) | u64::from(time.dwLowDateTime);
    ticks as f64 / FILETIME_TICKS_PER_SECOND
}

impl PlatformExtensions for Platform {
    const GUEST_TIME_IN_USER: bool = false;

    fn cpu_times() -> io::Result<BTreeMap<String, f64>> {
        let zero = || FILETIME {
            dwLowDateTime: 0,
            dwHighDateTime: 0,
        };
        let (mut idle, mut kernel, mut user) = (zero(), zero(), zero());
        // SAFETY: all three pointers refer to live FILETIME values.
        let ok = unsafe { GetSystemTimes(&mut idle, &mut kernel, &mut user) };
        if ok == 0 {
            return Err(io::Error::last_os_error());
        }

        // Kernel time includes idle time.
        let idle = filetime_seconds(idle);
        let system = (filetime_seconds(kernel) - idle).max(0.0);
        Ok(BTreeMap::from([
            ("user".to_string(), filetime_seconds(user)),
            ("system".to_string(), system),
            ("idle".to_string(), idle),
        ]))
    }

    fn battery_percent() -> Option<f64> {
        // SAFETY: SYSTEM_POWER_STATUS is plain data and zero is a valid value.
        let mut status: SYSTEM_POWER_STATUS = unsafe { std::mem::zeroed() };
        // SAFETY: `status` is a valid out pointer.
        let ok = unsafe { GetSystemPowerStatus(&mut status) };
        if ok == 0 || status.BatteryLifePercent == UNKNOWN_BATTERY {
            None
        } else {
            Some(f64::from(status.BatteryLifePercent))
        }
    }
}
