use std::collections::BTreeMap;
use std::io;

use super::PlatformExtensions;

pub struct Platform;

impl PlatformExtensions for Platform {
    const GUEST_TIME_IN_USER: bool = false;

    #[allow(deprecated)]
    fn cpu_times() -> io::Result<BTreeMap<String, f64>> {
        let mut info = libc::host_cpu_load_info {
            cpu_ticks: [0; libc::CPU_STATE_MAX as usize],
        };
        let mut count = libc::HOST_CPU_LOAD_INFO_COUNT;
        // SAFETY: `info` is a host_cpu_load_info and `count` holds its size in
        // integer_t units, as HOST_CPU_LOAD_INFO requires.
        let status = unsafe {
            libc::host_statistics64(
                libc::mach_host_self(),
                libc::HOST_CPU_LOAD_INFO,
                &mut info as *mut libc::host_cpu_load_info as libc::host_info64_t,
                &mut count,
            )
        };
        if status != libc::KERN_SUCCESS {
            return Err(io::Error::other(format!(
                "host_statistics64 failed with kern_return_t {status}"
            )));
        }

        // SAFETY: sysconf has no preconditions.
        let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
        let ticks_per_second = if ticks > 0 { ticks as f64 } else { 100.0 };
        let seconds = |state: libc::c_int| info.cpu_ticks[state as usize] as f64 / ticks_per_second;

        Ok(BTreeMap::from([
            ("user".to_string(), seconds(libc::CPU_STATE_USER)),
            ("nice".to_string(), seconds(libc::CPU_STATE_NICE)),
            ("system".to_string(), seconds(libc::CPU_STATE_SYSTEM)),
            ("idle".to_string(), seconds(libc::CPU_STATE_IDLE)),
        ]))
    }

    fn battery_percent() -> Option<f64> {
        // IOKit power sources are not wired up.
        None
    }
}
