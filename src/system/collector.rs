use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use sysinfo::{Disks, MemoryRefreshKind, Networks, RefreshKind, System};

use super::platform;
use super::snapshot::{MemoryGauge, Snapshot};

/// Reads instantaneous OS counters.
pub trait CounterSource {
    /// Captures cumulative counters, stamped with `time`.
    fn snapshot(&mut self, time: f64) -> Result<Snapshot>;
    fn memory(&mut self) -> Result<MemoryGauge>;
    fn battery(&mut self) -> Option<f64>;
}

pub struct Collector {
    sys: System,
    disks: Disks,
    networks: Networks,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    pub fn new() -> Self {
        let sys = System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::nothing().with_ram()),
        );
        Collector {
            sys,
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
        }
    }

    fn disk_totals(&self) -> (u64, u64) {
        self.disks
            .list()
            .iter()
            .map(|disk| disk.usage())
            .fold((0u64, 0u64), |(read, written), usage| {
                (
                    read.saturating_add(usage.total_read_bytes),
                    written.saturating_add(usage.total_written_bytes),
                )
            })
    }

    fn network_totals(&self) -> (u64, u64) {
        self.networks
            .list()
            .iter()
            .fold((0u64, 0u64), |(sent, recv), (_name, data)| {
                (
                    sent.saturating_add(data.total_transmitted()),
                    recv.saturating_add(data.total_received()),
                )
            })
    }
}

impl CounterSource for Collector {
    fn snapshot(&mut self, time: f64) -> Result<Snapshot> {
        #[cfg(feature = "tracing")]
        let _snapshot_span = tracing::debug_span!("collector.snapshot").entered();

        let cpu_times = platform::cpu_times().wrap_err("failed to read cpu times")?;

        self.disks.refresh(true);
        self.networks.refresh(true);
        let (disk_read, disk_write) = self.disk_totals();
        let (net_sent, net_recv) = self.network_totals();

        Ok(Snapshot {
            time,
            cpu_times,
            disk_read,
            disk_write,
            net_sent,
            net_recv,
        })
    }

    fn memory(&mut self) -> Result<MemoryGauge> {
        self.sys.refresh_memory();
        Ok(MemoryGauge {
            total: self.sys.total_memory(),
            available: self.sys.available_memory(),
        })
    }

    fn battery(&mut self) -> Option<f64> {
        platform::battery_percent()
    }
}
