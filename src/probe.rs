//! Optional link-latency probe for the SSH segment.

use std::fs;
use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Latency {
    Reachable(Duration),
    Unreachable,
}

/// Measures round-trip latency to a host.
pub trait LatencyProber {
    /// Resolves within roughly `timeout`; slower answers count as unreachable.
    fn probe(&self, target: &str, timeout: Duration) -> impl Future<Output = Latency>;
}

/// Sends a single ICMP echo through the system `ping`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PingProber;

impl PingProber {
    fn command(target: &str, timeout: Duration) -> Command {
        let deadline = timeout.as_secs_f64().round().max(1.0) as u64;
        let mut command = Command::new("ping");
        command
            .args(["-n", "-c", "1", "-w"])
            .arg(deadline.to_string())
            .args(["-q", "--", target])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        command
    }
}

impl LatencyProber for PingProber {
    async fn probe(&self, target: &str, timeout: Duration) -> Latency {
        let mut command = Self::command(target, timeout);
        let started = Instant::now();
        let Ok(mut child) = command.spawn() else {
            return Latency::Unreachable;
        };
        match tokio::time::timeout(timeout, child.wait()).await {
            Ok(Ok(status)) if status.success() => Latency::Reachable(started.elapsed()),
            _ => Latency::Unreachable,
        }
    }
}

/// Host to probe: the session's `.ip` file when present, else the client
/// address from `$SSH_CLIENT` (`"<ip> <port> <port>"`).
pub fn resolve_target(ip_file: &Path, ssh_client: Option<&str>) -> Option<String> {
    let from_file = fs::read_to_string(ip_file)
        .ok()
        .map(|contents| contents.trim().to_string())
        .filter(|ip| !ip.is_empty());
    from_file.or_else(|| {
        ssh_client
            .and_then(|client| client.split_whitespace().next())
            .map(str::to_string)
    })
}

/// Probes `target` if there is one.
pub async fn measure_latency<P: LatencyProber>(
    prober: &P,
    target: Option<&str>,
    timeout: Duration,
) -> Option<Latency> {
    match target {
        Some(target) => Some(prober.probe(target, timeout).await),
        None => None,
    }
}
