//! Bridges a rate measurement across short-lived invocations.
//!
//! The previous run's snapshot serves as the older half of the pair whenever
//! it exists; otherwise a fresh reading is taken and the sampler waits out one
//! interval before taking the newer one.

use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use color_eyre::Result;

use crate::state::store::SnapshotStore;
use crate::system::collector::CounterSource;
use crate::system::snapshot::{MemoryGauge, Snapshot};

pub trait Clock {
    /// Wall-clock time, seconds since the Unix epoch.
    fn now(&self) -> f64;
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        tokio::time::sleep(duration)
    }
}

/// Everything one invocation needs from the OS.
#[derive(Debug, Clone)]
pub struct Sample {
    pub older: Snapshot,
    pub newer: Snapshot,
    pub memory: MemoryGauge,
    pub battery: Option<f64>,
}

pub struct Sampler<'a, S, C> {
    source: S,
    clock: C,
    store: &'a SnapshotStore,
    interval: Duration,
}

impl<'a, S: CounterSource, C: Clock> Sampler<'a, S, C> {
    pub fn new(source: S, clock: C, store: &'a SnapshotStore, interval: Duration) -> Self {
        Sampler {
            source,
            clock,
            store,
            interval,
        }
    }

    /// Produces an `(older, newer)` pair roughly one interval apart and
    /// persists `newer` as the next invocation's baseline.
    ///
    /// Fails if the new baseline cannot be saved: a line computed from state
    /// the next run will not see would misreport freshness.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "sampler.sample", level = "debug", skip_all)
    )]
    pub async fn sample(&mut self) -> Result<Sample> {
        let older = match self.store.load() {
            Some(snapshot) => snapshot,
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!("cold start, taking a fresh baseline");
                let now = self.clock.now();
                self.source.snapshot(now)?
            }
        };
        let battery = self.source.battery();

        let wait = remaining_wait(self.interval, self.clock.now() - older.time);
        if !wait.is_zero() {
            self.clock.sleep(wait).await;
        }

        let now = self.clock.now();
        let newer = self.source.snapshot(now)?;
        let memory = self.source.memory()?;
        self.store.save(&newer)?;

        Ok(Sample {
            older,
            newer,
            memory,
            battery,
        })
    }
}

/// Time left until `older` is one interval old. Never negative, and never
/// more than one interval even if `older` claims to be from the future.
pub fn remaining_wait(interval: Duration, elapsed_secs: f64) -> Duration {
    let interval_secs = interval.as_secs_f64();
    let wait = (interval_secs - elapsed_secs).clamp(0.0, interval_secs);
    Duration::try_from_secs_f64(wait).unwrap_or(Duration::ZERO)
}
