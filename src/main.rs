use std::io::{Write, stdout};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::{Report, WrapErr};
use tmux_status_line::config::{Overrides, Settings, load_config, load_config_from_path};
use tmux_status_line::probe::{self, PingProber};
use tmux_status_line::rates;
use tmux_status_line::sampler::{Sampler, SystemClock};
use tmux_status_line::state::session::SessionId;
use tmux_status_line::state::store::SnapshotStore;
use tmux_status_line::system::collector::Collector;
use tmux_status_line::ui::statusbar;

#[derive(Parser)]
#[command(
    name = "tmux-status-line",
    about = "CPU, memory, disk and network rates for the tmux status bar"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fraction at which a gauge turns to the medium colour
    #[arg(long, env = "TMUX_STATUS_LINE_LO")]
    lo: Option<f64>,

    /// Fraction at which a gauge turns to the high colour
    #[arg(long, env = "TMUX_STATUS_LINE_HI")]
    hi: Option<f64>,

    /// Sampling interval in seconds
    #[arg(long, env = "TMUX_STATUS_LINE_INTERVAL")]
    interval: Option<f64>,

    /// Fractional digits kept in byte rates
    #[arg(long)]
    precision: Option<usize>,

    /// tmux colour for the low band
    #[arg(long, env = "TMUX_STATUS_LINE_COLOUR_LO")]
    colour_lo: Option<String>,

    /// tmux colour for the medium band
    #[arg(long, env = "TMUX_STATUS_LINE_COLOUR_MD")]
    colour_md: Option<String>,

    /// tmux colour for the high band
    #[arg(long, env = "TMUX_STATUS_LINE_COLOUR_HI")]
    colour_hi: Option<String>,

    /// Style string that restores the bar after a coloured segment
    #[arg(long, env = "TMUX_STATUS_LINE_COLOUR_TR")]
    colour_tr: Option<String>,

    /// Skip the SSH latency segment.
    #[arg(long, default_value_t = false)]
    no_probe: bool,

    /// Write tracing output (JSON lines) to this file.
    #[arg(long)]
    trace_output: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            lo: self.lo,
            hi: self.hi,
            interval_secs: self.interval,
            precision: self.precision,
            colour_lo: self.colour_lo.clone(),
            colour_md: self.colour_md.clone(),
            colour_hi: self.colour_hi.clone(),
            colour_tr: self.colour_tr.clone(),
            no_probe: self.no_probe,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let (line, code) = match run(&cli).await {
        Ok(line) => (line, ExitCode::SUCCESS),
        Err(report) => (diagnostic(&report), ExitCode::FAILURE),
    };

    let mut out = stdout().lock();
    if write!(out, "{line}").and_then(|()| out.flush()).is_err() {
        return ExitCode::FAILURE;
    }
    code
}

async fn run(cli: &Cli) -> Result<String> {
    color_eyre::install()?;
    init_tracing(cli)?;

    let config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };
    let settings = Settings::resolve(config, cli.overrides())?;

    let tmux = std::env::var("TMUX").wrap_err("TMUX is not set; run this from tmux")?;
    let session = SessionId::from_tmux_env(&tmux)?;
    let store = SnapshotStore::for_session(&session);

    let target = if settings.probe {
        let ssh_client = std::env::var("SSH_CLIENT").ok();
        probe::resolve_target(&session.probe_target_path(), ssh_client.as_deref())
    } else {
        None
    };

    let mut sampler = Sampler::new(Collector::new(), SystemClock, &store, settings.interval);
    let (latency, sample) = tokio::join!(
        probe::measure_latency(&PingProber, target.as_deref(), settings.interval),
        sampler.sample(),
    );
    let sample = sample?;

    let stats = rates::measure(&sample.older, &sample.newer, sample.memory);
    let line = statusbar::render(&stats, latency, sample.battery, &settings)?;
    Ok(line)
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.trace_output else {
        return Ok(());
    };

    #[cfg(not(feature = "tracing"))]
    {
        let _ = path;
        Err(color_eyre::eyre::eyre!(
            "--trace-output requires the `tracing` feature; build with `cargo build --features tracing`"
        ))
    }

    #[cfg(feature = "tracing")]
    {
        tmux_status_line::trace::init_tracing_json(path)
    }
}

/// One line, in place of the status line, so the failure shows up in the bar.
fn diagnostic(report: &Report) -> String {
    let chain: Vec<String> = report.chain().map(ToString::to_string).collect();
    format!("tmux-status-line: {}", chain.join(": "))
}
