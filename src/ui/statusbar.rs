use std::time::Duration;

use crate::config::Settings;
use crate::format::{UnitOverflow, human_readable_size, pad_start, percent};
use crate::probe::Latency;
use crate::system::snapshot::Stats;
use crate::ui::theme::{Band, style};

/// Display columns for a byte rate such as `" 12MB"`.
const BYTES_WIDTH: usize = 5;
/// Display columns for a percentage such as `" 42%"`.
const PERCENT_WIDTH: usize = 4;

/// Builds the status line: latency, network, disk, CPU, memory, battery,
/// separated by single spaces. Optional segments are left out entirely.
pub fn render(
    stats: &Stats,
    latency: Option<Latency>,
    battery: Option<f64>,
    settings: &Settings,
) -> Result<String, UnitOverflow> {
    let mut segments = Vec::with_capacity(7);

    if let Some(latency) = latency {
        segments.push(latency_segment(latency, settings.interval));
    }

    let bytes = |rate: f64| -> Result<String, UnitOverflow> {
        let size = human_readable_size(rate, settings.precision)?;
        Ok(pad_start(&format!("{size}B"), BYTES_WIDTH))
    };
    segments.push(format!(
        "[\u{21e1} {}, \u{21e3} {}]",
        bytes(stats.net_sent)?,
        bytes(stats.net_recv)?
    ));
    segments.push(format!(
        "[r {}, w {}]",
        bytes(stats.disk_read)?,
        bytes(stats.disk_write)?
    ));

    segments.push(gauge_segment('\u{3bb}', stats.cpu, settings));
    segments.push(gauge_segment('\u{3c4}', stats.mem, settings));

    if let Some(battery) = battery {
        segments.push("|".to_string());
        segments.push(style("italics", &format!("{battery:.0}%")));
    }

    Ok(segments.join(" "))
}

fn latency_segment(latency: Latency, interval: Duration) -> String {
    match latency {
        Latency::Reachable(rtt) => format!("SSH ~ {:.1}ms", rtt.as_secs_f64() * 1000.0),
        Latency::Unreachable => format!("SSH > {:.0}ms", interval.as_secs_f64() * 1000.0),
    }
}

/// A banded fraction such as ` λ 42% `.
fn gauge_segment(symbol: char, fraction: f64, settings: &Settings) -> String {
    let band = Band::classify(fraction, settings.lo, settings.hi);
    let text = format!(" {symbol}{} ", pad_start(&percent(fraction), PERCENT_WIDTH));
    settings.colours.paint(band, &text)
}
