use std::error::Error;
use std::fmt::{self, Display};

use unicode_width::UnicodeWidthStr;

/// Decimal unit ladder for byte magnitudes.
const UNITS: [&str; 9] = ["", "K", "M", "G", "T", "P", "E", "Z", "Y"];

/// A value too large for the largest unit. Realistic rates never get here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitOverflow(pub f64);

impl Display for UnitOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit overflow: {}", self.0)
    }
}

impl Error for UnitOverflow {}

/// Formats `size` with a base-1000 unit suffix, rounded to at most
/// `precision` fractional digits.
///
/// `human_readable_size(1000.0, 0)` is `"1K"` and
/// `human_readable_size(1_500_000.0, 1)` is `"1.5M"`.
pub fn human_readable_size(size: f64, precision: usize) -> Result<String, UnitOverflow> {
    let mut scaled = size;
    for unit in UNITS {
        let rounded = round_to(scaled, precision);
        // Unit is picked after rounding so 999.6 renders as 1K, not 1000.
        if rounded.abs() < 1000.0 {
            return Ok(format!("{}{unit}", trim_fraction(rounded, precision)));
        }
        scaled /= 1000.0;
    }
    Err(UnitOverflow(size))
}

fn round_to(value: f64, precision: usize) -> f64 {
    let factor = 10f64.powi(precision.min(15) as i32);
    let rounded = (value * factor).round() / factor;
    // Avoid printing "-0".
    if rounded == 0.0 { 0.0 } else { rounded }
}

fn trim_fraction(value: f64, precision: usize) -> String {
    let text = format!("{value:.precision$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// Right-aligns `s` to `width` terminal columns.
pub fn pad_start(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(s.width());
    format!("{}{s}", " ".repeat(pad))
}

/// `0.42` becomes `"42%"`.
pub fn percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}
