use crate::config::ColoursConfig;

/// Three-way classification of a fraction against the low/high thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Low,
    Medium,
    High,
}

impl Band {
    /// Half-open bands: `[.., lo)`, `[lo, hi)`, `[hi, ..]`.
    pub fn classify(value: f64, lo: f64, hi: f64) -> Self {
        if value < lo {
            Band::Low
        } else if value < hi {
            Band::Medium
        } else {
            Band::High
        }
    }
}

/// tmux colour tokens for each band, plus the token that restores the bar's
/// own style after a coloured segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Colours {
    pub lo: String,
    pub md: String,
    pub hi: String,
    pub tr: String,
}

impl Colours {
    pub fn from_config(colours: &ColoursConfig) -> Self {
        Self {
            lo: colours.lo.clone(),
            md: colours.md.clone(),
            hi: colours.hi.clone(),
            tr: colours.tr.clone(),
        }
    }

    pub fn for_band(&self, band: Band) -> &str {
        match band {
            Band::Low => &self.lo,
            Band::Medium => &self.md,
            Band::High => &self.hi,
        }
    }

    /// Wraps `text` in the band's background colour.
    pub fn paint(&self, band: Band, text: &str) -> String {
        format!("#[bg={}]{text}{}", self.for_band(band), self.tr)
    }
}

/// Wraps `text` in a tmux style and resets it afterwards.
pub fn style(style: &str, text: &str) -> String {
    format!("#[{style}]{text}#[none]")
}
