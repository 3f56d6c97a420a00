use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use serde::Deserialize;

use crate::ui::theme::Colours;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub thresholds: ThresholdsConfig,
    pub colours: ColoursConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub interval_secs: f64,
    pub precision: usize,
    pub probe: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            interval_secs: 1.0,
            precision: 0,
            probe: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ThresholdsConfig {
    pub lo: f64,
    pub hi: f64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        ThresholdsConfig { lo: 0.5, hi: 0.8 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ColoursConfig {
    pub lo: String,
    pub md: String,
    pub hi: String,
    pub tr: String,
}

impl Default for ColoursConfig {
    fn default() -> Self {
        ColoursConfig {
            lo: "green".to_string(),
            md: "yellow".to_string(),
            hi: "red".to_string(),
            tr: "#[bg=default]".to_string(),
        }
    }
}

/// Values given on the command line or through the environment. Anything
/// set here wins over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub lo: Option<f64>,
    pub hi: Option<f64>,
    pub interval_secs: Option<f64>,
    pub precision: Option<usize>,
    pub colour_lo: Option<String>,
    pub colour_md: Option<String>,
    pub colour_hi: Option<String>,
    pub colour_tr: Option<String>,
    pub no_probe: bool,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub lo: f64,
    pub hi: f64,
    pub interval: Duration,
    pub precision: usize,
    pub probe: bool,
    pub colours: Colours,
}

impl Settings {
    pub fn resolve(config: Config, overrides: Overrides) -> Result<Self> {
        let Config {
            general,
            thresholds,
            mut colours,
        } = config;

        let lo = overrides.lo.unwrap_or(thresholds.lo);
        let hi = overrides.hi.unwrap_or(thresholds.hi);
        if !lo.is_finite() || !hi.is_finite() {
            return Err(eyre!("thresholds must be finite (lo={lo}, hi={hi})"));
        }
        if lo > hi {
            return Err(eyre!("--lo ({lo}) must not exceed --hi ({hi})"));
        }

        let interval_secs = overrides.interval_secs.unwrap_or(general.interval_secs);
        if interval_secs.is_nan() || interval_secs <= 0.0 {
            return Err(eyre!("--interval must be greater than 0, got {interval_secs}"));
        }
        let interval = Duration::try_from_secs_f64(interval_secs)
            .wrap_err_with(|| format!("--interval {interval_secs} is out of range"))?;

        if let Some(lo) = overrides.colour_lo {
            colours.lo = lo;
        }
        if let Some(md) = overrides.colour_md {
            colours.md = md;
        }
        if let Some(hi) = overrides.colour_hi {
            colours.hi = hi;
        }
        if let Some(tr) = overrides.colour_tr {
            colours.tr = tr;
        }

        Ok(Settings {
            lo,
            hi,
            interval,
            precision: overrides.precision.unwrap_or(general.precision),
            probe: general.probe && !overrides.no_probe,
            colours: Colours::from_config(&colours),
        })
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tmux-status-line").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert!((config.general.interval_secs - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.general.precision, 0);
        assert!(config.general.probe);
        assert!((config.thresholds.lo - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.colours.hi, "red");
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[thresholds]
hi = 0.9
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!((config.thresholds.hi - 0.9).abs() < f64::EPSILON);
        // Other fields should be defaults
        assert!((config.thresholds.lo - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.colours.lo, "green");
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r##"
[general]
interval_secs = 2.5
precision = 1
probe = false

[thresholds]
lo = 0.3
hi = 0.6

[colours]
lo = "colour22"
md = "colour136"
hi = "colour124"
tr = "#[default]"
"##;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!((config.general.interval_secs - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.general.precision, 1);
        assert!(!config.general.probe);
        assert!((config.thresholds.lo - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.colours.md, "colour136");
        assert_eq!(config.colours.tr, "#[default]");
    }

    #[test]
    fn missing_file_returns_default() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.toml"));
        assert_eq!(config.colours.md, "yellow");
    }

    #[test]
    fn invalid_toml_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is not valid toml {{{{").unwrap();
        let config = load_config_from_path(&path);
        assert!((config.general.interval_secs - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn overrides_win_over_file() {
        let overrides = Overrides {
            lo: Some(0.4),
            interval_secs: Some(3.0),
            colour_hi: Some("magenta".to_string()),
            no_probe: true,
            ..Overrides::default()
        };
        let settings = Settings::resolve(Config::default(), overrides).unwrap();
        assert!((settings.lo - 0.4).abs() < f64::EPSILON);
        assert!((settings.hi - 0.8).abs() < f64::EPSILON);
        assert_eq!(settings.interval, Duration::from_secs(3));
        assert_eq!(settings.colours.hi, "magenta");
        assert_eq!(settings.colours.lo, "green");
        assert!(!settings.probe);
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let overrides = Overrides {
            lo: Some(0.9),
            hi: Some(0.1),
            ..Overrides::default()
        };
        assert!(Settings::resolve(Config::default(), overrides).is_err());
    }

    #[test]
    fn non_positive_interval_is_rejected() {
        for interval in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let overrides = Overrides {
                interval_secs: Some(interval),
                ..Overrides::default()
            };
            assert!(
                Settings::resolve(Config::default(), overrides).is_err(),
                "interval {interval} accepted"
            );
        }
    }

    #[test]
    fn fractional_interval_is_kept() {
        let overrides = Overrides {
            interval_secs: Some(0.25),
            ..Overrides::default()
        };
        let settings = Settings::resolve(Config::default(), overrides).unwrap();
        assert_eq!(settings.interval, Duration::from_millis(250));
    }
}
