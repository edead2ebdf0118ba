use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::clock::Millis;
use crate::controller::Timings;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "scrolldeck";

/// Service location used when neither flag, environment nor config names one.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";
pub const ENDPOINT_ENV: &str = "SCROLLDECK_ENDPOINT";

/// Accepted range for `timing.*` values, from `config set` or the file.
const MIN_TIMING_MS: Millis = 1;
const MAX_TIMING_MS: Millis = 10_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the service exposing `/api/slides`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<TimingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    /// 1-indexed slide to open on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_slide: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimingConfig {
    /// How long scroll observations are ignored after a jump.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settle_ms: Option<Millis>,

    /// Quiet period before scroll position is evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<Millis>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `scrolldeck config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# scrolldeck configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Endpoint precedence: explicit flag, then `SCROLLDECK_ENDPOINT`, then
    /// the config file, then [`DEFAULT_ENDPOINT`].
    pub fn resolve_endpoint(&self, flag: Option<&str>) -> String {
        let env = std::env::var(ENDPOINT_ENV).ok();
        self.endpoint_with(flag, env.as_deref())
    }

    fn endpoint_with(&self, flag: Option<&str>, env: Option<&str>) -> String {
        flag.or(env.filter(|e| !e.is_empty()))
            .or(self.endpoint.as_deref())
            .unwrap_or(DEFAULT_ENDPOINT)
            .to_string()
    }

    pub fn timings(&self) -> Timings {
        let defaults = Timings::default();
        let timing = self.timing.as_ref();
        Timings {
            settle_ms: clamp_timing(
                "timing.settle_ms",
                timing.and_then(|t| t.settle_ms),
                defaults.settle_ms,
            ),
            debounce_ms: clamp_timing(
                "timing.debounce_ms",
                timing.and_then(|t| t.debounce_ms),
                defaults.debounce_ms,
            ),
        }
    }

    pub fn theme_name(&self) -> &str {
        self.defaults
            .as_ref()
            .and_then(|d| d.theme.as_deref())
            .unwrap_or("dark")
    }

    pub fn start_slide(&self) -> Option<usize> {
        self.defaults.as_ref().and_then(|d| d.start_slide)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "endpoint" => {
                if !crate::source::is_absolute_url(value) {
                    anyhow::bail!("Invalid endpoint: {value}. Must start with http:// or https://.");
                }
                self.endpoint = Some(value.trim_end_matches('/').to_string());
            }
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "defaults.start_slide" => {
                let slide = match value.parse::<usize>() {
                    Ok(n) if n >= 1 => n,
                    _ => anyhow::bail!(
                        "Invalid start_slide: {value}. Must be a slide number (1 or higher)."
                    ),
                };
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .start_slide = Some(slide);
            }
            "timing.settle_ms" => {
                let ms = parse_timing(key, value)?;
                self.timing
                    .get_or_insert_with(TimingConfig::default)
                    .settle_ms = Some(ms);
            }
            "timing.debounce_ms" => {
                let ms = parse_timing(key, value)?;
                self.timing
                    .get_or_insert_with(TimingConfig::default)
                    .debounce_ms = Some(ms);
            }
            _ => anyhow::bail!(
                "Unknown config key: {key}. Valid keys: endpoint, defaults.theme, defaults.start_slide, timing.settle_ms, timing.debounce_ms"
            ),
        }
        Ok(())
    }
}

fn parse_timing(key: &str, value: &str) -> Result<Millis> {
    match value.parse::<Millis>() {
        Ok(ms) if (MIN_TIMING_MS..=MAX_TIMING_MS).contains(&ms) => Ok(ms),
        _ => anyhow::bail!(
            "Invalid {key}: {value}. Must be a number of milliseconds from {MIN_TIMING_MS} to {MAX_TIMING_MS}."
        ),
    }
}

/// Hand-edited files bypass `parse_timing`; out-of-range values are pulled
/// back into range here.
fn clamp_timing(key: &str, value: Option<Millis>, default: Millis) -> Millis {
    let Some(ms) = value else {
        return default;
    };
    let clamped = ms.clamp(MIN_TIMING_MS, MAX_TIMING_MS);
    if clamped != ms {
        warn!(key, value = ms, clamped, "timing out of range in config file");
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::PresentationController;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.timings(), Timings::default());
        assert_eq!(config.theme_name(), "dark");
        assert_eq!(config.start_slide(), None);
        assert_eq!(config.endpoint_with(None, None), DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_endpoint_precedence() {
        let config = Config {
            endpoint: Some("http://config".to_string()),
            ..Config::default()
        };
        assert_eq!(config.endpoint_with(None, None), "http://config");
        assert_eq!(config.endpoint_with(None, Some("http://env")), "http://env");
        assert_eq!(config.endpoint_with(None, Some("")), "http://config");
        assert_eq!(
            config.endpoint_with(Some("http://flag"), Some("http://env")),
            "http://flag"
        );
    }

    #[test]
    fn test_set_valid_keys() {
        let mut config = Config::default();
        config.set("endpoint", "https://slides.example.com/").unwrap();
        config.set("defaults.theme", "light").unwrap();
        config.set("defaults.start_slide", "3").unwrap();
        config.set("timing.settle_ms", "1200").unwrap();
        config.set("timing.debounce_ms", "30").unwrap();

        assert_eq!(config.endpoint.as_deref(), Some("https://slides.example.com"));
        assert_eq!(config.theme_name(), "light");
        assert_eq!(config.start_slide(), Some(3));
        assert_eq!(
            config.timings(),
            Timings {
                settle_ms: 1200,
                debounce_ms: 30
            }
        );
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("endpoint", "localhost").is_err());
        assert!(config.set("defaults.theme", "neon").is_err());
        assert!(config.set("defaults.start_slide", "0").is_err());
        assert!(config.set("timing.settle_ms", "-5").is_err());
        assert!(config.set("timing.debounce_ms", "999999").is_err());
        assert!(config.set("timing.settle_ms", "0").is_err());
        let err = config.set("nope", "1").unwrap_err().to_string();
        assert!(err.contains("Valid keys"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(FILENAME);
        let mut config = Config::default();
        config.set("timing.settle_ms", "900").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.timings().settle_ms, 900);
        assert_eq!(loaded.timings().debounce_ms, 50);
        assert!(Config::load_from(&dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_out_of_range_file_timings_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILENAME);
        std::fs::write(
            &path,
            "timing:\n  settle_ms: 18446744073709551615\n  debounce_ms: 0\n",
        )
        .unwrap();
        let timings = Config::load_from(&path).unwrap().timings();
        assert_eq!(
            timings,
            Timings {
                settle_ms: MAX_TIMING_MS,
                debounce_ms: MIN_TIMING_MS
            }
        );

        // A clamped settle window still ends, so scrolling moves the deck again.
        let mut controller = PresentationController::new(10, timings);
        controller.set_viewport_height(100.0);
        controller.go_to(3, 0);
        controller.poll(MAX_TIMING_MS);
        assert!(!controller.is_programmatic_scroll());
        controller.on_scroll(800.0, 100.0, MAX_TIMING_MS + 1);
        controller.poll(MAX_TIMING_MS + 10);
        assert_eq!(controller.active_index(), Some(8));
    }

    #[test]
    fn test_partial_yaml() {
        let config: Config = serde_yaml::from_str("timing:\n  debounce_ms: 20\n").unwrap();
        assert_eq!(config.timings().debounce_ms, 20);
        assert_eq!(config.timings().settle_ms, 800);
    }
}
