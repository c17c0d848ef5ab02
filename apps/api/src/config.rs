use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::layout::FontFamily;

/// Minimum export rasterization scale (pixels per point).
pub const MIN_EXPORT_SCALE: f32 = 2.0;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Base URL of the remote resume-analysis service.
    pub analysis_service_url: String,
    pub analysis_timeout_secs: u64,
    pub export_scale: f32,
    pub export_font: FontFamily,
    /// Extra font files for the rasterizer, on top of system fonts.
    pub export_font_dir: Option<PathBuf>,
    pub export_jpeg_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            analysis_service_url: "http://127.0.0.1:5000".to_string(),
            analysis_timeout_secs: 60,
            export_scale: MIN_EXPORT_SCALE,
            export_font: FontFamily::ComputerModern,
            export_font_dir: None,
            export_jpeg_quality: 98,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let port = match lookup("PORT") {
            Some(v) => v.parse::<u16>().context("PORT must be a valid port number")?,
            None => defaults.port,
        };
        let analysis_timeout_secs = match lookup("ANALYSIS_TIMEOUT_SECS") {
            Some(v) => v
                .parse::<u64>()
                .context("ANALYSIS_TIMEOUT_SECS must be a whole number of seconds")?,
            None => defaults.analysis_timeout_secs,
        };
        let export_scale = match lookup("EXPORT_SCALE") {
            Some(v) => v.parse::<f32>().context("EXPORT_SCALE must be a number")?,
            None => defaults.export_scale,
        };
        if !(export_scale >= MIN_EXPORT_SCALE) {
            bail!("EXPORT_SCALE must be at least {MIN_EXPORT_SCALE}, got {export_scale}");
        }
        let export_font = match lookup("EXPORT_FONT") {
            Some(v) => v.parse::<FontFamily>().context("EXPORT_FONT is invalid")?,
            None => defaults.export_font,
        };
        let export_jpeg_quality = match lookup("EXPORT_JPEG_QUALITY") {
            Some(v) => v
                .parse::<u8>()
                .context("EXPORT_JPEG_QUALITY must be between 1 and 100")?,
            None => defaults.export_jpeg_quality,
        };
        if !(1..=100).contains(&export_jpeg_quality) {
            bail!("EXPORT_JPEG_QUALITY must be between 1 and 100, got {export_jpeg_quality}");
        }

        Ok(Config {
            port,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            analysis_service_url: lookup("ANALYSIS_SERVICE_URL")
                .unwrap_or(defaults.analysis_service_url),
            analysis_timeout_secs,
            export_scale,
            export_font,
            export_font_dir: lookup("EXPORT_FONT_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            export_jpeg_quality,
        })
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.export_scale, 2.0);
        assert_eq!(config.export_font, FontFamily::ComputerModern);
        assert!(config.export_font_dir.is_none());
        assert_eq!(config.analysis_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("EXPORT_SCALE", "3"),
            ("EXPORT_FONT", "inter"),
            ("EXPORT_FONT_DIR", "/usr/share/fonts/cm"),
            ("ANALYSIS_SERVICE_URL", "http://analysis:5000"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.export_scale, 3.0);
        assert_eq!(config.export_font, FontFamily::Inter);
        assert_eq!(
            config.export_font_dir,
            Some(PathBuf::from("/usr/share/fonts/cm"))
        );
        assert_eq!(config.analysis_service_url, "http://analysis:5000");
    }

    #[test]
    fn test_scale_below_minimum_rejected() {
        assert!(config_from(&[("EXPORT_SCALE", "1.5")]).is_err());
        assert!(config_from(&[("EXPORT_SCALE", "NaN")]).is_err());
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("EXPORT_FONT", "comic_sans")]).is_err());
        assert!(config_from(&[("EXPORT_JPEG_QUALITY", "0")]).is_err());
        assert!(config_from(&[("EXPORT_JPEG_QUALITY", "101")]).is_err());
    }
}
