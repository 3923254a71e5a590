use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::foundation::core::Rgb8;
use crate::foundation::error::{FamapError, FamapResult};
use crate::geocode::nominatim::{DEFAULT_NOMINATIM_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::geocode::throttle::DEFAULT_MIN_INTERVAL;
use crate::pin::palette::BorderPalette;

/// Run configuration.
///
/// Every field has a default, so an empty JSON object (or no file at all) is a valid config.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// Family dataset JSON.
    pub family: PathBuf,
    /// Persisted geocode cache.
    pub cache: PathBuf,
    /// Directory receiving `<stem>_pin.png` files.
    pub pins_dir: PathBuf,
    /// Output HTML page.
    pub out: PathBuf,
    /// External lookup settings.
    pub geocoder: GeocoderConfig,
    /// Ring colors merged over the built-in table.
    pub border_colors: BTreeMap<String, Rgb8>,
    /// Ring color for names missing from the table.
    pub border_fallback: Option<Rgb8>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            family: PathBuf::from("family.json"),
            cache: PathBuf::from("geocode_cache.json"),
            pins_dir: PathBuf::from("images/pins"),
            out: PathBuf::from("www/output_map.html"),
            geocoder: GeocoderConfig::default(),
            border_colors: BTreeMap::new(),
            border_fallback: None,
        }
    }
}

/// Settings for the Nominatim client and its pacing.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeocoderConfig {
    /// Base URL of the Nominatim instance.
    pub url: String,
    /// `User-Agent` sent with each request.
    pub user_agent: String,
    /// Minimum gap between lookups, milliseconds.
    pub min_interval_ms: u64,
    /// Per-request timeout, seconds.
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_NOMINATIM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            min_interval_ms: DEFAULT_MIN_INTERVAL.as_millis() as u64,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl GeocoderConfig {
    /// [`GeocoderConfig::min_interval_ms`] as a duration.
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    /// [`GeocoderConfig::timeout_secs`] as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl MapConfig {
    /// Parse a JSON config from `r`.
    pub fn from_reader<R: std::io::Read>(r: R) -> FamapResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| FamapError::serde(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> FamapResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| FamapError::io(path, e))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> FamapResult<()> {
        if self.geocoder.timeout_secs == 0 {
            return Err(FamapError::validation("geocoder.timeout_secs must be > 0"));
        }
        if self.geocoder.user_agent.trim().is_empty() {
            return Err(FamapError::validation(
                "geocoder.user_agent must be non-empty",
            ));
        }
        for (p, what) in [
            (&self.family, "family"),
            (&self.cache, "cache"),
            (&self.out, "out"),
        ] {
            if p.as_os_str().is_empty() {
                return Err(FamapError::validation(format!("{what} path must be non-empty")));
            }
        }
        Ok(())
    }

    /// Built-in ring colors with this config's overrides applied.
    pub fn palette(&self) -> BorderPalette {
        let mut palette = BorderPalette::default();
        for (name, color) in &self.border_colors {
            palette.insert(name.clone(), *color);
        }
        if let Some(fallback) = self.border_fallback {
            palette.set_fallback(fallback);
        }
        palette
    }
}
