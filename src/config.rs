use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::catalog::{Thresholds, DEFAULT_CATALOG_URL};
use crate::predict::{GroundStation, Hemisphere};

pub const DEFAULT_WINDOW_HOURS: u64 = 24;
pub const MAX_WINDOW_HOURS: u64 = 720;
pub const DEFAULT_MIN_ELEVATION: f64 = 0.0;
pub const CATALOG_FILE_NAME: &str = "weather.txt";
const APP_DIR: &str = "satpasses";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config {} is invalid: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid window '{0}': {1}")]
    Window(String, String),
    #[error("the window must be longer than zero and at most 720 hours")]
    WindowRange,
    #[error("you must give your latitude (--lat) to get any pass information")]
    MissingLatitude,
    #[error("you must give your longitude (--lon) to get any pass information")]
    MissingLongitude,
    #[error("invalid latitude {0}: valid values are between -90 and 90")]
    Latitude(f64),
    #[error("invalid longitude {0}: valid values are between -180 and 180")]
    Longitude(f64),
    #[error("give at least one satellite name (see `satpasses list` for the catalog)")]
    NoSatellites,
    #[error("match ratio {match_ratio} must exceed suggestion ratio {suggest_ratio}, both within 0..=1")]
    Thresholds { match_ratio: f64, suggest_ratio: f64 },
}

/// Contents of the YAML config file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude_m: Option<f64>,
    /// Humantime duration (`36h`, `2days`) or plain hours.
    pub window: Option<String>,
    pub min_elevation: Option<f64>,
    pub hemisphere: Option<Hemisphere>,
    #[serde(default)]
    pub satellites: Vec<String>,
    pub catalog_path: Option<PathBuf>,
    pub catalog_url: Option<String>,
    pub match_ratio: Option<f64>,
    pub suggest_ratio: Option<f64>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Load `path` if given, else the default location when it exists.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => {
                    log::debug!("using config {}", path.display());
                    Self::from_file(&path)
                }
                None => Ok(Self::default()),
            },
        }
    }
}

/// Values given on the command line; they win over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude_m: Option<f64>,
    pub window: Option<Duration>,
    pub min_elevation: Option<f64>,
    pub hemisphere: Option<Hemisphere>,
    pub satellites: Vec<String>,
    pub catalog_path: Option<PathBuf>,
}

/// Effective settings after merging command line, config file and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude_m: f64,
    pub window: Duration,
    pub min_elevation: f64,
    pub hemisphere: Option<Hemisphere>,
    pub satellites: Vec<String>,
    pub catalog_path: PathBuf,
    pub catalog_url: String,
    pub thresholds: Thresholds,
}

impl Settings {
    pub fn resolve(cli: Overrides, file: FileConfig) -> Result<Self, ConfigError> {
        let file_window = file
            .window
            .as_deref()
            .map(|w| parse_window(w).map_err(|e| ConfigError::Window(w.to_string(), e)))
            .transpose()?;
        let window = cli
            .window
            .or(file_window)
            .unwrap_or(Duration::from_secs(DEFAULT_WINDOW_HOURS * 3600));
        if window.is_zero() || window > Duration::from_secs(MAX_WINDOW_HOURS * 3600) {
            return Err(ConfigError::WindowRange);
        }

        let defaults = Thresholds::default();
        let thresholds = Thresholds {
            match_ratio: file.match_ratio.unwrap_or(defaults.match_ratio),
            suggest_ratio: file.suggest_ratio.unwrap_or(defaults.suggest_ratio),
        };
        if !(0.0..=1.0).contains(&thresholds.suggest_ratio)
            || !(0.0..=1.0).contains(&thresholds.match_ratio)
            || thresholds.suggest_ratio >= thresholds.match_ratio
        {
            return Err(ConfigError::Thresholds {
                match_ratio: thresholds.match_ratio,
                suggest_ratio: thresholds.suggest_ratio,
            });
        }

        let satellites = if cli.satellites.is_empty() {
            file.satellites
        } else {
            cli.satellites
        };

        Ok(Self {
            latitude: cli.latitude.or(file.latitude),
            longitude: cli.longitude.or(file.longitude),
            altitude_m: cli.altitude_m.or(file.altitude_m).unwrap_or(0.0),
            window,
            min_elevation: cli
                .min_elevation
                .or(file.min_elevation)
                .unwrap_or(DEFAULT_MIN_ELEVATION),
            hemisphere: cli.hemisphere.or(file.hemisphere),
            satellites,
            catalog_path: cli
                .catalog_path
                .or(file.catalog_path)
                .unwrap_or_else(default_catalog_path),
            catalog_url: file
                .catalog_url
                .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string()),
            thresholds,
        })
    }

    /// Ground station from the merged settings, with the usual sanity checks.
    pub fn station(&self) -> Result<GroundStation, ConfigError> {
        let lat = self.latitude.ok_or(ConfigError::MissingLatitude)?;
        let lon = self.longitude.ok_or(ConfigError::MissingLongitude)?;
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ConfigError::Latitude(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(ConfigError::Longitude(lon));
        }
        if !(-500.0 < self.altitude_m && self.altitude_m < 9000.0) {
            log::warn!(
                "altitude {} m looks wrong, it should be in meters above sea level",
                self.altitude_m
            );
        }
        Ok(GroundStation::new(lat, lon, self.altitude_m))
    }

    pub fn satellites(&self) -> Result<&[String], ConfigError> {
        if self.satellites.is_empty() {
            return Err(ConfigError::NoSatellites);
        }
        Ok(&self.satellites)
    }
}

/// `24h`, `1day 12h` or a bare number of hours.
pub fn parse_window(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if let Ok(hours) = s.parse::<u64>() {
        return hours
            .checked_mul(3600)
            .map(Duration::from_secs)
            .ok_or_else(|| format!("{hours} hours is too large"));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.yaml"))
}

pub fn default_catalog_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CATALOG_FILE_NAME)
}
