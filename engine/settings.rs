use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use thiserror::Error;

use crate::domain::RangePolicy;

/// User-adjustable presentation and input-handling settings.
///
/// Read from an optional TOML file; every key may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub range_policy: RangePolicy,
    /// Decimal places used when printing probabilities.
    pub decimals: usize,
    pub draw_charts: bool,
    /// Width in characters of the chart bars.
    pub chart_width: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            range_policy: RangePolicy::Clamp,
            decimals: 1,
            draw_charts: true,
            chart_width: 50,
        }
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read or write settings file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML settings file: {0}")]
    TomlParseError(#[from] toml::de::Error),
    #[error("Failed to serialize settings to TOML format: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
    #[error("chart_width must be at least {minimum}, got {found}.")]
    ChartTooNarrow { found: usize, minimum: usize },
}

/// Narrowest chart that still shows both band boundaries as distinct columns.
pub const MINIMUM_CHART_WIDTH: usize = 10;

impl Settings {
    pub fn load(path: &str) -> Result<Self, SettingsError> {
        let toml_string = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&toml_string)?;
        if settings.chart_width < MINIMUM_CHART_WIDTH {
            return Err(SettingsError::ChartTooNarrow {
                found: settings.chart_width,
                minimum: MINIMUM_CHART_WIDTH,
            });
        }
        log::info!("Loaded settings from '{path}': {settings:?}");
        Ok(settings)
    }

    pub fn save(&self, path: &str) -> Result<(), SettingsError> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut file = BufWriter::new(fs::File::create(path)?);
        file.write_all(toml_string.as_bytes())?;
        Ok(())
    }

    /// Loads `path` if given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
