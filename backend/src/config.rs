//! Dashboard configuration file support.
//!
//! Settings are read from a TOML file. Every field has a default, so an empty
//! file (or no file at all) describes the standard dataset layout.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::ValueRange;
use crate::store::error::DashboardError;

/// Environment variable pointing at an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "DASHBOARD_CONFIG";

/// Complete dashboard configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub charts: ChartsConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Input file locations and layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub directory: PathBuf,
    #[serde(default)]
    pub usage: UsageTableConfig,
    #[serde(default)]
    pub ages: AgeTableConfig,
    #[serde(default = "default_search_index")]
    pub search_index: SeriesTableConfig,
    #[serde(default)]
    pub forecast: ForecastTableConfig,
    #[serde(default = "default_gas_price")]
    pub gas_price: SeriesTableConfig,
    /// Notebook offered on the download action.
    #[serde(default = "default_notebook")]
    pub notebook: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_notebook() -> PathBuf {
    PathBuf::from("solar_analysis.ipynb")
}

fn default_search_index() -> SeriesTableConfig {
    SeriesTableConfig {
        file: PathBuf::from("search_index.csv"),
        separator: ',',
        decimal_comma: false,
        date_column: "date".to_string(),
        value_column: "value".to_string(),
    }
}

fn default_gas_price() -> SeriesTableConfig {
    SeriesTableConfig {
        file: PathBuf::from("gas_price.csv"),
        separator: ',',
        decimal_comma: false,
        date_column: "date".to_string(),
        value_column: "price".to_string(),
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            directory: default_data_dir(),
            usage: UsageTableConfig::default(),
            ages: AgeTableConfig::default(),
            search_index: default_search_index(),
            forecast: ForecastTableConfig::default(),
            gas_price: default_gas_price(),
            notebook: default_notebook(),
        }
    }
}

impl DataConfig {
    /// Resolve a configured file name against the data directory.
    /// Absolute paths are returned unchanged.
    pub fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.directory.join(file)
        }
    }

    pub fn notebook_path(&self) -> PathBuf {
        self.resolve(&self.notebook)
    }
}

/// Merged household usage/production table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageTableConfig {
    pub file: PathBuf,
    pub separator: char,
    pub decimal_comma: bool,
    pub user_id_column: String,
    pub date_column: String,
    pub latitude_column: String,
    pub longitude_column: String,
    pub produced_column: String,
    pub self_used_column: String,
    pub bought_column: String,
    pub used_column: String,
    pub night_usage_column: String,
}

impl Default for UsageTableConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("merged_usage.csv"),
            separator: ',',
            decimal_comma: false,
            user_id_column: "user_id".to_string(),
            date_column: "date".to_string(),
            latitude_column: "latitude".to_string(),
            longitude_column: "longitude".to_string(),
            produced_column: "total_power_produced".to_string(),
            self_used_column: "total_power_self_used".to_string(),
            bought_column: "total_power_bought".to_string(),
            used_column: "total_power_used".to_string(),
            night_usage_column: "night_usage".to_string(),
        }
    }
}

/// Age lookup table (semicolon separated, Danish dates).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgeTableConfig {
    pub file: PathBuf,
    pub separator: char,
    pub user_id_column: String,
    pub birth_date_column: String,
}

impl Default for AgeTableConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("ages.csv"),
            separator: ';',
            user_id_column: "user_id".to_string(),
            birth_date_column: "birth_date".to_string(),
        }
    }
}

/// A two-column `date,value` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesTableConfig {
    pub file: PathBuf,
    #[serde(default = "default_comma")]
    pub separator: char,
    #[serde(default)]
    pub decimal_comma: bool,
    #[serde(default = "default_date_column")]
    pub date_column: String,
    #[serde(default = "default_value_column")]
    pub value_column: String,
}

fn default_comma() -> char {
    ','
}

fn default_date_column() -> String {
    "date".to_string()
}

fn default_value_column() -> String {
    "value".to_string()
}

/// Hourly grid-operator forecast feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastTableConfig {
    pub file: PathBuf,
    pub separator: char,
    pub decimal_comma: bool,
    pub timestamp_column: String,
    pub value_column: String,
    /// Column holding the forecast type; rows are kept only when it matches
    /// `forecast_type`. Empty disables the type filter.
    pub type_column: String,
    pub forecast_type: String,
}

impl Default for ForecastTableConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("energy_forecast.csv"),
            separator: ';',
            decimal_comma: true,
            timestamp_column: "HourDK".to_string(),
            value_column: "ForecastCurrent".to_string(),
            type_column: "ForecastType".to_string(),
            forecast_type: "Solar".to_string(),
        }
    }
}

/// Plausibility limits applied while loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub value_min: f64,
    pub value_max: f64,
    pub age_min: u32,
    pub age_max: u32,
    /// Year ages are computed against.
    pub reference_year: i32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            value_min: 0.0,
            value_max: 500.0,
            age_min: 18,
            age_max: 99,
            reference_year: 2023,
        }
    }
}

impl LimitsConfig {
    pub fn plausible_range(&self) -> ValueRange {
        ValueRange::new(self.value_min, self.value_max)
    }

    /// Age for a birth year, or `None` outside `[age_min, age_max]`.
    pub fn age_for_birth_year(&self, birth_year: i32) -> Option<u32> {
        let age = self.reference_year - birth_year;
        if age < 0 {
            return None;
        }
        let age = age as u32;
        (age >= self.age_min && age <= self.age_max).then_some(age)
    }
}

/// Chart rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartsConfig {
    /// Forecast production above this many MWh per hour is highlighted.
    pub threshold_mwh_per_hour: f64,
    pub threshold_color: String,
    pub below_threshold_color: String,
    /// Hexagon radius in degrees of latitude.
    pub hexagon_radius_deg: f64,
    pub top_households: usize,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            threshold_mwh_per_hour: 500.0,
            threshold_color: "#d62728".to_string(),
            below_threshold_color: "#1f77b4".to_string(),
            hexagon_radius_deg: 0.05,
            top_households: 10,
        }
    }
}

/// Session cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sessions idle for longer than this are dropped together with their tables.
    pub idle_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: 1800,
            sweep_interval_secs: 60,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a TOML file. A relative data directory is
    /// taken relative to the file's own directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DashboardError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            DashboardError::configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut config = Self::from_toml(&content)?;
        if config.data.directory.is_relative() {
            if let Some(parent) = path.parent() {
                config.data.directory = parent.join(&config.data.directory);
            }
        }
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, DashboardError> {
        let config: DashboardConfig = toml::from_str(content).map_err(|e| {
            DashboardError::configuration(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the first `dashboard.toml` found in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, DashboardError> {
        let search_paths = [
            PathBuf::from("dashboard.toml"),
            PathBuf::from("backend/dashboard.toml"),
            PathBuf::from("../dashboard.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(DashboardError::configuration(
            "No dashboard.toml found in standard locations",
        ))
    }

    /// Resolve configuration: `DASHBOARD_CONFIG` if set, otherwise the default
    /// locations, otherwise built-in defaults.
    pub fn load() -> Result<Self, DashboardError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::from_file(path);
        }

        match Self::from_default_location() {
            Ok(config) => Ok(config),
            Err(DashboardError::Configuration { message }) if message.starts_with("No dashboard.toml") => {
                tracing::info!("No dashboard.toml found, using built-in defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Reject settings the loaders cannot work with.
    pub fn validate(&self) -> Result<(), DashboardError> {
        let separators = [
            ("data.usage.separator", self.data.usage.separator),
            ("data.ages.separator", self.data.ages.separator),
            ("data.search_index.separator", self.data.search_index.separator),
            ("data.forecast.separator", self.data.forecast.separator),
            ("data.gas_price.separator", self.data.gas_price.separator),
        ];
        for (name, sep) in separators {
            if !sep.is_ascii() {
                return Err(DashboardError::configuration(format!(
                    "{} must be a single ASCII character, got '{}'",
                    name, sep
                )));
            }
        }

        if !(self.limits.value_min <= self.limits.value_max) {
            return Err(DashboardError::configuration(
                "limits.value_min must not exceed limits.value_max",
            ));
        }
        if self.limits.age_min > self.limits.age_max {
            return Err(DashboardError::configuration(
                "limits.age_min must not exceed limits.age_max",
            ));
        }
        if !(self.charts.hexagon_radius_deg > 0.0) {
            return Err(DashboardError::configuration(
                "charts.hexagon_radius_deg must be positive",
            ));
        }
        if self.session.idle_ttl_secs == 0 {
            return Err(DashboardError::configuration(
                "session.idle_ttl_secs must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = DashboardConfig::from_toml("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.data.ages.separator, ';');
        assert!(config.data.forecast.decimal_comma);
        assert_eq!(config.data.gas_price.value_column, "price");
        assert_eq!(config.limits.plausible_range(), ValueRange::new(0.0, 500.0));
    }

    #[test]
    fn test_parse_overrides() {
        let toml = r#"
[data]
directory = "/srv/solar"

[data.search_index]
file = "trends.csv"
value_column = "solceller"

[limits]
value_max = 10000.0
reference_year = 2022

[charts]
threshold_mwh_per_hour = 750.0
"#;

        let config = DashboardConfig::from_toml(toml).unwrap();
        assert_eq!(config.data.directory, PathBuf::from("/srv/solar"));
        assert_eq!(config.data.search_index.file, PathBuf::from("trends.csv"));
        assert_eq!(config.data.search_index.value_column, "solceller");
        assert_eq!(config.data.search_index.date_column, "date");
        assert_eq!(config.limits.value_max, 10000.0);
        assert_eq!(config.limits.value_min, 0.0);
        assert_eq!(config.charts.threshold_mwh_per_hour, 750.0);
        assert_eq!(
            config.data.resolve(&config.data.usage.file),
            PathBuf::from("/srv/solar/merged_usage.csv")
        );
    }

    #[test]
    fn test_invalid_limits_rejected() {
        let toml = r#"
[limits]
value_min = 10.0
value_max = 5.0
"#;
        assert!(DashboardConfig::from_toml(toml).is_err());
    }

    #[test]
    fn test_age_for_birth_year() {
        let limits = LimitsConfig::default();
        assert_eq!(limits.age_for_birth_year(1980), Some(43));
        assert_eq!(limits.age_for_birth_year(2005), Some(18));
        assert_eq!(limits.age_for_birth_year(2006), None);
        assert_eq!(limits.age_for_birth_year(1924), Some(99));
        assert_eq!(limits.age_for_birth_year(1923), None);
        assert_eq!(limits.age_for_birth_year(2030), None);
    }

    #[test]
    fn test_from_file_resolves_data_dir_next_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        fs::write(&path, "[data]\ndirectory = \"data\"\n").unwrap();

        let config = DashboardConfig::from_file(&path).unwrap();
        assert_eq!(config.data.directory, dir.path().join("data"));
        assert_eq!(
            config.data.notebook_path(),
            dir.path().join("data").join("solar_analysis.ipynb")
        );
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = DashboardConfig::from_file("/nonexistent/dashboard.toml").unwrap_err();
        assert!(matches!(err, DashboardError::Configuration { .. }));
    }
}
