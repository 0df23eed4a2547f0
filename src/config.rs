use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use thiserror::Error;

use crate::data::model::ColumnMap;
use crate::report::brands::MarkerBrandClassifier;
use crate::report::ReportSettings;

/// Looked up in the working directory at start-up.
pub const CONFIG_FILE: &str = "order-lens.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("delimiter {0:?} is not a single ASCII character")]
    Delimiter(char),
    #[error("invalid date display format {0:?}")]
    DateFormat(String),
    #[error("brand marker: {0}")]
    BrandMarker(#[from] regex::Error),
}

// ---------------------------------------------------------------------------
// DashboardConfig
// ---------------------------------------------------------------------------

/// Everything configurable. Every field has a default, so a config file only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub delimiter: char,
    pub columns: ColumnMap,
    pub top_n: usize,
    pub dormant_days: u64,
    pub date_display_format: String,
    pub brand_marker: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("orders.csv"),
            delimiter: ',',
            columns: ColumnMap::default(),
            top_n: 20,
            dormant_days: 120,
            date_display_format: "%-m/%-d/%Y".to_string(),
            brand_marker: "E-liquide".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file and check its values.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: DashboardConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Use `path` when it exists, the defaults otherwise or when it is unusable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No {} found, using defaults", path.display());
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring configuration: {e}");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.delimiter_byte()?;
        if StrftimeItems::new(&self.date_display_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::DateFormat(self.date_display_format.clone()));
        }
        Ok(())
    }

    /// The delimiter as the byte the CSV reader wants.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or(ConfigError::Delimiter(self.delimiter))
    }

    /// Aggregation settings derived from this config.
    pub fn report_settings(&self) -> Result<ReportSettings, ConfigError> {
        Ok(ReportSettings {
            top_n: self.top_n,
            dormant_days: self.dormant_days,
            date_display_format: self.date_display_format.clone(),
            classifier: Box::new(MarkerBrandClassifier::new(&self.brand_marker)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_match_the_reference_export() {
        let config = DashboardConfig::default();
        assert_eq!(config.top_n, 20);
        assert_eq!(config.dormant_days, 120);
        assert_eq!(config.columns.order_number, "Numéro de commande");
        assert_eq!(config.delimiter_byte().unwrap(), b',');
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = write_config(
            r#"{ "data_path": "export.csv", "delimiter": ";", "columns": { "email": "Email" } }"#,
        );
        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.data_path, PathBuf::from("export.csv"));
        assert_eq!(config.delimiter_byte().unwrap(), b';');
        assert_eq!(config.columns.email, "Email");
        assert_eq!(config.columns.order_total, "Montant total de la commande");
        assert_eq!(config.top_n, 20);
    }

    #[test]
    fn rejects_bad_values() {
        let file = write_config(r#"{ "delimiter": "é" }"#);
        assert!(matches!(
            DashboardConfig::from_file(file.path()),
            Err(ConfigError::Delimiter('é'))
        ));

        let file = write_config(r#"{ "date_display_format": "%Q" }"#);
        assert!(matches!(
            DashboardConfig::from_file(file.path()),
            Err(ConfigError::DateFormat(_))
        ));

        let file = write_config("{ not json");
        assert!(matches!(
            DashboardConfig::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn unusable_file_falls_back_to_defaults() {
        let file = write_config(r#"{ "top_n": "twenty" }"#);
        assert_eq!(DashboardConfig::load_or_default(file.path()), DashboardConfig::default());
        assert_eq!(
            DashboardConfig::load_or_default(Path::new("no/such/order-lens.json")),
            DashboardConfig::default()
        );
    }

    #[test]
    fn report_settings_follow_config() {
        let config = DashboardConfig {
            top_n: 5,
            dormant_days: 30,
            brand_marker: "Arôme".into(),
            ..Default::default()
        };
        let settings = config.report_settings().unwrap();
        assert_eq!(settings.top_n, 5);
        assert_eq!(settings.dormant_days, 30);
        assert_eq!(
            settings.classifier.classify("Arôme Fuu Pomme"),
            crate::report::brands::BrandLabel::Named("Fuu")
        );
    }
}
