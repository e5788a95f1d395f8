//! Engine configuration: clustering thresholds, keyword overrides, server port.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::types::Department;

/// Thresholds a candidate pair must satisfy to share a cluster.
///
/// A pair joins when similarity is strictly above `similarity`, distance is
/// strictly below `distance_meters` and the creation times are strictly less
/// than `max_hours` apart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterThresholds {
    /// Minimum description overlap ratio (0.0 - 1.0), exclusive.
    pub similarity: f64,
    /// Maximum great-circle distance in meters, exclusive.
    #[serde(rename = "distanceMeters")]
    pub distance_meters: f64,
    /// Maximum creation-time gap in hours, exclusive.
    #[serde(rename = "maxHours")]
    pub max_hours: f64,
}

impl ClusterThresholds {
    /// Tighter preset: `{0.5, 1000 m, 24 h}`. This is the default.
    pub fn standard() -> Self {
        Self {
            similarity: 0.5,
            distance_meters: 1000.0,
            max_hours: 24.0,
        }
    }

    /// Looser preset: `{0.4, 1000 m, 48 h}`.
    pub fn relaxed() -> Self {
        Self {
            similarity: 0.4,
            distance_meters: 1000.0,
            max_hours: 48.0,
        }
    }

    /// Look up a named preset.
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "standard" | "default" => Some(Self::standard()),
            "relaxed" | "loose" => Some(Self::relaxed()),
            _ => None,
        }
    }

    /// Reject values the clustering pass cannot meaningfully use.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity) {
            return Err(Error::Config(format!(
                "similarity threshold must be within [0, 1], got {}",
                self.similarity
            )));
        }
        if !self.distance_meters.is_finite() || self.distance_meters < 0.0 {
            return Err(Error::Config(format!(
                "distance threshold must be a non-negative number of meters, got {}",
                self.distance_meters
            )));
        }
        if !self.max_hours.is_finite() || self.max_hours < 0.0 {
            return Err(Error::Config(format!(
                "time window must be a non-negative number of hours, got {}",
                self.max_hours
            )));
        }
        Ok(())
    }
}

impl Default for ClusterThresholds {
    fn default() -> Self {
        Self::standard()
    }
}

/// Optional replacements for the built-in keyword tables.
///
/// A `None` field keeps the built-in vocabulary for that table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VocabularyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departments: Option<BTreeMap<Department, Vec<String>>>,
    #[serde(rename = "priorityHigh", default, skip_serializing_if = "Option::is_none")]
    pub priority_high: Option<Vec<String>>,
    #[serde(rename = "priorityMedium", default, skip_serializing_if = "Option::is_none")]
    pub priority_medium: Option<Vec<String>>,
}

/// Top-level CivicSense configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CivicConfig {
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub thresholds: ClusterThresholds,
    /// Substitute an example cluster when a pass finds nothing.
    #[serde(rename = "placeholderOnEmpty", default)]
    pub placeholder_on_empty: bool,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
}

fn default_port() -> u16 {
    5000
}

impl Default for CivicConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            thresholds: ClusterThresholds::default(),
            placeholder_on_empty: false,
            vocabulary: VocabularyConfig::default(),
        }
    }
}

impl CivicConfig {
    /// Load a JSON configuration file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: CivicConfig = serde_json::from_str(&data)?;
        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Create configuration from the process environment and defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// `CIVICSENSE_CONFIG` names a base file; the remaining variables
    /// override individual fields on top of it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("CIVICSENSE_CONFIG") {
            Some(path) if !path.trim().is_empty() => Self::load(path.trim())?,
            _ => Self::default(),
        };

        if let Some(port) = lookup("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("invalid PORT: {}", port)))?;
        }

        if let Some(name) = lookup("CIVICSENSE_THRESHOLDS") {
            config.thresholds = ClusterThresholds::preset(&name).ok_or_else(|| {
                Error::Config(format!("unknown threshold preset: {}", name))
            })?;
        }

        if let Some(v) = lookup("CIVICSENSE_SIM_THRESHOLD") {
            config.thresholds.similarity = parse_number("CIVICSENSE_SIM_THRESHOLD", &v)?;
        }
        if let Some(v) = lookup("CIVICSENSE_DIST_METERS") {
            config.thresholds.distance_meters = parse_number("CIVICSENSE_DIST_METERS", &v)?;
        }
        if let Some(v) = lookup("CIVICSENSE_MAX_HOURS") {
            config.thresholds.max_hours = parse_number("CIVICSENSE_MAX_HOURS", &v)?;
        }

        if let Some(v) = lookup("CIVICSENSE_PLACEHOLDER") {
            config.placeholder_on_empty = matches!(
                v.trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()
    }
}

fn parse_number(key: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::Config(format!("{} is not a number: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_is_standard() {
        let config = CivicConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.thresholds, ClusterThresholds::standard());
        assert_eq!(config.port, 5000);
        assert!(!config.placeholder_on_empty);
    }

    #[test]
    fn test_presets() {
        let relaxed = ClusterThresholds::preset("relaxed").unwrap();
        assert_eq!(relaxed.similarity, 0.4);
        assert_eq!(relaxed.max_hours, 48.0);
        assert_eq!(relaxed.distance_meters, 1000.0);
        assert!(ClusterThresholds::preset("bogus").is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = CivicConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("CIVICSENSE_THRESHOLDS", "relaxed"),
            ("CIVICSENSE_MAX_HOURS", "12"),
            ("CIVICSENSE_PLACEHOLDER", "true"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.thresholds.similarity, 0.4);
        assert_eq!(config.thresholds.max_hours, 12.0);
        assert!(config.placeholder_on_empty);
    }

    #[test]
    fn test_rejects_out_of_range_similarity() {
        let err = CivicConfig::from_lookup(lookup_from(&[("CIVICSENSE_SIM_THRESHOLD", "1.5")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_negative_distance_and_hours() {
        let mut t = ClusterThresholds::standard();
        t.distance_meters = -1.0;
        assert!(t.validate().is_err());

        let mut t = ClusterThresholds::standard();
        t.max_hours = -0.5;
        assert!(t.validate().is_err());

        let mut t = ClusterThresholds::standard();
        t.similarity = f64::NAN;
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_rejects_unparseable_values() {
        assert!(CivicConfig::from_lookup(lookup_from(&[("PORT", "http")])).is_err());
        assert!(
            CivicConfig::from_lookup(lookup_from(&[("CIVICSENSE_DIST_METERS", "far")])).is_err()
        );
    }

    #[test]
    fn test_load_file_with_vocabulary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("civicsense.json");
        std::fs::write(
            &path,
            r#"{
                "thresholds": { "similarity": 0.6 },
                "vocabulary": {
                    "departments": { "water": ["tap"] },
                    "priorityHigh": ["sinkhole"]
                }
            }"#,
        )
        .unwrap();

        let config = CivicConfig::load(&path).unwrap();
        assert_eq!(config.thresholds.similarity, 0.6);
        assert_eq!(config.thresholds.max_hours, 24.0);
        let departments = config.vocabulary.departments.unwrap();
        assert_eq!(departments[&Department::Water], vec!["tap".to_string()]);
        assert_eq!(config.vocabulary.priority_high.unwrap(), vec!["sinkhole"]);
        assert!(config.vocabulary.priority_medium.is_none());
    }

    #[test]
    fn test_config_file_from_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("civicsense.json");
        std::fs::write(&path, r#"{ "port": 7000, "placeholderOnEmpty": true }"#).unwrap();

        let path_str = path.to_string_lossy().to_string();
        let config = CivicConfig::from_lookup(lookup_from(&[
            ("CIVICSENSE_CONFIG", path_str.as_str()),
            ("PORT", "7100"),
        ]))
        .unwrap();
        assert_eq!(config.port, 7100);
        assert!(config.placeholder_on_empty);
    }

    #[test]
    fn test_load_missing_file() {
        let err = CivicConfig::load("/nonexistent/civicsense.json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
