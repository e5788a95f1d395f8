//! CivicSense Core: report types, configuration, errors.

pub mod config;
pub mod error;
pub mod types;

pub use config::{CivicConfig, ClusterThresholds, VocabularyConfig};
pub use error::{Error, Result};
pub use types::{Department, GeoPoint, Location, Report, ReportStatus};
