//! Shared application state.

use chrono::Utc;
use civicsense_cluster::{or_placeholder, ClusterBuilder, ClusterReport, PriorityKeywords};
use civicsense_core::{CivicConfig, Report};

use crate::snapshot::prepare_for_clustering;

/// Immutable engine configuration shared by all handlers.
///
/// Every request brings its own report snapshot, so nothing here is locked.
pub struct AppState {
    pub config: CivicConfig,
    pub builder: ClusterBuilder,
    pub priorities: PriorityKeywords,
}

impl AppState {
    pub fn new(config: CivicConfig) -> civicsense_core::Result<Self> {
        let builder = ClusterBuilder::from_config(&config)?;
        let priorities = PriorityKeywords::from_config(&config.vocabulary)?;
        Ok(Self {
            config,
            builder,
            priorities,
        })
    }

    /// Keep open reports, order them newest first, cluster, and apply the
    /// placeholder fallback if it is enabled.
    pub fn cluster_snapshot(&self, reports: Vec<Report>) -> ClusterReport {
        let open = prepare_for_clustering(reports);
        let result = self.builder.build(&open);
        if self.config.placeholder_on_empty {
            or_placeholder(result, Utc::now())
        } else {
            result
        }
    }
}
