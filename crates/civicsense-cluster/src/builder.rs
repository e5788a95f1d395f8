//! Greedy single-pass clustering of open reports.
//!
//! Reports are visited in input order (callers sort newest first). Each
//! unclaimed report scans every other unclaimed report and claims those that
//! are similar enough, close enough and recent enough. A claimed report is
//! never reconsidered, even if a later representative would fit it better,
//! and a report that claims nobody is dropped from the pass. The result
//! depends on input order and is not a global optimum.
//!
//! Cost is O(n²) in the snapshot size.

use std::collections::HashSet;

use civicsense_core::{CivicConfig, ClusterThresholds, Report, Result};
use tracing::{debug, info};

use crate::department::DepartmentKeywords;
use crate::geo::distance_meters;
use crate::similarity::{token_overlap, tokenize};
use crate::types::{Cluster, ClusterReport};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Stateless clustering engine. Safe to share across threads.
#[derive(Debug, Clone)]
pub struct ClusterBuilder {
    thresholds: ClusterThresholds,
    departments: DepartmentKeywords,
}

impl ClusterBuilder {
    /// Create a builder, rejecting invalid thresholds up front.
    pub fn new(thresholds: ClusterThresholds, departments: DepartmentKeywords) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self {
            thresholds,
            departments,
        })
    }

    pub fn from_config(config: &CivicConfig) -> Result<Self> {
        let departments = DepartmentKeywords::from_config(&config.vocabulary)?;
        Self::new(config.thresholds, departments)
    }

    pub fn thresholds(&self) -> &ClusterThresholds {
        &self.thresholds
    }

    pub fn departments(&self) -> &DepartmentKeywords {
        &self.departments
    }

    /// Whether `other` would join a cluster represented by `representative`.
    pub fn is_match(&self, representative: &Report, other: &Report) -> bool {
        let a = tokenize(representative.description());
        let b = tokenize(other.description());
        self.pair_matches(representative, &a, other, &b)
    }

    fn pair_matches(&self, p: &Report, p_tokens: &[String], q: &Report, q_tokens: &[String]) -> bool {
        // NaN fails every comparison below.
        token_overlap(p_tokens, q_tokens) > self.thresholds.similarity
            && distance_meters(p.geo_point(), q.geo_point()) < self.thresholds.distance_meters
            && hours_apart(p, q) < self.thresholds.max_hours
    }

    /// Partition `reports` into clusters of two or more.
    ///
    /// Expects open reports only, newest first. Status is not re-checked.
    pub fn build(&self, reports: &[Report]) -> ClusterReport {
        let start = std::time::Instant::now();
        info!("Clustering {} reports", reports.len());

        // Tokenize once; the pairwise scan reuses these.
        let tokens: Vec<Vec<String>> = reports.iter().map(|r| tokenize(r.description())).collect();

        let mut processed: HashSet<&str> = HashSet::new();
        let mut clusters = Vec::new();

        for (i, p) in reports.iter().enumerate() {
            if processed.contains(p.id.as_str()) {
                continue;
            }

            let department = self.departments.recommend(p.description());
            let mut cluster = Cluster::new(p.clone(), department);

            for (j, q) in reports.iter().enumerate() {
                if q.id == p.id || processed.contains(q.id.as_str()) {
                    continue;
                }
                if self.pair_matches(p, &tokens[i], q, &tokens[j]) {
                    cluster.push(q.clone());
                    processed.insert(q.id.as_str());
                }
            }

            if cluster.len() > 1 {
                processed.insert(p.id.as_str());
                debug!(
                    "Cluster around {} with {} reports -> {}",
                    p.id,
                    cluster.len(),
                    department
                );
                clusters.push(cluster);
            }
        }

        let mut report = ClusterReport {
            clusters,
            reports_considered: reports.len(),
            duration_ms: start.elapsed().as_millis() as u64,
            ..Default::default()
        };
        report.recount();

        info!(
            "Clustering complete: clusters={}, clustered_reports={}, duration={}ms",
            report.clusters.len(),
            report.total_issues,
            report.duration_ms
        );

        report
    }
}

impl Default for ClusterBuilder {
    fn default() -> Self {
        Self {
            thresholds: ClusterThresholds::default(),
            departments: DepartmentKeywords::default(),
        }
    }
}

fn hours_apart(a: &Report, b: &Report) -> f64 {
    let millis = (a.created_at - b.created_at).num_milliseconds().abs();
    millis as f64 / MILLIS_PER_HOUR
}
