//! Example cluster for presentation layers that always need something to
//! render. Applied at the boundary only; [`ClusterBuilder`] never produces it.
//!
//! [`ClusterBuilder`]: crate::ClusterBuilder

use chrono::{DateTime, Utc};
use civicsense_core::{Department, Report, ReportStatus};
use tracing::debug;

use crate::types::{Cluster, ClusterReport};

pub const PLACEHOLDER_MAIN_ID: &str = "placeholder_main";
pub const PLACEHOLDER_ISSUE_ID: &str = "placeholder_issue1";

const PLACEHOLDER_LON: f64 = 80.123;
const PLACEHOLDER_LAT: f64 = 13.456;

/// A fixed two-report pothole cluster stamped with `now`.
pub fn placeholder_cluster(now: DateTime<Utc>) -> Cluster {
    let main = Report::new(PLACEHOLDER_MAIN_ID, "Road damaged near main street", now)
        .with_location(PLACEHOLDER_LON, PLACEHOLDER_LAT)
        .with_status(ReportStatus::InProgress);

    let mut issue = Report::new(PLACEHOLDER_ISSUE_ID, "Huge pothole near bus stop", now)
        .with_location(PLACEHOLDER_LON, PLACEHOLDER_LAT)
        .with_status(ReportStatus::InProgress)
        .with_author("TestUser");
    issue.address = Some("Main Street".into());

    let mut cluster = Cluster::new(main, Department::Roads);
    cluster.push(issue);
    cluster
}

/// Substitute the placeholder cluster when a pass produced none.
pub fn or_placeholder(mut report: ClusterReport, now: DateTime<Utc>) -> ClusterReport {
    if report.clusters.is_empty() {
        debug!("No clusters found, substituting placeholder");
        report.clusters.push(placeholder_cluster(now));
        report.recount();
    }
    report
}

/// Whether `cluster` is the placeholder rather than real reports.
pub fn is_placeholder(cluster: &Cluster) -> bool {
    cluster.representative().id == PLACEHOLDER_MAIN_ID
}
