//! Clustering output types.

use civicsense_core::{Department, Report};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Two or more reports judged to describe the same issue.
///
/// `issues[0]` is the representative: the report whose scan gathered the
/// others, and the source of the recommended department. It is also
/// serialized on its own as `mainPost`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    issues: Vec<Report>,
    recommended_department: Department,
}

impl Serialize for Cluster {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Cluster", 3)?;
        state.serialize_field("mainPost", self.representative())?;
        state.serialize_field("issues", &self.issues)?;
        state.serialize_field("recommendedDepartment", &self.recommended_department)?;
        state.end()
    }
}

impl Cluster {
    pub(crate) fn new(representative: Report, recommended_department: Department) -> Self {
        Self {
            issues: vec![representative],
            recommended_department,
        }
    }

    pub(crate) fn push(&mut self, report: Report) {
        self.issues.push(report);
    }

    pub fn representative(&self) -> &Report {
        &self.issues[0]
    }

    pub fn issues(&self) -> &[Report] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Always false for a cluster handed out by this crate.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn recommended_department(&self) -> Department {
        self.recommended_department
    }

    pub fn issue_ids(&self) -> Vec<&str> {
        self.issues.iter().map(|r| r.id.as_str()).collect()
    }

    pub fn into_issues(self) -> Vec<Report> {
        self.issues
    }
}

/// Result of one clustering pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClusterReport {
    pub clusters: Vec<Cluster>,
    #[serde(rename = "totalIssues")]
    pub total_issues: usize,
    #[serde(rename = "reportsConsidered")]
    pub reports_considered: usize,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
}

impl ClusterReport {
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub(crate) fn recount(&mut self) {
        self.total_issues = self.clusters.iter().map(Cluster::len).sum();
    }
}
