//! Assignment workflow types.

use chrono::{DateTime, Utc};
use civicsense_cluster::Cluster;
use civicsense_core::{Department, ReportStatus};
use serde::{Deserialize, Serialize};

/// Label that closes an assignment when recorded as a department update.
pub const COMPLETED_LABEL: &str = "Completed";

/// Label of the update seeded on acknowledgment.
pub const RECEIVED_LABEL: &str = "Received";

/// Days an unresolved assignment may stay open before it is overdue.
pub const OVERDUE_AFTER_DAYS: i64 = 3;

/// Administrator-set urgency of an assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Kind of entry in an assignment's update log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    StatusChange,
    #[default]
    ProgressUpdate,
    ResourceRequest,
    Completion,
    Note,
}

/// Where the department is in handling the assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    #[default]
    Assessment,
    Planning,
    ResourceAllocation,
    Execution,
    Testing,
    Completion,
    Feedback,
}

/// One entry in the department update log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentUpdate {
    /// Free-form label such as "Received", "In Progress" or "Completed".
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "updatedBy", skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(rename = "updateType")]
    pub update_type: UpdateType,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Admin note. Internal notes are hidden from citizens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub content: String,
    pub author: String,
    #[serde(rename = "isInternal")]
    pub is_internal: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A citizen's rating of how their report was handled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitizenFeedback {
    #[serde(rename = "postId")]
    pub post_id: String,
    pub rating: u8,
    pub comment: String,
    #[serde(rename = "submittedAt")]
    pub submitted_at: DateTime<Utc>,
}

/// Derived timings and satisfaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentMetrics {
    /// Hours from acknowledgment to the first department update.
    #[serde(rename = "responseTime", skip_serializing_if = "Option::is_none")]
    pub response_time_hours: Option<f64>,
    /// Hours from acknowledgment to resolution.
    #[serde(rename = "resolutionTime", skip_serializing_if = "Option::is_none")]
    pub resolution_time_hours: Option<f64>,
    /// Average rating scaled to 0 - 10.
    #[serde(rename = "citizenSatisfactionScore", skip_serializing_if = "Option::is_none")]
    pub citizen_satisfaction_score: Option<f64>,
}

/// A report status mutation the caller must persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    #[serde(rename = "reportId")]
    pub report_id: String,
    pub status: ReportStatus,
}

/// What an administrator submits to acknowledge a cluster.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AcknowledgeRequest {
    #[serde(rename = "clusterId")]
    pub cluster_id: String,
    pub issues: Vec<String>,
    pub department: Department,
    #[serde(rename = "adminComment", default)]
    pub admin_comment: Option<String>,
    /// Status applied to the assignment and its reports; `In Progress` if absent.
    #[serde(default)]
    pub status: Option<ReportStatus>,
}

impl AcknowledgeRequest {
    /// Pre-fill a request from a freshly built cluster, accepting its
    /// recommended department.
    pub fn from_cluster(
        cluster: &Cluster,
        cluster_id: impl Into<String>,
        admin_comment: Option<String>,
    ) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            issues: cluster.issue_ids().into_iter().map(String::from).collect(),
            department: cluster.recommended_department(),
            admin_comment,
            status: None,
        }
    }
}
