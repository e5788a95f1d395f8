//! Cluster assignment record and its lifecycle.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use civicsense_core::{Department, Error, ReportStatus, Result};
use serde::Serialize;
use tracing::info;

use crate::types::*;

const MIN_FEEDBACK_COMMENT_CHARS: usize = 5;

/// A cluster routed to a department, as acknowledged by an administrator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterAssignment {
    pub id: String,
    #[serde(rename = "clusterId")]
    pub cluster_id: String,
    pub issues: Vec<String>,
    pub department: Department,
    #[serde(rename = "adminComment", skip_serializing_if = "Option::is_none")]
    pub admin_comment: Option<String>,
    pub status: ReportStatus,
    #[serde(rename = "acknowledgedBy")]
    pub acknowledged_by: String,
    #[serde(rename = "acknowledgedAt")]
    pub acknowledged_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    pub priority: AssignmentPriority,
    #[serde(rename = "priorityReason", skip_serializing_if = "Option::is_none")]
    pub priority_reason: Option<String>,
    #[serde(rename = "prioritySetBy", skip_serializing_if = "Option::is_none")]
    pub priority_set_by: Option<String>,
    #[serde(rename = "prioritySetAt", skip_serializing_if = "Option::is_none")]
    pub priority_set_at: Option<DateTime<Utc>>,
    #[serde(rename = "urgencyLevel")]
    pub urgency_level: u8,
    #[serde(rename = "workflowStage")]
    pub workflow_stage: WorkflowStage,
    #[serde(rename = "departmentUpdates")]
    pub department_updates: Vec<DepartmentUpdate>,
    pub notes: Vec<Note>,
    #[serde(rename = "citizenFeedback")]
    pub citizen_feedback: Vec<CitizenFeedback>,
    pub metrics: AssignmentMetrics,
    #[serde(rename = "actualCompletionDate", skip_serializing_if = "Option::is_none")]
    pub actual_completion: Option<DateTime<Utc>>,
}

impl ClusterAssignment {
    /// Acknowledge a cluster and forward it to a department.
    ///
    /// Returns the new assignment and the status change for every report in
    /// it.
    pub fn acknowledge(
        request: AcknowledgeRequest,
        acknowledged_by: &str,
        now: DateTime<Utc>,
    ) -> Result<(Self, Vec<StatusChange>)> {
        if request.issues.is_empty() {
            return Err(Error::Validation("a cluster assignment needs at least one issue".into()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = request.issues.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(Error::Validation(format!("issue {} listed more than once", dup)));
        }
        if acknowledged_by.trim().is_empty() {
            return Err(Error::Validation("acknowledging administrator is required".into()));
        }

        let status = request.status.unwrap_or(ReportStatus::InProgress);
        let assignment = Self {
            id: uuid::Uuid::new_v4().to_string(),
            cluster_id: request.cluster_id,
            issues: request.issues,
            department: request.department,
            admin_comment: request.admin_comment,
            status,
            acknowledged_by: acknowledged_by.to_string(),
            acknowledged_at: now,
            updated_at: now,
            priority: AssignmentPriority::default(),
            priority_reason: None,
            priority_set_by: None,
            priority_set_at: None,
            urgency_level: 5,
            workflow_stage: WorkflowStage::default(),
            department_updates: vec![DepartmentUpdate {
                status: RECEIVED_LABEL.into(),
                comment: Some("Issue forwarded to department".into()),
                updated_by: None,
                update_type: UpdateType::default(),
                updated_at: now,
            }],
            notes: Vec::new(),
            citizen_feedback: Vec::new(),
            metrics: AssignmentMetrics::default(),
            actual_completion: None,
        };

        info!(
            "Cluster {} acknowledged: {} issues -> {} ({})",
            assignment.cluster_id,
            assignment.issues.len(),
            assignment.department,
            assignment.status
        );

        let changes = assignment.status_changes(status);
        Ok((assignment, changes))
    }

    fn status_changes(&self, status: ReportStatus) -> Vec<StatusChange> {
        self.issues
            .iter()
            .map(|id| StatusChange {
                report_id: id.clone(),
                status,
            })
            .collect()
    }

    /// Append a department update.
    ///
    /// `"Completed"` resolves the assignment. A label naming a report status
    /// moves the assignment to it (never backwards). Any other label is
    /// logged without a status change. Returns the report status changes to
    /// persist, if any.
    pub fn record_update(
        &mut self,
        label: &str,
        comment: Option<String>,
        update_type: UpdateType,
        updated_by: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Vec<StatusChange>> {
        let label = label.trim();
        if label.is_empty() {
            return Err(Error::Validation("update status label is required".into()));
        }

        let target = if label == COMPLETED_LABEL {
            Some(ReportStatus::Resolved)
        } else {
            ReportStatus::parse(label)
        };
        if let Some(next) = target {
            if !self.status.can_transition_to(next) {
                return Err(Error::Validation(format!(
                    "cannot move assignment from {} to {}",
                    self.status, next
                )));
            }
        }

        if self.metrics.response_time_hours.is_none() {
            self.metrics.response_time_hours = Some(hours_between(self.acknowledged_at, now));
        }

        self.department_updates.push(DepartmentUpdate {
            status: label.to_string(),
            comment,
            updated_by,
            update_type,
            updated_at: now,
        });
        self.updated_at = now;

        let changes = match target {
            Some(next) if next != self.status => {
                self.status = next;
                if next == ReportStatus::Resolved {
                    self.resolve(now);
                }
                self.status_changes(next)
            }
            _ => Vec::new(),
        };

        Ok(changes)
    }

    fn resolve(&mut self, now: DateTime<Utc>) {
        self.actual_completion = Some(now);
        self.workflow_stage = WorkflowStage::Completion;
        if self.metrics.resolution_time_hours.is_none() {
            self.metrics.resolution_time_hours = Some(hours_between(self.acknowledged_at, now));
        }
        info!(
            "Assignment {} resolved after {:.1}h",
            self.id,
            hours_between(self.acknowledged_at, now)
        );
    }

    pub fn set_priority(
        &mut self,
        priority: AssignmentPriority,
        reason: Option<String>,
        set_by: &str,
        now: DateTime<Utc>,
    ) {
        self.priority = priority;
        self.priority_reason = reason;
        self.priority_set_by = Some(set_by.to_string());
        self.priority_set_at = Some(now);
        self.updated_at = now;
    }

    /// Set the 1 - 10 urgency level.
    pub fn set_urgency(&mut self, level: u8, now: DateTime<Utc>) -> Result<()> {
        if !(1..=10).contains(&level) {
            return Err(Error::Validation(format!(
                "urgency level must be between 1 and 10, got {}",
                level
            )));
        }
        self.urgency_level = level;
        self.updated_at = now;
        Ok(())
    }

    pub fn set_workflow_stage(&mut self, stage: WorkflowStage, now: DateTime<Utc>) {
        self.workflow_stage = stage;
        self.updated_at = now;
    }

    pub fn add_note(
        &mut self,
        content: &str,
        author: &str,
        is_internal: bool,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::Validation("note content is required".into()));
        }
        self.notes.push(Note {
            content: content.to_string(),
            author: author.to_string(),
            is_internal,
            created_at: now,
        });
        self.updated_at = now;
        Ok(())
    }

    /// Notes citizens are allowed to see.
    pub fn public_notes(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter().filter(|n| !n.is_internal)
    }

    /// Record a citizen's rating for one of the assignment's reports.
    ///
    /// Only resolved assignments accept feedback, once per report. Returns
    /// the new average rating.
    pub fn add_feedback(
        &mut self,
        post_id: &str,
        rating: u8,
        comment: &str,
        now: DateTime<Utc>,
    ) -> Result<f64> {
        if !(1..=5).contains(&rating) {
            return Err(Error::Validation(
                "Rating is required and must be between 1 and 5".into(),
            ));
        }
        let comment = comment.trim();
        if comment.chars().count() < MIN_FEEDBACK_COMMENT_CHARS {
            return Err(Error::Validation(
                "Comment is required and must be at least 5 characters long".into(),
            ));
        }
        if !self.issues.iter().any(|id| id == post_id) {
            return Err(Error::Validation(format!(
                "report {} is not part of this assignment",
                post_id
            )));
        }
        if self.status != ReportStatus::Resolved {
            return Err(Error::Validation(
                "You can only provide feedback after the issue has been resolved".into(),
            ));
        }
        if self.citizen_feedback.iter().any(|f| f.post_id == post_id) {
            return Err(Error::Validation(
                "You have already submitted feedback for this issue".into(),
            ));
        }

        self.citizen_feedback.push(CitizenFeedback {
            post_id: post_id.to_string(),
            rating,
            comment: comment.to_string(),
            submitted_at: now,
        });
        self.updated_at = now;

        let average = self.mean_rating().unwrap_or(0.0);
        self.metrics.citizen_satisfaction_score = Some(average / 5.0 * 10.0);
        Ok(average)
    }

    fn mean_rating(&self) -> Option<f64> {
        if self.citizen_feedback.is_empty() {
            return None;
        }
        let total: u32 = self.citizen_feedback.iter().map(|f| u32::from(f.rating)).sum();
        Some(f64::from(total) / self.citizen_feedback.len() as f64)
    }

    /// Average rating rounded to one decimal place.
    pub fn average_rating(&self) -> Option<f64> {
        self.mean_rating().map(|avg| (avg * 10.0).round() / 10.0)
    }

    pub fn total_issues(&self) -> usize {
        self.issues.len()
    }

    /// Unresolved and acknowledged more than three days ago.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != ReportStatus::Resolved
            && now - self.acknowledged_at > Duration::days(OVERDUE_AFTER_DAYS)
    }
}

fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 3_600_000.0
}
