//! Clustering, department recommendation and cluster acknowledgment routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use civicsense_assign::{AcknowledgeRequest, ClusterAssignment};
use civicsense_core::Report;
use serde::Deserialize;
use tracing::warn;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/clusters", post(build_clusters))
        .route("/clusters/acknowledge", post(acknowledge_cluster))
        .route("/recommend", post(recommend_department))
}

#[derive(Deserialize)]
struct SnapshotBody {
    reports: Vec<Report>,
}

#[derive(Deserialize)]
struct DescriptionBody {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Deserialize)]
struct AcknowledgeBody {
    #[serde(flatten)]
    request: AcknowledgeRequest,
    #[serde(rename = "acknowledgedBy")]
    acknowledged_by: String,
}

/// POST /api/clusters: cluster the open reports of a snapshot.
async fn build_clusters(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SnapshotBody>,
) -> Json<serde_json::Value> {
    let result = state.cluster_snapshot(body.reports);
    Json(serde_json::json!({
        "success": true,
        "clusters": result.clusters,
        "totalIssues": result.total_issues,
        "reportsConsidered": result.reports_considered,
        "durationMs": result.duration_ms,
    }))
}

/// POST /api/recommend: department for a single description.
async fn recommend_department(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DescriptionBody>,
) -> Json<serde_json::Value> {
    let departments = state.builder.departments();
    let description = body.description.as_deref();
    let scores: serde_json::Map<String, serde_json::Value> = departments
        .score_all(description)
        .into_iter()
        .map(|s| (s.department.to_string(), serde_json::json!(s.matches)))
        .collect();
    Json(serde_json::json!({
        "department": departments.recommend(description),
        "scores": scores,
    }))
}

/// POST /api/clusters/acknowledge: forward a cluster to a department.
async fn acknowledge_cluster(
    Json(body): Json<AcknowledgeBody>,
) -> (StatusCode, Json<serde_json::Value>) {
    let department = body.request.department;
    match ClusterAssignment::acknowledge(body.request, &body.acknowledged_by, Utc::now()) {
        Ok((assignment, changes)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "msg": "Cluster acknowledged and forwarded to department",
                "department": department,
                "updatedIssues": changes.len(),
                "assignment": assignment,
                "statusChanges": changes,
            })),
        ),
        Err(e) => {
            warn!("Rejected cluster acknowledgment: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use civicsense_core::CivicConfig;
    use serde_json::json;

    use crate::routes::test_support::{send, state_with};

    fn snapshot() -> serde_json::Value {
        json!({
            "reports": [
                {
                    "id": "older",
                    "description": "Huge pothole near bus stop",
                    "location": { "type": "Point", "coordinates": [80.123, 13.456] },
                    "createdAt": "2024-09-17T08:00:00Z",
                    "status": "Pending"
                },
                {
                    "id": "newer",
                    "description": "huge pothole near the bus stop",
                    "location": { "type": "Point", "coordinates": [80.1231, 13.4561] },
                    "createdAt": "2024-09-17T09:00:00Z",
                    "status": "Pending"
                },
                {
                    "id": "closed",
                    "description": "Huge pothole near bus stop",
                    "location": { "type": "Point", "coordinates": [80.123, 13.456] },
                    "createdAt": "2024-09-17T08:30:00Z",
                    "status": "Resolved"
                }
            ]
        })
    }

    #[tokio::test]
    async fn test_clusters_endpoint() {
        let state = state_with(CivicConfig::default());
        let (status, body) = send(state, "POST", "/api/clusters", Some(snapshot())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["totalIssues"], 2);
        assert_eq!(body["reportsConsidered"], 2);
        // Newest open report leads the cluster; resolved reports are skipped.
        assert_eq!(body["clusters"][0]["mainPost"]["id"], "newer");
        assert_eq!(body["clusters"][0]["issues"][0]["id"], "newer");
        assert_eq!(body["clusters"][0]["issues"][1]["id"], "older");
        assert_eq!(body["clusters"][0]["recommendedDepartment"], "roads");
    }

    #[tokio::test]
    async fn test_clusters_placeholder_only_when_enabled() {
        let empty = json!({ "reports": [] });

        let (_, body) = send(
            state_with(CivicConfig::default()),
            "POST",
            "/api/clusters",
            Some(empty.clone()),
        )
        .await;
        assert_eq!(body["clusters"].as_array().unwrap().len(), 0);

        let config = CivicConfig {
            placeholder_on_empty: true,
            ..Default::default()
        };
        let (_, body) = send(state_with(config), "POST", "/api/clusters", Some(empty)).await;
        assert_eq!(body["clusters"].as_array().unwrap().len(), 1);
        assert_eq!(body["clusters"][0]["issues"][0]["id"], "placeholder_main");
    }

    #[tokio::test]
    async fn test_clusters_rejects_malformed_body() {
        let state = state_with(CivicConfig::default());
        let (status, _) = send(state, "POST", "/api/clusters", Some(json!({ "posts": 1 }))).await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_recommend_endpoint() {
        let state = state_with(CivicConfig::default());
        let (status, body) = send(
            state,
            "POST",
            "/api/recommend",
            Some(json!({ "description": "garbage overflow" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["department"], "waste");
        assert_eq!(body["scores"]["waste"], 1);
        assert_eq!(body["scores"]["roads"], 0);
    }

    #[tokio::test]
    async fn test_acknowledge_endpoint() {
        let state = state_with(CivicConfig::default());
        let (status, body) = send(
            state.clone(),
            "POST",
            "/api/clusters/acknowledge",
            Some(json!({
                "clusterId": "c-1",
                "issues": ["newer", "older"],
                "department": "roads",
                "adminComment": "Ward 4",
                "acknowledgedBy": "admin-1"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["updatedIssues"], 2);
        assert_eq!(body["assignment"]["status"], "In Progress");
        assert_eq!(body["statusChanges"][0]["reportId"], "newer");

        let (status, body) = send(
            state,
            "POST",
            "/api/clusters/acknowledge",
            Some(json!({
                "clusterId": "c-2",
                "issues": [],
                "department": "roads",
                "acknowledgedBy": "admin-1"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("at least one issue"));
    }
}
