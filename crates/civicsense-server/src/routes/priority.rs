//! Priority ranking routes used by report listings.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use civicsense_cluster::PriorityTier;
use civicsense_core::Report;
use serde::Deserialize;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/priority", post(rank_reports))
}

#[derive(Deserialize)]
struct PriorityQuery {
    tier: Option<String>,
}

#[derive(Deserialize)]
struct SnapshotBody {
    reports: Vec<Report>,
}

/// POST /api/priority?tier=high: reports ranked by urgency, optionally
/// restricted to one tier.
async fn rank_reports(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PriorityQuery>,
    Json(body): Json<SnapshotBody>,
) -> (StatusCode, Json<serde_json::Value>) {
    let tier = match query.tier.as_deref() {
        None => None,
        Some(raw) => match PriorityTier::parse(raw) {
            Some(tier) => Some(tier),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({
                        "error": format!("unknown priority tier: {}", raw),
                    })),
                )
            }
        },
    };

    let mut ranked = state.priorities.rank(&body.reports);
    if let Some(tier) = tier {
        ranked.retain(|r| r.priority == tier);
    }

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "total": ranked.len(),
            "reports": ranked,
        })),
    )
}
