use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, TimeDelta, Utc};

use crate::AppState;
use crate::client_ip::ClientIp;
use crate::error::AppError;
use crate::models::stats::{StatsQuery, StatsResponse};

pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}

async fn get_stats(
    State(state): State<AppState>,
    client_ip: ClientIp,
    Query(params): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, AppError> {
    tracing::info!("Stats requested from IP: {client_ip}");

    let force = params.force_refresh();
    let cached = state
        .stats
        .get(force, || state.upstream.fetch_stats())
        .await?;

    tracing::debug!(force, expired = cached.expired, "Served stats");

    Ok(Json(StatsResponse {
        success: true,
        data: Some(cached.stats),
        expired: cached.expired,
        updated_at: Some(serde_json::Value::String(format_updated_at(cached.fetched_at))),
    }))
}

/// `YYYY-MM-DD HH:MM:SS` at a fixed UTC+8 offset.
pub fn format_updated_at(ts: DateTime<Utc>) -> String {
    (ts.naive_utc() + TimeDelta::hours(8))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
