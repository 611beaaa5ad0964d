//! HTTP handlers for the Analysis Service API

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use pulse_core::{HealthStatus, ReadinessStatus};
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use crate::{AppState, Result};

/// Stats response
#[derive(Serialize)]
pub struct StatsResponse {
    pub uptime_secs: u64,
    pub requests_total: u64,
    pub requests_failed: u64,
    pub requests_in_flight: u64,
    pub frames_decoded: u64,
    pub frames_skipped: u64,
    pub latency_mean_ms: f64,
    pub latency_p99_ms: f64,
}

// ============================================
// Health & Metrics Handlers
// ============================================

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.health())
}

pub async fn ready(State(state): State<AppState>) -> Json<ReadinessStatus> {
    Json(state.readiness())
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let metrics = &state.metrics;

    Json(StatsResponse {
        uptime_secs: state.uptime_secs(),
        requests_total: metrics.requests_total.get(),
        requests_failed: metrics.requests_failed.get(),
        requests_in_flight: metrics.requests_in_flight.get(),
        frames_decoded: metrics.frames_decoded.get(),
        frames_skipped: metrics.frames_skipped.get(),
        latency_mean_ms: metrics.request_latency_ms.mean(),
        latency_p99_ms: metrics.request_latency_ms.percentile(99.0),
    })
}

// ============================================
// Analysis Handlers
// ============================================

/// Missing query parameters read as empty strings so validation reports them.
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisQuery {
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub dimension: String,
}

pub async fn analysis(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Response> {
    let span = tracing::info_span!(
        "analysis",
        request_id = %Uuid::new_v4(),
        duration = %query.duration,
        dimension = %query.dimension,
    );

    async move {
        let metrics = &state.metrics;
        let _in_flight = metrics.start_request();

        let report = match state.analyzer.analyze(&query.duration, &query.dimension).await {
            Ok(report) => report,
            Err(e) => {
                metrics.record_failure(&e);
                return Err(e.into());
            }
        };
        metrics.record_success(&report);

        let body = report.summary.to_json_bytes()?;
        Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
    }
    .instrument(span)
    .await
}
