//! HTTP request layer — thin axum routes over the coordinator.
//!
//! Routing and body validation only; every campaign rule lives behind the
//! coordinator's operations.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::campaign::coordinator::CampaignCoordinator;
use crate::campaign::state::CampaignStep;
use crate::campaign::stats::DispatchStats;
use crate::channel::ChannelDescriptor;
use crate::error::{CampaignError, Error, TemplateError};
use crate::template::{self, TemplateId, TemplateInfo};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<CampaignCoordinator>,
}

/// Build the axum router for the campaign API.
pub fn campaign_routes(coordinator: Arc<CampaignCoordinator>) -> Router {
    let state = AppState { coordinator };

    Router::new()
        .route("/health", get(health))
        .route("/api/intake", post(intake))
        .route("/api/channels", post(prepare_channels))
        .route("/api/dispatch", post(start_dispatch))
        .route("/api/dispatch/stop", post(stop_dispatch))
        .route("/api/stats", get(get_stats))
        .route("/api/templates", get(list_templates))
        .route("/api/templates/{id}", get(template_content))
        .with_state(state)
}

// ── Requests / responses ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct IntakeRequest {
    /// Newline-delimited address list.
    pub addresses: String,
}

#[derive(Debug, Deserialize)]
pub struct ChannelsRequest {
    pub candidates: Vec<ChannelDescriptor>,
}

#[derive(Debug, Deserialize)]
pub struct DispatchRequest {
    pub template: String,
    /// Raw override content; a non-empty value wins over the template file.
    #[serde(default)]
    pub custom: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub step: CampaignStep,
    pub stats: DispatchStats,
    pub success_rate: f64,
    pub active_channel_count: usize,
    pub leads_parsed: usize,
    pub campaigns_launched: u64,
    pub recipients_remaining: usize,
    pub current_template: TemplateId,
    pub templates: Vec<TemplateInfo>,
}

/// Maps domain errors onto HTTP responses.
pub struct ApiError(Error);

impl From<CampaignError> for ApiError {
    fn from(e: CampaignError) -> Self {
        Self(e.into())
    }
}

impl From<TemplateError> for ApiError {
    fn from(e: TemplateError) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Campaign(CampaignError::EmptyIntake) | Error::Template(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::Campaign(CampaignError::AlreadyDispatching) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

// ── Handlers ────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "mailburst"
    }))
}

async fn intake(
    State(state): State<AppState>,
    Json(req): Json<IntakeRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let accepted = state.coordinator.intake(&req.addresses).await?;
    Ok(Json(json!({ "accepted": accepted })))
}

async fn prepare_channels(
    State(state): State<AppState>,
    Json(req): Json<ChannelsRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let active = state.coordinator.prepare_channels(req.candidates).await?;
    Ok(Json(json!({ "active": active })))
}

async fn start_dispatch(
    State(state): State<AppState>,
    Json(req): Json<DispatchRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let template: TemplateId = req.template.parse()?;
    state.coordinator.start_dispatch(template, req.custom).await?;
    Ok(Json(json!({ "accepted": true })))
}

async fn stop_dispatch(State(state): State<AppState>) -> Json<serde_json::Value> {
    let stopped = state.coordinator.stop_dispatch().await;
    Json(json!({ "stopped": stopped }))
}

async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let snapshot = state.coordinator.snapshot().await;
    Json(StatsResponse {
        step: snapshot.step,
        success_rate: snapshot.stats.success_rate(),
        stats: snapshot.stats,
        active_channel_count: snapshot.active_channel_count,
        leads_parsed: snapshot.leads_parsed,
        campaigns_launched: snapshot.campaigns_launched,
        recipients_remaining: snapshot.recipients.len(),
        current_template: snapshot.template,
        templates: template::catalog(),
    })
}

async fn list_templates() -> Json<Vec<TemplateInfo>> {
    Json(template::catalog())
}

/// Raw template content. An unknown id serves the stub, matching the
/// content-lookup fallback contract.
async fn template_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<serde_json::Value> {
    let content = match id.parse::<TemplateId>() {
        Ok(template) => state.coordinator.template_content(template).await,
        Err(_) => template::STUB_CONTENT.to_string(),
    };
    Json(json!({ "content": content }))
}
