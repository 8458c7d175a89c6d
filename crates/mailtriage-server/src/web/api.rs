// crates/mailtriage-server/src/web/api.rs
// REST API handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use mailtriage_types::{
    AnalyzeRequest, AnalyzeResponse, EmailPayload, EmailStats, ProbeReport, ProcessedEmail,
    ServiceInfo, WebhookResponse,
};
use tracing::{info, warn};

use crate::web::error::ApiError;
use crate::web::state::AppState;

/// Built-in dashboard page
const DASHBOARD_HTML: &str = include_str!("../../assets/dashboard.html");

/// Routes advertised on the landing document
pub const ENDPOINTS: &[&str] = &["/webhook/email", "/analyze", "/emails", "/stats", "/test-groq"];

// ═══════════════════════════════════════
// HEALTH & HOME
// ═══════════════════════════════════════

pub async fn home(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        status: "running".to_string(),
        message: "Support email triage API".to_string(),
        dashboard: format!("{}/dashboard", state.public_url),
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
    })
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn dashboard(State(state): State<AppState>) -> Html<String> {
    if let Some(ref path) = state.dashboard_path {
        match tokio::fs::read_to_string(path).await {
            Ok(html) => return Html(html),
            Err(e) => warn!(path = %path.display(), error = %e, "Dashboard file unreadable, serving built-in page"),
        }
    }
    Html(DASHBOARD_HTML.to_string())
}

// ═══════════════════════════════════════
// CLASSIFIER PROBE
// ═══════════════════════════════════════

/// Raw upstream connectivity check (status code and body, uninterpreted)
pub async fn test_classifier(State(state): State<AppState>) -> Result<Json<ProbeReport>, ApiError> {
    state.classifier().probe().await.map(Json).map_err(|e| {
        warn!(kind = e.kind(), error = %e, "Classifier probe failed");
        ApiError::new(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
    })
}

// ═══════════════════════════════════════
// ANALYSIS
// ═══════════════════════════════════════

/// Webhook for the mail relay: analyze and store
pub async fn receive_email(
    State(state): State<AppState>,
    payload: Result<Json<EmailPayload>, JsonRejection>,
) -> Result<Json<WebhookResponse>, ApiError> {
    let Json(email) = payload?;

    let analysis = state.analyzer.analyze(email.subject(), email.content()).await;
    let processed = state.store.append(email, analysis).await?;

    info!(
        id = processed.id,
        category = %processed.analysis.category,
        priority = %processed.analysis.priority,
        fallback = processed.analysis.is_fallback(),
        "Email processed"
    );

    Ok(Json(WebhookResponse {
        success: true,
        data: processed,
    }))
}

/// Ad-hoc analysis; nothing is stored
pub async fn analyze(
    State(state): State<AppState>,
    request: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) = request?;
    let analysis = state.analyzer.analyze(&request.subject, &request.text).await;

    Ok(Json(AnalyzeResponse {
        success: true,
        analysis,
    }))
}

// ═══════════════════════════════════════
// STORED EMAILS
// ═══════════════════════════════════════

pub async fn list_emails(State(state): State<AppState>) -> Result<Json<Vec<ProcessedEmail>>, ApiError> {
    Ok(Json(state.store.list().await?))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<EmailStats>, ApiError> {
    Ok(Json(state.store.stats().await?))
}
