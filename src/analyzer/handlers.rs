use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::{
    auth::AuthUser, error::AppError, extract::ApiJson, history::services as history,
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub product_url: String,
}

pub fn analyzer_routes() -> Router<AppState> {
    Router::new().route("/analyze", post(analyze))
}

/// Runs the analyzer, then records the result in the caller's history.
///
/// The two steps are independent: a failed append after a successful analysis
/// is reported as a server error and nothing is rolled back.
#[instrument(skip(state, user, payload), fields(email = %user.email))]
pub async fn analyze(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<AnalyzeRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if payload.product_url.trim().is_empty() {
        return Err(AppError::validation("productUrl is required"));
    }

    let report = state
        .analyzer
        .analyze(&payload.product_url)
        .await
        .map_err(|e| {
            warn!(url = %payload.product_url, "analysis failed");
            AppError::Upstream(e)
        })?;
    if report.is_null() {
        warn!(url = %payload.product_url, "analyzer returned an empty report");
        return Err(AppError::Upstream(anyhow::anyhow!("analyzer returned null")));
    }
    info!(url = %payload.product_url, "analysis complete");

    history::append(
        state.history.as_ref(),
        &user,
        payload.product_url,
        report.clone(),
    )
    .await?;

    Ok(Json(report))
}
