use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    auth::AuthUser,
    error::{AppError, MessageBody},
    extract::ApiJson,
    history::{dto::AppendHistoryRequest, repo_types::HistoryRecord, services},
    state::AppState,
};

pub fn history_routes() -> Router<AppState> {
    Router::new().route("/search-history", get(list_history).post(append_history))
}

#[instrument(skip(state, user, payload), fields(email = %user.email))]
pub async fn append_history(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<AppendHistoryRequest>,
) -> Result<(StatusCode, Json<MessageBody>), AppError> {
    services::append(
        state.history.as_ref(),
        &user,
        payload.search_url,
        payload.search_response,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageBody {
            message: "Search history saved".into(),
        }),
    ))
}

#[instrument(skip(state, user), fields(email = %user.email))]
pub async fn list_history(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<HistoryRecord>>, AppError> {
    let records = services::list(state.history.as_ref(), &user).await?;
    Ok(Json(records))
}
