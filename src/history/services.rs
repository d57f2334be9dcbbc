use time::OffsetDateTime;
use tracing::{debug, info};

use crate::{
    auth::AuthUser,
    error::AppError,
    history::{
        repo::HistoryStore,
        repo_types::{HistoryRecord, NewHistoryRecord},
    },
};

/// Persists one analysis under the caller's identity with a server-assigned timestamp.
pub async fn append(
    store: &dyn HistoryStore,
    owner: &AuthUser,
    search_url: String,
    search_response: serde_json::Value,
) -> Result<(), AppError> {
    if search_url.trim().is_empty() {
        return Err(AppError::validation("searchUrl is required"));
    }
    if search_response.is_null() {
        return Err(AppError::validation("searchResponse is required"));
    }

    store
        .insert(NewHistoryRecord {
            user_email: owner.email.clone(),
            search_url,
            search_response,
            recorded_at: OffsetDateTime::now_utc(),
        })
        .await?;
    info!(email = %owner.email, "search history saved");
    Ok(())
}

pub async fn list(
    store: &dyn HistoryStore,
    owner: &AuthUser,
) -> Result<Vec<HistoryRecord>, AppError> {
    let records = store.list_by_owner(&owner.email).await?;
    debug!(email = %owner.email, count = records.len(), "search history listed");
    Ok(records)
}
