use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// One analysis request, owned by the email that made it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: Uuid,
    pub user_email: String,
    pub search_url: String,
    /// Analyzer output, stored verbatim.
    pub search_response: serde_json::Value,
    #[sqlx(rename = "recorded_at")]
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewHistoryRecord {
    pub user_email: String,
    pub search_url: String,
    pub search_response: serde_json::Value,
    pub recorded_at: OffsetDateTime,
}
