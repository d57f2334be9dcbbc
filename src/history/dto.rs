use serde::Deserialize;

/// Body of `POST /search-history`. Unknown fields (e.g. a client-sent
/// `userEmail`) are ignored; the owner always comes from the token.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendHistoryRequest {
    pub search_url: String,
    pub search_response: serde_json::Value,
}
