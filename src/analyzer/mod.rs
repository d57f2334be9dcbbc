pub mod client;
pub mod handlers;

use crate::state::AppState;
use axum::Router;

pub use client::{AnalyzerClient, HttpAnalyzer};

pub fn router() -> Router<AppState> {
    handlers::analyzer_routes()
}
