use crate::analyzer::{AnalyzerClient, HttpAnalyzer};
use crate::auth::repo::{PgUserStore, UserStore};
use crate::config::AppConfig;
use crate::db;
use crate::history::repo::{HistoryStore, PgHistoryStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub history: Arc<dyn HistoryStore>,
    pub analyzer: Arc<dyn AnalyzerClient>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let pool = db::connect(&config).await?;
        if let Err(e) = db::migrate(&pool).await {
            tracing::warn!(error = %format!("{e:#}"), "migration failed; continuing");
        }

        let analyzer = Arc::new(HttpAnalyzer::new(&config.analyzer)?) as Arc<dyn AnalyzerClient>;

        Ok(Self::from_parts(
            config,
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgHistoryStore::new(pool)),
            analyzer,
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        history: Arc<dyn HistoryStore>,
        analyzer: Arc<dyn AnalyzerClient>,
    ) -> Self {
        Self {
            config,
            users,
            history,
            analyzer,
        }
    }
}

#[cfg(test)]
impl AppState {
    pub fn test_config() -> Arc<AppConfig> {
        Arc::new(AppConfig {
            database_url: "postgres://unused".into(),
            jwt: crate::config::JwtConfig {
                secret: "test-secret".into(),
                issuer: "test".into(),
                audience: "test".into(),
                ttl_minutes: 60,
            },
            analyzer: crate::config::AnalyzerConfig {
                url: "http://analyzer.invalid/scrape".into(),
                timeout_secs: 1,
            },
        })
    }

    /// In-memory stores and an analyzer that always answers `{"summary": "ok"}`.
    pub fn fake() -> Self {
        use crate::analyzer::client::fake::FakeAnalyzer;
        use crate::auth::repo::mem::MemUserStore;
        use crate::history::repo::mem::MemHistoryStore;

        Self::from_parts(
            Self::test_config(),
            Arc::new(MemUserStore::default()),
            Arc::new(MemHistoryStore::default()),
            Arc::new(FakeAnalyzer::replying(serde_json::json!({"summary": "ok"}))),
        )
    }
}
