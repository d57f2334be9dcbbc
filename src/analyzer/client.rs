use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::config::AnalyzerConfig;

/// External scraper/sentiment analyzer. Its response shape is owned by the
/// analyzer, so it is passed around as an opaque JSON document.
#[async_trait]
pub trait AnalyzerClient: Send + Sync {
    async fn analyze(&self, product_url: &str) -> anyhow::Result<serde_json::Value>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest<'a> {
    product_url: &'a str,
}

pub struct HttpAnalyzer {
    url: String,
    http_client: reqwest::Client,
}

impl HttpAnalyzer {
    pub fn new(config: &AnalyzerConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("reviewlens/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("build analyzer http client")?;
        Ok(Self {
            url: config.url.clone(),
            http_client,
        })
    }
}

#[async_trait]
impl AnalyzerClient for HttpAnalyzer {
    async fn analyze(&self, product_url: &str) -> anyhow::Result<serde_json::Value> {
        debug!(url = %self.url, "calling analyzer");

        let response = self
            .http_client
            .post(&self.url)
            .json(&AnalyzeRequest { product_url })
            .send()
            .await
            .context("analyzer request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("analyzer returned {}: {}", status, body));
        }

        response
            .json::<serde_json::Value>()
            .await
            .context("analyzer returned invalid JSON")
    }
}

#[cfg(test)]
pub mod fake {
    use std::sync::Mutex;

    use super::*;

    /// Answers every call with a fixed payload, or fails when built with `failing`.
    pub struct FakeAnalyzer {
        reply: Option<serde_json::Value>,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeAnalyzer {
        pub fn replying(reply: serde_json::Value) -> Self {
            Self {
                reply: Some(reply),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn failing() -> Self {
            Self {
                reply: None,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AnalyzerClient for FakeAnalyzer {
        async fn analyze(&self, product_url: &str) -> anyhow::Result<serde_json::Value> {
            self.calls.lock().unwrap().push(product_url.to_string());
            self.reply
                .clone()
                .ok_or_else(|| anyhow!("analyzer returned 500 Internal Server Error"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_product_url_key() {
        let body = serde_json::to_value(AnalyzeRequest {
            product_url: "https://shop.example/p/1",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"productUrl": "https://shop.example/p/1"}));
    }

    #[tokio::test]
    async fn unreachable_analyzer_is_an_error() {
        let analyzer = HttpAnalyzer::new(&AnalyzerConfig {
            url: "http://127.0.0.1:9/scrape".into(),
            timeout_secs: 2,
        })
        .unwrap();
        assert!(analyzer.analyze("https://shop.example/p/1").await.is_err());
    }
}
