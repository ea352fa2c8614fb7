use super::model::Article;
use super::provider::Provider;
use crate::config::RuntimeConfig;
use anyhow::{Context, Result, bail};
use futures_util::FutureExt;
use futures_util::StreamExt;
use futures_util::future::BoxFuture;
use reqwest::Client;
use std::time::Duration;

/// Anything that can answer a search query with filtered articles. The
/// session loop and tests only ever see this trait; the HTTP client below is
/// the one real implementation.
pub trait NewsSource: Send + Sync {
    fn search(&self, query: String) -> BoxFuture<'static, Result<Vec<Article>>>;
}

pub struct HttpNewsSource {
    client: Client,
    provider: Provider,
    endpoint: String,
    api_key: String,
    language: String,
    result_limit: u32,
}

impl HttpNewsSource {
    pub fn new(cfg: &RuntimeConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent("news-search/0.1")
            .gzip(true)
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self {
            client,
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            api_key: cfg.api_key.clone(),
            language: cfg.language.clone(),
            result_limit: cfg.result_limit,
        })
    }
}

impl NewsSource for HttpNewsSource {
    fn search(&self, query: String) -> BoxFuture<'static, Result<Vec<Article>>> {
        let client = self.client.clone();
        let provider = self.provider;
        let url = provider.search_url(
            &self.endpoint,
            &query,
            &self.api_key,
            &self.language,
            self.result_limit,
        );
        async move {
            let url = url?;
            let resp = client
                .get(url)
                .send()
                .await
                .context("failed to reach news endpoint")?;
            if !resp.status().is_success() {
                bail!("news endpoint returned {}", resp.status());
            }

            // Stream with a max size limit
            let mut stream = resp.bytes_stream();
            let mut buf: Vec<u8> = Vec::new();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.context("failed to read response body")?;
                if buf.len() + chunk.len() > max_body_bytes() {
                    bail!("response body too large (>{} bytes)", max_body_bytes());
                }
                buf.extend_from_slice(&chunk);
            }

            provider
                .parse_articles(&buf)
                .context("unexpected response shape from news endpoint")
        }
        .boxed()
    }
}

fn max_body_bytes() -> usize {
    // 2 MB cap
    2 * 1024 * 1024
}
