use crate::traits::DocumentSource;
use crate::types::{FetchConfig, QuizError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// HTTP-backed [`DocumentSource`].
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client })
    }

    pub async fn fetch_page(&self, url: &str, timeout: Duration) -> Result<String> {
        let start_time = Instant::now();
        debug!("Fetching page: {} (timeout {:?})", url, timeout);

        // Per-request timeout overrides the client default
        let response = self.client.get(url).timeout(timeout).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!("Fetching {} failed with HTTP {}", url, status);
            return Err(QuizError::HttpStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        // Redirects may have moved us
        let final_url = response.url().to_string();
        let content = response.text().await?;
        info!(
            "Fetched page: {} ({} bytes in {} ms)",
            final_url,
            content.len(),
            start_time.elapsed().as_millis()
        );
        Ok(content)
    }
}

#[async_trait]
impl DocumentSource for Fetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String> {
        self.fetch_page(url, timeout).await
    }
}
