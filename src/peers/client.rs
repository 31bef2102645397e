use super::picker::PeerGetter;
use super::protocol::{PeerRequest, PeerResponse};
use crate::error::{CacheError, Result};

use async_trait::async_trait;
use std::time::Duration;

const RETRY_BASE_DELAY_MS: u64 = 150;
const RETRY_MAX_DELAY_MS: u64 = 1200;

/// HTTP client bound to one peer.
///
/// Connection errors are retried with exponential backoff. A timeout is not:
/// the owner may still be loading the key, and a second request would load it
/// again. A non-success status is a definitive answer and is never retried.
#[derive(Debug, Clone)]
pub struct HttpGetter {
    peer: String,
    base_path: String,
    http_client: reqwest::Client,
    timeout: Duration,
    attempts: usize,
}

impl HttpGetter {
    pub fn new(
        peer: String,
        base_path: String,
        http_client: reqwest::Client,
        timeout: Duration,
        attempts: usize,
    ) -> Self {
        Self {
            peer,
            base_path,
            http_client,
            timeout,
            attempts: attempts.max(1),
        }
    }

    pub fn url_for(&self, request: &PeerRequest) -> String {
        format!("{}{}", self.peer, request.to_path(&self.base_path))
    }

    async fn get_with_retry(&self, url: &str) -> Result<reqwest::Response> {
        let mut delay_ms = RETRY_BASE_DELAY_MS;

        for attempt in 0..self.attempts {
            let response = self
                .http_client
                .get(url)
                .timeout(self.timeout)
                .send()
                .await;

            match response {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    if !e.is_connect() || attempt + 1 == self.attempts {
                        return Err(CacheError::peer(&self.peer, e));
                    }
                    tracing::debug!(peer = %self.peer, attempt, "peer request failed, retrying: {}", e);
                    let jitter = rand::random::<u64>() % 50;
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(RETRY_MAX_DELAY_MS);
                }
            }
        }

        Err(CacheError::peer(&self.peer, "retry attempts exhausted"))
    }
}

#[async_trait]
impl PeerGetter for HttpGetter {
    fn peer(&self) -> &str {
        &self.peer
    }

    async fn get(&self, request: &PeerRequest) -> Result<Vec<u8>> {
        let url = self.url_for(request);
        let response = self.get_with_retry(&url).await?;

        if !response.status().is_success() {
            return Err(CacheError::peer(
                &self.peer,
                format!("server returned: {}", response.status()),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CacheError::peer(&self.peer, format!("reading response body: {}", e)))?;

        let decoded = PeerResponse::decode(&body)
            .map_err(|e| CacheError::peer(&self.peer, format!("decoding response body: {}", e)))?;

        Ok(decoded.value)
    }
}
