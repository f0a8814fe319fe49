mod builder;
mod cache;

use crate::error::{ClientError, Result};
use crate::{log_debug, log_error, log_warn};
use async_trait::async_trait;
pub use builder::ClientBuilder;
pub use cache::ResponseCache;
use rquest::Client as RquestClient;
use scraper::Html;
use std::future::Future;

/// One GET, one body. Implementations report every transport problem
/// (connection, timeout, non-2xx status, body read) as an error.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn get(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP session shared by every scraper for the lifetime of the process.
pub struct Client {
    inner: RquestClient,
    cache: Option<ResponseCache>,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Drops every cached response. A session without a cache has nothing to clear.
    pub fn clear_cache(&self) -> Result<usize> {
        match &self.cache {
            Some(cache) => cache.clear(),
            None => Ok(0),
        }
    }

    async fn request(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::ResponseError {
                status_code: status.as_u16(),
                url: url.to_string(),
            }
            .into());
        }

        let body = response.bytes().await.map_err(|e| {
            ClientError::RequestFailed(format!("Failed to read response body: {}", e))
        })?;

        Ok(body.to_vec())
    }
}

#[async_trait]
impl Fetch for Client {
    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        through_cache(self.cache.as_ref(), url, || self.request(url)).await
    }
}

/// Serves `url` from `cache` when present, otherwise runs `request` and
/// stores its body. A failed store is only logged.
async fn through_cache<F, Fut>(
    cache: Option<&ResponseCache>,
    url: &str,
    request: F,
) -> Result<Vec<u8>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<u8>>>,
{
    if let Some(body) = cache.and_then(|cache| cache.get(url)) {
        log_debug!("[client] Cache hit for {}", url);
        return Ok(body);
    }

    let body = request().await?;

    if let Some(cache) = cache {
        if let Err(e) = cache.put(url, &body) {
            log_warn!("[client] Failed to cache response for {}: {}", url, e);
        }
    }

    Ok(body)
}

/// Fetches raw bytes. Transport failures are logged and become `None`.
pub async fn fetch_bytes(session: &dyn Fetch, url: &str) -> Option<Vec<u8>> {
    match session.get(url).await {
        Ok(body) => Some(body),
        Err(e) => {
            log_error!(e => "[client] Failed to fetch {}", url);
            None
        }
    }
}

/// Fetches a page and decodes it as UTF-8 regardless of what the server claims.
pub async fn fetch_page(session: &dyn Fetch, url: &str) -> Option<String> {
    let body = fetch_bytes(session, url).await?;
    Some(String::from_utf8_lossy(&body).into_owned())
}

pub async fn fetch_document(session: &dyn Fetch, url: &str) -> Option<Html> {
    let text = fetch_page(session, url).await?;
    Some(Html::parse_document(&text))
}
