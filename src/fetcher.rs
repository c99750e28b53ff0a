use reqwest::{Client, Response};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure or a non-success HTTP status.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Thin GET leaf over a shared HTTP client. One `Fetcher` is built per
/// coordinator and cloned into every task so connections are pooled.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Issues a GET and hands back the response with its body unread, so
    /// the caller can stream it straight to disk. Non-2xx statuses are
    /// mapped to `FetchError` rather than treated as downloadable content.
    pub async fn fetch(&self, url: &Url) -> Result<Response, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;
        Ok(response)
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}
