//! HTTP-backed document source for the live league site.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::constants::HTTP_TIMEOUT;
use crate::core::{Error, Result};

use super::{Document, DocumentSource, ResourceKind, resource_url};

/// Fetches pages over HTTP with a shared connection pool.
pub struct HttpDocumentSource {
    client: Client,
    base_url: String,
}

impl HttpDocumentSource {
    /// Creates a source rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("matchday/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| Error::Transport { url: base_url.clone(), reason: err.to_string() })?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn fetch(&self, kind: ResourceKind, id: u32) -> Result<Document> {
        let url = resource_url(&self.base_url, kind, id);
        debug!(%url, "fetching page");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| Error::Transport { url: url.clone(), reason: err.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UnexpectedStatus { url, status: status.as_u16() });
        }

        let body = response
            .text()
            .await
            .map_err(|err| Error::Transport { url: url.clone(), reason: err.to_string() })?;

        Ok(Document::new(url, body))
    }
}
