//! Outbound call to the Gemini `generateContent` endpoint.

use async_trait::async_trait;
use bytes::Bytes;
use keyproxy_config::UpstreamConfig;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connect, DNS, timeout or body read failure. The request URL is
    /// stripped so the credential never reaches logs.
    #[error("upstream request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("invalid upstream endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.without_url())
    }
}

/// Raw upstream reply: status and undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: Bytes,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// POST `body` as JSON to the upstream with `api_key` attached.
    async fn generate_content(
        &self,
        api_key: &SecretString,
        body: Bytes,
    ) -> Result<UpstreamReply, UpstreamError>;
}

/// [`UpstreamClient`] backed by `reqwest`.
pub struct HttpUpstream {
    client: Client,
    endpoint: Url,
}

impl HttpUpstream {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(UpstreamError::Client)?;
        Self::with_client(client, config)
    }

    pub fn with_client(client: Client, config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let endpoint = Url::parse(&config.generate_content_url())?;
        Ok(Self { client, endpoint })
    }

    fn request_url(&self, api_key: &SecretString) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("key", api_key.expose_secret());
        url
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    async fn generate_content(
        &self,
        api_key: &SecretString,
        body: Bytes,
    ) -> Result<UpstreamReply, UpstreamError> {
        debug!(endpoint = %self.endpoint, bytes = body.len(), "forwarding to upstream");

        let response = self
            .client
            .post(self.request_url(api_key))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;

        debug!(status, bytes = body.len(), "upstream replied");
        Ok(UpstreamReply { status, body })
    }
}
