use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use keyproxy_config::ProxyConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::de::{Error as _, IgnoredAny};
use tracing::{error, info, warn};

use crate::error::{upstream_failure, GatewayError};
use crate::route::Route;
use crate::upstream::{HttpUpstream, UpstreamClient, UpstreamError};

const EMPTY_OBJECT: &[u8] = b"{}";

#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub route: Route,
    pub body: Bytes,
}

/// Status and JSON body to hand back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: Bytes,
}

impl GatewayRequest {
    pub fn new(route: Route, body: impl Into<Bytes>) -> Self {
        Self {
            route,
            body: body.into(),
        }
    }
}

impl From<&GatewayError> for GatewayResponse {
    fn from(err: &GatewayError) -> Self {
        Self {
            status: err.status_code(),
            body: err.client_body(),
        }
    }
}

/// Forwards requests upstream with the server-held credential.
///
/// Holds no per-request state; one instance serves every route and every
/// concurrent request.
pub struct Gateway {
    api_key: Option<SecretString>,
    upstream: Arc<dyn UpstreamClient>,
}

impl Gateway {
    pub fn new(api_key: Option<SecretString>, upstream: Arc<dyn UpstreamClient>) -> Self {
        Self { api_key, upstream }
    }

    pub fn from_config(config: &ProxyConfig) -> Result<Self, UpstreamError> {
        let upstream = HttpUpstream::new(&config.upstream)?;
        Ok(Self::new(config.api_key.clone(), Arc::new(upstream)))
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }

    /// Forward one request. Never fails: every outcome is rendered as a
    /// status and JSON body.
    pub async fn forward(&self, request: GatewayRequest) -> GatewayResponse {
        let route = request.route;
        let started = Instant::now();

        match self.try_forward(request).await {
            Ok(body) => {
                info!(
                    route = route.label(),
                    status = 200,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "request forwarded"
                );
                GatewayResponse { status: 200, body }
            }
            Err(err) => {
                log_failure(route, &err);
                GatewayResponse::from(&err)
            }
        }
    }

    async fn try_forward(&self, request: GatewayRequest) -> Result<Bytes, GatewayError> {
        let api_key = self.api_key().ok_or(GatewayError::MissingApiKey)?;
        let body = inbound_body(request.body)?;

        let reply = self.upstream.generate_content(api_key, body).await?;

        if !reply.is_success() {
            return Err(upstream_failure(reply.status, &reply.body));
        }

        serde_json::from_slice::<IgnoredAny>(&reply.body)
            .map_err(GatewayError::MalformedUpstreamResponse)?;
        Ok(reply.body)
    }

    fn api_key(&self) -> Option<&SecretString> {
        self.api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
    }
}

/// An empty body forwards as `{}`; anything else must be a well-formed JSON
/// object or array and is forwarded byte-for-byte.
fn inbound_body(body: Bytes) -> Result<Bytes, GatewayError> {
    let Some(first) = body.iter().find(|b| !b.is_ascii_whitespace()) else {
        return Ok(Bytes::from_static(EMPTY_OBJECT));
    };
    if !matches!(first, b'{' | b'[') {
        return Err(GatewayError::InvalidBody(serde_json::Error::custom(
            "request body must be a JSON object or array",
        )));
    }
    serde_json::from_slice::<IgnoredAny>(&body).map_err(GatewayError::InvalidBody)?;
    Ok(body)
}

fn log_failure(route: Route, err: &GatewayError) {
    match err {
        GatewayError::MissingApiKey => {
            error!(route = route.label(), "API key is not configured on the server");
        }
        GatewayError::InvalidBody(e) => {
            warn!(route = route.label(), error = %e, "rejected malformed request body");
        }
        GatewayError::Upstream { status, details } => {
            error!(
                route = route.label(),
                status,
                details = details.get(),
                "Error from Google API"
            );
        }
        GatewayError::Transport(_) | GatewayError::MalformedUpstreamResponse(_) => {
            error!(route = route.label(), error = %err, "proxy error");
        }
    }
}
