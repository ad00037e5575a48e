//! Gateway error types and their client-facing rendering.

use bytes::Bytes;
use serde::Serialize;
use serde_json::value::RawValue;
use thiserror::Error;

use crate::upstream::UpstreamError;

pub const MISSING_API_KEY_MESSAGE: &str = "API key is not configured on the server.";
pub const INVALID_BODY_MESSAGE: &str = "Invalid JSON in request body";
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to fetch from Google AI API";

const INTERNAL_ERROR_BODY: &[u8] = br#"{"error":"Internal Server Error"}"#;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("request body is not valid JSON: {0}")]
    InvalidBody(#[source] serde_json::Error),

    #[error("upstream responded with status {status}")]
    Upstream {
        status: u16,
        details: Box<RawValue>,
    },

    #[error(transparent)]
    Transport(#[from] UpstreamError),

    #[error("upstream response is not valid JSON: {0}")]
    MalformedUpstreamResponse(#[source] serde_json::Error),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

#[derive(Serialize)]
struct UpstreamErrorBody<'a> {
    error: &'a str,
    details: &'a RawValue,
}

impl GatewayError {
    /// Status code reported to the client.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingApiKey => 500,
            Self::InvalidBody(_) => 400,
            Self::Upstream { status, .. } => *status,
            Self::Transport(_) | Self::MalformedUpstreamResponse(_) => 500,
        }
    }

    /// JSON payload reported to the client. Only upstream failures carry
    /// detail; transport problems collapse to a generic message.
    pub fn client_body(&self) -> Bytes {
        match self {
            Self::MissingApiKey => encode(&ErrorBody {
                error: MISSING_API_KEY_MESSAGE,
            }),
            Self::InvalidBody(_) => encode(&ErrorBody {
                error: INVALID_BODY_MESSAGE,
            }),
            Self::Upstream { details, .. } => encode(&UpstreamErrorBody {
                error: UPSTREAM_FAILURE_MESSAGE,
                details,
            }),
            Self::Transport(_) | Self::MalformedUpstreamResponse(_) => {
                Bytes::from_static(INTERNAL_ERROR_BODY)
            }
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Bytes {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .unwrap_or_else(|_| Bytes::from_static(INTERNAL_ERROR_BODY))
}

/// Classify a non-success upstream reply. A JSON body is relayed as
/// `details`; an empty or non-JSON body is treated as a malformed response.
pub(crate) fn upstream_failure(status: u16, body: &[u8]) -> GatewayError {
    match serde_json::from_slice::<Box<RawValue>>(body) {
        Ok(details) => GatewayError::Upstream { status, details },
        Err(err) => GatewayError::MalformedUpstreamResponse(err),
    }
}
