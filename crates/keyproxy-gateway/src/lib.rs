//! keyproxy gateway - forwards client requests to the Gemini API with a
//! server-held key.
//!
//! The browser never sees the credential. Each inbound request is checked for
//! a configured key, forwarded verbatim to `models/<model>:generateContent`
//! with the key appended as a query parameter, and the upstream reply is
//! relayed back:
//! - success: the upstream JSON, unchanged
//! - upstream failure: the upstream status plus a wrapper carrying its body
//! - anything else: a generic 500 with no internal detail
//!
//! Nothing here knows about HTTP servers or serverless events; adapters build
//! a [`GatewayRequest`] and render the [`GatewayResponse`].

pub mod error;
pub mod gateway;
pub mod route;
pub mod upstream;

pub use error::GatewayError;
pub use gateway::{Gateway, GatewayRequest, GatewayResponse};
pub use route::Route;
pub use upstream::{HttpUpstream, UpstreamClient, UpstreamError, UpstreamReply};
