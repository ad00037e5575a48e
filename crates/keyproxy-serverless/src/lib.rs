//! Serverless adapter for the keyproxy gateway.
//!
//! Functions platforms (Netlify, AWS Lambda behind API Gateway) hand the
//! function a proxy event describing one HTTP request and expect a proxy
//! response document back. This crate translates between those documents and
//! the transport-agnostic gateway.

pub mod event;
pub mod handler;

pub use event::{ProxyEvent, ProxyResponse};
pub use handler::{handle_event, resolve_route};
