use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use keyproxy_gateway::error::INVALID_BODY_MESSAGE;
use keyproxy_gateway::{Gateway, GatewayRequest, Route};
use serde_json::json;
use tracing::{debug, warn};

use crate::event::{ProxyEvent, ProxyResponse};

const NOT_FOUND_BODY: &str = r#"{"error":"Not Found"}"#;
const METHOD_NOT_ALLOWED_BODY: &str = r#"{"error":"Method Not Allowed"}"#;
const FUNCTIONS_PREFIX: &str = "/.netlify/functions/";

/// Map a request path to a route.
///
/// Accepts the public form (`<base_path>/<route>`) and the raw function form
/// (`/.netlify/functions/<name>/<route>`) some platforms deliver when no
/// redirect rule rewrote the path.
pub fn resolve_route(path: &str, base_path: &str) -> Option<Route> {
    let path = path.trim_end_matches('/');
    let rest = match path.strip_prefix(base_path) {
        Some(rest) => rest,
        None => {
            let function_path = path.strip_prefix(FUNCTIONS_PREFIX)?;
            &function_path[function_path.find('/')?..]
        }
    };
    Route::from_segment(rest.strip_prefix('/')?)
}

/// Handle one proxy event end to end.
pub async fn handle_event(gateway: &Gateway, base_path: &str, event: ProxyEvent) -> ProxyResponse {
    let Some(route) = resolve_route(&event.path, base_path) else {
        debug!(path = %event.path, "no route for path");
        return ProxyResponse::json(404, NOT_FOUND_BODY);
    };

    if !event.http_method.eq_ignore_ascii_case("POST") {
        debug!(method = %event.http_method, route = route.label(), "method not allowed");
        return ProxyResponse::json(405, METHOD_NOT_ALLOWED_BODY).with_header("allow", "POST");
    }

    let body = match event_body(&event) {
        Ok(body) => body,
        Err(err) => {
            warn!(error = %err, route = route.label(), "event body flagged as base64 but failed to decode");
            return ProxyResponse::json(400, json!({ "error": INVALID_BODY_MESSAGE }).to_string());
        }
    };

    let response = gateway.forward(GatewayRequest { route, body }).await;
    ProxyResponse::from_json_bytes(response.status, &response.body)
}

fn event_body(event: &ProxyEvent) -> Result<Bytes, base64::DecodeError> {
    let Some(body) = event.body.as_deref() else {
        return Ok(Bytes::new());
    };
    if event.is_base64_encoded {
        STANDARD.decode(body).map(Bytes::from)
    } else {
        Ok(Bytes::copy_from_slice(body.as_bytes()))
    }
}
