//! Route table and request handlers.

use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use keyproxy_gateway::{Gateway, GatewayRequest, GatewayResponse, Route};

const NOT_FOUND_BODY: &str = r#"{"error":"Not Found"}"#;

/// Register every route. The gateway must already be registered as
/// `web::Data<Gateway>` on the app.
pub fn configure_routes(cfg: &mut web::ServiceConfig, base_path: &str) {
    cfg.route("/health", web::get().to(health_check))
        .service(
            web::scope(base_path)
                .route("/generate", web::post().to(handle_generate))
                .route("/chat", web::post().to(handle_chat)),
        )
        .default_service(web::to(not_found));
}

async fn health_check() -> &'static str {
    "OK"
}

async fn handle_generate(gateway: web::Data<Gateway>, body: web::Bytes) -> HttpResponse {
    relay(&gateway, Route::Generate, body).await
}

async fn handle_chat(gateway: web::Data<Gateway>, body: web::Bytes) -> HttpResponse {
    relay(&gateway, Route::Chat, body).await
}

async fn relay(gateway: &Gateway, route: Route, body: web::Bytes) -> HttpResponse {
    let response = gateway.forward(GatewayRequest { route, body }).await;
    into_http(response)
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type(ContentType::json())
        .body(NOT_FOUND_BODY)
}

fn into_http(response: GatewayResponse) -> HttpResponse {
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status)
        .content_type(ContentType::json())
        .body(response.body)
}
