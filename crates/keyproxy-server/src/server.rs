//! Actix Web HTTP server.

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use keyproxy_config::ProxyConfig;
use keyproxy_gateway::Gateway;
use tracing::{info, warn};

use crate::routes::configure_routes;

pub async fn serve(config: ProxyConfig) -> Result<()> {
    let gateway = Gateway::from_config(&config).context("failed to build upstream client")?;
    if !gateway.has_api_key() {
        warn!("GEMINI_API_KEY is not set; forwarding routes will answer 500 until it is configured");
    }

    let gateway = web::Data::new(gateway);
    let base_path = config.server.base_path.clone();
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new({
        let base_path = base_path.clone();
        move || {
            App::new()
                .app_data(gateway.clone())
                .wrap(Cors::permissive())
                .configure(|cfg| configure_routes(cfg, &base_path))
        }
    })
    .bind(&addr)
    .with_context(|| format!("failed to bind {}", addr))?;

    info!(
        url = %format!("http://{}", addr),
        base_path = %base_path,
        model = %config.upstream.model,
        "keyproxy listening"
    );

    server.run().await.context("server error")?;

    Ok(())
}
