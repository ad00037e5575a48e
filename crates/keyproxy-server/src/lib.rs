//! Standalone keyproxy server.
//!
//! Mounts the forwarding gateway on an Actix Web server:
//! - `POST <base>/generate`
//! - `POST <base>/chat`
//! - `GET /health`
//!
//! `<base>` defaults to `/api`. Static assets are not served here; they live
//! behind whatever fronts the proxy, outside the API prefix.

pub mod routes;
pub mod server;

pub use routes::configure_routes;
pub use server::serve;
