//! Configuration for the keyproxy forwarding gateway
//!
//! All settings come from the process environment (optionally seeded from a
//! `.env` file) and are read once at startup. The resulting [`ProxyConfig`] is
//! immutable and shared by reference with the gateway and its adapters.

pub mod error;
pub mod loader;
pub mod schema;

pub use error::ConfigError;
pub use loader::{load_dotenv, load_dotenv_from};
pub use schema::{normalize_base_path, ProxyConfig, ServerConfig, UpstreamConfig};
