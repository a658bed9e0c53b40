//! Stormer: an API request execution service.

pub mod config;
pub mod execute;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod store;

pub use config::schema::StormerConfig;
pub use execute::{ExecuteService, OutboundRequestSpec, ResponseEnvelope};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::Stores;
