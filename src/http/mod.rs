//! HTTP surface subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, config reload)
//!     → request.rs (request ID, tracing span)
//!     → handlers.rs (execute, health, history) / resources.rs (collections, environments)
//!     → response.rs (envelope → status code)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod resources;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::ApiError;
pub use server::{build_router, AppState, HttpServer};
