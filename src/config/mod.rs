//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! stormer.toml
//!     → loader.rs (read, TOML → StormerConfig)
//!     → validation.rs (every semantic error collected, not just the first)
//!     → main.rs (logging, metrics, stores, listener)
//!     → HttpServer (executor runtime)
//!
//! On file change:
//!     watcher.rs (notify) → loader.rs → validation.rs
//!     → mpsc channel → server::apply_config → ArcSwap<Runtime>
//! ```
//!
//! # Design Decisions
//! - Every section is `#[serde(default)]`; an empty file is a valid config
//! - A rejected reload is logged and the running config stays in place
//! - Listener and CORS settings are read once at startup

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{
    CorsConfig, ExecutorConfig, HistoryConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    StorageConfig, StormerConfig,
};
pub use watcher::ConfigWatcher;
