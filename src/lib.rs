//! Website form intake service library.

// Core subsystems
pub mod config;
pub mod forms;
pub mod http;
pub mod news;
pub mod store;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::PersistenceGateway;
