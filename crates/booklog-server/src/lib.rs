pub mod config;
pub mod handlers;
pub mod observability;
pub mod server;

pub use config::{AppConfig, LoggingConfig, SeedMember, ServerConfig};
pub use observability::init_tracing;
pub use server::{AppState, BooklogServer, ServerBuilder, build_app};
