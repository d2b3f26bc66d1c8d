//! Vidsync - Bunny Stream video catalogue sync
//!
//! Hexagonal Architecture:
//! - domain/: Video records, lifecycle states and provider documents
//! - ports/: Trait definitions (provider, record store)
//! - adapters/: Concrete implementations (Bunny HTTP client, SQLite, axum API)
//! - application/: Generic sync service
//! - config: Environment configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports for convenience
pub use adapters::bunny::BunnyClient;
pub use adapters::sqlite::SqliteVideoStore;
pub use application::VideoSyncService;
pub use config::AppConfig;
