//! Ports - Trait definitions for the provider and the record store.

pub mod provider;
pub mod repository;

pub use provider::{ProviderError, VideoProvider};
pub use repository::{StoreError, VideoRepository};
