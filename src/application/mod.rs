//! Application layer - Services that use ports.

pub mod sync;

pub use sync::{CreatedVideo, SyncError, VideoSyncService, WebhookOutcome};
