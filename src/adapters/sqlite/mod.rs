//! SQLite adapter for the `VideoRepository` port.

mod pool;
mod repository;

pub use pool::SqliteVideoStore;

/// Column list shared by every query returning a full record.
const VIDEO_COLUMNS: &str = "id, video_id, library_id, title, status, processing_status, \
     playable_link, metadata, created_at, updated_at";
