use crate::domain::video::{NewVideoRecord, RecordChanges, VideoRecord};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("video {0} already exists")]
    Duplicate(String),

    #[error("video {0} not found")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// Persistence of local video records, keyed by the provider's video id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Persist a new record. Fails with `Duplicate` if the remote id is taken.
    async fn insert(&self, record: NewVideoRecord) -> Result<VideoRecord, StoreError>;

    async fn find_by_remote_id(&self, remote_id: &str) -> Result<Option<VideoRecord>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<VideoRecord>, StoreError>;

    /// Apply the `Some` fields of `changes`. Fails with `NotFound` if absent.
    async fn update(
        &self,
        remote_id: &str,
        changes: RecordChanges,
    ) -> Result<VideoRecord, StoreError>;

    /// Returns whether a row was removed
    async fn delete(&self, remote_id: &str) -> Result<bool, StoreError>;

    async fn list_all(&self) -> Result<Vec<VideoRecord>, StoreError>;
}
