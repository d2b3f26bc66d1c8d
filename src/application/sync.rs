use crate::domain::remote::{ProviderAck, RemoteVideo, RemoteVideoPage};
use crate::domain::video::{
    playable_link, CreateVideo, NewVideoRecord, RecordChanges, VideoPatch, VideoRecord, VideoState,
    DEFAULT_TITLE, MAX_PROCESSING_CODE,
};
use crate::ports::provider::{ProviderError, VideoProvider};
use crate::ports::repository::{StoreError, VideoRepository};
use thiserror::Error;
use tracing::{error, info, warn};

/// First provider code that is persisted by the webhook path.
const FIRST_SETTLED_CODE: u8 = 3;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Remote(#[from] ProviderError),

    #[error("video {0} not found")]
    NotFound(String),

    #[error("video {0} already exists")]
    Duplicate(String),

    #[error("processing status {0} is out of range")]
    InvalidStatusCode(u8),

    #[error("storage failure: {0}")]
    Storage(#[source] StoreError),
}

impl From<StoreError> for SyncError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(id) => SyncError::Duplicate(id),
            StoreError::NotFound(id) => SyncError::NotFound(id),
            other => SyncError::Storage(other),
        }
    }
}

/// Result of a successful create.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedVideo {
    pub record: VideoRecord,
    /// Provider's answer to the ingest request
    pub fetch: ProviderAck,
}

/// Result of a status webhook.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    /// Provider still working on the video; nothing was written.
    Processing { remote_id: String, code: u8 },
    Updated(VideoRecord),
}

/// Keeps local video records and the provider library in step.
///
/// Mutations follow one ordering: check the local record, change the provider,
/// then change the local row. A failure at any step aborts without undoing the
/// steps already taken.
pub struct VideoSyncService<P, R> {
    provider: P,
    repo: R,
}

impl<P, R> VideoSyncService<P, R>
where
    P: VideoProvider,
    R: VideoRepository,
{
    pub fn new(provider: P, repo: R) -> Self {
        Self { provider, repo }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn create_video(&self, input: CreateVideo) -> Result<CreatedVideo, SyncError> {
        let title = input.title.as_deref().unwrap_or(DEFAULT_TITLE);

        // 1. Placeholder entry on the provider
        let remote = self
            .provider
            .create_remote(title, input.collection_id.clone())
            .await?;
        let remote_id = remote.guid.clone();
        info!(remote_id = %remote_id, "Created remote video entry");

        // 2. Ingest from source URL
        let fetch = self
            .provider
            .fetch_from_url(&remote_id, &input.source_url)
            .await?;
        if !fetch.success {
            warn!(
                remote_id = %remote_id,
                message = ?fetch.message,
                "Provider refused to fetch source"
            );
        }

        // 3. Local record
        let library_id = self.provider.library_id();
        let (status, processing_status) = if fetch.success {
            (VideoState::Uploading, 0)
        } else {
            (VideoState::Failed, MAX_PROCESSING_CODE)
        };
        let record = NewVideoRecord {
            playable_link: Some(playable_link(&library_id, &remote_id)),
            remote_video_id: remote_id.clone(),
            remote_library_id: library_id,
            title: input.title,
            status,
            processing_status,
            metadata: serde_json::to_value(&remote).ok(),
        };

        let record = self.repo.insert(record).await.map_err(|e| {
            error!(remote_id = %remote_id, error = %e, "Remote video has no local record");
            SyncError::from(e)
        })?;

        info!(remote_id = %remote_id, id = record.id, status = %record.status, "Video created");
        Ok(CreatedVideo { record, fetch })
    }

    pub async fn update_video(
        &self,
        remote_id: &str,
        patch: VideoPatch,
    ) -> Result<VideoRecord, SyncError> {
        let existing = self.require(remote_id).await?;
        if patch.is_empty() {
            return Ok(existing);
        }

        self.provider.update_remote(remote_id, &patch).await?;
        info!(remote_id, "Updated remote video");

        // Metadata refresh is best effort; the provider already holds the change.
        let metadata = match self.provider.get_remote(remote_id).await {
            Ok(remote) => serde_json::to_value(&remote).ok(),
            Err(e) => {
                warn!(remote_id, error = %e, "Could not refresh remote metadata");
                None
            }
        };

        let changes = RecordChanges {
            title: patch.title,
            metadata,
            ..RecordChanges::default()
        };
        if changes.is_empty() {
            return Ok(existing);
        }

        let record = self.repo.update(remote_id, changes).await.map_err(|e| {
            warn!(remote_id, error = %e, "Remote updated but local update failed");
            SyncError::from(e)
        })?;
        Ok(record)
    }

    /// Delete locally known video on both sides. Returns the removed record.
    pub async fn delete_video(&self, remote_id: &str) -> Result<VideoRecord, SyncError> {
        let existing = self.require(remote_id).await?;

        self.provider.delete_remote(remote_id).await?;
        info!(remote_id, "Deleted remote video");

        if !self.repo.delete(remote_id).await? {
            warn!(remote_id, "Local record vanished before delete");
        }
        Ok(existing)
    }

    pub async fn handle_status_webhook(
        &self,
        remote_id: &str,
        code: u8,
    ) -> Result<WebhookOutcome, SyncError> {
        if code > MAX_PROCESSING_CODE {
            return Err(SyncError::InvalidStatusCode(code));
        }
        if code < FIRST_SETTLED_CODE {
            return Ok(WebhookOutcome::Processing {
                remote_id: remote_id.to_string(),
                code,
            });
        }

        let existing = self.require(remote_id).await?;
        if existing.status.is_terminal() {
            // No transition guard: a settled video may flip again.
            info!(remote_id, from = %existing.status, code, "Overwriting settled status");
        }

        let record = self
            .repo
            .update(remote_id, RecordChanges::from_processing_code(code))
            .await?;
        info!(remote_id, code, status = %record.status, "Applied status webhook");
        Ok(WebhookOutcome::Updated(record))
    }

    pub async fn list_videos(&self) -> Result<Vec<VideoRecord>, SyncError> {
        Ok(self.repo.list_all().await?)
    }

    pub async fn get_video(&self, remote_id: &str) -> Result<VideoRecord, SyncError> {
        self.require(remote_id).await
    }

    pub async fn get_video_by_local_id(&self, id: i64) -> Result<VideoRecord, SyncError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| SyncError::NotFound(id.to_string()))
    }

    /// Live provider view of a video, without touching the local store.
    pub async fn get_remote_video(&self, remote_id: &str) -> Result<RemoteVideo, SyncError> {
        Ok(self.provider.get_remote(remote_id).await?)
    }

    pub async fn list_remote_videos(
        &self,
        page: u32,
        items_per_page: u32,
    ) -> Result<RemoteVideoPage, SyncError> {
        Ok(self.provider.list_remote(page, items_per_page).await?)
    }

    async fn require(&self, remote_id: &str) -> Result<VideoRecord, SyncError> {
        self.repo
            .find_by_remote_id(remote_id)
            .await?
            .ok_or_else(|| SyncError::NotFound(remote_id.to_string()))
    }
}
