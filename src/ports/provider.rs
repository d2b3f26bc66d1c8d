use crate::domain::remote::{ProviderAck, RemoteVideo, RemoteVideoPage};
use crate::domain::video::VideoPatch;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered with a non-2xx status.
    #[error("provider responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider request timed out: {0}")]
    Timeout(String),

    #[error("provider unreachable: {0}")]
    Transport(String),

    #[error("unexpected provider response: {0}")]
    Decode(String),
}

impl ProviderError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProviderError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Remote video host scoped to a single library.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Library every call is scoped to
    fn library_id(&self) -> String;

    /// Create an empty remote entry and return it
    async fn create_remote(
        &self,
        title: &str,
        collection_id: Option<String>,
    ) -> Result<RemoteVideo, ProviderError>;

    /// Ask the provider to ingest `source_url` into an existing entry
    async fn fetch_from_url(
        &self,
        remote_id: &str,
        source_url: &str,
    ) -> Result<ProviderAck, ProviderError>;

    /// Push a metadata patch
    async fn update_remote(
        &self,
        remote_id: &str,
        patch: &VideoPatch,
    ) -> Result<ProviderAck, ProviderError>;

    async fn delete_remote(&self, remote_id: &str) -> Result<ProviderAck, ProviderError>;

    async fn get_remote(&self, remote_id: &str) -> Result<RemoteVideo, ProviderError>;

    async fn list_remote(
        &self,
        page: u32,
        items_per_page: u32,
    ) -> Result<RemoteVideoPage, ProviderError>;
}
