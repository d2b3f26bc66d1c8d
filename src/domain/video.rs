use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Embed player base used to build playable links.
pub const PLAYER_BASE_URL: &str = "https://iframe.mediadelivery.net/play";

/// Title stored when the caller does not provide one.
pub const DEFAULT_TITLE: &str = "Untitled Video";

/// Highest processing code the provider reports through webhooks.
pub const MAX_PROCESSING_CODE: u8 = 5;

/// Build the embeddable player URL for a video.
pub fn playable_link(library_id: &str, remote_video_id: &str) -> String {
    format!("{}/{}/{}", PLAYER_BASE_URL, library_id, remote_video_id)
}

/// Local lifecycle label of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoState {
    Uploading,
    Processing,
    Success,
    Failed,
}

impl VideoState {
    /// Map a provider processing code onto a local label.
    ///
    /// Codes 0..=2 are queued/processing/encoding, 3 and 4 mean the video is
    /// playable (finished or a resolution finished) and 5 is a failed encode.
    /// Anything above 5 is treated as a failure.
    pub fn from_processing_code(code: u8) -> Self {
        match code {
            0..=2 => VideoState::Processing,
            3 | 4 => VideoState::Success,
            _ => VideoState::Failed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoState::Uploading => "uploading",
            VideoState::Processing => "processing",
            VideoState::Success => "success",
            VideoState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, VideoState::Success | VideoState::Failed)
    }
}

impl fmt::Display for VideoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVideoState(pub String);

impl fmt::Display for UnknownVideoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown video state '{}'", self.0)
    }
}

impl std::error::Error for UnknownVideoState {}

impl FromStr for VideoState {
    type Err = UnknownVideoState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uploading" => Ok(VideoState::Uploading),
            "processing" => Ok(VideoState::Processing),
            "success" => Ok(VideoState::Success),
            "failed" => Ok(VideoState::Failed),
            other => Err(UnknownVideoState(other.to_string())),
        }
    }
}

/// A local record mirroring one provider video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: i64,
    pub remote_video_id: String,
    pub remote_library_id: String,
    pub title: String,
    pub status: VideoState,
    pub processing_status: u8,
    pub playable_link: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to persist a freshly created video.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVideoRecord {
    pub remote_video_id: String,
    pub remote_library_id: String,
    pub title: Option<String>,
    pub status: VideoState,
    pub processing_status: u8,
    pub playable_link: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl NewVideoRecord {
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }
}

/// Partial update applied to a stored record. `None` leaves the column as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordChanges {
    pub title: Option<String>,
    pub status: Option<VideoState>,
    pub processing_status: Option<u8>,
    pub metadata: Option<serde_json::Value>,
}

impl RecordChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.status.is_none()
            && self.processing_status.is_none()
            && self.metadata.is_none()
    }

    /// Status change derived from a provider processing code.
    pub fn from_processing_code(code: u8) -> Self {
        Self {
            status: Some(VideoState::from_processing_code(code)),
            processing_status: Some(code),
            ..Self::default()
        }
    }
}

/// Input for creating a video from a remote source URL.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateVideo {
    pub title: Option<String>,
    pub source_url: String,
    pub collection_id: Option<String>,
}

/// Metadata patch pushed to the provider and mirrored locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
}

impl VideoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.collection_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playable_link_format() {
        assert_eq!(
            playable_link("42", "abc"),
            "https://iframe.mediadelivery.net/play/42/abc"
        );
    }

    #[test]
    fn test_state_from_processing_code() {
        for code in 0..=2 {
            assert_eq!(
                VideoState::from_processing_code(code),
                VideoState::Processing
            );
        }
        assert_eq!(VideoState::from_processing_code(3), VideoState::Success);
        assert_eq!(VideoState::from_processing_code(4), VideoState::Success);
        assert_eq!(VideoState::from_processing_code(5), VideoState::Failed);
    }

    #[test]
    fn test_state_round_trips_through_str() {
        for state in [
            VideoState::Uploading,
            VideoState::Processing,
            VideoState::Success,
            VideoState::Failed,
        ] {
            assert_eq!(state.as_str().parse::<VideoState>(), Ok(state));
        }
        assert!("done".parse::<VideoState>().is_err());
    }

    #[test]
    fn test_state_serializes_lowercase() {
        let json = serde_json::to_string(&VideoState::Success).unwrap();
        assert_eq!(json, "\"success\"");
    }

    #[test]
    fn test_new_record_title_default() {
        let record = NewVideoRecord {
            remote_video_id: "abc".into(),
            remote_library_id: "42".into(),
            title: None,
            status: VideoState::Uploading,
            processing_status: 0,
            playable_link: None,
            metadata: None,
        };
        assert_eq!(record.title_or_default(), DEFAULT_TITLE);
    }

    #[test]
    fn test_changes_from_processing_code() {
        let changes = RecordChanges::from_processing_code(5);
        assert_eq!(changes.status, Some(VideoState::Failed));
        assert_eq!(changes.processing_status, Some(5));
        assert!(changes.title.is_none());
        assert!(!changes.is_empty());
        assert!(RecordChanges::default().is_empty());
    }

    #[test]
    fn test_patch_skips_absent_fields() {
        let patch = VideoPatch {
            title: Some("New".into()),
            collection_id: None,
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "New" }));
    }
}
