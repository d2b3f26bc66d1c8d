//! Provider-side documents as returned by the video host.

use serde::{Deserialize, Serialize};

/// Video object as stored by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteVideo {
    pub guid: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub video_library_id: Option<i64>,
    #[serde(default)]
    pub collection_id: Option<String>,
    /// Provider processing code (0 queued .. 5 failed).
    #[serde(default)]
    pub status: Option<u8>,
    #[serde(default)]
    pub encode_progress: Option<u32>,
    #[serde(default)]
    pub length: Option<u64>,
    /// Everything else the provider sends, kept for the metadata column.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Generic acknowledgement returned by fetch, update and delete calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAck {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status_code: Option<u16>,
}

impl ProviderAck {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
            status_code: Some(200),
        }
    }
}

/// One page of the provider's video listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteVideoPage {
    pub total_items: u64,
    pub current_page: u32,
    pub items_per_page: u32,
    pub items: Vec<RemoteVideo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_video_keeps_unknown_fields() {
        let json = serde_json::json!({
            "videoLibraryId": 42,
            "guid": "abc",
            "title": "Clip",
            "status": 3,
            "views": 10,
            "thumbnailFileName": "thumbnail.jpg"
        });

        let video: RemoteVideo = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(video.guid, "abc");
        assert_eq!(video.status, Some(3));
        assert_eq!(video.extra.get("views"), Some(&serde_json::json!(10)));

        let back = serde_json::to_value(&video).unwrap();
        assert_eq!(back["thumbnailFileName"], "thumbnail.jpg");
        assert_eq!(back["videoLibraryId"], 42);
    }

    #[test]
    fn test_ack_tolerates_missing_message() {
        let ack: ProviderAck =
            serde_json::from_str(r#"{"success":true,"statusCode":200}"#).unwrap();
        assert!(ack.success);
        assert!(ack.message.is_none());
        assert_eq!(ack.status_code, Some(200));
    }
}
