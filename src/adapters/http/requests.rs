//! Request bodies and their validation rules.

use super::error::ApiError;
use crate::domain::video::{CreateVideo, VideoPatch, MAX_PROCESSING_CODE};
use serde::Deserialize;
use std::borrow::Cow;
use url::Url;
use uuid::Uuid;
use validator::{Validate, ValidationError};

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn validate_uuid(value: &str) -> Result<(), ValidationError> {
    Uuid::try_parse(value)
        .map(|_| ())
        .map_err(|_| invalid("uuid", "Must be a valid UUID"))
}

fn validate_source_url(value: &str) -> Result<(), ValidationError> {
    let url = Url::parse(value)
        .map_err(|_| invalid("url", "Please provide a valid HTTP or HTTPS URL"))?;
    let has_host = url.host_str().map(|h| !h.is_empty()).unwrap_or(false);
    if matches!(url.scheme(), "http" | "https") && has_host {
        Ok(())
    } else {
        Err(invalid("url", "Please provide a valid HTTP or HTTPS URL"))
    }
}

/// `POST /videos`
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoRequest {
    #[validate(
        required(message = "The video URL is required"),
        custom(function = "validate_source_url")
    )]
    pub url: Option<String>,

    #[validate(length(
        min = 1,
        max = 255,
        message = "The video title must be between 1 and 255 characters"
    ))]
    pub title: Option<String>,

    #[validate(custom(function = "validate_uuid"))]
    pub collection_id: Option<String>,
}

impl CreateVideoRequest {
    pub fn into_command(self) -> Result<CreateVideo, ApiError> {
        let source_url = self.url.ok_or_else(|| {
            ApiError::invalid_field("url", "required", "The video URL is required")
        })?;
        Ok(CreateVideo {
            title: self.title,
            source_url,
            collection_id: self.collection_id,
        })
    }
}

/// `POST /videos/{id}`
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVideoRequest {
    #[validate(length(max = 255, message = "Title must not exceed 255 characters"))]
    pub title: Option<String>,

    #[validate(custom(function = "validate_uuid"))]
    pub collection_id: Option<String>,
}

impl From<UpdateVideoRequest> for VideoPatch {
    fn from(req: UpdateVideoRequest) -> Self {
        VideoPatch {
            title: req.title,
            collection_id: req.collection_id,
        }
    }
}

/// `POST /videos/webhook`, in the provider's casing.
#[derive(Debug, Deserialize, Validate)]
pub struct StatusWebhookRequest {
    #[serde(rename = "VideoLibraryId", default)]
    pub video_library_id: Option<i64>,

    #[serde(rename = "VideoGuid")]
    #[validate(
        required(message = "Video GUID is required for webhook processing"),
        custom(function = "validate_uuid")
    )]
    pub video_guid: Option<String>,

    #[serde(rename = "Status")]
    #[validate(
        required(message = "Processing status is required"),
        range(min = 0, max = 5, message = "Invalid processing status")
    )]
    pub status: Option<i64>,
}

impl StatusWebhookRequest {
    /// Remote id and status code, once validated.
    pub fn into_parts(self) -> Result<(String, u8), ApiError> {
        let guid = self
            .video_guid
            .as_deref()
            .and_then(canonical_guid)
            .ok_or_else(|| {
                ApiError::invalid_field("VideoGuid", "uuid", "Video GUID must be a valid UUID")
            })?;
        let status = self
            .status
            .and_then(|s| u8::try_from(s).ok())
            .filter(|s| *s <= MAX_PROCESSING_CODE)
            .ok_or_else(|| {
                ApiError::invalid_field(
                    "Status",
                    "range",
                    "Processing status must be between 0 and 5",
                )
            })?;
        Ok((guid, status))
    }
}

/// `GET /videos/remote`
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RemotePageQuery {
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u32>,

    #[validate(range(
        min = 1,
        max = 1000,
        message = "itemsPerPage must be between 1 and 1000"
    ))]
    pub items_per_page: Option<u32>,
}

impl RemotePageQuery {
    pub const DEFAULT_ITEMS_PER_PAGE: u32 = 100;

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn items_per_page(&self) -> u32 {
        self.items_per_page.unwrap_or(Self::DEFAULT_ITEMS_PER_PAGE)
    }
}

/// How a `{id}` path segment addresses a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoKey {
    Remote(String),
    Local(i64),
}

impl VideoKey {
    /// Provider GUIDs are UUIDs; bare integers address the local surrogate id.
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        if let Ok(id) = raw.parse::<i64>() {
            return Ok(VideoKey::Local(id));
        }
        parse_remote_id(raw).map(VideoKey::Remote)
    }
}

/// Provider GUID in its stored form: lowercase and hyphenated.
pub fn parse_remote_id(raw: &str) -> Result<String, ApiError> {
    canonical_guid(raw)
        .ok_or_else(|| ApiError::invalid_field("id", "uuid", "Video ID must be a valid UUID"))
}

fn canonical_guid(raw: &str) -> Option<String> {
    Uuid::try_parse(raw)
        .ok()
        .map(|id| id.hyphenated().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUID: &str = "4b9d7c1e-2f7a-4a53-9d8e-1c2b3a4d5e6f";

    fn create(json: serde_json::Value) -> CreateVideoRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_create_accepts_minimal_body() {
        let req = create(serde_json::json!({ "url": "https://example.com/a.mp4" }));
        assert!(req.validate().is_ok());

        let cmd = req.into_command().unwrap();
        assert_eq!(cmd.source_url, "https://example.com/a.mp4");
        assert!(cmd.title.is_none());
    }

    #[test]
    fn test_create_requires_url() {
        let req = create(serde_json::json!({ "title": "Clip" }));
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("url"));
    }

    #[test]
    fn test_create_rejects_non_http_url() {
        for url in ["ftp://example.com/a.mp4", "not a url", "file:///etc/passwd"] {
            let req = create(serde_json::json!({ "url": url }));
            assert!(req.validate().is_err(), "{} should be rejected", url);
        }
    }

    #[test]
    fn test_create_rejects_bad_title_and_collection() {
        let req = create(serde_json::json!({
            "url": "https://example.com/a.mp4",
            "title": "",
            "collectionId": "nope"
        }));
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("collection_id"));
    }

    #[test]
    fn test_update_title_length() {
        let req = UpdateVideoRequest {
            title: Some("x".repeat(256)),
            collection_id: None,
        };
        assert!(req.validate().is_err());
        assert!(UpdateVideoRequest::default().validate().is_ok());
    }

    #[test]
    fn test_webhook_parts() {
        let req: StatusWebhookRequest = serde_json::from_value(serde_json::json!({
            "VideoLibraryId": 42,
            "VideoGuid": GUID,
            "Status": 3
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.into_parts().unwrap(), (GUID.to_string(), 3));
    }

    #[test]
    fn test_guids_are_canonicalized() {
        let upper = GUID.to_uppercase();
        assert_eq!(parse_remote_id(&upper).unwrap(), GUID);
        assert_eq!(parse_remote_id(&GUID.replace('-', "")).unwrap(), GUID);

        let req: StatusWebhookRequest = serde_json::from_value(serde_json::json!({
            "VideoGuid": upper,
            "Status": 4
        }))
        .unwrap();
        assert_eq!(req.into_parts().unwrap(), (GUID.to_string(), 4));
    }

    #[test]
    fn test_webhook_status_out_of_range() {
        let req: StatusWebhookRequest = serde_json::from_value(serde_json::json!({
            "VideoGuid": GUID,
            "Status": 9
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_video_key_parse() {
        assert_eq!(VideoKey::parse("17").unwrap(), VideoKey::Local(17));
        assert_eq!(
            VideoKey::parse(GUID).unwrap(),
            VideoKey::Remote(GUID.to_string())
        );
        assert!(VideoKey::parse("abc").is_err());
        assert!(parse_remote_id("17").is_err());
    }

    #[test]
    fn test_remote_page_defaults() {
        let query = RemotePageQuery {
            page: None,
            items_per_page: None,
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.items_per_page(), 100);
        assert!(query.validate().is_ok());
    }
}
