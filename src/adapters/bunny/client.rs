use crate::config::{ConfigError, ProviderConfig};
use crate::domain::remote::{ProviderAck, RemoteVideo, RemoteVideoPage};
use crate::domain::video::VideoPatch;
use crate::ports::provider::{ProviderError, VideoProvider};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

const ACCESS_KEY_HEADER: &str = "AccessKey";

/// Bunny Stream client implementing `VideoProvider` for one library.
#[derive(Clone, Debug)]
pub struct BunnyClient {
    http: Client,
    base_url: String,
    library_id: String,
}

impl BunnyClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ConfigError> {
        let mut access_key =
            HeaderValue::from_str(&config.access_key).map_err(|e| ConfigError::Invalid {
                name: "BUNNY_ACCESS_KEY",
                reason: e.to_string(),
            })?;
        access_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_KEY_HEADER, access_key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::Invalid {
                name: "BUNNY_API_URL",
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            library_id: config.library_id.clone(),
        })
    }

    fn videos_url(&self) -> String {
        format!("{}/library/{}/videos", self.base_url, self.library_id)
    }

    fn video_url(&self, remote_id: &str) -> String {
        format!("{}/{}", self.videos_url(), remote_id)
    }

    /// Send a request and decode a JSON body from a 2xx response.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ProviderError> {
        let body = self.send_raw(request).await?;
        serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))
    }

    /// Like `send`, but an empty 2xx body counts as success.
    async fn send_ack(&self, request: RequestBuilder) -> Result<ProviderAck, ProviderError> {
        let body = self.send_raw(request).await?;
        if body.trim().is_empty() {
            return Ok(ProviderAck::ok());
        }
        serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))
    }

    async fn send_raw(&self, request: RequestBuilder) -> Result<String, ProviderError> {
        let response = request.send().await.map_err(map_transport)?;
        let status = response.status();
        let body = response.text().await.map_err(map_transport)?;

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %body, "Provider rejected request");
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

fn map_transport(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(err.to_string())
    } else if err.is_decode() {
        ProviderError::Decode(err.to_string())
    } else {
        ProviderError::Transport(err.to_string())
    }
}

#[async_trait]
impl VideoProvider for BunnyClient {
    fn library_id(&self) -> String {
        self.library_id.clone()
    }

    async fn create_remote(
        &self,
        title: &str,
        collection_id: Option<String>,
    ) -> Result<RemoteVideo, ProviderError> {
        debug!(title, "Creating remote video entry");
        let mut body = json!({ "title": title });
        if let Some(collection_id) = collection_id {
            body["collectionId"] = json!(collection_id);
        }
        let request = self.http.post(self.videos_url()).json(&body);
        self.send(request).await
    }

    async fn fetch_from_url(
        &self,
        remote_id: &str,
        source_url: &str,
    ) -> Result<ProviderAck, ProviderError> {
        debug!(remote_id, source_url, "Requesting remote fetch");
        let url = format!("{}/fetch", self.video_url(remote_id));
        let request = self.http.post(url).json(&json!({ "url": source_url }));
        self.send_ack(request).await
    }

    async fn update_remote(
        &self,
        remote_id: &str,
        patch: &VideoPatch,
    ) -> Result<ProviderAck, ProviderError> {
        debug!(remote_id, "Updating remote video");
        let request = self.http.post(self.video_url(remote_id)).json(patch);
        self.send_ack(request).await
    }

    async fn delete_remote(&self, remote_id: &str) -> Result<ProviderAck, ProviderError> {
        debug!(remote_id, "Deleting remote video");
        let request = self.http.delete(self.video_url(remote_id));
        self.send_ack(request).await
    }

    async fn get_remote(&self, remote_id: &str) -> Result<RemoteVideo, ProviderError> {
        self.send(self.http.get(self.video_url(remote_id))).await
    }

    async fn list_remote(
        &self,
        page: u32,
        items_per_page: u32,
    ) -> Result<RemoteVideoPage, ProviderError> {
        let request = self
            .http
            .get(self.videos_url())
            .query(&[("page", page), ("itemsPerPage", items_per_page)]);
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_url: &str) -> ProviderConfig {
        ProviderConfig::new(api_url, "secret", "42")
    }

    #[test]
    fn test_urls_strip_trailing_slash() {
        let client = BunnyClient::new(&config("https://video.bunnycdn.com/")).unwrap();
        assert_eq!(
            client.videos_url(),
            "https://video.bunnycdn.com/library/42/videos"
        );
        assert_eq!(
            client.video_url("abc"),
            "https://video.bunnycdn.com/library/42/videos/abc"
        );
        assert_eq!(client.library_id(), "42");
    }

    #[test]
    fn test_rejects_access_key_with_newline() {
        let mut cfg = config("https://video.bunnycdn.com");
        cfg.access_key = "bad\nkey".to_string();
        assert!(matches!(
            BunnyClient::new(&cfg),
            Err(ConfigError::Invalid {
                name: "BUNNY_ACCESS_KEY",
                ..
            })
        ));
    }
}
