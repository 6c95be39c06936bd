//! Client for the Watch2Gether room-hosting API.
//! An API key is optional; providing one raises the service's rate limits.

use reqwest::Client;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Public endpoint for room creation.
pub const DEFAULT_BASE_URL: &str = "https://api.w2g.tv";

/// Rooms are joined through the public site, not the API host.
const ROOM_URL_BASE: &str = "https://w2g.tv/rooms";

/// Errors that can occur while creating a watch room.
#[derive(Error, Debug)]
pub enum WatchRoomError {
    /// Error during HTTP request communication.
    #[error("API communication failure: {0}")]
    Api(#[from] reqwest::Error),

    /// Error parsing the JSON response from the API.
    #[error("Unable to parse response: {0}")]
    Json(#[from] serde_json::Error),

    /// The preload URL failed local validation; no request was made.
    #[error("Invalid preload URL: {0}")]
    InvalidUrl(String),

    /// The API answered successfully but without a usable room key.
    #[error("Invalid response received from Watch2Gether")]
    Invalid,
}

/// A created Watch2Gether room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRoom {
    pub id: String,
    pub streamkey: String,
    pub url: String,
}

pub struct WatchRoomClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WatchRoomClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string(), api_key)
    }

    /// The base URL is injectable so tests can point the client at a mock server.
    pub fn with_base_url(base_url: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Creates a room, optionally preloading a video URL. The caller is
    /// expected to have validated the URL via [`validate_preload_url`].
    pub async fn create_room(&self, preload: Option<&str>) -> Result<WatchRoom, WatchRoomError> {
        let url = format!("{}/rooms/create.json", self.base_url);

        let payload = json!({
            "w2g_api_key": self.api_key.as_deref().unwrap_or(""),
            "share": preload.unwrap_or(""),
            "bg_color": "#000000",
            "bg_opacity": "100",
        });

        debug!("Creating watch room (preload: {})", preload.unwrap_or("none"));

        let response = self.client.post(&url).json(&payload).send().await?;

        if !response.status().is_success() {
            return Err(WatchRoomError::Api(
                response.error_for_status().unwrap_err(),
            ));
        }

        let body = response.text().await?;
        let val: Value = serde_json::from_str(&body)?;

        let streamkey = match &val["streamkey"] {
            Value::String(key) if !key.is_empty() => key.clone(),
            _ => return Err(WatchRoomError::Invalid),
        };
        let id = match &val["id"] {
            Value::String(id) => id.clone(),
            Value::Number(id) => id.to_string(),
            _ => String::new(),
        };

        Ok(WatchRoom {
            id,
            url: format!("{}/{}", ROOM_URL_BASE, streamkey),
            streamkey,
        })
    }
}

/// Checks that a preload URL is well-formed http(s) before any network round
/// trip. Content is not validated further; the room service handles that.
pub fn validate_preload_url(raw: &str) -> Result<Url, WatchRoomError> {
    let parsed =
        Url::parse(raw).map_err(|e| WatchRoomError::InvalidUrl(format!("{}: {}", raw, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(WatchRoomError::InvalidUrl(format!(
            "unsupported scheme `{}`",
            scheme
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_create_room_success() {
        let server = MockServer::start().await;
        let client =
            WatchRoomClient::with_base_url(server.uri(), Some("test-w2g-key".to_string()));

        Mock::given(method("POST"))
            .and(path("/rooms/create.json"))
            .and(body_partial_json(json!({
                "w2g_api_key": "test-w2g-key",
                "share": "https://youtu.be/dQw4w9WgXcQ",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 12345,
                "streamkey": "abcdef123456",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let room = client
            .create_room(Some("https://youtu.be/dQw4w9WgXcQ"))
            .await
            .unwrap();

        assert_eq!(room.streamkey, "abcdef123456");
        assert_eq!(room.url, "https://w2g.tv/rooms/abcdef123456");
        assert_eq!(room.id, "12345");
        server.verify().await;
    }

    #[tokio::test]
    async fn test_create_room_without_preload_sends_empty_share() {
        let server = MockServer::start().await;
        let client = WatchRoomClient::with_base_url(server.uri(), None);

        Mock::given(method("POST"))
            .and(path("/rooms/create.json"))
            .and(body_partial_json(json!({"share": "", "w2g_api_key": ""})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "streamkey": "nokey000",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let room = client.create_room(None).await.unwrap();

        assert_eq!(room.url, "https://w2g.tv/rooms/nokey000");
        server.verify().await;
    }

    #[tokio::test]
    async fn test_create_room_http_error() {
        let server = MockServer::start().await;
        let client = WatchRoomClient::with_base_url(server.uri(), None);

        Mock::given(method("POST"))
            .and(path("/rooms/create.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = client.create_room(None).await;

        assert_matches!(result, Err(WatchRoomError::Api(_)));
    }

    #[tokio::test]
    async fn test_create_room_missing_streamkey() {
        let server = MockServer::start().await;
        let client = WatchRoomClient::with_base_url(server.uri(), None);

        Mock::given(method("POST"))
            .and(path("/rooms/create.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
            .mount(&server)
            .await;

        let result = client.create_room(None).await;

        assert_matches!(result, Err(WatchRoomError::Invalid));
    }

    #[test_case("https://youtu.be/abc" ; "https url")]
    #[test_case("http://example.com/video.mp4" ; "http url")]
    fn test_validate_preload_url_accepts(raw: &str) {
        assert!(validate_preload_url(raw).is_ok());
    }

    #[test_case("not a url" ; "unparseable")]
    #[test_case("ftp://example.com/video" ; "wrong scheme")]
    #[test_case("javascript:alert(1)" ; "script scheme")]
    fn test_validate_preload_url_rejects(raw: &str) {
        assert_matches!(validate_preload_url(raw), Err(WatchRoomError::InvalidUrl(_)));
    }
}
