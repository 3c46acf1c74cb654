//! Telephony provider client.
//!
//! Speaks the provider's `2010-04-01` REST dialect with basic auth
//! (account SID + auth token). One `reqwest::Client` is constructed per
//! provider client and shared across requests; tests inject their own via
//! [`HttpTelephonyClient::with_client`].

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, instrument};

use vox_core::call::{CallMetadata, RecordingRef};
use vox_core::ids::CallId;
use vox_settings::TelephonySettings;

use crate::errors::{Result, TelephonyError};
use crate::types::{CallResource, RecordingPage};

/// REST API version path segment.
const API_VERSION: &str = "2010-04-01";

/// Provider access configuration.
#[derive(Clone, Debug)]
pub struct TelephonyConfig {
    /// Provider REST base URL.
    pub base_url: String,
    /// Account SID (routing + basic auth username).
    pub account_sid: String,
    /// Auth token (basic auth password).
    pub auth_token: String,
}

impl From<&TelephonySettings> for TelephonyConfig {
    fn from(settings: &TelephonySettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            account_sid: settings.account_sid.clone(),
            auth_token: settings.auth_token.clone(),
        }
    }
}

/// Read access to the telephony provider.
#[async_trait]
pub trait TelephonyClient: Send + Sync {
    /// Fetch metadata for a completed call.
    async fn fetch_call(&self, call_id: &CallId) -> Result<CallMetadata>;

    /// List the recordings captured for a call, in provider order.
    async fn list_recordings(&self, call_id: &CallId) -> Result<Vec<RecordingRef>>;

    /// Download recording media from an authenticated URL.
    async fn download_recording(&self, media_url: &str) -> Result<Bytes>;
}

/// Production HTTP implementation of [`TelephonyClient`].
pub struct HttpTelephonyClient {
    config: TelephonyConfig,
    client: reqwest::Client,
}

impl HttpTelephonyClient {
    /// Create a new client with its own connection pool.
    #[must_use]
    pub fn new(config: TelephonyConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Create a new client sharing an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(config: TelephonyConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn account_url(&self, suffix: &str) -> String {
        format!(
            "{}/{API_VERSION}/Accounts/{}/{suffix}",
            self.config.base_url.trim_end_matches('/'),
            self.config.account_sid
        )
    }

    async fn get_authed(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .send()
            .await?;
        Ok(response)
    }
}

/// Map a non-success response into a typed error, consuming the body.
async fn status_error(response: reqwest::Response) -> TelephonyError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    TelephonyError::Status { status, body }
}

#[async_trait]
impl TelephonyClient for HttpTelephonyClient {
    #[instrument(skip(self), fields(call_id = %call_id))]
    async fn fetch_call(&self, call_id: &CallId) -> Result<CallMetadata> {
        let url = self.account_url(&format!("Calls/{call_id}.json"));
        let response = self.get_authed(&url).await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(TelephonyError::CallNotFound(call_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let resource: CallResource = response
            .json()
            .await
            .map_err(|e| TelephonyError::Decode(e.to_string()))?;
        let metadata = resource.into_metadata()?;
        debug!(duration_secs = metadata.duration_secs, "fetched call metadata");
        Ok(metadata)
    }

    #[instrument(skip(self), fields(call_id = %call_id))]
    async fn list_recordings(&self, call_id: &CallId) -> Result<Vec<RecordingRef>> {
        let url = self.account_url(&format!("Recordings.json?CallSid={call_id}"));
        let response = self.get_authed(&url).await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let page: RecordingPage = response
            .json()
            .await
            .map_err(|e| TelephonyError::Decode(e.to_string()))?;
        let refs = page
            .recordings
            .into_iter()
            .map(|r| r.into_ref(&self.config.base_url))
            .collect::<Vec<_>>();
        debug!(count = refs.len(), "listed recordings");
        Ok(refs)
    }

    #[instrument(skip(self, media_url))]
    async fn download_recording(&self, media_url: &str) -> Result<Bytes> {
        let response = self.get_authed(media_url).await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        Ok(response.bytes().await?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpTelephonyClient {
        HttpTelephonyClient::new(TelephonyConfig {
            base_url: server.uri(),
            account_sid: "AC1".into(),
            auth_token: "token".into(),
        })
    }

    // ── fetch_call ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn fetch_call_parses_provider_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2010-04-01/Accounts/AC1/Calls/CA1.json"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sid": "CA1",
                "duration": "93",
                "price": "-0.01300",
                "to_formatted": "+1 555-000-1111"
            })))
            .mount(&server)
            .await;

        let meta = client_for(&server)
            .fetch_call(&CallId::from("CA1"))
            .await
            .unwrap();
        assert_eq!(meta.duration_secs, 93);
        assert_eq!(meta.price, Some(-0.013));
        assert_eq!(meta.to_number, "+1 555-000-1111");
    }

    #[tokio::test]
    async fn fetch_call_404_is_call_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such call"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_call(&CallId::from("CA404"))
            .await
            .unwrap_err();
        assert_matches!(err, TelephonyError::CallNotFound(id) if id == "CA404");
    }

    #[tokio::test]
    async fn fetch_call_5xx_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_call(&CallId::from("CA1"))
            .await
            .unwrap_err();
        assert_matches!(err, TelephonyError::Status { status: 503, .. });
    }

    #[tokio::test]
    async fn fetch_call_in_progress_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sid": "CA1",
                "duration": null,
                "price": null
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_call(&CallId::from("CA1"))
            .await
            .unwrap_err();
        assert_matches!(err, TelephonyError::Decode(_));
    }

    // ── list_recordings ──────────────────────────────────────────────────

    #[tokio::test]
    async fn list_recordings_filters_by_call_sid() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2010-04-01/Accounts/AC1/Recordings.json"))
            .and(query_param("CallSid", "CA1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "recordings": [
                    {"sid": "RE1", "uri": "/2010-04-01/Accounts/AC1/Recordings/RE1.json"},
                    {"sid": "RE2", "uri": "/2010-04-01/Accounts/AC1/Recordings/RE2.json"}
                ]
            })))
            .mount(&server)
            .await;

        let refs = client_for(&server)
            .list_recordings(&CallId::from("CA1"))
            .await
            .unwrap();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].recording_id, "RE1");
        assert!(refs[0].media_url.ends_with("/Recordings/RE1.mp3"));
        assert!(refs[0].media_url.starts_with(&server.uri()));
    }

    #[tokio::test]
    async fn list_recordings_empty_page_is_empty_vec() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"recordings": []})),
            )
            .mount(&server)
            .await;

        let refs = client_for(&server)
            .list_recordings(&CallId::from("CA1"))
            .await
            .unwrap();
        assert!(refs.is_empty());
    }

    // ── download_recording ───────────────────────────────────────────────

    #[tokio::test]
    async fn download_recording_returns_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2010-04-01/Accounts/AC1/Recordings/RE1.mp3"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp3 bytes".to_vec()))
            .mount(&server)
            .await;

        let url = format!("{}/2010-04-01/Accounts/AC1/Recordings/RE1.mp3", server.uri());
        let bytes = client_for(&server).download_recording(&url).await.unwrap();
        assert_eq!(bytes.as_ref(), b"mp3 bytes");
    }

    #[tokio::test]
    async fn download_recording_non_2xx_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let url = format!("{}/whatever.mp3", server.uri());
        let err = client_for(&server).download_recording(&url).await.unwrap_err();
        assert_matches!(err, TelephonyError::Status { status: 403, .. });
    }
}
