//! Recording archival.
//!
//! Downloads a call recording through the authenticated telephony client
//! and writes it to durable object storage under a key derived from the
//! run identity. A non-2xx download or a store write failure is a no-op
//! failure reported to the caller so a missing archive can be retried.

use std::sync::Arc;

use tracing::{info, instrument};

use vox_core::ids::RunKey;
use vox_store::object_store::ObjectStore;
use vox_telephony::client::TelephonyClient;

use crate::errors::RuntimeError;

/// Fetches call recordings and writes them to durable storage.
pub struct RecordingArchiver {
    telephony: Arc<dyn TelephonyClient>,
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl RecordingArchiver {
    /// Create an archiver writing into `bucket` of the given store.
    pub fn new(
        telephony: Arc<dyn TelephonyClient>,
        store: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            telephony,
            store,
            bucket: bucket.into(),
        }
    }

    /// Deterministic object key for a run's recording.
    #[must_use]
    pub fn object_key(key: &RunKey) -> String {
        format!("{}/{}/{}.mp3", key.user_id, key.assistant_id, key.run_id)
    }

    /// Download the recording at `media_url` and archive it for `key`.
    ///
    /// Returns the object key written. Both the download and the store
    /// write surface as [`RuntimeError::ArchiveUpload`].
    #[instrument(skip(self, media_url), fields(run_id = %key.run_id))]
    pub async fn archive(&self, key: &RunKey, media_url: &str) -> Result<String, RuntimeError> {
        let bytes = self
            .telephony
            .download_recording(media_url)
            .await
            .map_err(|e| RuntimeError::ArchiveUpload(e.to_string()))?;

        let object_key = Self::object_key(key);
        self.store
            .put(&self.bucket, &object_key, bytes)
            .await
            .map_err(|e| RuntimeError::ArchiveUpload(e.to_string()))?;

        info!(bucket = %self.bucket, object_key = %object_key, "recording archived");
        Ok(object_key)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use bytes::Bytes;

    use vox_core::call::{CallMetadata, RecordingRef};
    use vox_core::ids::{AssistantId, CallId, RunId, UserId};
    use vox_store::object_store::FsObjectStore;
    use vox_telephony::errors::TelephonyError;

    /// Telephony fake that serves a fixed recording body, or a 403.
    struct FakeTelephony {
        forbidden: bool,
    }

    #[async_trait]
    impl TelephonyClient for FakeTelephony {
        async fn fetch_call(&self, _: &CallId) -> vox_telephony::Result<CallMetadata> {
            unimplemented!("not used by the archiver")
        }

        async fn list_recordings(&self, _: &CallId) -> vox_telephony::Result<Vec<RecordingRef>> {
            unimplemented!("not used by the archiver")
        }

        async fn download_recording(&self, _media_url: &str) -> vox_telephony::Result<Bytes> {
            if self.forbidden {
                return Err(TelephonyError::Status {
                    status: 403,
                    body: "forbidden".into(),
                });
            }
            Ok(Bytes::from_static(b"mp3 bytes"))
        }
    }

    fn key() -> RunKey {
        RunKey::new(
            UserId::from("u1"),
            AssistantId::from("a1"),
            RunId::from("a1#1000".to_string()),
        )
    }

    #[test]
    fn object_key_is_user_assistant_run() {
        assert_eq!(RecordingArchiver::object_key(&key()), "u1/a1/a1#1000.mp3");
    }

    #[tokio::test]
    async fn archive_writes_recording_bytes_under_derived_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FsObjectStore::new(dir.path()));
        let archiver = RecordingArchiver::new(
            Arc::new(FakeTelephony { forbidden: false }),
            Arc::clone(&store) as Arc<dyn ObjectStore>,
            "vox",
        );

        let object_key = archiver
            .archive(&key(), "https://api.example.com/rec/RE1.mp3")
            .await
            .unwrap();
        assert_eq!(object_key, "u1/a1/a1#1000.mp3");

        let stored = store.get("vox", &object_key).await.unwrap().unwrap();
        assert_eq!(stored.as_ref(), b"mp3 bytes");
    }

    #[tokio::test]
    async fn non_2xx_download_is_reported_not_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn ObjectStore> = Arc::new(FsObjectStore::new(dir.path()));
        let archiver =
            RecordingArchiver::new(Arc::new(FakeTelephony { forbidden: true }), store, "vox");

        let err = archiver
            .archive(&key(), "https://api.example.com/rec/RE1.mp3")
            .await
            .unwrap_err();
        assert_matches!(err, RuntimeError::ArchiveUpload(_));
    }

    #[tokio::test]
    async fn store_write_failure_is_archive_upload() {
        struct RejectingStore;

        #[async_trait]
        impl ObjectStore for RejectingStore {
            async fn put(&self, _: &str, _: &str, _: Bytes) -> vox_store::Result<()> {
                Err(vox_store::StoreError::Internal("volume detached".into()))
            }
            async fn get(&self, _: &str, _: &str) -> vox_store::Result<Option<Bytes>> {
                Ok(None)
            }
        }

        let archiver = RecordingArchiver::new(
            Arc::new(FakeTelephony { forbidden: false }),
            Arc::new(RejectingStore),
            "vox",
        );

        let err = archiver
            .archive(&key(), "https://api.example.com/rec/RE1.mp3")
            .await
            .unwrap_err();
        assert_matches!(err, RuntimeError::ArchiveUpload(_));
    }
}
