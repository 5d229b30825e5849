use crate::error::app_error::AppError;
use crate::models::session::Session;
use crate::store::SessionStore;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::warn;

/// JSON-file-backed store, the durable equivalent of a browser profile's
/// local storage. Writes land in a sibling temp file and are renamed into
/// place, so a reader never observes a torn record.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn staging_path(&self) -> PathBuf {
        let mut raw = self.path.as_os_str().to_owned();
        raw.push(".tmp");
        PathBuf::from(raw)
    }
}

#[async_trait]
impl SessionStore for FileStore {
    async fn save(&self, session: &Session) -> Result<(), AppError> {
        let body = serde_json::to_vec_pretty(session)
            .map_err(|e| AppError::serialization("Failed to encode session record", e))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::storage("Failed to create session storage directory", e))?;
        }

        let staging = self.staging_path();
        tokio::fs::write(&staging, &body)
            .await
            .map_err(|e| AppError::storage("Failed to write session record", e))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| AppError::storage("Failed to commit session record", e))?;

        Ok(())
    }

    async fn load(&self) -> Result<Option<Session>, AppError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AppError::storage("Failed to read session record", err)),
        };

        match serde_json::from_slice(&bytes) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                // An unreadable record cannot be trusted; drop it so the
                // caller lands in the unauthenticated state.
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "discarding corrupt session record"
                );
                let _ = tokio::fs::remove_file(&self.path).await;
                Ok(None)
            }
        }
    }

    async fn clear(&self) -> Result<(), AppError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::storage("Failed to clear session record", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::{Identity, Role};
    use chrono::{TimeZone, Utc};

    fn sample_session() -> Session {
        Session {
            token: "tok-77c1".to_string(),
            expires_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
            last_activity_at: Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap(),
            identity: Identity {
                email: "casey@example.com".to_string(),
                role: Role::Staff,
            },
        }
    }

    #[tokio::test]
    async fn save_then_load_round_trips_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));

        let session = sample_session();
        store.save(&session).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, session);
    }

    #[tokio::test]
    async fn load_without_record_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));

        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_record_degrades_to_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let store = FileStore::new(&path);
        assert!(store.load().await.unwrap().is_none());
        // The corrupt file is gone, so the next load is clean too.
        assert!(store.load().await.unwrap().is_none());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));

        store.save(&sample_session()).await.unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_overwrites_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));

        let first = sample_session();
        store.save(&first).await.unwrap();

        let mut second = sample_session();
        second.token = "tok-90ab".to_string();
        store.save(&second).await.unwrap();

        assert_eq!(store.load().await.unwrap().unwrap().token, "tok-90ab");
    }

    #[tokio::test]
    async fn save_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("profile").join("session.json"));

        store.save(&sample_session()).await.unwrap();
        assert!(store.load().await.unwrap().is_some());
    }
}
