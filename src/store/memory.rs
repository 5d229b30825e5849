use crate::error::app_error::AppError;
use crate::models::session::Session;
use crate::store::SessionStore;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// In-memory store for embedders without durable storage, and for tests.
/// Sessions do not survive the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<Session>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn save(&self, session: &Session) -> Result<(), AppError> {
        *self.slot.lock().await = Some(session.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<Session>, AppError> {
        Ok(self.slot.lock().await.clone())
    }

    async fn clear(&self) -> Result<(), AppError> {
        *self.slot.lock().await = None;
        Ok(())
    }
}
