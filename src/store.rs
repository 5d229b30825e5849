pub mod file;
pub mod memory;

use crate::error::app_error::AppError;
use crate::models::session::Session;
use async_trait::async_trait;

/// Durable persistence for the session record.
///
/// Implementations persist the record atomically from the caller's point of
/// view: `load` yields the full record or nothing, never a partial one. A
/// store that cannot be read degrades to "absent" rather than failing the
/// process; callers treat every error here as recoverable.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save(&self, session: &Session) -> Result<(), AppError>;
    async fn load(&self) -> Result<Option<Session>, AppError>;
    /// Remove the persisted record. Idempotent.
    async fn clear(&self) -> Result<(), AppError>;
}
