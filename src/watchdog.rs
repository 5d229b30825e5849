use crate::controller::{EndReason, SessionController};
use crate::models::session::Session;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Decide whether `session` is past either ceiling at `now`.
///
/// Token lifetime is the harder limit and is checked first, so an
/// expired-but-recently-active session is still ended, and for the right
/// reason.
pub fn expiry_reason(
    session: &Session,
    now: DateTime<Utc>,
    inactivity_ceiling: chrono::Duration,
) -> Option<EndReason> {
    if now >= session.expires_at {
        return Some(EndReason::TokenExpired);
    }
    if now - session.last_activity_at >= inactivity_ceiling {
        return Some(EndReason::InactivityTimeout);
    }
    None
}

/// Periodic check that ends sessions past their token lifetime or idle past
/// the inactivity ceiling. This is the only component that acts on either
/// timeout; it never refreshes or extends expiry, and its sole mutation is
/// the terminal logout.
pub struct ExpiryWatchdog {
    controller: Arc<SessionController>,
    period: Duration,
    inactivity_ceiling: chrono::Duration,
}

impl ExpiryWatchdog {
    pub fn new(controller: Arc<SessionController>, period: Duration, inactivity_ceiling: Duration) -> Self {
        Self {
            controller,
            period,
            inactivity_ceiling: chrono::Duration::seconds(inactivity_ceiling.as_secs() as i64),
        }
    }

    /// Run one check. Returns the reason if the session was ended.
    pub async fn tick_once(&self) -> Option<EndReason> {
        let live = self.controller.session()?;

        // The persisted record is the shared truth: another process using
        // the same store may have logged out or recorded fresher activity
        // since the last tick.
        let session = match self.controller.load_persisted().await {
            Ok(Some(persisted)) => persisted,
            Ok(None) => {
                info!("persisted session cleared externally, ending session");
                self.controller.end_session(EndReason::Logout).await;
                return Some(EndReason::Logout);
            }
            Err(err) => {
                warn!(error = %err, "could not read persisted session, checking in-memory state");
                live
            }
        };

        let reason = expiry_reason(&session, self.controller.now(), self.inactivity_ceiling)?;

        info!(
            reason = ?reason,
            email = %session.identity.email,
            "watchdog ending session"
        );
        self.controller.end_session(reason).await;
        Some(reason)
    }

    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        let period = self.period;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let _ = self.tick_once().await;
            }
        })
    }
}
