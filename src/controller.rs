use crate::clock::{Clock, SystemClock};
use crate::gate::{self, AccessDecision};
use crate::models::session::{Identity, LoginGrant, Role, Session};
use crate::store::SessionStore;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{info, warn};

/// Why a session stopped being live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Explicit user-driven logout.
    Logout,
    /// Token lifetime elapsed.
    TokenExpired,
    /// No observed interaction for the inactivity ceiling.
    InactivityTimeout,
}

/// Value published to subscribers on every lifecycle transition.
///
/// `ended` lets the UI distinguish "you logged out" from "your session
/// expired" without inspecting logs.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Unauthenticated { ended: Option<EndReason> },
    Authenticated(Session),
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            SessionState::Unauthenticated { .. } => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }
}

/// Authoritative in-memory session plus the operations that mutate it.
///
/// Every mutation persists (or clears) the stored copy before the new state
/// is published, so no subscriber acts on a session the store does not yet
/// reflect. Persistence failures are logged and the core continues
/// in-memory; storage trouble never takes the session core down.
pub struct SessionController {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    state: watch::Sender<SessionState>,
    // Serializes each state check with the store write that depends on it.
    // Without it, a logout interleaving at an activity save's await point
    // would clear the store and then be overwritten by the stale save,
    // leaving a dangling record for the next restore to adopt.
    write_lock: Mutex<()>,
}

impl SessionController {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>) -> Self {
        let (state, _) = watch::channel(SessionState::Unauthenticated { ended: None });
        Self {
            store,
            clock,
            state,
            write_lock: Mutex::new(()),
        }
    }

    /// Receiver observing every login/logout/restore transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.state.borrow().session().cloned()
    }

    /// Current instant as the controller's clock sees it.
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// Access decision for a protected view against the live session,
    /// re-evaluated on every call.
    pub fn decide(&self, required_roles: &[Role]) -> AccessDecision {
        gate::decide(self.state.borrow().session(), required_roles)
    }

    /// Adopt the result of a successful credential exchange.
    ///
    /// The exchange itself (password checks, transport) happens upstream;
    /// this derives the expiry instant from the declared TTL and makes the
    /// session live.
    pub async fn login(&self, grant: LoginGrant) -> Session {
        let now = self.clock.now();
        let session = Session {
            token: grant.token,
            expires_at: now + chrono::Duration::seconds(grant.expires_in),
            last_activity_at: now,
            identity: Identity {
                email: grant.user.email,
                role: grant.user.role,
            },
        };

        let _guard = self.write_lock.lock().await;
        self.persist(&session).await;
        info!(
            email = %session.identity.email,
            role = ?session.identity.role,
            expires_at = %session.expires_at,
            "session started"
        );
        self.state.send_replace(SessionState::Authenticated(session.clone()));
        session
    }

    /// Explicit logout. Idempotent; callers navigate away afterwards.
    pub async fn logout(&self) {
        self.end_session(EndReason::Logout).await;
    }

    pub(crate) async fn end_session(&self, reason: EndReason) {
        let _guard = self.write_lock.lock().await;
        if let Err(err) = self.store.clear().await {
            warn!(error = %err, "failed to clear persisted session");
        }

        if self.state.borrow().is_authenticated() {
            info!(reason = ?reason, "session ended");
            self.state
                .send_replace(SessionState::Unauthenticated { ended: Some(reason) });
        }
    }

    /// One-time startup restore of a persisted session.
    ///
    /// An already-expired record is logged out on the spot instead of being
    /// exposed. A live record is adopted with its `last_activity_at` intact:
    /// a browser reopened after a long idle stretch must still be caught by
    /// the watchdog, not silently revived.
    pub async fn restore(&self) {
        let _guard = self.write_lock.lock().await;
        let persisted = match self.store.load().await {
            Ok(persisted) => persisted,
            Err(err) => {
                warn!(error = %err, "session storage unavailable, starting unauthenticated");
                None
            }
        };

        let Some(session) = persisted else {
            return;
        };

        if self.clock.now() >= session.expires_at {
            // Stale state from a previous process lifetime. Clear it and
            // report the expiry instead of exposing a dead session.
            if let Err(err) = self.store.clear().await {
                warn!(error = %err, "failed to clear expired session record");
            }
            info!(email = %session.identity.email, "persisted session already expired");
            self.state.send_replace(SessionState::Unauthenticated {
                ended: Some(EndReason::TokenExpired),
            });
            return;
        }

        info!(
            email = %session.identity.email,
            expires_at = %session.expires_at,
            "session restored"
        );
        self.state.send_replace(SessionState::Authenticated(session));
    }

    /// Set `last_activity_at` to now. No-op unless a session is live, so an
    /// interaction racing a logout cannot resurrect a cleared record.
    pub(crate) async fn record_activity(&self) {
        let now = self.clock.now();
        let _guard = self.write_lock.lock().await;
        let mut updated: Option<Session> = None;

        self.state.send_if_modified(|state| {
            if let SessionState::Authenticated(session) = state
                && now > session.last_activity_at
            {
                session.last_activity_at = now;
                updated = Some(session.clone());
            }
            // Activity is not a lifecycle transition; never notify.
            false
        });

        if let Some(session) = updated
            && let Err(err) = self.store.save(&session).await
        {
            warn!(error = %err, "failed to persist activity instant");
        }
    }

    /// Persisted record as the store currently has it, untouched.
    pub(crate) async fn load_persisted(&self) -> Result<Option<Session>, crate::error::app_error::AppError> {
        self.store.load().await
    }

    async fn persist(&self, session: &Session) {
        if let Err(err) = self.store.save(session).await {
            warn!(error = %err, "failed to persist session, continuing in-memory");
        }
    }
}
