use crate::clock::Clock;
use crate::models::session::{GrantUser, LoginGrant, Role};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// Deterministic clock. Starts at a fixed instant and only moves when
/// advanced, so expiry arithmetic in tests never depends on wall time.
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new() -> Self {
        let start = Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap();
        Self {
            millis: AtomicI64::new(start.timestamp_millis()),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.millis.fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.millis.load(Ordering::SeqCst)).unwrap()
    }
}

/// Credential-exchange result fixture driving `SessionController::login`.
pub fn grant(role: Role, ttl_seconds: i64) -> LoginGrant {
    LoginGrant {
        token: "tok-8d0c".to_string(),
        expires_in: ttl_seconds,
        user: GrantUser {
            email: "casey@example.com".to_string(),
            role,
            name: "Casey".to_string(),
        },
    }
}
