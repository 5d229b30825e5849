use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Staff,
    Client,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    pub role: Role,
}

/// Full session record, both the in-memory live session and the persisted
/// copy. Either all fields exist or the session does not; no partial record
/// is ever written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    /// Fixed at login from the server-declared TTL; never extended.
    pub expires_at: DateTime<Utc>,
    /// Monotonically non-decreasing while the session is live.
    pub last_activity_at: DateTime<Utc>,
    pub identity: Identity,
}

/// Result of a successful credential exchange, as the authentication
/// endpoint returns it. Credentials are already validated by the time this
/// shape exists.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginGrant {
    pub token: String,
    /// Token time-to-live in seconds.
    pub expires_in: i64,
    pub user: GrantUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GrantUser {
    pub email: String,
    pub role: Role,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn role_serializes_screaming_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(serde_json::to_string(&Role::Staff).unwrap(), "\"STAFF\"");
        assert_eq!(serde_json::to_string(&Role::Client).unwrap(), "\"CLIENT\"");
    }

    #[test]
    fn login_grant_parses_exchange_payload() {
        let grant: LoginGrant = serde_json::from_str(
            r#"{
                "token": "tok-4f2a",
                "expiresIn": 1800,
                "user": { "email": "casey@example.com", "role": "STAFF", "name": "Casey" }
            }"#,
        )
        .unwrap();

        assert_eq!(grant.token, "tok-4f2a");
        assert_eq!(grant.expires_in, 1800);
        assert_eq!(grant.user.email, "casey@example.com");
        assert_eq!(grant.user.role, Role::Staff);
    }

    fn role_strategy() -> impl Strategy<Value = Role> {
        prop_oneof![Just(Role::Admin), Just(Role::Staff), Just(Role::Client)]
    }

    proptest! {
        // The file store persists exactly this encoding, so round-trip
        // equality here is round-trip equality for the store.
        #[test]
        fn session_record_round_trips(
            token in "[A-Za-z0-9_-]{8,64}",
            email in "[a-z]{1,12}@[a-z]{1,12}\\.com",
            role in role_strategy(),
            expires_millis in 0i64..4_102_444_800_000,
            activity_millis in 0i64..4_102_444_800_000,
        ) {
            let session = Session {
                token,
                expires_at: Utc.timestamp_millis_opt(expires_millis).unwrap(),
                last_activity_at: Utc.timestamp_millis_opt(activity_millis).unwrap(),
                identity: Identity { email, role },
            };

            let encoded = serde_json::to_vec(&session).unwrap();
            let decoded: Session = serde_json::from_slice(&encoded).unwrap();
            prop_assert_eq!(decoded, session);
        }
    }
}
