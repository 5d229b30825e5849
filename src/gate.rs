use crate::models::session::{Role, Session};

/// Outcome of an access check for a protected view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    /// No live session; the caller should offer to log in.
    DenyUnauthenticated,
    /// Live session lacks the required role. Surfaced separately from
    /// `DenyUnauthenticated` so the user is not prompted to re-authenticate
    /// when the problem is insufficient privilege.
    DenyForbidden,
}

/// Pure access decision. An empty `required_roles` set means any
/// authenticated role is acceptable. No caching happens here; the verdict is
/// only as fresh as the session passed in, so callers re-evaluate on every
/// access attempt.
pub fn decide(session: Option<&Session>, required_roles: &[Role]) -> AccessDecision {
    let Some(session) = session else {
        return AccessDecision::DenyUnauthenticated;
    };

    if !required_roles.is_empty() && !required_roles.contains(&session.identity.role) {
        return AccessDecision::DenyForbidden;
    }

    AccessDecision::Allow
}
