//! Message read-access guard.

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The principal may read messages.
    Granted,
    /// The principal may not read messages.
    Denied,
}

impl AccessDecision {
    /// Whether the decision grants access.
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Authorization guard consulted before any notification row is written.
///
/// Host platforms plug their own access-control here; the notification paths
/// only care about the typed decision.
pub trait MessageAccess: Send + Sync {
    /// Can this principal read messages?
    fn check_read(&self, principal_user_id: &str) -> AccessDecision;
}

/// Guard that grants read access to every principal.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl MessageAccess for AllowAll {
    fn check_read(&self, _principal_user_id: &str) -> AccessDecision {
        AccessDecision::Granted
    }
}
