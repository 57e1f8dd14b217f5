//! Notification permission gate.
//!
//! Wraps the platform's capability check ("may I show notifications?"),
//! which may require prompting the user. The status triple mirrors the
//! browser notification permission model: granted, denied, or never asked.

use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// The user has never been prompted.
    NotAsked,
}

#[async_trait]
pub trait PermissionGate: Send + Sync {
    /// Current permission state, without prompting.
    fn status(&self) -> PermissionStatus;

    /// Prompt the user (or the platform) and return the resulting state.
    /// Implementations must cache the answer so repeated calls within a
    /// session never re-prompt.
    async fn request(&self) -> PermissionStatus;

    /// Resolve to a yes/no answer, prompting only when the question has
    /// never been asked.
    async fn check_or_request(&self) -> bool {
        match self.status() {
            PermissionStatus::Granted => true,
            PermissionStatus::Denied => false,
            PermissionStatus::NotAsked => self.request().await == PermissionStatus::Granted,
        }
    }
}

/// A gate with a fixed answer.
///
/// Hosts without a permission concept (the terminal) are always-granted;
/// platforms that cannot show notifications at all are always-denied.
#[derive(Debug, Clone, Copy)]
pub struct StaticGate(pub PermissionStatus);

#[async_trait]
impl PermissionGate for StaticGate {
    fn status(&self) -> PermissionStatus {
        self.0
    }

    async fn request(&self) -> PermissionStatus {
        self.0
    }
}
