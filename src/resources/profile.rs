use tokio::sync::mpsc;
use tracing::debug;

use crate::api::{ErrorKind, Gateway, Resource};
use crate::auth::SessionEvent;
use crate::models::{Profile, ProfilePatch};
use crate::op::{OpStatus, OperationTracker};

/// Controller for the authenticated user's profile.
///
/// An `Unauthorized` failure on the fetch operation is the one local
/// failure with a global side effect: it emits a `SessionEvent` so the
/// session owner can run the logout cascade.
pub struct ProfileController {
    profile: Option<Profile>,
    op: OperationTracker,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl ProfileController {
    pub fn new(events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            profile: None,
            op: OperationTracker::new(),
            events,
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn status(&self) -> OpStatus {
        self.op.status()
    }

    pub fn error(&self) -> Option<ErrorKind> {
        self.op.error()
    }

    /// Fetch the profile. Returns true when the result was applied (not
    /// superseded by a newer invocation).
    pub async fn fetch<G: Gateway>(&mut self, gateway: &G) -> bool {
        let ticket = self.op.begin();

        match gateway.fetch_profile().await {
            Ok(profile) => {
                if !self.op.succeed(ticket) {
                    return false;
                }
                self.profile = Some(profile);
                true
            }
            Err(e) => {
                let kind = ErrorKind::from_api(Resource::ProfileFetch, &e);
                debug!(error = %e, "Profile fetch failed");
                if self.op.fail(ticket, kind) && kind.is_unauthorized() {
                    // Receiver gone means the app is shutting down anyway
                    let _ = self.events.send(SessionEvent::Unauthorized);
                }
                false
            }
        }
    }

    /// Apply a partial profile update. The server returns the merged
    /// profile, which replaces the local copy.
    pub async fn update<G: Gateway>(&mut self, gateway: &G, patch: &ProfilePatch) -> bool {
        let ticket = self.op.begin();

        match gateway.update_profile(patch).await {
            Ok(profile) => {
                if !self.op.succeed(ticket) {
                    return false;
                }
                self.profile = Some(profile);
                true
            }
            Err(e) => {
                let kind = ErrorKind::from_api(Resource::ProfileUpdate, &e);
                debug!(error = %e, "Profile update failed");
                self.op.fail(ticket, kind);
                false
            }
        }
    }

    /// Back to initial state (logout cascade).
    pub fn reset(&mut self) {
        self.profile = None;
        self.op.reset();
    }
}
