//! Asynchronous operation tracking.
//!
//! Every network-backed read/write in the client runs through an
//! `OperationTracker`: one per resource family, moving
//! idle -> loading -> succeeded | failed. A new invocation re-enters
//! loading from any state; each call is independent.
//!
//! Overlapping invocations of the same tracker are resolved by ticket:
//! `begin` issues a monotonically increasing ticket and only the most
//! recently issued ticket may settle the operation. A resolution arriving
//! for a superseded ticket is discarded, so whichever call was issued last
//! wins regardless of wall-clock completion order.

use tracing::debug;

use crate::api::ErrorKind;

/// State of an asynchronous operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Proof of a specific `begin` call. Settling with a superseded ticket is a
/// no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpTicket(u64);

#[derive(Debug, Default)]
pub struct OperationTracker {
    status: OpStatus,
    error: Option<ErrorKind>,
    issued: u64,
}

impl OperationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> OpStatus {
        self.status
    }

    pub fn error(&self) -> Option<ErrorKind> {
        self.error
    }

    pub fn is_loading(&self) -> bool {
        self.status == OpStatus::Loading
    }

    /// Enter `Loading` and issue the ticket for this invocation,
    /// invalidating any ticket issued earlier.
    pub fn begin(&mut self) -> OpTicket {
        self.issued += 1;
        self.status = OpStatus::Loading;
        OpTicket(self.issued)
    }

    /// Settle as succeeded, clearing any previous error.
    ///
    /// Returns false (and changes nothing) when `ticket` has been superseded
    /// by a newer invocation.
    pub fn succeed(&mut self, ticket: OpTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.status = OpStatus::Succeeded;
        self.error = None;
        true
    }

    /// Settle as failed, recording `kind`. The resource payload is owned by
    /// the controller and is deliberately left alone, so stale data survives
    /// a failed refresh.
    pub fn fail(&mut self, ticket: OpTicket, kind: ErrorKind) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.status = OpStatus::Failed;
        self.error = Some(kind);
        true
    }

    /// Back to the initial state (used by the logout cascade).
    pub fn reset(&mut self) {
        self.status = OpStatus::Idle;
        self.error = None;
    }

    fn is_current(&self, ticket: OpTicket) -> bool {
        if ticket.0 != self.issued {
            debug!(
                ticket = ticket.0,
                current = self.issued,
                "Discarding stale operation resolution"
            );
            return false;
        }
        true
    }
}
