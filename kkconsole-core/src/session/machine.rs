//! Session state machine
//!
//! A session is created in `Opening` by a submit and runs
//! `Opening -> Active -> Closed`. Every transition is driven by a
//! [`SessionEvent`]; the machine answers with at most one
//! [`SessionCommand`] for the transport.

use super::coupling::SessionCoupling;
use crate::wizard::{OperationKind, OperationMessages, TRANSPORT_FAILURE_LINE};
use tracing::{debug, info, warn};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nothing submitted yet. Reported by `Wizard::session_phase` before the
    /// first submit; a `StreamingSession` never holds it.
    Idle,
    Opening,
    Active,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Pending,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The transport finished its handshake
    Opened,
    /// One text frame from the backend
    Message(String),
    /// The transport failed; the reason is only logged
    TransportError(String),
    /// The peer closed the stream
    Closed,
    /// The owning view went away
    Teardown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Send(String),
    Close,
}

/// Everything needed to open a session
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRequest {
    pub kind: OperationKind,
    /// Streaming endpoint including query parameters
    pub endpoint: Url,
    /// Serialized cluster document
    pub payload: String,
}

#[derive(Debug)]
pub struct StreamingSession {
    request: OperationRequest,
    messages: OperationMessages,
    phase: SessionPhase,
    outcome: SessionOutcome,
}

impl StreamingSession {
    /// A session waiting for its transport to open
    pub fn new(request: OperationRequest) -> Self {
        let messages = request.kind.messages();
        Self {
            request,
            messages,
            phase: SessionPhase::Opening,
            outcome: SessionOutcome::Pending,
        }
    }

    pub fn request(&self) -> &OperationRequest {
        &self.request
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn outcome(&self) -> SessionOutcome {
        self.outcome
    }

    pub fn is_live(&self) -> bool {
        matches!(self.phase, SessionPhase::Opening | SessionPhase::Active)
    }

    pub fn handle(
        &mut self,
        event: SessionEvent,
        coupling: &mut SessionCoupling,
    ) -> Option<SessionCommand> {
        let kind = self.request.kind;
        match (self.phase, event) {
            (SessionPhase::Opening, SessionEvent::Opened) => {
                coupling.logs.clear();
                coupling.logs.push(self.messages.started);
                coupling.in_flight = true;
                coupling.safe_to_navigate_away = false;
                self.phase = SessionPhase::Active;
                info!(operation = %kind, endpoint = %self.request.endpoint, "session opened");
                Some(SessionCommand::Send(self.request.payload.clone()))
            }
            (SessionPhase::Active, SessionEvent::Message(line)) => {
                if line == self.messages.succeeded {
                    // in_flight stays set: the view offers only "return home"
                    coupling.safe_to_navigate_away = true;
                    self.outcome = SessionOutcome::Succeeded;
                    self.phase = SessionPhase::Closed;
                    coupling.logs.push(line);
                    info!(operation = %kind, "operation succeeded");
                    Some(SessionCommand::Close)
                } else if line == self.messages.failed {
                    coupling.in_flight = false;
                    coupling.safe_to_navigate_away = true;
                    self.outcome = SessionOutcome::Failed;
                    self.phase = SessionPhase::Closed;
                    coupling.logs.push(line);
                    warn!(operation = %kind, "operation failed");
                    Some(SessionCommand::Close)
                } else {
                    coupling.logs.push(line);
                    None
                }
            }
            (SessionPhase::Opening | SessionPhase::Active, SessionEvent::TransportError(reason)) => {
                // Flags are left as they are; the outcome stays pending.
                warn!(operation = %kind, %reason, "session transport error");
                coupling.logs.push(TRANSPORT_FAILURE_LINE);
                self.phase = SessionPhase::Closed;
                None
            }
            (SessionPhase::Opening | SessionPhase::Active, SessionEvent::Closed) => {
                info!(operation = %kind, outcome = ?self.outcome, "session closed by peer");
                self.phase = SessionPhase::Closed;
                None
            }
            (SessionPhase::Opening | SessionPhase::Active, SessionEvent::Teardown) => {
                debug!(operation = %kind, "session torn down");
                self.phase = SessionPhase::Closed;
                Some(SessionCommand::Close)
            }
            (phase, event) => {
                debug!(?phase, ?event, "event ignored");
                None
            }
        }
    }
}
