//! Async driver pumping a transport into a wizard's session

use super::coupling::LogCursor;
use super::machine::{SessionCommand, SessionEvent, SessionOutcome};
use super::transport::{Connection, Transport};
use crate::error::ConsoleResult;
use crate::wizard::Wizard;
use tokio::sync::oneshot;
use tracing::{debug, info};

/// Held by the owner of a session; dropping it tears the session down.
#[derive(Debug)]
pub struct TeardownGuard {
    _tx: oneshot::Sender<()>,
}

impl TeardownGuard {
    /// Tear the session down now
    pub fn teardown(self) {}
}

/// Resolves once the matching [`TeardownGuard`] is gone
#[derive(Debug)]
pub struct TeardownSignal {
    rx: oneshot::Receiver<()>,
}

pub fn teardown_pair() -> (TeardownGuard, TeardownSignal) {
    let (tx, rx) = oneshot::channel();
    (TeardownGuard { _tx: tx }, TeardownSignal { rx })
}

/// Submit the wizard's operation and stream it to completion.
///
/// `on_line` receives every log line appended during the run, in arrival
/// order. Returns the outcome once the stream closes, a sentinel arrives,
/// the transport fails or the teardown signal fires. Errors only when the
/// wizard refuses to submit.
pub async fn run_session<F>(
    wizard: &mut Wizard,
    transport: &dyn Transport,
    mut teardown: TeardownSignal,
    mut on_line: F,
) -> ConsoleResult<SessionOutcome>
where
    F: FnMut(&str),
{
    let request = wizard.submit()?;
    let mut cursor = LogCursor::new(wizard.log_buffer());
    info!(operation = %request.kind, endpoint = %request.endpoint, "opening session");

    let connected = tokio::select! {
        result = transport.connect(&request.endpoint) => Some(result),
        _ = &mut teardown.rx => None,
    };

    let mut connection = match connected {
        Some(Ok(connection)) => connection,
        Some(Err(e)) => {
            wizard.handle_event(SessionEvent::TransportError(e.to_string()));
            cursor.emit(wizard.log_buffer(), &mut on_line);
            return Ok(wizard.outcome());
        }
        None => {
            wizard.teardown();
            return Ok(wizard.outcome());
        }
    };

    if let Some(SessionCommand::Send(payload)) = wizard.handle_event(SessionEvent::Opened) {
        cursor.emit(wizard.log_buffer(), &mut on_line);
        if let Err(e) = connection.send(payload).await {
            wizard.handle_event(SessionEvent::TransportError(e.to_string()));
            cursor.emit(wizard.log_buffer(), &mut on_line);
            close_quietly(connection.as_mut()).await;
            return Ok(wizard.outcome());
        }
    }

    while wizard.session_live() {
        let event = tokio::select! {
            frame = connection.recv() => match frame {
                Some(Ok(text)) => SessionEvent::Message(text),
                Some(Err(e)) => SessionEvent::TransportError(e.to_string()),
                None => SessionEvent::Closed,
            },
            _ = &mut teardown.rx => SessionEvent::Teardown,
        };

        let command = wizard.handle_event(event);
        cursor.emit(wizard.log_buffer(), &mut on_line);
        if let Some(SessionCommand::Close) = command {
            close_quietly(connection.as_mut()).await;
        }
    }

    Ok(wizard.outcome())
}

async fn close_quietly(connection: &mut dyn Connection) {
    if let Err(e) = connection.close().await {
        debug!(error = %e, "closing session transport failed");
    }
}
