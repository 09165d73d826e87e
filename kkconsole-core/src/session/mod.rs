//! Streaming operation sessions
//!
//! A session submits the cluster document over a WebSocket and collects the
//! backend's log lines until a sentinel line reports the result. The state
//! machine in [`machine`] performs no I/O; [`driver`] pumps a [`Transport`]
//! into it.

pub mod coupling;
pub mod driver;
pub mod machine;
pub mod transport;
pub mod websocket;

pub use coupling::{LogBuffer, LogCursor, SessionCoupling};
pub use driver::{run_session, teardown_pair, TeardownGuard, TeardownSignal};
pub use machine::{
    OperationRequest, SessionCommand, SessionEvent, SessionOutcome, SessionPhase, StreamingSession,
};
pub use transport::{Connection, Transport};
pub use websocket::WebSocketTransport;
