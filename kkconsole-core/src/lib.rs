//! Core of the KubeKey console
//!
//! Wizards for the cluster lifecycle operations, the path-addressed cluster
//! document they edit, and the streaming sessions that run an operation on
//! the backend.

pub mod backend;
pub mod config;
pub mod error;
pub mod session;
pub mod spec;
pub mod wizard;

pub use backend::BackendClient;
pub use config::ConsoleConfig;
pub use error::{ConsoleError, ConsoleResult};
pub use session::{run_session, teardown_pair, SessionOutcome, WebSocketTransport};
pub use spec::{ClusterSpecification, Host, SpecDocument};
pub use wizard::{OperationKind, Wizard, WizardStep};
