//! Error handling for the console core
//!
//! The console distinguishes a small number of failure families:
//!
//! - **Programmer errors**: malformed document paths, inconsistent host
//!   inventories. These fail fast and are never recovered from.
//! - **Navigation errors**: an action the wizard currently forbids, such as
//!   submitting while an operation is in flight.
//! - **Transport errors**: the backend could not be reached or dropped the
//!   stream. Inside a session these are folded into the log buffer rather
//!   than surfaced as values.
//! - **Configuration errors**: invalid settings or unreadable config files.
//!
//! Operator-facing failure information travels through the session log
//! buffer; the typed errors here are for callers of the library.

pub mod types;
pub mod constructors;
pub mod conversions;


pub use types::{ConsoleError, ConsoleResult};
