//! Runs one wizard non-interactively from the command line

use kkconsole_core::error::{ConsoleError, ConsoleResult};
use kkconsole_core::session::{run_session, SessionOutcome, TeardownSignal, Transport};
use kkconsole_core::wizard::Wizard;
use std::io::Write;
use tracing::info;

/// Advance through every step whose gate passes.
///
/// Fails with the title of the first incomplete step when the wizard cannot
/// reach its final step.
pub fn walk_to_confirm(wizard: &mut Wizard) -> ConsoleResult<()> {
    while wizard.advance() {}
    if wizard.is_last_step() {
        return Ok(());
    }
    Err(ConsoleError::navigation_blocked(
        "advance",
        format!("step '{}' is incomplete", wizard.current_step().title()),
    ))
}

/// Submit the wizard and copy every log line to `out`
pub async fn execute<W: Write>(
    wizard: &mut Wizard,
    transport: &dyn Transport,
    teardown: TeardownSignal,
    out: &mut W,
) -> ConsoleResult<()> {
    let mut write_error = None;
    let outcome = run_session(wizard, transport, teardown, |line| {
        if write_error.is_none() {
            if let Err(e) = writeln!(out, "{}", line) {
                write_error = Some(e);
            }
        }
    })
    .await?;

    if let Some(e) = write_error {
        return Err(e.into());
    }

    match outcome {
        SessionOutcome::Succeeded => {
            info!(operation = %wizard.kind(), "operation finished");
            Ok(())
        }
        SessionOutcome::Failed => Err(ConsoleError::OperationFailed {
            operation: wizard.kind().to_string(),
        }),
        SessionOutcome::Pending => Err(ConsoleError::connection(
            "session ended before the backend reported a result",
        )),
    }
}
