pub mod add;
pub mod agenda;
pub mod board;
pub mod day;
pub mod edit;
pub mod month;
pub mod mv;
pub mod pull;
pub mod rm;
pub mod timeline;
pub mod week;

use anyhow::Result;
use dayboard_core::Planner;

/// Wait for optimistic mutations to settle before the process exits, and
/// surface any error the settlement recorded.
pub async fn finish(planner: &Planner) -> Result<()> {
    planner.settled().await;
    if let Some(message) = planner.snapshot().last_error {
        anyhow::bail!(message);
    }
    Ok(())
}
