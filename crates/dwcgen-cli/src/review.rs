//! Operator review of a flagged resource.
//!
//! The decision loop behind the quality gate: once the checker finds
//! problems, the operator either signs the resource off (skip, with a
//! reason recorded in the override ledger) or asks for the whole work
//! unit to be reprocessed. Any other answer re-prompts. The loop is
//! unbounded; only the operator ends it.

use anyhow::Result;

use crate::ledger::OverrideLedger;
use crate::session::PromptSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// The resource proceeds to output writing.
    Accepted,
    /// Reprocess the whole work unit from the parse step.
    Retry,
}

/// Ask the operator what to do with a resource the checker flagged.
///
/// On skip, the override row is appended and flushed before this
/// returns, so the sign-off survives whatever happens next.
pub fn review_problems(
    session: &mut dyn PromptSession,
    ledger: &OverrideLedger,
    work_id: &str,
    resource_id: &str,
) -> Result<ReviewOutcome> {
    loop {
        let choice = session.ask(&format!(
            "{work_id}: problems found in {resource_id}. Skip or retry (s/r)? "
        ))?;
        match choice.trim().chars().next() {
            Some('s' | 'S') => {
                let reason = session.ask("Reason for skipping? ")?;
                ledger.append(work_id, resource_id, &reason)?;
                println!("{work_id}: skipping {resource_id}");
                return Ok(ReviewOutcome::Accepted);
            }
            Some('r' | 'R') => return Ok(ReviewOutcome::Retry),
            _ => {}
        }
    }
}
