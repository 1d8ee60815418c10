//! Scenario 3: recovering from a failed tool call.
//!
//! The model first calls `lookup_calendar` without the required `date`.
//! The schema violation comes back as an observation, the model corrects
//! the call, and the run completes.

use serde_json::json;

use stride_contracts::{
    error::StrideResult,
    outcome::AgentOutcome,
    tool::ToolInvocation,
    trajectory::Decision,
};

use super::OFFICE_POLICY;
use crate::runtime::{print_outcome, OfficeRuntime};

pub const QUERY: &str = "Check my calendar for Monday";

pub fn script() -> Vec<Decision> {
    vec![
        Decision::invoke(
            "Look up Monday.",
            ToolInvocation::new("lookup_calendar", json!({ "day": "Monday" })),
        ),
        Decision::invoke(
            "The tool wants an ISO date; Monday is 2026-10-19.",
            ToolInvocation::new("lookup_calendar", json!({ "date": "2026-10-19" })),
        ),
        Decision::finish(
            "Three events found.",
            "Monday: standup 09:00, design review 11:00, 1:1 with Priya 15:30.",
        ),
    ]
}

pub async fn run_scenario() -> StrideResult<AgentOutcome> {
    println!("=== Scenario 3: Tool failure recovery ===");
    println!("  Query:       {QUERY}");

    let runtime = OfficeRuntime::scripted(script(), OFFICE_POLICY)?;
    let outcome = runtime.run(QUERY).await?;
    print_outcome(&outcome, runtime.trace());

    println!();
    Ok(outcome)
}
