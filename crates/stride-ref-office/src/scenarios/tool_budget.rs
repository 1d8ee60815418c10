//! Scenario 2: tool-call budget.
//!
//! The request allows two tool calls. The model looks at two days, then
//! tries to book; the third dispatch is refused and the run aborts with
//! both completed steps kept.

use serde_json::json;

use stride_contracts::{
    error::StrideResult,
    outcome::AgentOutcome,
    tool::ToolInvocation,
    trajectory::Decision,
};

use super::OFFICE_POLICY;
use crate::runtime::{print_outcome, OfficeRuntime};

pub const QUERY: &str = "Book a meeting tomorrow within 2 tool calls";

pub fn script() -> Vec<Decision> {
    vec![
        Decision::invoke(
            "Look at tomorrow first.",
            ToolInvocation::new("lookup_calendar", json!({ "date": "2026-10-19" })),
        ),
        Decision::invoke(
            "Compare with the day after.",
            ToolInvocation::new("lookup_calendar", json!({ "date": "2026-10-20" })),
        ),
        Decision::invoke(
            "Book the morning slot tomorrow.",
            ToolInvocation::new(
                "create_event",
                json!({ "title": "Meeting", "date": "2026-10-19", "start": "10:00" }),
            ),
        ),
    ]
}

pub async fn run_scenario() -> StrideResult<AgentOutcome> {
    println!("=== Scenario 2: Tool-call budget ===");
    println!("  Query:       {QUERY}");

    let runtime = OfficeRuntime::scripted(script(), OFFICE_POLICY)?;
    let outcome = runtime.run(QUERY).await?;
    print_outcome(&outcome, runtime.trace());

    println!();
    Ok(outcome)
}
