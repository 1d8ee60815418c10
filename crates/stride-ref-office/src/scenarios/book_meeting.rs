//! Scenario 1: book a meeting.
//!
//! The model checks the calendar, books a free slot, then answers. The
//! request allows three tool calls and the run needs two.

use serde_json::json;

use stride_contracts::{
    error::StrideResult,
    outcome::AgentOutcome,
    tool::ToolInvocation,
    trajectory::Decision,
};

use super::OFFICE_POLICY;
use crate::runtime::{print_outcome, OfficeRuntime};

pub const QUERY: &str = "Book a meeting with Dana on 2026-10-19 within 3 tool calls";

pub fn script() -> Vec<Decision> {
    vec![
        Decision::invoke(
            "Check what is already on the 19th.",
            ToolInvocation::new("lookup_calendar", json!({ "date": "2026-10-19" })),
        ),
        Decision::invoke(
            "10:00 is free between standup and the design review.",
            ToolInvocation::new(
                "create_event",
                json!({
                    "title": "Sync with Dana",
                    "date": "2026-10-19",
                    "start": "10:00",
                    "duration_minutes": 30,
                    "attendees": ["dana@example.com"]
                }),
            ),
        ),
        Decision::finish(
            "The event is confirmed.",
            "Booked \"Sync with Dana\" on 2026-10-19 at 10:00 for 30 minutes.",
        ),
    ]
}

pub async fn run_scenario() -> StrideResult<AgentOutcome> {
    println!("=== Scenario 1: Book a meeting ===");
    println!("  Query:       {QUERY}");

    let runtime = OfficeRuntime::scripted(script(), OFFICE_POLICY)?;
    let outcome = runtime.run(QUERY).await?;
    print_outcome(&outcome, runtime.trace());

    println!();
    Ok(outcome)
}
