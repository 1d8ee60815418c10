//! Scenario 5: an operator rule.
//!
//! The request itself allows sending mail, but the read-only deployment
//! policy denies `send_email` for everyone.

use serde_json::json;

use stride_contracts::{
    error::StrideResult,
    outcome::AgentOutcome,
    tool::ToolInvocation,
    trajectory::Decision,
};

use super::READ_ONLY_POLICY;
use crate::runtime::{print_outcome, OfficeRuntime};

pub const QUERY: &str = "Send an email to Priya confirming Tuesday afternoon";

pub fn script() -> Vec<Decision> {
    vec![Decision::invoke(
        "Confirm with Priya.",
        ToolInvocation::new(
            "send_email",
            json!({
                "to": "priya@example.com",
                "subject": "Tuesday",
                "body": "Tuesday afternoon works."
            }),
        ),
    )]
}

pub async fn run_scenario() -> StrideResult<AgentOutcome> {
    println!("=== Scenario 5: Operator rule ===");
    println!("  Query:       {QUERY}");

    let runtime = OfficeRuntime::scripted(script(), READ_ONLY_POLICY)?;
    let outcome = runtime.run(QUERY).await?;
    print_outcome(&outcome, runtime.trace());

    println!();
    Ok(outcome)
}
