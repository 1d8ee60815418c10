//! The office tool set.
//!
//! | tool              | required arguments          | side effect (simulated) |
//! |-------------------|-----------------------------|-------------------------|
//! | `lookup_calendar` | `date`                      | none                    |
//! | `create_event`    | `title`, `date`, `start`    | books a slot            |
//! | `list_emails`     | none                        | none                    |
//! | `send_email`      | `to`, `subject`, `body`     | sends mail              |

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context};
use serde_json::{json, Map, Value};
use tracing::info;

use stride_contracts::{error::StrideResult, tool::ToolSpec};
use stride_tools::ToolRegistry;

use crate::mock_data::{calendar_for, filter_inbox, slot_taken};

const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";
const TIME_PATTERN: &str = r"^([01]\d|2[0-3]):[0-5]\d$";

fn str_arg<'a>(arguments: &'a Map<String, Value>, key: &str) -> anyhow::Result<&'a str> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .with_context(|| format!("argument '{key}' must be a string"))
}

// ── Specs ─────────────────────────────────────────────────────────────────────

pub fn lookup_calendar_spec() -> ToolSpec {
    ToolSpec::new("lookup_calendar", "List the events on the user's calendar for one day")
        .with_input_schema(json!({
            "type": "object",
            "required": ["date"],
            "properties": {
                "date": { "type": "string", "pattern": DATE_PATTERN, "description": "YYYY-MM-DD" }
            },
            "additionalProperties": false
        }))
        .with_output_schema(json!({
            "type": "object",
            "required": ["date", "events"],
            "properties": { "events": { "type": "array" } }
        }))
}

pub fn create_event_spec() -> ToolSpec {
    ToolSpec::new("create_event", "Create a calendar event")
        .with_input_schema(json!({
            "type": "object",
            "required": ["title", "date", "start"],
            "properties": {
                "title": { "type": "string", "minLength": 1 },
                "date": { "type": "string", "pattern": DATE_PATTERN },
                "start": { "type": "string", "pattern": TIME_PATTERN, "description": "HH:MM, 24h" },
                "duration_minutes": { "type": "integer", "minimum": 5, "maximum": 480 },
                "attendees": { "type": "array", "items": { "type": "string" } }
            },
            "additionalProperties": false
        }))
        .with_output_schema(json!({
            "type": "object",
            "required": ["event_id", "status"]
        }))
}

pub fn list_emails_spec() -> ToolSpec {
    ToolSpec::new("list_emails", "List messages in the user's inbox").with_input_schema(json!({
        "type": "object",
        "properties": {
            "unread_only": { "type": "boolean" },
            "from": { "type": "string" }
        },
        "additionalProperties": false
    }))
}

pub fn send_email_spec() -> ToolSpec {
    ToolSpec::new("send_email", "Send an email on the user's behalf")
        .with_input_schema(json!({
            "type": "object",
            "required": ["to", "subject", "body"],
            "properties": {
                "to": { "type": "string", "minLength": 3 },
                "subject": { "type": "string" },
                "body": { "type": "string" },
                "in_reply_to": { "type": "string" }
            },
            "additionalProperties": false
        }))
        .with_output_schema(json!({
            "type": "object",
            "required": ["message_id", "status"]
        }))
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// Register every office tool.
pub fn build_registry() -> StrideResult<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    let event_ids = Arc::new(AtomicU64::new(1));
    let message_ids = Arc::new(AtomicU64::new(9000));

    registry.register_fn(lookup_calendar_spec(), |args| {
        let date = str_arg(&args, "date")?;
        Ok(calendar_for(date))
    })?;

    registry.register_fn(create_event_spec(), move |args| {
        let title = str_arg(&args, "title")?;
        let date = str_arg(&args, "date")?;
        let start = str_arg(&args, "start")?;
        if slot_taken(date, start) {
            bail!("{start} on {date} is already booked");
        }

        let id = event_ids.fetch_add(1, Ordering::Relaxed);
        info!(event_id = id, date, start, "event created");
        Ok(json!({
            "event_id": format!("evt-{id}"),
            "status": "confirmed",
            "title": title,
            "date": date,
            "start": start,
            "duration_minutes": args.get("duration_minutes").cloned().unwrap_or(json!(30)),
        }))
    })?;

    registry.register_fn(list_emails_spec(), |args| {
        let unread_only = args.get("unread_only").and_then(Value::as_bool).unwrap_or(false);
        let from = args.get("from").and_then(Value::as_str);
        let emails = filter_inbox(unread_only, from);
        Ok(json!({ "count": emails.len(), "emails": emails }))
    })?;

    registry.register_fn(send_email_spec(), move |args| {
        let to = str_arg(&args, "to")?;
        if !to.contains('@') {
            bail!("'{to}' is not a deliverable address");
        }
        let id = message_ids.fetch_add(1, Ordering::Relaxed);
        info!(message_id = id, to, "email sent");
        Ok(json!({ "message_id": format!("msg-{id}"), "status": "sent", "to": to }))
    })?;

    Ok(registry)
}
