//! Simulated calendar and mailbox for the office reference runtime.
//!
//! All data is hardcoded and fictional. Nothing external is contacted.

use serde_json::{json, Value};

// ── Calendar (mock) ───────────────────────────────────────────────────────────

/// Events already on the calendar for `date` (`YYYY-MM-DD`).
///
/// Only 2026-10-19 and 2026-10-20 have entries; every other day is empty.
pub fn calendar_for(date: &str) -> Value {
    let events = match date {
        "2026-10-19" => json!([
            { "title": "Team standup", "start": "09:00", "duration_minutes": 15 },
            { "title": "Design review", "start": "11:00", "duration_minutes": 60 },
            { "title": "1:1 with Priya", "start": "15:30", "duration_minutes": 30 }
        ]),
        "2026-10-20" => json!([
            { "title": "Quarterly planning", "start": "09:00", "duration_minutes": 240 }
        ]),
        _ => json!([]),
    };

    json!({ "date": date, "events": events })
}

/// Whether `start` on `date` collides with an existing event's start time.
pub fn slot_taken(date: &str, start: &str) -> bool {
    calendar_for(date)["events"]
        .as_array()
        .is_some_and(|events| events.iter().any(|e| e["start"] == start))
}

// ── Inbox (mock) ──────────────────────────────────────────────────────────────

pub fn inbox() -> Value {
    json!([
        {
            "id": "msg-101",
            "from": "dana@example.com",
            "subject": "Offsite agenda",
            "received": "2026-10-16T08:12:00Z",
            "unread": true,
            "preview": "Can you send me the agenda draft before Monday?"
        },
        {
            "id": "msg-102",
            "from": "billing@example.com",
            "subject": "Invoice #4471",
            "received": "2026-10-15T17:40:00Z",
            "unread": false,
            "preview": "Your invoice for October is attached."
        },
        {
            "id": "msg-103",
            "from": "priya@example.com",
            "subject": "Re: hiring loop",
            "received": "2026-10-17T10:03:00Z",
            "unread": true,
            "preview": "Works for me, let's do Tuesday afternoon."
        }
    ])
}

/// Inbox messages, optionally only unread ones and only from one sender.
pub fn filter_inbox(unread_only: bool, from: Option<&str>) -> Vec<Value> {
    let Value::Array(messages) = inbox() else {
        return Vec::new();
    };

    messages
        .into_iter()
        .filter(|m| !unread_only || m["unread"] == true)
        .filter(|m| from.map_or(true, |sender| m["from"] == sender))
        .collect()
}
