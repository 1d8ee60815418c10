//! Constraint phrase recognition and normalization.
//!
//! Recognized phrase families (case-insensitive):
//!
//! | phrase                                   | constraint        |
//! |------------------------------------------|-------------------|
//! | `within 5 minutes`, `in under an hour`   | `TimeLimit`       |
//! | `within 2 tool calls`, `at most 3 tool calls` | `ToolCallLimit` |
//! | `in at most 4 steps`, `within 6 steps`   | `StepLimit`       |
//! | `without using X`, `don't use X`         | `DisallowedTools` |
//!
//! Anything else is left in the text and never becomes a constraint.

use std::collections::BTreeSet;
use std::sync::LazyLock;
use std::time::Duration;

use regex::{Captures, Regex};

use stride_contracts::query::{Constraint, ConstraintSet};

const NUMBER: &str =
    r"\d+|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|an|a";

/// Bounding words that may follow a preposition or stand on their own.
const QUANTIFIER: &str = r"at most|no more than|up to|max(?:imum)?(?:\s+of)?";

static TIME_LIMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:within|in under|in less than|under|no longer than|at most)\s+({NUMBER})\s*(seconds?|secs?|minutes?|mins?|hours?|hrs?)\b"
    ))
    .expect("time limit pattern is a valid regex")
});

static TOOL_CALL_LIMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:(?:within|using|with|in|under)\s+(?:(?:{QUANTIFIER})\s+)?|(?:{QUANTIFIER})\s+)({NUMBER})\s+(?:tool|api)\s+(?:calls?|uses?|invocations?)\b"
    ))
    .expect("tool call limit pattern is a valid regex")
});

static STEP_LIMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:(?:within|in|using|under)\s+(?:(?:{QUANTIFIER})\s+)?|(?:{QUANTIFIER})\s+)({NUMBER})\s+(?:steps?|iterations?)\b"
    ))
    .expect("step limit pattern is a valid regex")
});

static DISALLOWED_TOOL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:without\s+(?:using|calling)|(?:do\s+not|don't|dont|never)\s+(?:use|call))\s+(?:the\s+)?([a-z][a-z0-9_]*)(?:\s+tool)?\b",
    )
    .expect("disallowed tool pattern is a valid regex")
});

fn parse_number(s: &str) -> Option<u32> {
    if let Ok(n) = s.parse() {
        return Some(n);
    }
    let n = match s.to_ascii_lowercase().as_str() {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        _ => return None,
    };
    Some(n)
}

fn unit_seconds(unit: &str) -> u64 {
    let unit = unit.to_ascii_lowercase();
    if unit.starts_with('h') {
        3600
    } else if unit.starts_with('m') {
        60
    } else {
        1
    }
}

fn time_limit(caps: &Captures<'_>) -> Option<Constraint> {
    let n = parse_number(&caps[1])?;
    let limit = Duration::from_secs(u64::from(n) * unit_seconds(&caps[2]));
    Some(Constraint::TimeLimit { limit })
}

fn tool_call_limit(caps: &Captures<'_>) -> Option<Constraint> {
    parse_number(&caps[1]).map(|max_calls| Constraint::ToolCallLimit { max_calls })
}

fn step_limit(caps: &Captures<'_>) -> Option<Constraint> {
    parse_number(&caps[1]).map(|max_steps| Constraint::StepLimit { max_steps })
}

fn disallowed_tool(caps: &Captures<'_>) -> Option<Constraint> {
    let tool = caps[1].to_ascii_lowercase();
    Some(Constraint::DisallowedTools {
        tools: BTreeSet::from([tool]),
    })
}

type Extractor = fn(&Captures<'_>) -> Option<Constraint>;

fn families() -> [(&'static Regex, Extractor); 4] {
    [
        (&*TOOL_CALL_LIMIT, tool_call_limit as Extractor),
        (&*STEP_LIMIT, step_limit as Extractor),
        (&*TIME_LIMIT, time_limit as Extractor),
        (&*DISALLOWED_TOOL, disallowed_tool as Extractor),
    ]
}

/// Normalize a single constraint phrase, e.g. `"within 5 minutes"`.
///
/// Returns `None` for phrases that match no known family.
pub fn normalize_constraint(phrase: &str) -> Option<Constraint> {
    families()
        .into_iter()
        .find_map(|(re, extract)| re.captures(phrase).and_then(|caps| extract(&caps)))
}

/// Pull every recognized constraint out of `text`.
///
/// Returns the constraint set and the text with the matched phrases removed,
/// so intent classification is not confused by them.
pub fn extract_constraints(text: &str) -> (ConstraintSet, String) {
    let mut constraints = ConstraintSet::default();
    let mut remainder = text.to_string();

    for (re, extract) in families() {
        for caps in re.captures_iter(&remainder) {
            if let Some(constraint) = extract(&caps) {
                constraints.insert(constraint);
            }
        }
        remainder = re.replace_all(&remainder, " ").into_owned();
    }

    (constraints, remainder)
}
