//! Rule-based intent classification.
//!
//! The interpreter strips constraint phrases first, then tries each intent
//! rule in order against what is left. Caller-supplied rules are tried before
//! the built-in table. When nothing matches, the remaining words become the
//! intent label.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use stride_contracts::{
    error::{StrideError, StrideResult},
    query::{Intent, ParsedRequest},
};
use stride_core::traits::QueryInterpreter;

use crate::constraints::extract_constraints;

/// Words kept when the intent falls back to the query text itself.
const FALLBACK_MAX_WORDS: usize = 8;

/// One labelled pattern in the intent table.
#[derive(Debug, Clone)]
pub struct IntentRule {
    pub label: String,
    pattern: Regex,
}

impl IntentRule {
    /// Compile a rule. The pattern is matched case-insensitively.
    pub fn new(label: impl Into<String>, pattern: &str) -> StrideResult<Self> {
        let label = label.into();
        let pattern = Regex::new(&format!("(?i){pattern}")).map_err(|e| {
            StrideError::ConfigError {
                reason: format!("invalid pattern for intent '{label}': {e}"),
            }
        })?;
        Ok(Self { label, pattern })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

const BUILTIN_RULES: &[(&str, &str)] = &[
    (
        "schedule_meeting",
        r"\b(?:schedule|book|set\s+up|arrange|organi[sz]e|plan)\b.*\b(?:meetings?|calls?|appointments?|events?|syncs?|1:1)\b|\bmeet\s+with\b",
    ),
    (
        "reply_email",
        r"\b(?:reply|respond|answer)\b.*\b(?:e-?mails?|inbox|messages?)\b",
    ),
    (
        "send_email",
        r"\b(?:send|write|draft|compose|forward)\b.*\be-?mails?\b|\be-?mail\s+(?:to\s+)?[a-z]+",
    ),
    (
        "read_email",
        r"\b(?:read|check|show|list|summari[sz]e|go\s+through)\b.*\b(?:e-?mails?|inbox)\b",
    ),
    (
        "send_message",
        r"\b(?:send|post|write)\b.*\b(?:messages?|slack|dms?|texts?)\b|\b(?:ping|text|dm)\s+[a-z]+",
    ),
    (
        "check_calendar",
        r"\b(?:calendar|agenda)\b|\b(?:am\s+i|are\s+we|is\s+[a-z]+)\s+(?:free|busy|available)\b",
    ),
    (
        "update_spreadsheet",
        r"\b(?:update|edit|fill\s+in|add\s+to|modify|append\s+to)\b.*\b(?:spreadsheets?|sheets?|excel|tables?)\b",
    ),
    (
        "find_document",
        r"\b(?:find|locate|search\s+for|look\s+for|open|pull\s+up)\b.*\b(?:docs?|documents?|files?|reports?|pdfs?|slides?)\b",
    ),
    (
        "search_web",
        r"\b(?:search|google|look\s+up|browse)\b|\bweb\b",
    ),
];

static BUILTIN: LazyLock<Vec<IntentRule>> = LazyLock::new(|| {
    BUILTIN_RULES
        .iter()
        .map(|(label, pattern)| {
            IntentRule::new(*label, pattern).expect("built-in intent pattern is a valid regex")
        })
        .collect()
});

/// Turn free text into a snake_case label of at most eight words.
///
/// Any Unicode letter or digit counts as part of a word, so accented and
/// non-Latin queries keep their text.
pub fn snake_label(text: &str) -> Option<String> {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .take(FALLBACK_MAX_WORDS)
        .map(str::to_lowercase)
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(words.join("_"))
    }
}

/// Collapse runs of whitespace and stray punctuation left by stripped phrases.
fn goal_description(text: &str) -> String {
    let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
    joined
        .trim_matches(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .to_string()
}

/// A deterministic, regex-driven `QueryInterpreter`.
///
/// ```rust,ignore
/// let interpreter = RuleInterpreter::new()
///     .with_rule("file_expense", r"\bexpense\b")?;
/// let parsed = interpreter.interpret("Book a meeting tomorrow within 2 tool calls")?;
/// assert_eq!(parsed.intent.as_str(), "schedule_meeting");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleInterpreter {
    custom: Vec<IntentRule>,
}

impl RuleInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule that takes precedence over the built-in table.
    ///
    /// Rules added later are tried after rules added earlier.
    pub fn with_rule(mut self, label: impl Into<String>, pattern: &str) -> StrideResult<Self> {
        self.custom.push(IntentRule::new(label, pattern)?);
        Ok(self)
    }

    fn classify(&self, text: &str) -> Option<String> {
        self.custom
            .iter()
            .chain(BUILTIN.iter())
            .find(|rule| rule.matches(text))
            .map(|rule| rule.label.clone())
            .or_else(|| snake_label(text))
    }

    /// Synchronous form of [`QueryInterpreter::parse`].
    pub fn interpret(&self, raw_text: &str) -> StrideResult<ParsedRequest> {
        let trimmed = raw_text.trim();
        if trimmed.is_empty() {
            return Err(StrideError::MalformedQuery {
                reason: "query is empty".to_string(),
            });
        }

        let (constraints, remainder) = extract_constraints(trimmed);
        let label = self
            .classify(&remainder)
            .ok_or_else(|| StrideError::MalformedQuery {
                reason: format!("no intent could be extracted from '{trimmed}'"),
            })?;

        let description = goal_description(&remainder);

        debug!(intent = %label, constraints = constraints.len(), "query interpreted");

        Ok(ParsedRequest {
            intent: Intent::with_description(label, description),
            constraints,
        })
    }
}

#[async_trait]
impl QueryInterpreter for RuleInterpreter {
    async fn parse(&self, raw_text: &str) -> StrideResult<ParsedRequest> {
        self.interpret(raw_text)
    }
}
