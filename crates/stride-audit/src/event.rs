//! Trace event and log types.
//!
//! `TraceEvent` wraps one trajectory `Step` with its position in the chain
//! and the SHA-256 hashes that make tampering detectable. `TraceLog` is the
//! exported view of one execution's chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stride_contracts::{error::ErrorKind, outcome::OutcomeStatus, trajectory::Step};

/// A single entry in the hash chain for one execution.
///
/// Modifying any field, including those of the embedded `step`, invalidates
/// `this_hash` and every later `prev_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Position in the chain, starting at 0.
    pub sequence: u64,

    pub execution_id: String,

    pub step: Step,

    /// Hash of the previous event, or `GENESIS_HASH` for the first event.
    pub prev_hash: String,

    /// Hash over (execution_id, sequence, prev_hash, canonical JSON of step).
    pub this_hash: String,
}

impl TraceEvent {
    /// The `prev_hash` of the first event in every chain.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// How the execution ended, captured by `TraceWriter::finalize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceSeal {
    pub status: OutcomeStatus,
    pub reason: Option<ErrorKind>,
    pub finalized_at: DateTime<Utc>,
}

/// Exported trace for a single execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceLog {
    pub execution_id: String,

    /// All events in chain order.
    pub events: Vec<TraceEvent>,

    /// `None` while the execution is still running.
    pub seal: Option<TraceSeal>,

    /// The `this_hash` of the last event. Empty if no step was recorded.
    pub terminal_hash: String,
}

impl TraceLog {
    pub fn is_sealed(&self) -> bool {
        self.seal.is_some()
    }
}
