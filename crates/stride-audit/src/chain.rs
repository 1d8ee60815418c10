//! Hash-chain primitives.
//!
//! Hash input layout (bytes, in order):
//!   1. execution_id as UTF-8 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. compact JSON of the step

use sha2::{Digest, Sha256};

use stride_contracts::{
    error::{StrideError, StrideResult},
    trajectory::Step,
};

use crate::event::TraceEvent;

/// Compute the SHA-256 hash for one trace event.
///
/// Returns a lowercase 64-character hex string, or `TraceWriteFailed` if the
/// step cannot be serialized.
pub fn hash_step(
    execution_id: &str,
    sequence: u64,
    step: &Step,
    prev_hash: &str,
) -> StrideResult<String> {
    let step_json = serde_json::to_vec(step).map_err(|e| StrideError::TraceWriteFailed {
        reason: format!("step {} is not serializable: {}", step.index, e),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(execution_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&step_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Verify prev-hash linkage and hash correctness for every event.
///
/// An empty chain is valid.
pub fn verify_chain(events: &[TraceEvent]) -> bool {
    let mut expected_prev = TraceEvent::GENESIS_HASH.to_string();

    for (position, event) in events.iter().enumerate() {
        if event.sequence != position as u64 || event.prev_hash != expected_prev {
            return false;
        }

        match hash_step(&event.execution_id, event.sequence, &event.step, &event.prev_hash) {
            Ok(recomputed) if recomputed == event.this_hash => {}
            _ => return false,
        }

        expected_prev = event.this_hash.clone();
    }

    true
}
