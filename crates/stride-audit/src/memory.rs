//! In-memory implementation of `TraceWriter`.
//!
//! One writer can observe many executions at once; each execution gets its
//! own chain, keyed by execution id. Share it across loops with an `Arc`.
//!
//! Chains are kept until they are taken out with
//! [`InMemoryTraceWriter::take_log`]. A writer that lives longer than a
//! handful of runs should take each log once the run has been handled.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{debug, info};

use stride_contracts::{
    error::{StrideError, StrideResult},
    outcome::AgentOutcome,
    trajectory::{ExecutionId, Step},
};
use stride_core::traits::TraceWriter;

use crate::{
    chain::{hash_step, verify_chain},
    event::{TraceEvent, TraceLog, TraceSeal},
};

// ── Internal mutable state ────────────────────────────────────────────────────

#[derive(Debug)]
pub(crate) struct Chain {
    pub(crate) events: Vec<TraceEvent>,
    pub(crate) last_hash: String,
    pub(crate) seal: Option<TraceSeal>,
}

impl Default for Chain {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            last_hash: TraceEvent::GENESIS_HASH.to_string(),
            seal: None,
        }
    }
}

impl Chain {
    fn terminal_hash(&self) -> String {
        self.events
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_default()
    }
}

// ── Public writer ─────────────────────────────────────────────────────────────

/// An append-only trace writer backed by per-execution SHA-256 hash chains.
#[derive(Debug, Default)]
pub struct InMemoryTraceWriter {
    pub(crate) chains: Mutex<HashMap<String, Chain>>,
}

impl InMemoryTraceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StrideResult<MutexGuard<'_, HashMap<String, Chain>>> {
        self.chains.lock().map_err(|e| StrideError::TraceWriteFailed {
            reason: format!("trace state lock poisoned: {}", e),
        })
    }

    /// Read access survives a poisoned lock; the chain is verified anyway.
    fn read(&self) -> MutexGuard<'_, HashMap<String, Chain>> {
        self.chains.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Export the trace for one execution, or `None` if it was never seen.
    pub fn export_log(&self, execution_id: &ExecutionId) -> Option<TraceLog> {
        let key = execution_id.to_string();
        let chains = self.read();
        let chain = chains.get(&key)?;

        Some(TraceLog {
            terminal_hash: chain.terminal_hash(),
            execution_id: key,
            events: chain.events.clone(),
            seal: chain.seal.clone(),
        })
    }

    /// Remove one execution's chain and return it as a log.
    ///
    /// Later writes for the same execution start a fresh chain.
    pub fn take_log(&self, execution_id: &ExecutionId) -> Option<TraceLog> {
        let key = execution_id.to_string();
        let chain = self.read().remove(&key)?;

        debug!(execution_id = %key, event_count = chain.events.len(), "trace taken");

        Some(TraceLog {
            terminal_hash: chain.terminal_hash(),
            execution_id: key,
            events: chain.events,
            seal: chain.seal,
        })
    }

    /// Verify the chain of one execution. Unknown executions are valid.
    pub fn verify_integrity(&self, execution_id: &ExecutionId) -> bool {
        self.read()
            .get(&execution_id.to_string())
            .map_or(true, |chain| verify_chain(&chain.events))
    }

    /// Number of executions observed so far.
    pub fn executions(&self) -> usize {
        self.read().len()
    }
}

// ── TraceWriter impl ──────────────────────────────────────────────────────────

impl TraceWriter for InMemoryTraceWriter {
    fn record(&self, execution_id: &ExecutionId, step: &Step) -> StrideResult<()> {
        let key = execution_id.to_string();
        let mut chains = self.lock()?;
        let chain = chains.entry(key.clone()).or_default();

        if chain.seal.is_some() {
            return Err(StrideError::TraceWriteFailed {
                reason: format!("execution {} is already finalized", key),
            });
        }

        let sequence = chain.events.len() as u64;
        let prev_hash = chain.last_hash.clone();
        let this_hash = hash_step(&key, sequence, step, &prev_hash)?;

        debug!(execution_id = %key, sequence, hash = %this_hash, "trace event appended");

        chain.events.push(TraceEvent {
            sequence,
            execution_id: key,
            step: step.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        chain.last_hash = this_hash;

        Ok(())
    }

    fn finalize(&self, outcome: &AgentOutcome) -> StrideResult<()> {
        let key = outcome.execution_id.to_string();
        let mut chains = self.lock()?;
        let chain = chains.entry(key.clone()).or_default();

        chain.seal = Some(TraceSeal {
            status: outcome.status,
            reason: outcome.reason,
            finalized_at: Utc::now(),
        });

        info!(
            execution_id = %key,
            event_count = chain.events.len(),
            terminal_hash = %chain.terminal_hash(),
            status = ?outcome.status,
            "trace finalized"
        );

        Ok(())
    }
}
