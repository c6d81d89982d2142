//! Type definitions for cracking runs.

use serde::Serialize;

/// Options controlling how a cracking run is scheduled.
#[derive(Debug, Clone)]
pub struct CrackOptions {
    /// Number of parallel workers (default: 16)
    pub threads: usize,

    /// Number of candidates dispensed to a worker per batch (default: 256)
    pub chunk_size: usize,
}

impl Default for CrackOptions {
    fn default() -> Self {
        Self {
            threads: 16,
            chunk_size: 256,
        }
    }
}

/// Final state of a completed cracking run.
///
/// Exactly one of three shapes is ever produced:
/// - `password` set: the carrier was cracked, `attempts` counts every
///   invocation that completed before termination (including the winner).
/// - `password` unset, `has_error` false: the wordlist was exhausted.
/// - `password` unset, `has_error` true: a worker hit a fatal tool fault
///   and the pool stopped early.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// The accepted password, if any candidate succeeded
    pub password: Option<String>,

    /// Number of completed extraction attempts across all workers
    pub attempts: u64,

    /// Whether the run was terminated by a tool invocation fault
    pub has_error: bool,
}
