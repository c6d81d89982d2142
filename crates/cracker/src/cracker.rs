//! The concurrent cracking core: batch dispensing, worker loops, and
//! race-to-first-success coordination.
//!
//! A fixed pool of workers pulls candidate batches from a shared,
//! single-pass stream and feeds each candidate to the extraction invoker.
//! The pool stops launching new invocations as soon as any worker either
//! finds the password or hits a fatal tool fault; in-flight invocations
//! are allowed to finish (the external process is never killed).

use crate::steghide::{Attempt, Extractor};
use crate::types::{CrackOptions, RunSummary};
use crate::wordlist::CandidateStream;
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use tracing::{debug, error};

/// Type alias for progress callback functions.
///
/// The callback receives:
/// - `attempts`: total completed attempts across all workers so far
/// - `last`: the candidate most recently tried by the reporting worker
///
/// Invoked at batch boundaries, under the same lock that serializes batch
/// dispensing, so successive calls always see a monotone attempt count.
pub type ProgressCallback = dyn Fn(u64, &str) + Send + Sync;

/// The candidate stream and the attempt counter share one critical
/// section: batches are dispensed and attempt totals flushed under the
/// same lock, keeping progress reporting consistent with dispensing.
struct Dispenser<R: BufRead> {
    stream: CandidateStream<R>,
    attempts: u64,
}

struct Shared<R: BufRead> {
    dispenser: Mutex<Dispenser<R>>,
    /// First-writer-wins; never cleared or overwritten once set.
    found: Mutex<Option<String>>,
    /// Pool-wide cancellation token, raised on success or fatal fault.
    stop: AtomicBool,
    has_error: AtomicBool,
}

/// A poisoned lock means a worker panicked mid-section; the guarded data
/// (stream cursor, counter) is still internally consistent, so the
/// remaining workers keep going rather than wedging the pool.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Coordinator owning a fixed worker pool and one extraction invoker.
pub struct Cracker<E: Extractor> {
    extractor: E,
    options: CrackOptions,
}

impl<E: Extractor> Cracker<E> {
    pub fn new(extractor: E, options: CrackOptions) -> Self {
        Self { extractor, options }
    }

    /// Drain the candidate stream with the configured worker pool,
    /// blocking until every worker has finished.
    ///
    /// Returns exactly one of three terminal outcomes in the summary:
    /// password found, wordlist exhausted, or error-terminated. The
    /// caller-supplied `cancel` flag is observed cooperatively at every
    /// candidate and batch boundary; setting it ends the run early with
    /// whatever state has accumulated.
    pub fn run<R>(
        &self,
        stream: CandidateStream<R>,
        progress: Option<&ProgressCallback>,
        cancel: Arc<AtomicBool>,
    ) -> RunSummary
    where
        R: BufRead + Send,
    {
        let shared = Shared {
            dispenser: Mutex::new(Dispenser {
                stream,
                attempts: 0,
            }),
            found: Mutex::new(None),
            stop: AtomicBool::new(false),
            has_error: AtomicBool::new(false),
        };

        let threads = self.options.threads.max(1);

        thread::scope(|scope| {
            for id in 1..=threads {
                let shared = &shared;
                let cancel = &cancel;
                scope.spawn(move || self.worker(shared, cancel, progress, id));
            }
        });

        let password = lock(&shared.found).take();
        let attempts = lock(&shared.dispenser).attempts;

        RunSummary {
            password,
            attempts,
            has_error: shared.has_error.load(Ordering::SeqCst),
        }
    }

    /// One worker: fetch a batch, attempt each candidate, report, repeat.
    fn worker<R: BufRead>(
        &self,
        shared: &Shared<R>,
        cancel: &AtomicBool,
        progress: Option<&ProgressCallback>,
        id: usize,
    ) {
        let chunk_size = self.options.chunk_size.max(1);

        loop {
            if stopped(shared, cancel) {
                return;
            }

            // The lock is held only for the pull, never across an
            // invocation, so dispensing cannot serialize the real work.
            let batch = lock(&shared.dispenser).stream.take_batch(chunk_size);
            if batch.is_empty() {
                debug!(worker = id, "candidate stream exhausted");
                return;
            }

            let mut completed = 0u64;
            let mut last = "";

            for password in &batch {
                if stopped(shared, cancel) {
                    flush(shared, completed, progress, last);
                    return;
                }

                match self.extractor.attempt(password) {
                    Ok(Attempt::Accepted) => {
                        completed += 1;
                        flush(shared, completed, None, "");

                        let mut found = lock(&shared.found);
                        if found.is_none() {
                            *found = Some(password.clone());
                        }
                        drop(found);

                        shared.stop.store(true, Ordering::SeqCst);
                        debug!(worker = id, "password accepted");
                        return;
                    }
                    Ok(Attempt::Rejected { diagnostics }) => {
                        completed += 1;
                        last = password.as_str();
                        let diagnostics = diagnostics.trim_end();
                        if !diagnostics.is_empty() {
                            debug!(worker = id, candidate = %password, "{diagnostics}");
                        }
                    }
                    Err(err) => {
                        error!(worker = id, "unhandled fault in cracker worker: {err}");
                        shared.has_error.store(true, Ordering::SeqCst);
                        shared.stop.store(true, Ordering::SeqCst);
                        flush(shared, completed, progress, last);
                        return;
                    }
                }
            }

            flush(shared, completed, progress, last);
        }
    }
}

fn stopped<R: BufRead>(shared: &Shared<R>, cancel: &AtomicBool) -> bool {
    shared.stop.load(Ordering::SeqCst) || cancel.load(Ordering::SeqCst)
}

/// Fold a worker's local attempt count into the shared total and report
/// progress, all under the dispenser lock.
fn flush<R: BufRead>(
    shared: &Shared<R>,
    completed: u64,
    progress: Option<&ProgressCallback>,
    last: &str,
) {
    if completed == 0 {
        return;
    }

    let mut dispenser = lock(&shared.dispenser);
    dispenser.attempts += completed;

    if let Some(callback) = progress {
        callback(dispenser.attempts, last);
    }
}
