//! # Cracker
//!
//! A steganography password brute-forcing library built around the
//! external `steghide` tool.
//!
//! Given a carrier file and a candidate-password wordlist, a fixed pool
//! of workers repeatedly invokes `steghide extract` with each candidate
//! until one succeeds or the wordlist is exhausted. The library only
//! schedules invocations; it never tries to accelerate the tool itself.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cracker::{crack, CrackOptions};
//! use std::path::Path;
//! use std::sync::Arc;
//! use std::sync::atomic::AtomicBool;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = CrackOptions::default();
//! let cancel_flag = Arc::new(AtomicBool::new(false));
//! let progress_cb = |attempts: u64, last: &str| {
//!     eprintln!("{} attempts, last tried: {}", attempts, last);
//! };
//!
//! let summary = crack(
//!     Path::new("tom.jpg"),
//!     Path::new("tom.jpg.out"),
//!     Path::new("/usr/share/wordlists/rockyou.txt"),
//!     &options,
//!     Some(&progress_cb),
//!     cancel_flag,
//! )?;
//!
//! match summary.password {
//!     Some(password) => println!("{}", password),
//!     None => eprintln!("ran out of passwords"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod cracker;
pub mod error;
pub mod preflight;
pub mod steghide;
pub mod types;
pub mod wordlist;

// Re-export main types
pub use cracker::{Cracker, ProgressCallback};
pub use error::CrackError;
pub use steghide::{Attempt, Extractor, Steghide};
pub use types::{CrackOptions, RunSummary};
pub use wordlist::CandidateStream;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Brute-force a carrier file with a wordlist using `steghide`.
///
/// # Arguments
///
/// * `carrier` - File suspected of containing hidden data
/// * `output` - Path the extracted payload is written to on success
/// * `wordlist` - Candidate passwords, one per line
/// * `options` - Worker count and batch size
/// * `progress_cb` - Optional callback for progress updates
/// * `cancel_flag` - Atomic flag to signal cancellation
///
/// # Returns
///
/// Returns a `RunSummary` with the found password (if any), the attempt
/// count, and whether a fatal tool fault terminated the run.
///
/// # Errors
///
/// Returns an error only if the wordlist cannot be opened; everything
/// after that point is reported through the summary.
pub fn crack(
    carrier: &Path,
    output: &Path,
    wordlist: &Path,
    options: &CrackOptions,
    progress_cb: Option<&ProgressCallback>,
    cancel_flag: Arc<AtomicBool>,
) -> Result<RunSummary, CrackError> {
    let reader = BufReader::new(File::open(wordlist)?);
    let stream = CandidateStream::new(reader);
    let cracker = Cracker::new(Steghide::new(carrier, output), options.clone());
    Ok(cracker.run(stream, progress_cb, cancel_flag))
}
