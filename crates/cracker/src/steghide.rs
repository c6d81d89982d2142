//! Synchronous invocation of the external `steghide` tool.
//!
//! The tool is a black box: only its invocation contract matters here.
//! One call attempts exactly one candidate password against the carrier
//! file, and its exit status tells us whether the password was accepted.

use crate::error::CrackError;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Outcome of one completed extraction attempt.
///
/// A launch failure or unexpected fault is not an `Attempt`; it surfaces
/// as the `Err` arm of [`Extractor::attempt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// The tool accepted the password and wrote the payload to the
    /// output path.
    Accepted,

    /// The tool rejected the password (the normal, frequent case).
    Rejected {
        /// Captured stderr/stdout of the rejected invocation
        diagnostics: String,
    },
}

/// One synchronous extraction attempt with a single candidate password.
///
/// Implementors are shared by all workers in the pool, so an attempt must
/// not require exclusive access. The pool guarantees that at most one
/// attempt ever succeeds per run (it cancels the rest), so implementors
/// only need the output path to be written on the accepted attempt.
pub trait Extractor: Sync {
    /// Run the tool with `password`, blocking until it exits.
    ///
    /// # Errors
    ///
    /// Returns an error only when the invocation itself faults (the tool
    /// cannot be started, or disappears mid-run). A wrong password is a
    /// normal [`Attempt::Rejected`] outcome, not an error.
    fn attempt(&self, password: &str) -> Result<Attempt, CrackError>;
}

impl<E: Extractor + ?Sized> Extractor for &E {
    fn attempt(&self, password: &str) -> Result<Attempt, CrackError> {
        (**self).attempt(password)
    }
}

/// Invoker for the real `steghide` binary.
pub struct Steghide {
    program: PathBuf,
    carrier: PathBuf,
    output: PathBuf,
}

impl Steghide {
    /// Invoker resolving `steghide` from PATH.
    pub fn new(carrier: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self::with_program("steghide", carrier, output)
    }

    /// Invoker running an explicit program path instead of `steghide`.
    pub fn with_program(
        program: impl Into<PathBuf>,
        carrier: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            carrier: carrier.into(),
            output: output.into(),
        }
    }

    /// Path the payload is written to on an accepted attempt.
    pub fn output_path(&self) -> &Path {
        &self.output
    }
}

impl Extractor for Steghide {
    fn attempt(&self, password: &str) -> Result<Attempt, CrackError> {
        // Fixed argument template; must be reproduced exactly for
        // compatibility with steghide's CLI. `-f` forces overwrite of any
        // stale partial output left by a previous rejected attempt.
        let output = Command::new(&self.program)
            .arg("extract")
            .arg("-sf")
            .arg(&self.carrier)
            .arg("-xf")
            .arg(&self.output)
            .arg("-p")
            .arg(password)
            .arg("-f")
            .stdin(Stdio::null())
            .output()
            .map_err(|source| CrackError::ToolInvocation {
                program: self.program.display().to_string(),
                source,
            })?;

        if output.status.success() {
            Ok(Attempt::Accepted)
        } else {
            let mut diagnostics = String::from_utf8_lossy(&output.stderr).into_owned();
            diagnostics.push_str(&String::from_utf8_lossy(&output.stdout));
            Ok(Attempt::Rejected { diagnostics })
        }
    }
}
