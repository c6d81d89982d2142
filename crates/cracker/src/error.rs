//! Error types for cracking operations.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cracking operations.
#[derive(Debug, Error)]
pub enum CrackError {
    /// The external extraction tool is not installed or not on PATH.
    #[error(
        "{0} does not appear to be installed, or has not been added to your \
         current PATH, please install it using: \"apt-get install {0} -y\" \
         or by downloading it from the official code repository: \
         http://steghide.sourceforge.net/"
    )]
    ToolNotFound(String),

    /// Carrier file not found at the specified path.
    #[error("Input file {0:?} does not exist!")]
    CarrierNotFound(PathBuf),

    /// Wordlist file not found at the specified path.
    #[error("Wordlist {0:?} does not exist!")]
    WordlistNotFound(PathBuf),

    /// The output file already exists and must not be overwritten.
    #[error("Output file {0:?} already exists!")]
    OutputExists(PathBuf),

    /// The carrier file type is not supported by the extraction tool.
    #[error("Unsupported file type {extension:?}! Supported extensions: {supported}")]
    UnsupportedFormat {
        /// Extension of the rejected carrier file
        extension: String,
        /// Comma-separated list of supported extensions
        supported: String,
    },

    /// The external tool could not be started or faulted unexpectedly.
    #[error("Failed to run {program:?}: {source}")]
    ToolInvocation {
        /// Program that was being launched
        program: String,
        /// Underlying launch failure
        #[source]
        source: std::io::Error,
    },

    /// An I/O error occurred outside of a tool invocation.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
