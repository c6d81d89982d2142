//! Ordered, single-pass candidate stream over a wordlist.
//!
//! Each line of the wordlist is one password candidate. The stream is
//! consumed exactly once: every candidate is handed to exactly one caller,
//! in original file order, and once the underlying reader is drained the
//! stream is permanently empty. Concurrent access is serialized one level
//! up, by the coordinator's dispenser lock; the stream itself is plain
//! sequential code.

use std::io::BufRead;

/// Single-pass producer of password candidates read from a wordlist.
pub struct CandidateStream<R: BufRead> {
    reader: R,
    exhausted: bool,
}

impl<R: BufRead> CandidateStream<R> {
    /// Create a stream over a reader positioned at the start of a wordlist.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            exhausted: false,
        }
    }

    /// Pull the next candidate, or `None` once the wordlist is drained.
    ///
    /// The trailing record separator (`\n`, with an optional preceding
    /// `\r`) is trimmed. Read errors are treated as exhaustion: a wordlist
    /// that cannot be read any further simply ends.
    pub fn next_candidate(&mut self) -> Option<String> {
        if self.exhausted {
            return None;
        }

        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line) {
            Ok(0) | Err(_) => {
                self.exhausted = true;
                None
            }
            Ok(_) => {
                if line.last() == Some(&b'\n') {
                    line.pop();
                    if line.last() == Some(&b'\r') {
                        line.pop();
                    }
                }
                Some(decode_dropping_invalid(&line))
            }
        }
    }

    /// Pull up to `n` candidates in original order, consuming them.
    ///
    /// Returns fewer than `n` (including zero) when the stream is
    /// exhausted. Never fails.
    pub fn take_batch(&mut self, n: usize) -> Vec<String> {
        let mut batch = Vec::with_capacity(n);
        while batch.len() < n {
            match self.next_candidate() {
                Some(candidate) => batch.push(candidate),
                None => break,
            }
        }
        batch
    }
}

/// Decode bytes as UTF-8, dropping any undecodable bytes.
///
/// Wordlists in the wild routinely contain lines in legacy encodings; a
/// candidate with broken bytes is still worth attempting with whatever
/// decodes, and must never abort the stream.
fn decode_dropping_invalid(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());

    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                break;
            }
            Err(err) => {
                let (valid, rest) = bytes.split_at(err.valid_up_to());
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());

                match err.error_len() {
                    // Skip the invalid sequence and keep decoding.
                    Some(len) => bytes = &rest[len..],
                    // Truncated sequence at the end of the line.
                    None => break,
                }
            }
        }
    }

    out
}
