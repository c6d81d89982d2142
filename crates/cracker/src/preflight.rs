//! Pre-flight checks run before a cracking attempt starts.
//!
//! Everything here fails fast, before any worker is spawned: a missing
//! tool, a missing input, or a pre-existing output file is reported once
//! and the run never begins.

use crate::error::CrackError;
use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Carrier file extensions steghide can operate on.
pub const SUPPORTED_FILES: [&str; 5] = ["jpg", "jpeg", "bmp", "wav", "au"];

/// Validate the full setup for a run with the stock `steghide` tool.
///
/// # Errors
///
/// Returns the first failing check as a [`CrackError`].
pub fn check_setup(carrier: &Path, wordlist: &Path, output: &Path) -> Result<(), CrackError> {
    check_setup_with_program("steghide", carrier, wordlist, output)
}

/// Validate the full setup for a run with an explicit extraction program.
///
/// Checks, in order: the program is resolvable (see [`find_executable`]),
/// the carrier file exists and has a supported extension, the wordlist
/// exists, and the output path does not already exist. The output-exists
/// check is what guarantees the pool never overwrites an unrelated
/// pre-existing file: the output path is only ever written by the winning
/// invocation.
///
/// # Errors
///
/// Returns the first failing check as a [`CrackError`].
pub fn check_setup_with_program(
    program: &str,
    carrier: &Path,
    wordlist: &Path,
    output: &Path,
) -> Result<(), CrackError> {
    if find_executable(program).is_none() {
        return Err(CrackError::ToolNotFound(program.to_string()));
    }

    if !carrier.is_file() {
        return Err(CrackError::CarrierNotFound(carrier.to_path_buf()));
    }

    let extension = carrier
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if !SUPPORTED_FILES.contains(&extension.as_str()) {
        return Err(CrackError::UnsupportedFormat {
            extension,
            supported: SUPPORTED_FILES.join(", "),
        });
    }

    if !wordlist.is_file() {
        return Err(CrackError::WordlistNotFound(wordlist.to_path_buf()));
    }

    if output.exists() {
        return Err(CrackError::OutputExists(output.to_path_buf()));
    }

    Ok(())
}

/// Resolve an executable by name against the current PATH.
///
/// A name containing a path separator is treated as an explicit path and
/// checked directly, the way shells resolve commands.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let as_path = Path::new(name);
    if as_path.components().nth(1).is_some() {
        return as_path.is_file().then(|| as_path.to_path_buf());
    }

    let path = env::var_os("PATH")?;
    find_executable_in(name, env::split_paths(&path))
}

fn find_executable_in(name: &str, dirs: impl Iterator<Item = PathBuf>) -> Option<PathBuf> {
    for dir in dirs {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// Count the lines in a wordlist, for progress display.
///
/// A final line without a trailing newline still counts.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn count_lines(path: &Path) -> Result<u64, CrackError> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut count = 0u64;

    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            break;
        }

        let consumed = buf.len();
        count += buf.iter().filter(|&&b| b == b'\n').count() as u64;
        let ends_with_newline = buf.last() == Some(&b'\n');
        reader.consume(consumed);

        if !ends_with_newline {
            // Peek ahead: a trailing unterminated line counts as one.
            if reader.fill_buf()?.is_empty() {
                count += 1;
                break;
            }
        }
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_executable_in() {
        let temp_dir = TempDir::new().unwrap();
        let tool = temp_dir.path().join("sometool");
        fs::write(&tool, b"#!/bin/sh\n").unwrap();

        let dirs = vec![PathBuf::from("/nonexistent"), temp_dir.path().to_path_buf()];
        assert_eq!(
            find_executable_in("sometool", dirs.clone().into_iter()),
            Some(tool)
        );
        assert_eq!(find_executable_in("othertool", dirs.into_iter()), None);
    }

    #[test]
    fn test_count_lines_with_trailing_newline() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("words.txt");
        fs::write(&path, b"a\nb\nc\n").unwrap();
        assert_eq!(count_lines(&path).unwrap(), 3);
    }

    #[test]
    fn test_count_lines_without_trailing_newline() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("words.txt");
        fs::write(&path, b"a\nb\nc").unwrap();
        assert_eq!(count_lines(&path).unwrap(), 3);
    }

    #[test]
    fn test_count_lines_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("words.txt");
        fs::write(&path, b"").unwrap();
        assert_eq!(count_lines(&path).unwrap(), 0);
    }

    /// A fixture directory with a stand-in tool, carrier, and wordlist.
    fn setup_fixture() -> (TempDir, String, PathBuf, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let tool = temp_dir.path().join("fake-steghide");
        let carrier = temp_dir.path().join("photo.jpg");
        let wordlist = temp_dir.path().join("words.txt");
        fs::write(&tool, b"#!/bin/sh\n").unwrap();
        fs::write(&carrier, b"jpeg").unwrap();
        fs::write(&wordlist, b"a\n").unwrap();

        let program = tool.to_str().unwrap().to_string();
        (temp_dir, program, carrier, wordlist)
    }

    #[test]
    fn test_find_executable_explicit_path() {
        let (_temp_dir, program, _carrier, _wordlist) = setup_fixture();
        assert_eq!(find_executable(&program), Some(PathBuf::from(&program)));
        assert_eq!(find_executable(&format!("{program}.gone")), None);
    }

    #[test]
    fn test_check_setup_rejects_existing_output() {
        let (temp_dir, program, carrier, wordlist) = setup_fixture();
        let output = temp_dir.path().join("photo.jpg.out");
        fs::write(&output, b"precious").unwrap();

        let result = check_setup_with_program(&program, &carrier, &wordlist, &output);
        assert!(matches!(result, Err(CrackError::OutputExists(_))));
    }

    #[test]
    fn test_check_setup_accepts_fresh_output() {
        let (temp_dir, program, carrier, wordlist) = setup_fixture();
        let output = temp_dir.path().join("photo.jpg.out");

        assert!(check_setup_with_program(&program, &carrier, &wordlist, &output).is_ok());
    }

    #[test]
    fn test_check_setup_missing_tool() {
        let (temp_dir, _program, carrier, wordlist) = setup_fixture();
        let missing = temp_dir.path().join("no-such-tool");
        let output = temp_dir.path().join("photo.jpg.out");

        let result =
            check_setup_with_program(missing.to_str().unwrap(), &carrier, &wordlist, &output);
        assert!(matches!(result, Err(CrackError::ToolNotFound(_))));
    }

    #[test]
    fn test_check_setup_missing_carrier() {
        let (temp_dir, program, _carrier, wordlist) = setup_fixture();
        let absent = temp_dir.path().join("gone.jpg");
        let output = temp_dir.path().join("gone.jpg.out");

        let result = check_setup_with_program(&program, &absent, &wordlist, &output);
        assert!(matches!(result, Err(CrackError::CarrierNotFound(_))));
    }

    #[test]
    fn test_check_setup_unsupported_extension() {
        let (temp_dir, program, _carrier, wordlist) = setup_fixture();
        let carrier = temp_dir.path().join("photo.png");
        let output = temp_dir.path().join("photo.png.out");
        fs::write(&carrier, b"png").unwrap();

        let result = check_setup_with_program(&program, &carrier, &wordlist, &output);
        assert!(matches!(result, Err(CrackError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_check_setup_missing_wordlist() {
        let (temp_dir, program, carrier, _wordlist) = setup_fixture();
        let absent = temp_dir.path().join("nowords.txt");
        let output = temp_dir.path().join("photo.jpg.out");

        let result = check_setup_with_program(&program, &carrier, &absent, &output);
        assert!(matches!(result, Err(CrackError::WordlistNotFound(_))));
    }

    #[test]
    fn test_unsupported_extension_message() {
        let err = CrackError::UnsupportedFormat {
            extension: "png".to_string(),
            supported: SUPPORTED_FILES.join(", "),
        };
        let message = err.to_string();
        assert!(message.contains("png"));
        assert!(message.contains("jpg, jpeg, bmp, wav, au"));
    }
}
