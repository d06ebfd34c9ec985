pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Resolve the snapshot `command` runs on from `--input <file>` or piped
/// stdin.
///
/// Returns `None` when neither is present so the caller can fall back to
/// flags or fail with a command-specific message.
pub fn read_snapshot<T: DeserializeOwned>(
    path: Option<&str>,
    command: &str,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Some(file::read_snapshot_file(path)?)),
        None => stdin::read_piped(command),
    }
}
