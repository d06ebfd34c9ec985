use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Read a snapshot for `command` from piped stdin.
///
/// Returns `None` on an interactive terminal or when nothing was piped.
pub fn read_piped<T: DeserializeOwned>(
    command: &str,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        log::debug!("{command}: stdin is a terminal, no piped snapshot");
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| format!("{command}: failed to read stdin: {e}"))?;

    Ok(parse_piped(&buffer, command)?)
}

/// Parse piped text as JSON, or as YAML when it does not open a JSON
/// object or array.
fn parse_piped<T: DeserializeOwned>(text: &str, command: &str) -> Result<Option<T>, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        log::debug!("{command}: stdin was empty");
        return Ok(None);
    }

    let parsed = if trimmed.starts_with('{') || trimmed.starts_with('[') {
        serde_json::from_str(trimmed).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(trimmed).map_err(|e| e.to_string())
    };
    parsed
        .map(Some)
        .map_err(|e| format!("{command}: invalid snapshot on stdin: {e}"))
}
