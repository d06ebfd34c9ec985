use serde_json::Value;
use std::io::{self, Write};

/// Write `value` to stdout as indented JSON.
///
/// A closed pipe (`immo analyze | head`) ends output quietly.
pub fn print_json(value: &Value) {
    let mut out = io::stdout().lock();
    if let Err(e) = write_json(&mut out, value) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            log::debug!("stdout closed before JSON output finished");
        } else {
            eprintln!("Failed to write JSON output: {e}");
        }
    }
}

fn write_json<W: Write>(out: &mut W, value: &Value) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    out.flush()
}
