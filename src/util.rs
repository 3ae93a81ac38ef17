// util.rs

use std::io::{ErrorKind, Write};

/// Writes a command's output followed by a newline. Empty output prints
/// nothing; a closed pipe is not an error.
pub fn write_reply<W: Write>(mut w: W, text: &str) -> std::io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    match writeln!(w, "{}", text).and_then(|_| w.flush()) {
        Err(ref e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
