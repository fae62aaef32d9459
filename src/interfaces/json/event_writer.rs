use crate::domain::event::OracleEvent;
use crate::error::Result;
use std::io::Write;

/// Writes the broker's notification stream as JSON lines.
///
/// One event per line, flushed as it is written, so a consumer tailing the
/// stream sees notices as they happen.
pub struct EventWriter<W: Write> {
    writer: W,
}

impl<W: Write> EventWriter<W> {
    /// Creates an `EventWriter` over any `Write` sink (e.g. stdout, a file).
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_event(&mut self, event: &OracleEvent) -> Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
