use std::collections::HashMap;
use std::path::Path;

use tracing::{error, info};

use crate::clock::Clock;
use crate::config::SinkOptions;
use crate::error::{Error, Result};
use crate::record::SinkRecord;
use crate::writer::RotatingFileWriter;

/// Host-facing task that turns delivered records into log lines.
///
/// Lifecycle: [`start`](FileSink::start) once, [`put`](FileSink::put) any
/// number of batches, then [`stop`](FileSink::stop). `stop` is safe on every
/// exit path, including after a failed `start`.
#[derive(Default)]
pub struct FileSink {
  clock: Clock,
  writer: Option<RotatingFileWriter>,
}

impl FileSink {
  pub fn new() -> Self {
    Self::default()
  }

  /// A sink whose filenames are stamped from `clock`.
  pub fn with_clock(clock: Clock) -> Self {
    Self { clock, writer: None }
  }

  pub fn version(&self) -> &'static str {
    env!("CARGO_PKG_VERSION")
  }

  /// Reads `file` and `max.size` from `props` and opens the first log file.
  pub fn start(&mut self, props: &HashMap<String, String>) -> Result<()> {
    if self.writer.is_some() {
      return Err(Error::Config("Sink is already started".into()));
    }

    let options = SinkOptions::from_props(props)?;
    let writer = RotatingFileWriter::open_with_clock(options, self.clock.clone())?;
    info!(target: "rollsink", "File sink started, writing to {}", writer.options().file_prefix.display());

    self.writer = Some(writer);
    Ok(())
  }

  /// Writes each record as one line, in order. Stops at the first failure;
  /// later records in the batch are not written.
  pub fn put<'a, I>(&mut self, records: I) -> Result<()>
  where
    I: IntoIterator<Item = &'a SinkRecord>,
  {
    let writer = self.writer.as_mut().ok_or(Error::Closed)?;
    for record in records {
      if let Err(e) = writer.write(&record.to_log_entry()) {
        error!(target: "rollsink", "Failed to write record from topic {}: {}", record.topic, e);
        return Err(e);
      }
    }
    Ok(())
  }

  /// Closes the active log file. Calling it again, or without a successful
  /// `start`, does nothing.
  pub fn stop(&mut self) -> Result<()> {
    match self.writer.take() {
      Some(mut writer) => {
        writer.close()?;
        info!(target: "rollsink", "File sink stopped after {} rotations", writer.rotations());
        Ok(())
      }
      None => Ok(()),
    }
  }

  /// The file currently being written, if started.
  pub fn filename(&self) -> Option<&Path> {
    self.writer.as_ref().and_then(|w| w.current_path())
  }

  pub fn writer(&self) -> Option<&RotatingFileWriter> {
    self.writer.as_ref()
  }
}
