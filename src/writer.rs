use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::config::{SinkOptions, SyncMode};
use crate::error::{Error, Result};
use crate::util::{format_timestamp, log_filename};

/// The file currently receiving appends.
struct ActiveFile {
  path: PathBuf,
  /// Stamp and collision sequence the path was generated from.
  stamp: String,
  seq: u32,
  file: BufWriter<File>,
  /// Record bytes appended since this file was opened. Line terminators
  /// are not counted.
  bytes_written: u64,
}

impl ActiveFile {
  fn open(path: PathBuf, stamp: String, seq: u32, options: &SinkOptions) -> Result<Self> {
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let writer = BufWriter::with_capacity(options.write_buffer_size, file);

    Ok(Self {
      path,
      stamp,
      seq,
      file: writer,
      bytes_written: 0,
    })
  }

  fn append(&mut self, record: &str, sync_mode: SyncMode) -> Result<()> {
    self.file.write_all(record.as_bytes())?;
    self.file.write_all(b"\n")?;
    self.file.flush()?;
    if sync_mode == SyncMode::Strict {
      self.file.get_ref().sync_data()?;
    }
    self.bytes_written += record.len() as u64;
    Ok(())
  }

  /// Flushes and releases the handle, surfacing any error the flush hits.
  fn close(self, sync_mode: SyncMode) -> Result<()> {
    let file = self.file.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    if sync_mode == SyncMode::Strict {
      file.sync_all()?;
    }
    Ok(())
  }
}

/// Appends records to a single open file at a time and rolls over to a
/// freshly named file before a record would push the current one past
/// `max_file_size`.
///
/// The writer is not internally synchronized. Callers that share it
/// between threads must wrap it in a lock.
///
/// Any failed operation leaves the writer closed; further writes return
/// [`Error::Closed`] until a new writer is opened.
pub struct RotatingFileWriter {
  options: SinkOptions,
  clock: Clock,
  active: Option<ActiveFile>,
  rotations: u64,
}

impl RotatingFileWriter {
  /// Opens (creating if absent) `<prefix>-<timestamp>.log` for appending.
  pub fn open(options: SinkOptions) -> Result<Self> {
    Self::open_with_clock(options, Clock::System)
  }

  /// Like [`open`](Self::open), with filenames stamped from `clock`.
  pub fn open_with_clock(options: SinkOptions, clock: Clock) -> Result<Self> {
    options.validate()?;

    let stamp = format_timestamp(&clock.now());
    let path = log_filename(&options.file_prefix, &stamp, 0);
    let active = ActiveFile::open(path, stamp, 0, &options)?;

    info!(target: "rollsink", "Opened log file {} (max size {} bytes)", active.path.display(), options.max_file_size);

    Ok(Self {
      options,
      clock,
      active: Some(active),
      rotations: 0,
    })
  }

  /// Appends `record` plus a line terminator and flushes it to the OS.
  ///
  /// Rotates first if the record would take the current file past the
  /// threshold. A record larger than the threshold is still written whole
  /// into a freshly rotated file.
  pub fn write(&mut self, record: &str) -> Result<()> {
    let needs_rotation = {
      let active = self.active.as_ref().ok_or(Error::Closed)?;
      active.bytes_written.saturating_add(record.len() as u64) > self.options.max_file_size
    };

    if needs_rotation {
      self.rotate()?;
    }

    let mut active = self.active.take().ok_or(Error::Closed)?;
    match active.append(record, self.options.sync_mode) {
      Ok(()) => {
        self.active = Some(active);
        Ok(())
      }
      Err(e) => {
        error!(target: "rollsink", "Write to {} failed, closing writer: {}", active.path.display(), e);
        Err(e)
      }
    }
  }

  /// Writes each record in order, stopping at the first failure.
  pub fn write_all<I, S>(&mut self, records: I) -> Result<()>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    for record in records {
      self.write(record.as_ref())?;
    }
    Ok(())
  }

  /// Closes the current file and opens a new one under a fresh timestamp.
  ///
  /// On failure the writer is left closed.
  pub fn rotate(&mut self) -> Result<()> {
    let old = self.active.take().ok_or(Error::Closed)?;
    let old_path = old.path.clone();
    let old_stamp = old.stamp.clone();
    let old_seq = old.seq;
    let old_bytes = old.bytes_written;

    old.close(self.options.sync_mode)?;

    let stamp = format_timestamp(&self.clock.now());
    let mut seq = if stamp == old_stamp { old_seq + 1 } else { 0 };
    let mut path = log_filename(&self.options.file_prefix, &stamp, seq);
    while path == old_path || path.exists() {
      seq += 1;
      path = log_filename(&self.options.file_prefix, &stamp, seq);
    }
    if seq > 0 {
      warn!(target: "rollsink", "Rotation within one millisecond of {}; using sequence {}", stamp, seq);
    }

    let active = ActiveFile::open(path, stamp, seq, &self.options)?;
    self.rotations += 1;

    debug!(
      target: "rollsink",
      "Rotated {} ({} bytes) -> {}",
      old_path.display(),
      old_bytes,
      active.path.display()
    );

    self.active = Some(active);
    Ok(())
  }

  /// Flushes and closes the current file. Closing a closed writer is a no-op.
  pub fn close(&mut self) -> Result<()> {
    match self.active.take() {
      Some(active) => {
        let path = active.path.clone();
        active.close(self.options.sync_mode)?;
        debug!(target: "rollsink", "Closed log file {}", path.display());
        Ok(())
      }
      None => Ok(()),
    }
  }

  /// False once closed or after any failed operation.
  pub fn is_open(&self) -> bool {
    self.active.is_some()
  }

  /// Path of the file currently receiving writes, if open.
  pub fn current_path(&self) -> Option<&Path> {
    self.active.as_ref().map(|a| a.path.as_path())
  }

  /// Record bytes written since the last rotation.
  pub fn bytes_written(&self) -> u64 {
    self.active.as_ref().map_or(0, |a| a.bytes_written)
  }

  /// Rotation threshold in bytes.
  pub fn max_file_size(&self) -> u64 {
    self.options.max_file_size
  }

  /// Number of rotations performed by this writer.
  pub fn rotations(&self) -> u64 {
    self.rotations
  }

  /// Options the writer was opened with.
  pub fn options(&self) -> &SinkOptions {
    &self.options
  }
}

impl Drop for RotatingFileWriter {
  fn drop(&mut self) {
    if let Some(mut active) = self.active.take() {
      if let Err(e) = active.file.flush() {
        error!(target: "rollsink", "Failed to flush {} on drop. Data loss possible: {}", active.path.display(), e);
      }
    }
  }
}
