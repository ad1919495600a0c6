use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Property naming the filename prefix of generated log files.
pub const FILE_CONFIG: &str = "file";

/// Property naming the rotation threshold in bytes.
pub const MAX_SIZE_CONFIG: &str = "max.size";

/// Rotation threshold used when `max.size` is not supplied.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024;

/// Defines how far each write is pushed towards the physical disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
  /// Hand the user-space buffer to the OS after every write.
  /// Survives a process crash, not a power failure.
  #[default]
  Flush,

  /// Flush and `fsync` the file data after every write and on close.
  /// Slowest, but nothing acknowledged is left in the page cache.
  Strict,
}

#[derive(Debug, Clone)]
pub struct SinkOptions {
  /// Prefix of every generated file. May include directories; the
  /// directory must already exist.
  /// Files are named `<prefix>-<yyyyMMdd-HHmmssSSS>.log`.
  pub file_prefix: PathBuf,

  /// Rotation threshold in bytes. The writer rotates before a record
  /// would push the current file past this size.
  /// Default: 1024.
  pub max_file_size: u64,

  /// Capacity of the in-memory buffer in front of the file.
  /// Default: 8 KB.
  pub write_buffer_size: usize,

  pub sync_mode: SyncMode,
}

impl Default for SinkOptions {
  fn default() -> Self {
    Self {
      file_prefix: PathBuf::from("./sink"),
      max_file_size: DEFAULT_MAX_FILE_SIZE,
      write_buffer_size: 8 * 1024, // 8 KB
      sync_mode: SyncMode::Flush,
    }
  }
}

impl SinkOptions {
  pub fn new(prefix: impl Into<PathBuf>) -> Self {
    Self {
      file_prefix: prefix.into(),
      ..Default::default()
    }
  }

  /// Builds options from a flat string property map.
  ///
  /// `file` is required. `max.size` falls back to [`DEFAULT_MAX_FILE_SIZE`]
  /// when absent; it is an error when present but not a positive integer.
  pub fn from_props(props: &HashMap<String, String>) -> Result<Self> {
    let prefix = props
      .get(FILE_CONFIG)
      .map(|s| s.trim())
      .filter(|s| !s.is_empty())
      .ok_or_else(|| Error::Config(format!("Missing required option '{}'", FILE_CONFIG)))?;

    let mut options = Self::new(prefix);

    if let Some(raw) = props.get(MAX_SIZE_CONFIG) {
      options.max_file_size = raw
        .trim()
        .parse::<u64>()
        .map_err(|e| Error::Config(format!("Invalid '{}' value {:?}: {}", MAX_SIZE_CONFIG, raw, e)))?;
    }

    options.validate()?;
    Ok(options)
  }

  pub fn validate(&self) -> Result<()> {
    if self.file_prefix.as_os_str().is_empty() {
      return Err(Error::Config("File prefix cannot be empty".into()));
    }
    if self.file_prefix.file_name().is_none() {
      return Err(Error::Config(format!(
        "File prefix must end in a file name component: {}",
        self.file_prefix.display()
      )));
    }
    if self.max_file_size == 0 {
      return Err(Error::Config(format!("'{}' must be greater than zero", MAX_SIZE_CONFIG)));
    }
    if self.write_buffer_size == 0 {
      return Err(Error::Config("Write buffer size must be greater than zero".into()));
    }
    Ok(())
  }
}
