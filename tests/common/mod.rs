#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, TimeZone};
use rollsink::{ManualClock, RotatingFileWriter, SinkOptions};
use tempfile::TempDir;

pub struct TestEnv {
  pub writer: RotatingFileWriter,
  pub clock: ManualClock,
  pub prefix: PathBuf,
  // The TempDir guard must be kept alive to prevent premature deletion of the directory.
  pub _dir: TempDir,
}

impl TestEnv {
  /// Opens a writer under a fresh temp directory. `options.file_prefix` is
  /// reinterpreted as a file name inside that directory.
  pub fn new(mut options: SinkOptions) -> Self {
    let dir = tempfile::tempdir().unwrap();
    let stem = options.file_prefix.file_name().unwrap().to_owned();
    options.file_prefix = dir.path().join(stem);
    let prefix = options.file_prefix.clone();

    let clock = ManualClock::new(Local.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    let writer = RotatingFileWriter::open_with_clock(options, clock.clone().into()).unwrap();

    Self {
      writer,
      clock,
      prefix,
      _dir: dir,
    }
  }

  pub fn with_max_size(max_file_size: u64) -> Self {
    let mut opts = SinkOptions::new("app");
    opts.max_file_size = max_file_size;
    Self::new(opts)
  }

  /// Every generated file, oldest first.
  pub fn files(&self) -> Vec<PathBuf> {
    rollsink::list_log_files(&self.prefix).unwrap()
  }

  /// Lines of every generated file, oldest file first.
  pub fn contents(&self) -> Vec<Vec<String>> {
    self.files().iter().map(|p| read_lines(p)).collect()
  }
}

pub fn read_lines(path: &Path) -> Vec<String> {
  fs::read_to_string(path).unwrap().lines().map(str::to_string).collect()
}

pub fn record(tag: char, len: usize) -> String {
  std::iter::repeat_n(tag, len).collect()
}
