use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

use crate::error::{Error, Result};

/// `yyyyMMdd-HHmmssSSS`
const STAMP_FORMAT: &str = "%Y%m%d-%H%M%S%3f";
const STAMP_LEN: usize = 18;
const SUFFIX: &str = ".log";

/// Renders a timestamp with millisecond precision, e.g. `20240301-120000042`.
pub fn format_timestamp<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
  Tz::Offset: std::fmt::Display,
{
  time.format(STAMP_FORMAT).to_string()
}

/// Builds the path of a log file from its prefix and stamp.
/// Format: `<prefix>-20240301-120000042.log`, or `<prefix>-20240301-120000042.<seq>.log`
/// when `seq > 0`.
pub fn log_filename(prefix: &Path, stamp: &str, seq: u32) -> PathBuf {
  let mut name = prefix.as_os_str().to_os_string();
  if seq == 0 {
    name.push(format!("-{}{}", stamp, SUFFIX));
  } else {
    name.push(format!("-{}.{}{}", stamp, seq, SUFFIX));
  }
  PathBuf::from(name)
}

/// The parsed components of a generated filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileName {
  pub stamp: String,
  pub seq: u32,
}

impl Ord for LogFileName {
  fn cmp(&self, other: &Self) -> Ordering {
    // Stamps are fixed width, so lexical order is chronological order.
    self.stamp.cmp(&other.stamp).then(self.seq.cmp(&other.seq))
  }
}

impl PartialOrd for LogFileName {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

/// Parses a bare filename generated for `stem` (the last component of the prefix).
pub fn parse_log_filename(stem: &str, filename: &str) -> Option<LogFileName> {
  let rest = filename.strip_prefix(stem)?.strip_prefix('-')?.strip_suffix(SUFFIX)?;
  if rest.len() < STAMP_LEN || !rest.is_char_boundary(STAMP_LEN) {
    return None;
  }

  let (stamp, tail) = rest.split_at(STAMP_LEN);
  let well_formed = stamp
    .bytes()
    .enumerate()
    .all(|(i, b)| if i == 8 { b == b'-' } else { b.is_ascii_digit() });
  if !well_formed {
    return None;
  }

  let seq = if tail.is_empty() {
    0
  } else {
    let seq = tail.strip_prefix('.')?.parse::<u32>().ok()?;
    if seq == 0 {
      return None;
    }
    seq
  };

  Some(LogFileName {
    stamp: stamp.to_string(),
    seq,
  })
}

/// Lists every file generated for `prefix`, oldest first.
pub fn list_log_files(prefix: &Path) -> Result<Vec<PathBuf>> {
  let stem = prefix
    .file_name()
    .and_then(|s| s.to_str())
    .ok_or_else(|| Error::Config(format!("Invalid file prefix: {}", prefix.display())))?;

  let dir = match prefix.parent() {
    Some(p) if !p.as_os_str().is_empty() => p,
    _ => Path::new("."),
  };

  let mut found = Vec::new();
  for entry in fs::read_dir(dir)? {
    let entry = entry?;
    if !entry.file_type()?.is_file() {
      continue;
    }
    let filename = entry.file_name().to_string_lossy().to_string();
    if let Some(parsed) = parse_log_filename(stem, &filename) {
      found.push((parsed, entry.path()));
    }
  }

  found.sort_by(|a, b| a.0.cmp(&b.0));
  Ok(found.into_iter().map(|(_, path)| path).collect())
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Local, TimeDelta};

  #[test]
  fn test_filenames() {
    let t = Local.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap() + TimeDelta::milliseconds(42);
    let stamp = format_timestamp(&t);
    assert_eq!(stamp, "20240301-090507042");

    let name = log_filename(Path::new("logs/app"), &stamp, 0);
    assert_eq!(name, PathBuf::from("logs/app-20240301-090507042.log"));

    let name = log_filename(Path::new("logs/app"), &stamp, 3);
    assert_eq!(name, PathBuf::from("logs/app-20240301-090507042.3.log"));
  }

  #[test]
  fn test_parse() {
    assert_eq!(
      parse_log_filename("app", "app-20240301-090507042.log"),
      Some(LogFileName {
        stamp: "20240301-090507042".into(),
        seq: 0
      })
    );
    assert_eq!(
      parse_log_filename("app", "app-20240301-090507042.12.log").map(|n| n.seq),
      Some(12)
    );

    assert_eq!(parse_log_filename("app", "other-20240301-090507042.log"), None);
    assert_eq!(parse_log_filename("app", "app-20240301-090507042.0.log"), None);
    assert_eq!(parse_log_filename("app", "app-20240301x090507042.log"), None);
    assert_eq!(parse_log_filename("app", "app-2024.log"), None);
    assert_eq!(parse_log_filename("app", "app-20240301-090507042.txt"), None);
  }

  #[test]
  fn test_ordering_follows_stamp_then_seq() {
    let a = parse_log_filename("a", "a-20240301-090507042.log").unwrap();
    let b = parse_log_filename("a", "a-20240301-090507042.2.log").unwrap();
    let c = parse_log_filename("a", "a-20240301-090507043.log").unwrap();
    assert!(a < b && b < c);
  }

  #[test]
  fn test_list_ignores_foreign_files() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("app");
    for name in [
      "app-20240301-090507043.log",
      "app-20240301-090507042.1.log",
      "app-20240301-090507042.log",
      "app.log",
      "apple-20240301-090507042.log",
    ] {
      fs::write(dir.path().join(name), b"").unwrap();
    }

    let files: Vec<String> = list_log_files(&prefix)
      .unwrap()
      .iter()
      .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
      .collect();

    assert_eq!(
      files,
      vec![
        "app-20240301-090507042.log",
        "app-20240301-090507042.1.log",
        "app-20240301-090507043.log",
      ]
    );
  }
}
