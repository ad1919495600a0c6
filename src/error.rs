use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
  /// Open, write, flush or close of a log file failed.
  #[error("I/O Error: {0}")]
  Io(#[from] io::Error),

  /// A required option is missing or an option has an unusable value.
  #[error("Configuration Error: {0}")]
  Config(String),

  /// The writer was closed, or left unusable by an earlier failure.
  #[error("Writer is closed; it must be reopened before further writes")]
  Closed,
}
