//! # rollsink
//!
//! `rollsink` appends text records to a log file and rolls over to a fresh,
//! timestamped file once the current one reaches a configured size.
//!
//! ## Key Features
//!
//! * **Rotate before overflow**: the size check runs before each write, so a
//!   record never straddles two files.
//! * **Predictable names**: `<prefix>-<yyyyMMdd-HHmmssSSS>.log`, with a sequence
//!   suffix when two files would share a millisecond.
//! * **Fail loudly**: any I/O failure closes the writer instead of leaving it
//!   half-initialized.
//!
//! ## Example
//!
//! ```no_run
//! use rollsink::{RotatingFileWriter, SinkOptions};
//!
//! # fn main() -> rollsink::Result<()> {
//! let mut opts = SinkOptions::new("/var/log/app/events");
//! opts.max_file_size = 64 * 1024;
//!
//! let mut writer = RotatingFileWriter::open(opts)?;
//! writer.write("first record")?;
//! writer.write("second record")?;
//! writer.close()?;
//! # Ok(())
//! # }
//! ```

mod clock;
mod config;
mod error;
mod record;
mod sink;
mod util;
mod writer;

// Re-exports for the flat public API
pub use clock::{Clock, ManualClock};
pub use config::{DEFAULT_MAX_FILE_SIZE, FILE_CONFIG, MAX_SIZE_CONFIG, SinkOptions, SyncMode};
pub use error::{Error, Result};
pub use record::SinkRecord;
pub use sink::FileSink;
pub use util::{LogFileName, format_timestamp, list_log_files, log_filename, parse_log_filename};
pub use writer::RotatingFileWriter;
