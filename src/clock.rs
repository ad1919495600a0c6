use std::sync::Arc;

use chrono::{DateTime, Local, TimeDelta};
use parking_lot::Mutex;

/// Source of the timestamps stamped into generated filenames.
#[derive(Debug, Clone, Default)]
pub enum Clock {
  /// The local wall clock.
  #[default]
  System,

  /// A settable clock shared with the caller. Used to make rotation
  /// naming deterministic.
  Manual(ManualClock),
}

impl Clock {
  pub fn now(&self) -> DateTime<Local> {
    match self {
      Clock::System => Local::now(),
      Clock::Manual(clock) => clock.now(),
    }
  }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
  now: Arc<Mutex<DateTime<Local>>>,
}

impl ManualClock {
  pub fn new(start: DateTime<Local>) -> Self {
    Self {
      now: Arc::new(Mutex::new(start)),
    }
  }

  pub fn now(&self) -> DateTime<Local> {
    *self.now.lock()
  }

  pub fn set(&self, time: DateTime<Local>) {
    *self.now.lock() = time;
  }

  pub fn advance(&self, delta: TimeDelta) {
    let mut now = self.now.lock();
    *now += delta;
  }
}

impl From<ManualClock> for Clock {
  fn from(clock: ManualClock) -> Self {
    Clock::Manual(clock)
  }
}
