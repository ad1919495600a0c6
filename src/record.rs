use std::fmt;

/// A record handed over by the upstream delivery system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkRecord {
  pub topic: String,
  pub key: Option<String>,
  pub value: Option<String>,
}

impl SinkRecord {
  pub fn new(topic: impl Into<String>) -> Self {
    Self {
      topic: topic.into(),
      key: None,
      value: None,
    }
  }

  pub fn with_key(mut self, key: impl Into<String>) -> Self {
    self.key = Some(key.into());
    self
  }

  pub fn with_value(mut self, value: impl Into<String>) -> Self {
    self.value = Some(value.into());
    self
  }

  /// Renders the record as a single log line (without terminator).
  pub fn to_log_entry(&self) -> String {
    self.to_string()
  }
}

impl fmt::Display for SinkRecord {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Topic: {}, Key: {}, Value: {}",
      self.topic,
      self.key.as_deref().unwrap_or("null"),
      self.value.as_deref().unwrap_or("null")
    )
  }
}
