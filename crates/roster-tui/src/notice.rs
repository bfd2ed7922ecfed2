//! Transient notifications shown in the status bar.

use std::{
  collections::VecDeque,
  time::{Duration, Instant},
};

/// How long a notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  Success,
  Error,
  Info,
}

#[derive(Debug, Clone)]
pub struct Notice {
  pub level:     Level,
  pub message:   String,
  pub raised_at: Instant,
}

/// Queue of live notices, oldest first.
#[derive(Debug)]
pub struct Notices {
  queue: VecDeque<Notice>,
  ttl:   Duration,
}

impl Default for Notices {
  fn default() -> Self { Self::with_ttl(NOTICE_TTL) }
}

impl Notices {
  pub fn with_ttl(ttl: Duration) -> Self {
    Self {
      queue: VecDeque::new(),
      ttl,
    }
  }

  pub fn push(&mut self, level: Level, message: impl Into<String>) {
    let message = message.into();
    match level {
      Level::Error => tracing::warn!(%message, "notice"),
      _ => tracing::info!(%message, "notice"),
    }
    self.queue.push_back(Notice {
      level,
      message,
      raised_at: Instant::now(),
    });
  }

  pub fn push_success(&mut self, message: impl Into<String>) { self.push(Level::Success, message) }

  pub fn push_error(&mut self, message: impl Into<String>) { self.push(Level::Error, message) }

  pub fn push_info(&mut self, message: impl Into<String>) { self.push(Level::Info, message) }

  /// The most recent notice still alive.
  pub fn latest(&self) -> Option<&Notice> { self.queue.back() }

  pub fn len(&self) -> usize { self.queue.len() }

  pub fn is_empty(&self) -> bool { self.queue.is_empty() }

  /// Drop notices older than the TTL as of `now`.
  pub fn expire(&mut self, now: Instant) {
    let ttl = self.ttl;
    self
      .queue
      .retain(|n| now.saturating_duration_since(n.raised_at) < ttl);
  }
}
