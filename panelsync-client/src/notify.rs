use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Blocking notices need acknowledgment (an alert); others are toasts.
    pub blocking: bool,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self::build(NoticeLevel::Info, message, false)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::build(NoticeLevel::Warning, message, false)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::build(NoticeLevel::Error, message, false)
    }

    pub fn alert(message: impl Into<String>) -> Self {
        Self::build(NoticeLevel::Error, message, true)
    }

    fn build(level: NoticeLevel, message: impl Into<String>, blocking: bool) -> Self {
        Self {
            level,
            message: message.into(),
            blocking,
            raised_at: Utc::now(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => info!(blocking = notice.blocking, "{}", notice.message),
            NoticeLevel::Warning => warn!(blocking = notice.blocking, "{}", notice.message),
            NoticeLevel::Error => error!(blocking = notice.blocking, "{}", notice.message),
        }
    }
}

/// Keeps every notice in memory.
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices
            .lock()
            .iter()
            .map(|notice| notice.message.clone())
            .collect()
    }

    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.notices.lock().is_empty()
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}
