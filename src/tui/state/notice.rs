use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// Transient one-line message for the status bar.
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    expires_at: Instant,
}

impl Notice {
    const INFO_TTL: Duration = Duration::from_secs(8);
    const WARNING_TTL: Duration = Duration::from_secs(4);

    #[must_use]
    pub fn new(text: impl Into<String>, level: NoticeLevel) -> Self {
        let ttl = match level {
            NoticeLevel::Info => Self::INFO_TTL,
            NoticeLevel::Warning => Self::WARNING_TTL,
        };
        Self {
            text: text.into(),
            level,
            expires_at: Instant::now() + ttl,
        }
    }

    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
