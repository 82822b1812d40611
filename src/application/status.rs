use std::time::{Duration, Instant};

/// How long a status message stays visible after it is posted.
pub const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    posted_at: Instant,
}

/// Transient success/error line under the editor.
///
/// Messages expire on their own timer; nothing the user does cancels that.
/// Posting a new message replaces the current one.
#[derive(Debug, Default)]
pub struct StatusLine {
    current: Option<StatusMessage>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, kind: StatusKind, text: impl Into<String>, now: Instant) {
        self.current = Some(StatusMessage {
            text: text.into(),
            kind,
            posted_at: now,
        });
    }

    pub fn info(&mut self, text: impl Into<String>, now: Instant) {
        self.post(StatusKind::Info, text, now);
    }

    pub fn success(&mut self, text: impl Into<String>, now: Instant) {
        self.post(StatusKind::Success, text, now);
    }

    pub fn error(&mut self, text: impl Into<String>, now: Instant) {
        self.post(StatusKind::Error, text, now);
    }

    pub fn visible(&self, now: Instant) -> Option<&StatusMessage> {
        self.current
            .as_ref()
            .filter(|m| now.saturating_duration_since(m.posted_at) < STATUS_TTL)
    }
}
