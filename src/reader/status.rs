//! Transient status-bar messages.

use std::time::{Duration, Instant};

/// How long success and error messages stay visible.
pub const STATUS_FADE: Duration = Duration::from_secs(5);

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Neutral information. Stays until replaced.
    Info,
    /// An action completed.
    Success,
    /// An action failed.
    Error,
}

/// One status-bar message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Message text.
    pub text: String,
    /// Severity.
    pub kind: StatusKind,
    shown_at: Instant,
}

impl StatusMessage {
    /// Message shown at `now`.
    pub fn new(text: impl Into<String>, kind: StatusKind, now: Instant) -> Self {
        Self {
            text: text.into(),
            kind,
            shown_at: now,
        }
    }

    /// Whether the message has faded by `now`. Info messages never fade.
    pub fn is_expired(&self, now: Instant) -> bool {
        self.kind != StatusKind::Info && now.saturating_duration_since(self.shown_at) >= STATUS_FADE
    }

    /// Time left before the message fades.
    pub fn time_until_expiry(&self, now: Instant) -> Option<Duration> {
        match self.kind {
            StatusKind::Info => None,
            _ => Some(STATUS_FADE.saturating_sub(now.saturating_duration_since(self.shown_at))),
        }
    }
}
