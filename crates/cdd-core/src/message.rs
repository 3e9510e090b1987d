//! Feedback messages with auto-expiry

use std::time::Duration;
use tokio::time::Instant;

/// How a feedback message should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// A single line of user feedback
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackMessage {
    pub text: String,
    pub severity: Severity,
    /// When the message disappears; `None` keeps it until replaced
    pub expires_at: Option<Instant>,
}

impl FeedbackMessage {
    pub fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
            expires_at: None,
        }
    }
}

/// One message slot with a single pending expiry.
///
/// Setting a message replaces both the text and the deadline, so an expiry
/// scheduled for an older message can never clear a newer one.
#[derive(Debug, Clone, Default)]
pub struct EphemeralMessage {
    current: Option<FeedbackMessage>,
}

impl EphemeralMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current message. `ttl` of `None` means no expiry.
    pub fn set(
        &mut self,
        text: impl Into<String>,
        severity: Severity,
        ttl: Option<Duration>,
        now: Instant,
    ) {
        self.current = Some(FeedbackMessage {
            text: text.into(),
            severity,
            expires_at: ttl.map(|d| now + d),
        });
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Drop the message if its deadline has passed. Returns true if it was cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        let expired = matches!(
            &self.current,
            Some(FeedbackMessage { expires_at: Some(at), .. }) if now >= *at
        );
        if expired {
            self.current = None;
        }
        expired
    }

    pub fn current(&self) -> Option<&FeedbackMessage> {
        self.current.as_ref()
    }

    /// Current text, empty when there is no message
    pub fn text(&self) -> &str {
        self.current.as_ref().map(|m| m.text.as_str()).unwrap_or("")
    }

    pub fn severity(&self) -> Option<Severity> {
        self.current.as_ref().map(|m| m.severity)
    }
}
