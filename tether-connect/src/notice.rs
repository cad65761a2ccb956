//! User-visible notices.
//!
//! Failures the user must see (a server `detail`, or a generic message) are
//! handed to a [`Notifier`]. Abandoned flows never produce a notice.

use serde::Serialize;
use std::fmt;
use tether_core::ProviderKind;
use tokio::sync::mpsc;
use tracing::warn;

/// The step that produced a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeStage {
    /// Requesting the authorization URL or opening the window.
    Authorization,
    /// Exchanging the completed flow for credentials.
    Credentials,
    /// Retrieving a snapshot.
    Load,
}

impl fmt::Display for NoticeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Authorization => "authorization",
            Self::Credentials => "credentials",
            Self::Load => "load",
        })
    }
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Provider the notice is about.
    pub provider: ProviderKind,
    /// Step that failed.
    pub stage: NoticeStage,
    /// Text to show, verbatim.
    pub message: String,
}

impl Notice {
    /// Creates a notice.
    pub fn new(provider: ProviderKind, stage: NoticeStage, message: impl Into<String>) -> Self {
        Self {
            provider,
            stage,
            message: message.into(),
        }
    }
}

/// Receives user-visible notices.
pub trait Notifier: Send + Sync {
    /// Shows `notice` to the user.
    fn notify(&self, notice: Notice);
}

// ============================================================================
// Implementations
// ============================================================================

/// Forwards notices over an unbounded channel to the host.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    /// Creates a notifier and the receiving end for the host.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        if self.tx.send(notice).is_err() {
            warn!("Notice receiver dropped");
        }
    }
}

/// Writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        warn!(provider = %notice.provider, stage = %notice.stage, "{}", notice.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_notifier_delivers() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier.notify(Notice::new(
            ProviderKind::Hubspot,
            NoticeStage::Authorization,
            "bad org",
        ));

        let notice = rx.try_recv().unwrap();
        assert_eq!(notice.message, "bad org");
        assert_eq!(notice.stage, NoticeStage::Authorization);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_notifier_survives_dropped_receiver() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);
        notifier.notify(Notice::new(ProviderKind::Notion, NoticeStage::Load, "x"));
    }
}
