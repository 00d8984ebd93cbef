//! User-visible transient notices
//!
//! Every notice is logged. Desktop notifications are only raised when enabled.

use notify_rust::{Notification, Timeout};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

use crate::error::PasteError;

/// Global flag to enable/disable desktop notifications
static NOTIFICATIONS_ENABLED: AtomicBool = AtomicBool::new(false);

/// Initialize notifications with the enabled setting
pub fn init(enabled: bool) {
    NOTIFICATIONS_ENABLED.store(enabled, Ordering::SeqCst);
}

/// Check if desktop notifications are enabled
pub fn is_enabled() -> bool {
    NOTIFICATIONS_ENABLED.load(Ordering::SeqCst)
}

/// What a notice is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Paste attempted with no open document
    NoActiveDocument,
    /// A rule pattern failed to compile
    InvalidRule,
    /// Folder, file or document write failed
    Storage,
    /// A new note was created from a paste
    Created,
}

impl NoticeKind {
    fn icon(&self) -> &'static str {
        match self {
            NoticeKind::NoActiveDocument => "dialog-warning",
            NoticeKind::InvalidRule | NoticeKind::Storage => "dialog-error",
            NoticeKind::Created => "dialog-information",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            NoticeKind::NoActiveDocument => "No Active Note",
            NoticeKind::InvalidRule => "Rule Error",
            NoticeKind::Storage => "Storage Error",
            NoticeKind::Created => "Note Created",
        }
    }

    fn is_error(&self) -> bool {
        !matches!(self, NoticeKind::Created)
    }
}

/// Show a transient notice.
///
/// Fire-and-forget: a failing desktop notification is logged, never propagated.
pub fn notice(kind: NoticeKind, message: &str) {
    if kind.is_error() {
        warn!("{}: {}", kind.prefix(), message);
    } else {
        info!("{}: {}", kind.prefix(), message);
    }

    if !is_enabled() {
        return;
    }

    let result = Notification::new()
        .appname("pasteroute")
        .summary(&format!("pasteroute: {}", kind.prefix()))
        .body(message)
        .icon(kind.icon())
        .timeout(Timeout::Milliseconds(5000))
        .show();

    if let Err(e) = result {
        warn!("Failed to send notification: {}", e);
    }
}

/// Turn a paste error into a notice. Returns whether anything was shown.
pub fn report(error: &PasteError) -> bool {
    match error.notice_kind() {
        Some(kind) => {
            notice(kind, &error.to_string());
            true
        }
        None => false,
    }
}

/// Convenience for a successful redirect
pub fn notify_created(path: &str) {
    notice(NoticeKind::Created, &format!("Pasted into {}", path));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_skips_silent_errors() {
        init(false);
        assert!(!report(&PasteError::NoPlainText));
        assert!(report(&PasteError::NoActiveDocument));
    }

    #[test]
    fn test_created_is_not_an_error() {
        assert!(!NoticeKind::Created.is_error());
        assert!(NoticeKind::Storage.is_error());
    }
}
