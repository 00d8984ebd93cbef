//! Error taxonomy for the paste flow

use crate::notifications::NoticeKind;

/// Errors raised while deciding on or committing a paste.
///
/// A rule not matching is not an error; see [`crate::paste::Decision::NoMatch`].
#[derive(Debug, thiserror::Error)]
pub enum PasteError {
    /// Paste attempted without an open document
    #[error("No active document to paste into")]
    NoActiveDocument,

    /// The clipboard holds no plain-text representation
    #[error("Clipboard has no plain text")]
    NoPlainText,

    /// A stored rule pattern does not compile
    #[error("Rule '{rule}' has an invalid pattern: {source}")]
    InvalidRulePattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    /// Folder or file creation, or document insertion, failed
    #[error("Failed to {action} '{path}': {source}")]
    Storage {
        action: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl PasteError {
    pub(crate) fn storage(action: &'static str, path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            action,
            path: path.into(),
            source,
        }
    }

    /// Kind of user-visible notice this error turns into, if any.
    ///
    /// A missing clipboard text aborts silently.
    pub fn notice_kind(&self) -> Option<NoticeKind> {
        match self {
            PasteError::NoActiveDocument => Some(NoticeKind::NoActiveDocument),
            PasteError::NoPlainText => None,
            PasteError::InvalidRulePattern { .. } => Some(NoticeKind::InvalidRule),
            PasteError::Storage { .. } => Some(NoticeKind::Storage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pattern_message_names_rule() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = PasteError::InvalidRulePattern {
            rule: "json".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("Rule 'json' has an invalid pattern"));
        assert_eq!(err.notice_kind(), Some(NoticeKind::InvalidRule));
    }

    #[test]
    fn test_missing_text_is_silent() {
        assert_eq!(PasteError::NoPlainText.notice_kind(), None);
        assert_eq!(
            PasteError::NoActiveDocument.notice_kind(),
            Some(NoticeKind::NoActiveDocument)
        );
    }
}
