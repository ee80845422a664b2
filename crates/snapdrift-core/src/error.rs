// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Snapdrift media bot.

use thiserror::Error;

/// Text shown to end users for any failure that is not a validation error.
pub const GENERIC_USER_ERROR: &str = "An error occurred processing your request.";

/// The primary error type used across all Snapdrift adapters and core operations.
#[derive(Debug, Error)]
pub enum SnapdriftError {
    /// Configuration errors (unknown tier, missing required setting, invalid TOML values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Caller input was rejected before any work started.
    ///
    /// The message is written for the end user and may be shown verbatim.
    #[error("{0}")]
    Validation(String),

    /// The remote asset server failed or was unreachable. Retryable.
    #[error("upstream error: {message}")]
    Upstream {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The requested asset no longer exists upstream.
    #[error("asset not found: {id}")]
    NotFound { id: String },

    /// Sending, editing, or deleting a chat notification failed.
    #[error("delivery error: {message}")]
    Delivery {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Preference storage errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SnapdriftError {
    /// Convenience constructor for an upstream failure without a source error.
    pub fn upstream(message: impl Into<String>) -> Self {
        SnapdriftError::Upstream {
            message: message.into(),
            source: None,
        }
    }

    /// Convenience constructor for a delivery failure without a source error.
    pub fn delivery(message: impl Into<String>) -> Self {
        SnapdriftError::Delivery {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true when retrying the same operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, SnapdriftError::Upstream { .. })
    }

    /// Returns true for [`SnapdriftError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, SnapdriftError::NotFound { .. })
    }

    /// The text that may be shown to an end user for this error.
    ///
    /// Validation messages are user-facing already; everything else collapses
    /// to [`GENERIC_USER_ERROR`] so internal detail never reaches the chat.
    pub fn user_message(&self) -> String {
        match self {
            SnapdriftError::Validation(msg) => msg.clone(),
            _ => GENERIC_USER_ERROR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_user_facing() {
        let err = SnapdriftError::Validation("Media type must be 'image', 'video', or 'all'".into());
        assert_eq!(
            err.user_message(),
            "Media type must be 'image', 'video', or 'all'"
        );
        assert_eq!(err.to_string(), "Media type must be 'image', 'video', or 'all'");
    }

    #[test]
    fn internal_detail_is_hidden_from_users() {
        let err = SnapdriftError::Upstream {
            message: "GET http://10.0.0.4/api/assets/abc returned 502".into(),
            source: Some(Box::new(std::io::Error::other("connection reset"))),
        };
        assert_eq!(err.user_message(), GENERIC_USER_ERROR);
        assert!(err.to_string().contains("502"));

        let err = SnapdriftError::Storage {
            source: Box::new(std::io::Error::other("disk full")),
        };
        assert_eq!(err.user_message(), GENERIC_USER_ERROR);
    }

    #[test]
    fn only_upstream_is_transient() {
        assert!(SnapdriftError::upstream("timeout").is_transient());
        assert!(!SnapdriftError::NotFound { id: "a".into() }.is_transient());
        assert!(!SnapdriftError::delivery("chat gone").is_transient());
        assert!(!SnapdriftError::Config("bad".into()).is_transient());
    }

    #[test]
    fn not_found_is_detected() {
        assert!(SnapdriftError::NotFound { id: "a".into() }.is_not_found());
        assert!(!SnapdriftError::Internal("x".into()).is_not_found());
    }
}
