// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound message lifecycle operations.

use async_trait::async_trait;

use crate::error::SnapdriftError;
use crate::types::{ChatId, FileUpload, MessageHandle};

/// Sends, edits, and deletes chat messages.
///
/// All failures are reported as [`SnapdriftError::Delivery`].
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Sends a text message and returns a handle for later edits.
    async fn send_message(&self, chat: &ChatId, text: &str)
    -> Result<MessageHandle, SnapdriftError>;

    /// Replaces the text of a previously sent message.
    async fn edit_message(&self, handle: &MessageHandle, text: &str)
    -> Result<(), SnapdriftError>;

    /// Deletes a previously sent message.
    ///
    /// A message that is already gone counts as deleted.
    async fn delete_message(&self, handle: &MessageHandle) -> Result<(), SnapdriftError>;

    /// Uploads a file with a caption.
    async fn send_file(&self, chat: &ChatId, file: FileUpload)
    -> Result<MessageHandle, SnapdriftError>;
}
