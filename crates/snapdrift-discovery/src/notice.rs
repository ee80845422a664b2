// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Short-lived chat notices.

use std::sync::Arc;
use std::time::Duration;

use snapdrift_core::{MessageHandle, NotificationSink};
use tokio::task::JoinHandle;
use tracing::debug;

/// Delete `handle` after `delay` on a background task.
///
/// A failed delete is logged and otherwise ignored.
pub fn schedule_delete(
    sink: Arc<dyn NotificationSink>,
    handle: MessageHandle,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if let Err(e) = sink.delete_message(&handle).await {
            debug!(
                chat_id = %handle.chat_id,
                message_id = %handle.message_id,
                error = %e,
                "transient notice could not be deleted"
            );
        }
    })
}
