// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` and `NotificationSink` with
//! injectable inbound commands and a captured log of every outbound
//! operation for assertion in tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use snapdrift_core::{
    AdapterType, ChannelAdapter, ChatId, FileUpload, HealthStatus, InboundCommand,
    MessageHandle, NotificationSink, PluginAdapter, SnapdriftError, UserId,
};

/// One outbound operation observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Message {
        handle: MessageHandle,
        text: String,
    },
    Edit {
        handle: MessageHandle,
        text: String,
    },
    Delete {
        handle: MessageHandle,
    },
    File {
        handle: MessageHandle,
        filename: String,
        caption: String,
        bytes: Vec<u8>,
    },
}

/// A mock messaging channel for testing.
///
/// Provides two queues:
/// - **inbound**: Commands injected via `inject_text()` are returned by `receive()`
/// - **events**: Sends, edits, deletes, and uploads, retrievable via `events()`
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundCommand>>>,
    events: Arc<Mutex<Vec<SinkEvent>>>,
    notify: Arc<Notify>,
    next_id: AtomicU64,
    fail_files: AtomicBool,
    closed: AtomicBool,
}

impl MockChannel {
    /// Create a new mock channel with empty queues.
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            events: Arc::new(Mutex::new(Vec::new())),
            notify: Arc::new(Notify::new()),
            next_id: AtomicU64::new(1),
            fail_files: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        }
    }

    /// Build a command as if `user` typed `text` in a DM.
    pub fn command(user: &str, text: &str) -> InboundCommand {
        InboundCommand {
            id: format!("in-{user}"),
            chat_id: ChatId(format!("chat-{user}")),
            sender_id: UserId(user.to_string()),
            text: text.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Inject an inbound command into the receive queue.
    pub async fn inject(&self, cmd: InboundCommand) {
        self.inbound.lock().await.push_back(cmd);
        self.notify.notify_one();
    }

    /// Inject `text` from `user`.
    pub async fn inject_text(&self, user: &str, text: &str) {
        self.inject(Self::command(user, text)).await;
    }

    /// Make `receive()` fail once the queue is empty.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Make every `send_file()` fail with a delivery error.
    pub fn fail_files(&self, fail: bool) {
        self.fail_files.store(fail, Ordering::SeqCst);
    }

    /// Every outbound operation, in order.
    pub async fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().await.clone()
    }

    /// Texts of plain messages sent, in order.
    pub async fn texts(&self) -> Vec<String> {
        self.events
            .lock()
            .await
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Message { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// `(filename, caption)` of every uploaded file, in order.
    pub async fn files(&self) -> Vec<(String, String)> {
        self.events
            .lock()
            .await
            .iter()
            .filter_map(|e| match e {
                SinkEvent::File {
                    filename, caption, ..
                } => Some((filename.clone(), caption.clone())),
                _ => None,
            })
            .collect()
    }

    /// Whether `handle` has been deleted.
    pub async fn was_deleted(&self, handle: &MessageHandle) -> bool {
        self.events
            .lock()
            .await
            .iter()
            .any(|e| matches!(e, SinkEvent::Delete { handle: h } if h == handle))
    }

    /// Handle of the first plain message whose text equals `text`.
    pub async fn handle_of(&self, text: &str) -> Option<MessageHandle> {
        self.events.lock().await.iter().find_map(|e| match e {
            SinkEvent::Message { handle, text: t } if t == text => Some(handle.clone()),
            _ => None,
        })
    }

    /// Clear the event log.
    pub async fn clear(&self) {
        self.events.lock().await.clear();
    }

    fn next_handle(&self, chat: &ChatId) -> MessageHandle {
        MessageHandle {
            chat_id: chat.clone(),
            message_id: self.next_id.fetch_add(1, Ordering::SeqCst).to_string(),
        }
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, SnapdriftError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SnapdriftError> {
        Ok(())
    }
}

#[async_trait]
impl NotificationSink for MockChannel {
    async fn send_message(
        &self,
        chat: &ChatId,
        text: &str,
    ) -> Result<MessageHandle, SnapdriftError> {
        let handle = self.next_handle(chat);
        self.events.lock().await.push(SinkEvent::Message {
            handle: handle.clone(),
            text: text.to_string(),
        });
        Ok(handle)
    }

    async fn edit_message(
        &self,
        handle: &MessageHandle,
        text: &str,
    ) -> Result<(), SnapdriftError> {
        self.events.lock().await.push(SinkEvent::Edit {
            handle: handle.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn delete_message(&self, handle: &MessageHandle) -> Result<(), SnapdriftError> {
        self.events.lock().await.push(SinkEvent::Delete {
            handle: handle.clone(),
        });
        Ok(())
    }

    async fn send_file(
        &self,
        chat: &ChatId,
        file: FileUpload,
    ) -> Result<MessageHandle, SnapdriftError> {
        if self.fail_files.load(Ordering::SeqCst) {
            return Err(SnapdriftError::delivery("mock upload failure"));
        }
        let handle = self.next_handle(chat);
        self.events.lock().await.push(SinkEvent::File {
            handle: handle.clone(),
            filename: file.filename,
            caption: file.caption,
            bytes: file.data,
        });
        Ok(handle)
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn connect(&mut self) -> Result<(), SnapdriftError> {
        Ok(())
    }

    async fn receive(&self) -> Result<InboundCommand, SnapdriftError> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(cmd) = queue.pop_front() {
                    return Ok(cmd);
                }
            }
            if self.closed.load(Ordering::SeqCst) {
                return Err(SnapdriftError::delivery("mock channel closed"));
            }
            self.notify.notified().await;
        }
    }
}
