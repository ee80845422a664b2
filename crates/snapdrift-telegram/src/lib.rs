// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the Snapdrift bot.
//!
//! Implements [`ChannelAdapter`] and [`NotificationSink`] for the Telegram
//! Bot API via teloxide: long polling for inbound commands, plain-text
//! messages with edit and delete, and document uploads for assets.

pub mod handler;

use std::sync::Arc;

use async_trait::async_trait;
use snapdrift_config::model::TelegramConfig;
use snapdrift_core::{
    AdapterType, ChannelAdapter, ChatId, FileUpload, HealthStatus, InboundCommand,
    MessageHandle, NotificationSink, PluginAdapter, SnapdriftError,
};
use teloxide::prelude::*;
use teloxide::types::{ChatId as TgChatId, InputFile, MessageId as TgMessageId};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Telegram channel adapter.
///
/// Connects to Telegram via long polling, drops messages from users outside
/// `allowed_users`, and forwards text messages as [`InboundCommand`]s.
pub struct TelegramChannel {
    bot: Bot,
    config: TelegramConfig,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundCommand>>,
    inbound_tx: mpsc::Sender<InboundCommand>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: TelegramConfig) -> Result<Self, SnapdriftError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            SnapdriftError::Config("telegram.bot_token is required for Telegram adapter".into())
        })?;

        if token.is_empty() {
            return Err(SnapdriftError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            config,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, SnapdriftError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), SnapdriftError> {
        debug!("Telegram channel shutting down");
        if let Some(handle) = &self.polling_handle {
            handle.abort();
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn connect(&mut self) -> Result<(), SnapdriftError> {
        if self.polling_handle.is_some() {
            return Ok(());
        }

        let bot = self.bot.clone();
        let tx = self.inbound_tx.clone();
        let allowed_users: Arc<Vec<String>> = Arc::new(self.config.allowed_users.clone());

        if allowed_users.is_empty() {
            warn!("telegram.allowed_users is empty, every message will be ignored");
        }
        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let endpoint = Update::filter_message().endpoint(move |msg: Message| {
                let tx = tx.clone();
                let allowed = allowed_users.clone();
                async move {
                    if !handler::is_authorized(&msg, &allowed) {
                        debug!(chat_id = msg.chat.id.0, "ignoring unauthorized user");
                        return respond(());
                    }

                    match handler::command_text(&msg) {
                        Some(text) => {
                            let inbound = handler::to_inbound_command(&msg, text);
                            if tx.send(inbound).await.is_err() {
                                warn!("inbound channel closed, dropping message");
                            }
                        }
                        None => debug!(msg_id = msg.id.0, "ignoring non-text message"),
                    }

                    respond(())
                }
            });

            Dispatcher::builder(bot, endpoint)
                .default_handler(|_| async {})
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn receive(&self) -> Result<InboundCommand, SnapdriftError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv()
            .await
            .ok_or_else(|| SnapdriftError::delivery("Telegram inbound channel closed"))
    }
}

#[async_trait]
impl NotificationSink for TelegramChannel {
    async fn send_message(
        &self,
        chat: &ChatId,
        text: &str,
    ) -> Result<MessageHandle, SnapdriftError> {
        let sent = self
            .bot
            .send_message(parse_chat_id(chat)?, text)
            .await
            .map_err(|e| delivery_error("failed to send message", e))?;

        Ok(MessageHandle {
            chat_id: chat.clone(),
            message_id: sent.id.0.to_string(),
        })
    }

    async fn edit_message(
        &self,
        handle: &MessageHandle,
        text: &str,
    ) -> Result<(), SnapdriftError> {
        let chat_id = parse_chat_id(&handle.chat_id)?;
        let msg_id = parse_message_id(&handle.message_id)?;

        match self.bot.edit_message_text(chat_id, msg_id, text).await {
            Ok(_) => Ok(()),
            Err(e) if e.to_string().contains("message is not modified") => Ok(()),
            Err(e) => Err(delivery_error("failed to edit message", e)),
        }
    }

    async fn delete_message(&self, handle: &MessageHandle) -> Result<(), SnapdriftError> {
        let chat_id = parse_chat_id(&handle.chat_id)?;
        let msg_id = parse_message_id(&handle.message_id)?;

        match self.bot.delete_message(chat_id, msg_id).await {
            Ok(_) => Ok(()),
            Err(e) if e.to_string().contains("message to delete not found") => {
                debug!(message_id = %handle.message_id, "message already deleted");
                Ok(())
            }
            Err(e) => Err(delivery_error("failed to delete message", e)),
        }
    }

    async fn send_file(
        &self,
        chat: &ChatId,
        file: FileUpload,
    ) -> Result<MessageHandle, SnapdriftError> {
        let document = InputFile::memory(file.data).file_name(file.filename);
        let sent = self
            .bot
            .send_document(parse_chat_id(chat)?, document)
            .caption(file.caption)
            .await
            .map_err(|e| delivery_error("failed to upload file", e))?;

        Ok(MessageHandle {
            chat_id: chat.clone(),
            message_id: sent.id.0.to_string(),
        })
    }
}

fn parse_chat_id(chat: &ChatId) -> Result<TgChatId, SnapdriftError> {
    chat.0
        .parse::<i64>()
        .map(TgChatId)
        .map_err(|e| SnapdriftError::delivery(format!("invalid chat_id {}: {e}", chat.0)))
}

fn parse_message_id(message_id: &str) -> Result<TgMessageId, SnapdriftError> {
    message_id
        .parse::<i32>()
        .map(TgMessageId)
        .map_err(|e| SnapdriftError::delivery(format!("invalid message_id {message_id}: {e}")))
}

fn delivery_error(context: &str, e: teloxide::RequestError) -> SnapdriftError {
    SnapdriftError::Delivery {
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: Option<&str>) -> TelegramConfig {
        TelegramConfig {
            bot_token: token.map(String::from),
            allowed_users: vec!["12345".into()],
        }
    }

    #[test]
    fn new_requires_bot_token() {
        assert!(TelegramChannel::new(config(None)).is_err());
    }

    #[test]
    fn new_rejects_empty_token() {
        let err = TelegramChannel::new(config(Some(""))).err().unwrap();
        assert!(matches!(err, SnapdriftError::Config(_)));
    }

    #[test]
    fn new_accepts_valid_token() {
        assert!(TelegramChannel::new(config(Some("123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11"))).is_ok());
    }

    #[test]
    fn plugin_adapter_metadata() {
        let channel = TelegramChannel::new(config(Some("test:token"))).unwrap();
        assert_eq!(channel.name(), "telegram");
        assert_eq!(channel.version(), semver::Version::new(0, 1, 0));
        assert_eq!(channel.adapter_type(), AdapterType::Channel);
    }

    #[test]
    fn chat_ids_parse_including_groups() {
        assert_eq!(parse_chat_id(&ChatId("12345".into())).unwrap(), TgChatId(12345));
        assert_eq!(
            parse_chat_id(&ChatId("-100123".into())).unwrap(),
            TgChatId(-100123)
        );
        assert!(parse_chat_id(&ChatId("telegram".into())).is_err());
    }

    #[test]
    fn message_ids_must_be_numeric() {
        assert_eq!(parse_message_id("42").unwrap(), TgMessageId(42));
        let err = parse_message_id("mock-1").unwrap_err();
        assert!(matches!(err, SnapdriftError::Delivery { .. }));
    }
}
