// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for messaging platform integrations (Telegram, etc.).

use async_trait::async_trait;

use crate::error::SnapdriftError;
use crate::traits::adapter::PluginAdapter;
use crate::traits::sink::NotificationSink;
use crate::types::InboundCommand;

/// Adapter for bidirectional messaging channel integrations.
///
/// A channel both delivers commands to the bot and acts as the
/// [`NotificationSink`] for replies.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter + NotificationSink {
    /// Establishes a connection to the messaging platform.
    async fn connect(&mut self) -> Result<(), SnapdriftError>;

    /// Receives the next inbound command from the channel.
    async fn receive(&self) -> Result<InboundCommand, SnapdriftError>;
}
