// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot loop and command handling for Snapdrift.
//!
//! The [`BotLoop`] is the central coordinator that:
//! - Receives commands from a channel adapter
//! - Hands each one to the [`CommandHandler`]
//! - Tracks the discovery jobs it spawned
//! - Drains those jobs on shutdown

pub mod commands;
pub mod handlers;
pub mod replies;
pub mod shutdown;

use std::sync::Arc;
use std::time::Duration;

use snapdrift_core::{ChannelAdapter, InboundCommand, SnapdriftError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

pub use commands::{AssetRef, Command, PrefSetting, RandomArgs, parse_command};
pub use handlers::{CommandHandler, HandlerSettings};

/// Grace period for running searches at shutdown.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// The main loop that feeds channel commands to the handler.
pub struct BotLoop {
    channel: Arc<dyn ChannelAdapter>,
    handler: Arc<CommandHandler>,
    jobs: Vec<JoinHandle<()>>,
    drain_timeout: Duration,
}

impl BotLoop {
    pub fn new(channel: Arc<dyn ChannelAdapter>, handler: Arc<CommandHandler>) -> Self {
        info!(prefix = handler.settings().prefix.as_str(), "bot loop initialized");
        Self {
            channel,
            handler,
            jobs: Vec::new(),
            drain_timeout: DRAIN_TIMEOUT,
        }
    }

    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    /// Number of spawned searches that have not finished yet.
    pub fn running_jobs(&self) -> usize {
        self.jobs.iter().filter(|j| !j.is_finished()).count()
    }

    /// Runs until the cancellation token is triggered or the channel closes.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), SnapdriftError> {
        info!("bot loop running");

        loop {
            tokio::select! {
                msg = self.channel.receive() => {
                    match msg {
                        Ok(inbound) => self.handle_inbound(inbound).await,
                        Err(e) => {
                            error!(error = %e, "channel receive error, stopping bot loop");
                            break;
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping bot loop");
                    break;
                }
            }
        }

        shutdown::drain_jobs(std::mem::take(&mut self.jobs), self.drain_timeout).await;
        self.channel.shutdown().await?;

        info!("bot loop stopped");
        Ok(())
    }

    /// Handles one inbound command, keeping any job it starts.
    pub async fn handle_inbound(&mut self, inbound: InboundCommand) {
        debug!(
            user_id = %inbound.sender_id,
            message_id = inbound.id.as_str(),
            "inbound command"
        );

        self.jobs.retain(|j| !j.is_finished());
        if let Some(job) = self.handler.handle(inbound).await {
            self.jobs.push(job);
        }
    }
}
