// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the complete bot stack with mock adapters and a
//! temp SQLite preference database. [`TestHarness::send`] drives one chat
//! command through parsing, handling, and (for `random`) the discovery job.

use std::sync::Arc;
use std::time::Duration;

use snapdrift_agent::{BotLoop, CommandHandler, HandlerSettings};
use snapdrift_config::model::StorageConfig;
use snapdrift_core::{ChannelAdapter, PreferenceStore, SnapdriftError, UserId, UserPreferences};
use snapdrift_discovery::{DiscoveryEngine, JobRegistry, LastAssetRegistry, SizeLimitPolicy};
use snapdrift_storage::SqlitePreferenceStore;
use tokio::task::JoinHandle;

use crate::mock_channel::MockChannel;
use crate::mock_gateway::MockGateway;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    limits: SizeLimitPolicy,
    settings: HandlerSettings,
    batch_size: usize,
    notice_ttl: Option<Duration>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            limits: SizeLimitPolicy::default(),
            settings: HandlerSettings::default(),
            batch_size: 5,
            notice_ttl: None,
        }
    }

    /// Use custom tier ceilings.
    pub fn with_limits(mut self, limits: SizeLimitPolicy) -> Self {
        self.limits = limits;
        self
    }

    /// Use a different command prefix.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.settings.prefix = prefix.to_string();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notice_ttl = Some(ttl);
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, SnapdriftError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| SnapdriftError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("prefs.db");

        let store = Arc::new(SqlitePreferenceStore::new(StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
        }));
        store.initialize().await?;

        let gateway = Arc::new(MockGateway::new());
        let channel = Arc::new(MockChannel::new());

        let engine = DiscoveryEngine::new(
            gateway.clone(),
            channel.clone(),
            Arc::new(JobRegistry::new()),
            Arc::new(LastAssetRegistry::new()),
            self.limits,
        )
        .with_batch_size(self.batch_size)
        .with_notice_ttl(self.notice_ttl);

        let handler = Arc::new(CommandHandler::new(
            Arc::new(engine),
            gateway.clone(),
            channel.clone(),
            store.clone(),
            self.settings,
        ));

        Ok(TestHarness {
            gateway,
            channel,
            store,
            handler,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with mock adapters and temp storage.
pub struct TestHarness {
    /// The mock asset server.
    pub gateway: Arc<MockGateway>,
    /// The mock chat channel, also the notification sink.
    pub channel: Arc<MockChannel>,
    /// SQLite preference store (temp DB, cleaned up on drop).
    pub store: Arc<SqlitePreferenceStore>,
    /// The command handler under test.
    pub handler: Arc<CommandHandler>,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Send `text` from `user` and wait for any discovery job it starts.
    pub async fn send(&self, user: &str, text: &str) {
        if let Some(job) = self.send_detached(user, text).await {
            if let Err(e) = job.await {
                tracing::error!(error = %e, "discovery job panicked in test harness");
            }
        }
    }

    /// Send `text` from `user` without waiting for a discovery job.
    pub async fn send_detached(&self, user: &str, text: &str) -> Option<JoinHandle<()>> {
        self.handler.handle(MockChannel::command(user, text)).await
    }

    /// Stored preferences of `user`.
    pub async fn preferences(&self, user: &str) -> Result<UserPreferences, SnapdriftError> {
        self.store.get(&UserId(user.to_string())).await
    }

    /// Id of the asset `user` received last.
    pub fn last_asset(&self, user: &str) -> Option<String> {
        self.handler
            .engine()
            .last_assets()
            .get(&UserId(user.to_string()))
            .map(|r| r.asset_id)
    }

    /// Whether `user` has a discovery job registered.
    pub fn job_active(&self, user: &str) -> bool {
        self.handler
            .engine()
            .jobs()
            .is_active(&UserId(user.to_string()))
    }

    /// A bot loop reading from the mock channel.
    pub fn bot_loop(&self) -> BotLoop {
        let channel: Arc<dyn ChannelAdapter> = self.channel.clone();
        BotLoop::new(channel, Arc::clone(&self.handler))
    }
}
