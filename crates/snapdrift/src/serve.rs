// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `snapdrift serve` command implementation.
//!
//! Wires the Immich gateway, the SQLite preference store, and the Telegram
//! channel into a discovery engine and command handler, then runs the bot
//! loop until SIGINT/SIGTERM.

use std::sync::Arc;

use snapdrift_agent::shutdown;
use snapdrift_agent::{BotLoop, CommandHandler, HandlerSettings};
use snapdrift_config::SnapdriftConfig;
use snapdrift_core::{
    ChannelAdapter, NotificationSink, PluginAdapter, PreferenceStore, SnapdriftError,
};
use snapdrift_discovery::{DiscoveryEngine, JobRegistry, LastAssetRegistry, SizeLimitPolicy};
use snapdrift_immich::ImmichGateway;
use snapdrift_storage::SqlitePreferenceStore;
use snapdrift_telegram::TelegramChannel;
use tracing::{info, warn};

/// Run the `snapdrift serve` command.
pub async fn run_serve(config: SnapdriftConfig) -> Result<(), SnapdriftError> {
    init_tracing(&config.bot.log_level);
    info!(name = config.bot.name.as_str(), "starting snapdrift");

    let limits = SizeLimitPolicy::from_config(&config.limits)?;
    let gateway = Arc::new(ImmichGateway::new(&config.immich)?);

    let store = Arc::new(SqlitePreferenceStore::new(config.storage.clone()));
    store.initialize().await?;
    info!(path = config.storage.database_path.as_str(), "preference store ready");

    let mut telegram = TelegramChannel::new(config.telegram.clone())?;
    telegram.connect().await?;
    let telegram = Arc::new(telegram);
    let sink: Arc<dyn NotificationSink> = telegram.clone();
    let channel: Arc<dyn ChannelAdapter> = telegram;

    let settings = HandlerSettings::from_config(&config.bot);
    let engine = DiscoveryEngine::new(
        gateway.clone(),
        sink.clone(),
        Arc::new(JobRegistry::new()),
        Arc::new(LastAssetRegistry::new()),
        limits,
    )
    .with_batch_size(config.discovery.batch_size)
    .with_notice_ttl(Some(settings.transient));

    let handler = Arc::new(CommandHandler::new(
        Arc::new(engine),
        gateway.clone(),
        sink,
        store.clone(),
        settings,
    ));

    let cancel = shutdown::install_signal_handler();
    let mut bot = BotLoop::new(channel, handler);
    let result = bot.run(cancel).await;

    if let Err(e) = store.shutdown().await {
        warn!(error = %e, "preference store shutdown failed");
    }
    if let Err(e) = gateway.shutdown().await {
        warn!(error = %e, "gateway shutdown failed");
    }

    info!("snapdrift stopped");
    result
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

fn default_directive(log_level: &str) -> String {
    format!("snapdrift={log_level},warn")
}
