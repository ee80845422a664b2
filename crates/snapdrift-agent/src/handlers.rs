// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command handlers.
//!
//! [`CommandHandler::handle`] parses one inbound message, loads the sender's
//! preferences, and runs the command. Discovery jobs are spawned onto their
//! own task so the caller never waits on a search. Errors never escape:
//! they are logged in full and answered with [`SnapdriftError::user_message`].

use std::sync::Arc;
use std::time::Duration;

use snapdrift_config::model::BotConfig;
use snapdrift_core::{
    AccountTier, ChatId, FileUpload, InboundCommand, NotificationSink, PreferenceStore,
    RemoteAssetGateway, SnapdriftError, UserId, UserPreferences,
};
use snapdrift_discovery::format::{asset_file_name, file_details};
use snapdrift_discovery::{DiscoveryEngine, DiscoveryRequest, FilterSpec, schedule_delete};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::commands::{AssetRef, Command, PrefSetting, RandomArgs, parse_command};
use crate::replies;

/// How long preference listings and help stay in the chat.
pub const INFO_TTL: Duration = Duration::from_secs(60);

/// Host settings for command handling.
#[derive(Debug, Clone)]
pub struct HandlerSettings {
    pub prefix: String,
    /// Delete delay for replies when no per-user delay applies.
    pub transient: Duration,
}

impl HandlerSettings {
    pub fn from_config(bot: &BotConfig) -> Self {
        Self {
            prefix: bot.command_prefix.clone(),
            transient: Duration::from_secs(bot.transient_message_secs),
        }
    }
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            prefix: "/".into(),
            transient: Duration::from_secs(10),
        }
    }
}

/// Runs parsed commands against the engine, gateway, and preference store.
pub struct CommandHandler {
    engine: Arc<DiscoveryEngine>,
    gateway: Arc<dyn RemoteAssetGateway>,
    sink: Arc<dyn NotificationSink>,
    store: Arc<dyn PreferenceStore>,
    settings: HandlerSettings,
}

impl CommandHandler {
    pub fn new(
        engine: Arc<DiscoveryEngine>,
        gateway: Arc<dyn RemoteAssetGateway>,
        sink: Arc<dyn NotificationSink>,
        store: Arc<dyn PreferenceStore>,
        settings: HandlerSettings,
    ) -> Self {
        Self {
            engine,
            gateway,
            sink,
            store,
            settings,
        }
    }

    pub fn engine(&self) -> &Arc<DiscoveryEngine> {
        &self.engine
    }

    pub fn settings(&self) -> &HandlerSettings {
        &self.settings
    }

    /// Handle one inbound message.
    ///
    /// Returns the task running a discovery job, if one was started.
    pub async fn handle(&self, inbound: InboundCommand) -> Option<JoinHandle<()>> {
        let command = match parse_command(&self.settings.prefix, &inbound.text) {
            Ok(Some(command)) => command,
            Ok(None) => return None,
            Err(e) => {
                self.reply_error(&inbound, &e, self.settings.transient).await;
                return None;
            }
        };

        debug!(
            user_id = %inbound.sender_id,
            chat_id = %inbound.chat_id,
            command = ?command,
            "handling command"
        );

        let prefs = match self.store.get(&inbound.sender_id).await {
            Ok(prefs) => prefs,
            Err(e) => {
                self.reply_error(&inbound, &e, self.settings.transient).await;
                return None;
            }
        };
        let delay = self.reply_delay(&prefs);

        match self.dispatch(&inbound, command, prefs, delay).await {
            Ok(job) => job,
            Err(e) => {
                self.reply_error(&inbound, &e, delay).await;
                None
            }
        }
    }

    async fn dispatch(
        &self,
        inbound: &InboundCommand,
        command: Command,
        prefs: UserPreferences,
        delay: Duration,
    ) -> Result<Option<JoinHandle<()>>, SnapdriftError> {
        let user = &inbound.sender_id;
        let chat = &inbound.chat_id;

        match command {
            Command::Random(args) => {
                return Ok(Some(self.start_random(inbound, args, &prefs, delay)));
            }
            Command::Cancel => self.cancel(user, chat, delay).await,
            Command::Get(target) => {
                let id = self.resolve(user, target)?;
                self.get(user, chat, &id, &prefs, delay).await?;
            }
            Command::Delete(target) => self.delete(user, chat, target, delay).await?,
            Command::Favorite(target) => self.favorite(user, chat, target, true, delay).await?,
            Command::Unfavorite(target) => {
                self.favorite(user, chat, target, false, delay).await?
            }
            Command::Stats => {
                let stats = self.gateway.get_server_stats().await?;
                self.sink.send_message(chat, &replies::stats(&stats)).await?;
            }
            Command::Prefs => {
                let tier = self.tier(&prefs);
                let limit = self.engine.limits().resolve_limit(tier);
                let text = replies::preferences(&self.settings.prefix, &prefs, tier, limit);
                self.reply(chat, &text, INFO_TTL).await;
            }
            Command::PrefsSet { setting, value } => {
                self.set_preference(user, chat, prefs, setting, &value, delay)
                    .await?
            }
            Command::PrefsReset => {
                self.store.reset(user).await?;
                info!(user_id = %user, "preferences reset");
                self.reply(chat, replies::PREFS_RESET, delay).await;
            }
            Command::HelpPref => {
                let text = replies::preference_help(&self.settings.prefix);
                self.reply(chat, &text, INFO_TTL).await;
            }
            Command::Help => {
                let limit = self.engine.limits().resolve_limit(self.tier(&prefs));
                let text = replies::help(&self.settings.prefix, &prefs, limit);
                self.sink.send_message(chat, &text).await?;
            }
        }
        Ok(None)
    }

    /// Spawn a discovery job with the preferences as they are now.
    fn start_random(
        &self,
        inbound: &InboundCommand,
        args: RandomArgs,
        prefs: &UserPreferences,
        delay: Duration,
    ) -> JoinHandle<()> {
        let filter = FilterSpec::new(
            args.media_type.or(prefs.default_media_type),
            args.min_bytes.or(prefs.min_size_bytes),
            args.max_bytes.or(prefs.max_size_bytes),
            args.count,
        );
        let request = DiscoveryRequest {
            user_id: inbound.sender_id.clone(),
            chat_id: inbound.chat_id.clone(),
            filter,
            tier: self.tier(prefs),
            max_attempts: prefs.max_attempts,
            progress_interval: Duration::from_secs(prefs.progress_update_interval_secs),
            command_text: inbound.text.trim().to_string(),
            notice_ttl: Some(delay),
        };

        let engine = Arc::clone(&self.engine);
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            let chat = request.chat_id.clone();
            let user = request.user_id.clone();
            match engine.run(request).await {
                Ok(outcome) => debug!(user_id = %user, outcome = ?outcome, "discovery job done"),
                Err(e) => {
                    log_error(&user, &e);
                    send_transient(&sink, &chat, &e.user_message(), delay).await;
                }
            }
        })
    }

    async fn cancel(&self, user: &UserId, chat: &ChatId, delay: Duration) {
        let progress = self.engine.jobs().get_handle(user);
        if !self.engine.jobs().request_cancel(user) {
            self.reply(chat, replies::NOTHING_TO_CANCEL, delay).await;
            return;
        }

        info!(user_id = %user, "search cancellation requested");
        if let Some(handle) = progress {
            if let Err(e) = self.sink.delete_message(&handle).await {
                debug!(error = %e, "progress message could not be deleted");
            }
        }
        self.reply(chat, replies::CANCELLING, delay).await;
    }

    async fn get(
        &self,
        user: &UserId,
        chat: &ChatId,
        id: &str,
        prefs: &UserPreferences,
        delay: Duration,
    ) -> Result<(), SnapdriftError> {
        let info = match self.gateway.get_asset_info(id).await {
            Ok(info) => info,
            Err(e) if e.is_not_found() => {
                self.reply(chat, &replies::not_found(id), delay).await;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let limit = self.engine.limits().resolve_limit(self.tier(prefs));
        if info.byte_size > limit {
            self.reply(chat, &replies::too_large(info.byte_size, limit), delay)
                .await;
            return Ok(());
        }

        let data = self.gateway.get_asset_data(id).await?;
        let upload = FileUpload {
            data,
            filename: asset_file_name(&info),
            caption: file_details(&info),
        };
        let handle = self.sink.send_file(chat, upload).await?;
        self.engine.last_assets().record(user, &info.id, handle);
        info!(user_id = %user, asset_id = %info.id, "asset sent");
        Ok(())
    }

    async fn delete(
        &self,
        user: &UserId,
        chat: &ChatId,
        target: AssetRef,
        delay: Duration,
    ) -> Result<(), SnapdriftError> {
        let id = match target {
            AssetRef::Id(id) => id,
            AssetRef::Last => {
                let record = self
                    .engine
                    .last_assets()
                    .get(user)
                    .ok_or_else(|| SnapdriftError::Validation(replies::NO_LAST_ASSET.into()))?;
                if let Err(e) = self.sink.delete_message(&record.handle).await {
                    warn!(error = %e, "could not delete the message that delivered the asset");
                }
                record.asset_id
            }
        };

        self.gateway.delete_asset(&id).await?;
        info!(user_id = %user, asset_id = %id, "asset deleted");
        self.engine.last_assets().clear_if(user, &id);
        self.reply(chat, &replies::deleted(&id), delay).await;
        Ok(())
    }

    async fn favorite(
        &self,
        user: &UserId,
        chat: &ChatId,
        target: AssetRef,
        favorite: bool,
        delay: Duration,
    ) -> Result<(), SnapdriftError> {
        let id = self.resolve(user, target)?;
        self.gateway.set_favorite(&id, favorite).await?;
        info!(user_id = %user, asset_id = %id, favorite, "favorite updated");
        self.reply(chat, &replies::favorite_changed(&id, favorite), delay)
            .await;
        Ok(())
    }

    async fn set_preference(
        &self,
        user: &UserId,
        chat: &ChatId,
        mut prefs: UserPreferences,
        setting: PrefSetting,
        value: &str,
        delay: Duration,
    ) -> Result<(), SnapdriftError> {
        setting.apply(&mut prefs, value)?;
        self.store.put(user, &prefs).await?;
        info!(user_id = %user, setting = setting.name(), "preference updated");
        self.reply(chat, &replies::preference_updated(setting.name()), delay)
            .await;
        Ok(())
    }

    fn resolve(&self, user: &UserId, target: AssetRef) -> Result<String, SnapdriftError> {
        match target {
            AssetRef::Id(id) => Ok(id),
            AssetRef::Last => self
                .engine
                .last_assets()
                .get(user)
                .map(|record| record.asset_id)
                .ok_or_else(|| SnapdriftError::Validation(replies::NO_LAST_ASSET.into())),
        }
    }

    fn tier(&self, prefs: &UserPreferences) -> AccountTier {
        prefs.tier_or(self.engine.limits().default_tier())
    }

    /// The user's own delete delay, or the deployment default when it is zero.
    fn reply_delay(&self, prefs: &UserPreferences) -> Duration {
        if prefs.message_delete_delay_secs > 0 {
            Duration::from_secs(prefs.message_delete_delay_secs)
        } else {
            self.settings.transient
        }
    }

    async fn reply(&self, chat: &ChatId, text: &str, delay: Duration) {
        send_transient(&self.sink, chat, text, delay).await;
    }

    async fn reply_error(&self, inbound: &InboundCommand, e: &SnapdriftError, delay: Duration) {
        log_error(&inbound.sender_id, e);
        self.reply(&inbound.chat_id, &e.user_message(), delay).await;
    }
}

fn log_error(user: &UserId, e: &SnapdriftError) {
    match e {
        SnapdriftError::Validation(msg) => debug!(user_id = %user, reason = %msg, "command rejected"),
        other => error!(user_id = %user, error = %other, "command failed"),
    }
}

/// Send `text` and delete it after `delay`.
async fn send_transient(
    sink: &Arc<dyn NotificationSink>,
    chat: &ChatId,
    text: &str,
    delay: Duration,
) {
    match sink.send_message(chat, text).await {
        Ok(handle) => {
            schedule_delete(Arc::clone(sink), handle, delay);
        }
        Err(e) => warn!(chat_id = %chat, error = %e, "could not send reply"),
    }
}
