// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete Snapdrift command pipeline.
//!
//! Each test creates an isolated TestHarness with a temp SQLite preference
//! database, a mock asset server, and a mock chat. Tests are independent and
//! order-insensitive.

use std::time::Duration;

use snapdrift_agent::replies;
use snapdrift_core::{
    GENERIC_USER_ERROR, MediaType, MessageHandle, PreferenceStore, ServerStats, UserId,
};
use snapdrift_discovery::format::{SEARCH_STARTED, exhausted_text};
use snapdrift_test_utils::{MockGateway, SinkEvent, TestHarness};
use tokio_util::sync::CancellationToken;

const MB: u64 = 1_000_000;

async fn harness_with_library() -> TestHarness {
    let harness = TestHarness::builder().build().await.unwrap();
    let gw = &harness.gateway;
    gw.add_asset(MockGateway::asset("i1", MediaType::Image, MB));
    gw.add_asset(MockGateway::asset("i2", MediaType::Image, 2 * MB));
    gw.add_asset(MockGateway::asset("i3", MediaType::Image, 20 * MB));
    gw.add_asset(MockGateway::asset("v1", MediaType::Video, 3 * MB));
    gw.add_asset(MockGateway::asset("v2", MediaType::Video, 4 * MB));
    harness
}

// ---- Random discovery ----

#[tokio::test]
async fn random_collects_requested_count_of_matching_assets() {
    let harness = harness_with_library().await;
    harness.gateway.push_batch(&["i1", "v1"]);
    harness.gateway.push_batch(&["i2", "v2"]);
    harness.gateway.push_batch(&["i3"]);

    harness.send("alice", "/random image count:2").await;

    let files = harness.channel.files().await;
    let names: Vec<&str> = files.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["asset_i1.jpg", "asset_i2.jpg"]);
    assert!(files[0].1.contains("/random image count:2"));
    assert_eq!(harness.last_asset("alice").as_deref(), Some("i2"));
    assert!(!harness.job_active("alice"));

    let progress = harness.channel.handle_of(SEARCH_STARTED).await.unwrap();
    assert!(harness.channel.was_deleted(&progress).await);
}

#[tokio::test]
async fn random_falls_back_to_preferred_media_type() {
    let harness = harness_with_library().await;
    harness.send("alice", "/prefs set mt video").await;
    harness.gateway.push_batch(&["i1"]);
    harness.gateway.push_batch(&["v1"]);

    harness.send("alice", "/random").await;

    let files = harness.channel.files().await;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].0, "asset_v1.mp4");
}

#[tokio::test]
async fn random_rejects_minimum_above_account_limit() {
    let harness = harness_with_library().await;

    harness.send("alice", "/random min:30mb").await;

    let texts = harness.channel.texts().await;
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("cannot exceed your account's maximum"));
    assert_eq!(harness.gateway.random_calls(), 0);
    assert!(!harness.job_active("alice"));
}

#[tokio::test]
async fn random_rejects_inverted_size_window() {
    let harness = harness_with_library().await;

    harness.send("alice", "/random min:5mb max:1mb").await;

    let texts = harness.channel.texts().await;
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("cannot exceed maximum file size"));
}

#[tokio::test]
async fn random_rejects_malformed_size() {
    let harness = harness_with_library().await;

    harness.send("alice", "/random min:big").await;

    assert_eq!(harness.gateway.random_calls(), 0);
    assert_eq!(harness.channel.texts().await.len(), 1);
}

#[tokio::test]
async fn random_reports_exhaustion_on_progress_message() {
    let harness = harness_with_library().await;
    harness.send("alice", "/prefs set attempts 3").await;
    harness.channel.clear().await;

    harness.send("alice", "/random").await;

    let progress = harness.channel.handle_of(SEARCH_STARTED).await.unwrap();
    let expected = exhausted_text("/random", 3);
    let edited = harness
        .channel
        .events()
        .await
        .into_iter()
        .any(|e| matches!(e, SinkEvent::Edit { handle, text } if handle == progress && text == expected));
    assert!(edited);
    assert!(harness.channel.files().await.is_empty());
    assert_eq!(harness.last_asset("alice"), None);
}

#[tokio::test]
async fn random_sends_metadata_for_assets_over_the_limit() {
    let harness = harness_with_library().await;
    harness
        .gateway
        .add_asset(MockGateway::asset("huge", MediaType::Image, 30 * MB));
    harness.gateway.push_batch(&["huge"]);

    harness.send("alice", "/random").await;

    assert!(harness.channel.files().await.is_empty());
    assert_eq!(harness.gateway.data_calls(), 0);
    let texts = harness.channel.texts().await;
    let note = texts.last().unwrap();
    assert!(note.contains("File too large for upload"));
    assert!(note.contains("Size: 30.00 MB, Limit: 25.00 MB"));
    assert_eq!(harness.last_asset("alice").as_deref(), Some("huge"));
}

#[tokio::test]
async fn premium_tier_raises_the_ceiling() {
    let harness = harness_with_library().await;
    harness
        .gateway
        .add_asset(MockGateway::asset("huge", MediaType::Image, 30 * MB));
    harness.send("alice", "/prefs set tier premium").await;
    harness.gateway.push_batch(&["huge"]);

    harness.send("alice", "/random").await;

    let files = harness.channel.files().await;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].0, "asset_huge.jpg");
}

#[tokio::test]
async fn failed_upload_is_reported_generically() {
    let harness = harness_with_library().await;
    harness.gateway.push_batch(&["i1"]);
    harness.channel.fail_files(true);

    harness.send("alice", "/random").await;

    assert!(
        harness
            .channel
            .texts()
            .await
            .contains(&GENERIC_USER_ERROR.to_string())
    );
    assert_eq!(harness.last_asset("alice"), None);
    assert!(!harness.job_active("alice"));
}

// ---- Cancellation ----

#[tokio::test]
async fn cancel_without_search_reports_nothing_to_cancel() {
    let harness = harness_with_library().await;

    harness.send("alice", "/cancel").await;

    assert_eq!(
        harness.channel.texts().await,
        vec![replies::NOTHING_TO_CANCEL.to_string()]
    );
}

#[tokio::test]
async fn cancel_flags_running_search_and_removes_progress() {
    let harness = harness_with_library().await;
    let user = UserId("alice".into());
    let progress = MessageHandle {
        chat_id: snapdrift_core::ChatId("chat-alice".into()),
        message_id: "999".into(),
    };
    harness
        .handler
        .engine()
        .jobs()
        .start_job(&user, Some(progress.clone()));

    harness.send("alice", "/cancel").await;

    assert!(harness.handler.engine().jobs().is_cancelled(&user));
    assert!(harness.channel.was_deleted(&progress).await);
    assert_eq!(
        harness.channel.texts().await,
        vec![replies::CANCELLING.to_string()]
    );
}

// ---- Single-asset commands ----

#[tokio::test]
async fn get_sends_asset_with_file_details() {
    let harness = harness_with_library().await;

    harness.send("alice", "/get i2").await;

    let files = harness.channel.files().await;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].0, "asset_i2.jpg");
    assert!(files[0].1.starts_with("File Details:\nID: i2\n"));
    assert!(files[0].1.contains("Resolution: 4032x3024"));
    assert_eq!(harness.last_asset("alice").as_deref(), Some("i2"));
}

#[tokio::test]
async fn get_last_resends_previous_asset() {
    let harness = harness_with_library().await;
    harness.send("alice", "/get v1").await;

    harness.send("alice", "/get last").await;

    let files = harness.channel.files().await;
    assert_eq!(files.len(), 2);
    assert_eq!(files[1].0, "asset_v1.mp4");
}

#[tokio::test]
async fn get_reports_missing_and_oversized_assets() {
    let harness = harness_with_library().await;
    harness
        .gateway
        .add_asset(MockGateway::asset("huge", MediaType::Video, 40 * MB));

    harness.send("alice", "/get nope").await;
    harness.send("alice", "/get huge").await;

    assert_eq!(
        harness.channel.texts().await,
        vec![
            replies::not_found("nope"),
            replies::too_large(40 * MB, 25 * MB)
        ]
    );
    assert!(harness.channel.files().await.is_empty());
}

#[tokio::test]
async fn get_last_without_history_is_explained() {
    let harness = harness_with_library().await;

    harness.send("alice", "/get last").await;

    assert_eq!(
        harness.channel.texts().await,
        vec![replies::NO_LAST_ASSET.to_string()]
    );
}

#[tokio::test]
async fn get_without_argument_shows_usage() {
    let harness = harness_with_library().await;

    harness.send("alice", "/get").await;

    assert_eq!(
        harness.channel.texts().await,
        vec!["Usage: /get <asset_id|last>".to_string()]
    );
}

#[tokio::test]
async fn delete_last_removes_delivered_message_and_asset() {
    let harness = harness_with_library().await;
    harness.send("alice", "/get i1").await;
    let delivered = harness
        .channel
        .events()
        .await
        .into_iter()
        .find_map(|e| match e {
            SinkEvent::File { handle, .. } => Some(handle),
            _ => None,
        })
        .unwrap();

    harness.send("alice", "/delete last").await;

    assert!(harness.channel.was_deleted(&delivered).await);
    assert!(harness.gateway.is_deleted("i1"));
    assert_eq!(harness.last_asset("alice"), None);
    assert!(
        harness
            .channel
            .texts()
            .await
            .contains(&replies::deleted("i1"))
    );
}

#[tokio::test]
async fn delete_by_id_keeps_unrelated_last_asset() {
    let harness = harness_with_library().await;
    harness.send("alice", "/get i1").await;

    harness.send("alice", "/delete v2").await;

    assert!(harness.gateway.is_deleted("v2"));
    assert_eq!(harness.last_asset("alice").as_deref(), Some("i1"));
}

#[tokio::test]
async fn favorite_and_unfavorite_update_the_server() {
    let harness = harness_with_library().await;
    harness.send("alice", "/get i3").await;

    harness.send("alice", "/favorite last").await;
    assert_eq!(harness.gateway.favorite("i3"), Some(true));

    harness.send("alice", "/unfavorite i3").await;
    assert_eq!(harness.gateway.favorite("i3"), Some(false));

    let texts = harness.channel.texts().await;
    assert!(texts.contains(&replies::favorite_changed("i3", true)));
    assert!(texts.contains(&replies::favorite_changed("i3", false)));
}

#[tokio::test]
async fn stats_use_thousands_separators() {
    let harness = harness_with_library().await;
    harness.gateway.set_stats(ServerStats {
        photo_count: 1_234_567,
        video_count: 890,
    });

    harness.send("alice", "/stats").await;

    let texts = harness.channel.texts().await;
    assert!(texts[0].contains("Total Assets: 1,235,457"));
    assert!(texts[0].contains("Photos: 1,234,567"));
    assert!(texts[0].contains("Videos: 890"));
}

// ---- Preferences ----

#[tokio::test]
async fn prefs_set_persists_valid_values() {
    let harness = harness_with_library().await;

    harness.send("alice", "/prefs set min 1.5mb").await;
    harness.send("alice", "/prefs set attempts 12").await;
    harness.send("alice", "/prefs set tier basic").await;

    let prefs = harness.preferences("alice").await.unwrap();
    assert_eq!(prefs.min_size_bytes, Some(1_500_000));
    assert_eq!(prefs.max_attempts, 12);
    assert_eq!(
        prefs.account_tier,
        Some(snapdrift_core::AccountTier::Basic)
    );
    assert_eq!(
        harness.preferences("bob").await.unwrap().max_attempts,
        snapdrift_core::UserPreferences::default().max_attempts
    );
}

#[tokio::test]
async fn prefs_set_rejects_invalid_values() {
    let harness = harness_with_library().await;

    harness.send("alice", "/prefs set attempts 0").await;
    harness.send("alice", "/prefs set colour red").await;

    let texts = harness.channel.texts().await;
    assert_eq!(texts[0], "Max attempts must be a positive number");
    assert!(texts[1].starts_with("Invalid setting."));
    assert_eq!(
        harness.preferences("alice").await.unwrap(),
        snapdrift_core::UserPreferences::default()
    );
}

#[tokio::test]
async fn prefs_reset_restores_defaults() {
    let harness = harness_with_library().await;
    harness.send("alice", "/prefs set mt image").await;

    harness.send("alice", "/prefs reset").await;

    assert_eq!(
        harness.preferences("alice").await.unwrap(),
        snapdrift_core::UserPreferences::default()
    );
    assert!(
        harness
            .channel
            .texts()
            .await
            .contains(&replies::PREFS_RESET.to_string())
    );
}

#[tokio::test]
async fn prefs_and_help_describe_current_settings() {
    let harness = harness_with_library().await;
    harness.send("alice", "/prefs set tier basic").await;
    harness.channel.clear().await;

    harness.send("alice", "/prefs").await;
    harness.send("alice", "/help").await;
    harness.send("alice", "/helppref").await;

    let texts = harness.channel.texts().await;
    assert_eq!(texts.len(), 3);
    assert!(texts[0].contains("Account Tier (tier): basic"));
    assert!(texts[1].contains("Max File Size: 50.00 MB"));
    assert!(texts[2].contains("mt"));
}

#[tokio::test]
async fn unknown_commands_and_plain_text_are_ignored() {
    let harness = harness_with_library().await;

    harness.send("alice", "/dance").await;
    harness.send("alice", "hello there").await;

    assert!(harness.channel.events().await.is_empty());
}

#[tokio::test]
async fn replies_are_deleted_after_user_delay() {
    let harness = harness_with_library().await;
    let user = UserId("alice".into());
    let mut prefs = harness.preferences("alice").await.unwrap();
    prefs.message_delete_delay_secs = 1;
    harness.store.put(&user, &prefs).await.unwrap();

    harness.send("alice", "/cancel").await;
    let reply = harness
        .channel
        .handle_of(replies::NOTHING_TO_CANCEL)
        .await
        .unwrap();
    assert!(!harness.channel.was_deleted(&reply).await);

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(harness.channel.was_deleted(&reply).await);
}

#[tokio::test]
async fn discovery_notices_follow_user_delay() {
    let harness = TestHarness::builder()
        .with_notice_ttl(Duration::from_secs(60))
        .build()
        .await
        .unwrap();
    let user = UserId("alice".into());
    let mut prefs = harness.preferences("alice").await.unwrap();
    prefs.message_delete_delay_secs = 1;
    prefs.max_attempts = 1;
    harness.store.put(&user, &prefs).await.unwrap();

    harness.send("alice", "/random").await;
    let progress = harness.channel.handle_of(SEARCH_STARTED).await.unwrap();
    assert!(!harness.channel.was_deleted(&progress).await);

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(harness.channel.was_deleted(&progress).await);
}

// ---- Bot loop ----

#[tokio::test]
async fn bot_loop_processes_commands_until_channel_closes() {
    let harness = harness_with_library().await;
    harness.gateway.push_batch(&["v2"]);
    harness.channel.inject_text("alice", "/random video").await;
    harness.channel.inject_text("bob", "/get i1").await;
    harness.channel.close();

    let mut bot = harness.bot_loop().with_drain_timeout(Duration::from_secs(5));
    tokio::time::timeout(Duration::from_secs(10), bot.run(CancellationToken::new()))
        .await
        .expect("bot loop did not stop")
        .unwrap();

    let names: Vec<String> = harness
        .channel
        .files()
        .await
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert!(names.contains(&"asset_v2.mp4".to_string()));
    assert!(names.contains(&"asset_i1.jpg".to_string()));
    assert_eq!(harness.last_asset("bob").as_deref(), Some("i1"));
    assert_eq!(bot.running_jobs(), 0);
}

#[tokio::test]
async fn bot_loop_stops_on_cancellation() {
    let harness = harness_with_library().await;
    let cancel = CancellationToken::new();
    let mut bot = harness.bot_loop();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    tokio::time::timeout(Duration::from_secs(5), bot.run(cancel))
        .await
        .expect("bot loop ignored cancellation")
        .unwrap();
}
