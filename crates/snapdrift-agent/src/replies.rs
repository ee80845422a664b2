// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing reply texts.

use snapdrift_core::{AccountTier, ServerStats, UserPreferences};
use snapdrift_discovery::format::group_thousands;
use snapdrift_discovery::{MAX_TARGET_COUNT, format_size};

pub const CANCELLING: &str = "🛑 Cancelling search...";
pub const NOTHING_TO_CANCEL: &str = "❌ No active search to cancel";
pub const NO_LAST_ASSET: &str = "No asset has been fetched yet.";
pub const PREFS_RESET: &str = "Preferences reset to defaults.";

pub fn not_found(id: &str) -> String {
    format!("Asset {id} was not found.")
}

pub fn too_large(bytes: u64, limit: u64) -> String {
    format!(
        "Asset is too large to upload (Size: {}, Limit: {})",
        format_size(bytes),
        format_size(limit)
    )
}

pub fn deleted(id: &str) -> String {
    format!("Asset {id} has been deleted.")
}

pub fn favorite_changed(id: &str, favorite: bool) -> String {
    if favorite {
        format!("Asset {id} has been marked as favorite.")
    } else {
        format!("Asset {id} has been removed from favorites.")
    }
}

pub fn preference_updated(setting: &str) -> String {
    format!("Updated {setting} preference.")
}

pub fn stats(stats: &ServerStats) -> String {
    format!(
        "Server Statistics\n\n\
         Total Assets: {}\n\
         Photos: {}\n\
         Videos: {}",
        group_thousands(stats.total()),
        group_thousands(stats.photo_count),
        group_thousands(stats.video_count),
    )
}

fn optional_size(bytes: Option<u64>) -> String {
    bytes.map(format_size).unwrap_or_else(|| "Not set".into())
}

/// Current preferences with the account ceiling they resolve to.
pub fn preferences(
    prefix: &str,
    prefs: &UserPreferences,
    tier: AccountTier,
    limit: u64,
) -> String {
    let media = prefs
        .default_media_type
        .map(|m| m.to_string())
        .unwrap_or_else(|| "All types".into());

    format!(
        "Your Current Preferences\n\
         Default Media Type (mt): {media}\n\
         Minimum File Size (min): {}\n\
         Maximum File Size (max): {}\n\
         API Retry Attempts (attempts): {}\n\
         Progress Update Interval (interval): {}s\n\
         Account Tier (tier): {tier} (limit {})\n\n\
         Use {prefix}prefs set <setting> <value> to change a setting\n\
         Use {prefix}helppref for detailed setting information\n\
         Use {prefix}prefs reset to reset to defaults",
        optional_size(prefs.min_size_bytes),
        optional_size(prefs.max_size_bytes),
        prefs.max_attempts,
        prefs.progress_update_interval_secs,
        format_size(limit),
    )
}

pub fn preference_help(prefix: &str) -> String {
    format!(
        "Preference Settings Help\n\
         =======================\n\n\
         media_type (mt, type): default media type\n\
         \u{20}  Values: image, video, all\n\
         \u{20}  Example: {prefix}prefs set mt image\n\n\
         min_size (mins, min): default minimum file size\n\
         \u{20}  Format: number + mb/kb\n\
         \u{20}  Example: {prefix}prefs set min 2mb\n\n\
         max_size (maxs, max): default maximum file size\n\
         \u{20}  Format: number + mb/kb\n\
         \u{20}  Example: {prefix}prefs set max 5mb\n\n\
         max_attempts (attempts, retry): candidates checked per search\n\
         \u{20}  Format: positive number\n\
         \u{20}  Example: {prefix}prefs set attempts 50\n\n\
         update_interval (interval, update): progress update interval\n\
         \u{20}  Format: seconds (positive number)\n\
         \u{20}  Example: {prefix}prefs set interval 5\n\n\
         account_tier (tier, account): upload size class\n\
         \u{20}  Values: free, basic, premium\n\
         \u{20}  Example: {prefix}prefs set tier basic\n\n\
         Commands:\n\
         {prefix}prefs: show current preferences\n\
         {prefix}prefs set <setting> <value>: update a preference\n\
         {prefix}prefs reset: reset to defaults"
    )
}

pub fn help(prefix: &str, prefs: &UserPreferences, limit: u64) -> String {
    format!(
        "📋 SNAPDRIFT HELP\n\
         ═══════════════════════\n\n\
         ⚙️ Current Settings\n\
         \u{20} • Max File Size: {}\n\
         \u{20} • Max Attempts: {}\n\
         \u{20} • Update Interval: {}s\n\n\
         🎲 Random Assets\n\
         \u{20} {prefix}random [min:size] [max:size] [image|video] [count:n]\n\
         \u{20} count is at most {MAX_TARGET_COUNT}\n\
         \u{20} Example: {prefix}random min:2mb max:5mb image count:3\n\n\
         🖼 Assets\n\
         \u{20} {prefix}get <id|last>\n\
         \u{20} {prefix}delete <id|last>\n\
         \u{20} {prefix}favorite <id|last>\n\
         \u{20} {prefix}unfavorite <id|last>\n\
         \u{20} {prefix}stats\n\n\
         ⚙️ Preferences\n\
         \u{20} {prefix}prefs [set <setting> <value> | reset]\n\
         \u{20} {prefix}helppref\n\n\
         🛑 Control\n\
         \u{20} {prefix}cancel  Stop the running search",
        format_size(limit),
        prefs.max_attempts,
        prefs.progress_update_interval_secs,
    )
}
