// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing text for discovery progress, captions, and file names.

use std::path::Path;

use chrono::{DateTime, Utc};
use snapdrift_core::AssetInfo;

use crate::size::format_size;

pub const SEARCH_STARTED: &str = "🔍 Starting asset search...";
pub const SEARCH_CANCELLED: &str = "✋ Search cancelled";

/// Longest caption Telegram accepts on a photo, video, or document.
pub const MAX_CAPTION_CHARS: usize = 1024;

/// Extensions for content types commonly served by photo libraries.
const CONTENT_TYPE_EXTENSIONS: &[(&str, &str)] = &[
    ("image/jpeg", ".jpg"),
    ("image/png", ".png"),
    ("image/gif", ".gif"),
    ("image/webp", ".webp"),
    ("image/heic", ".heic"),
    ("image/heif", ".heif"),
    ("image/avif", ".avif"),
    ("image/tiff", ".tiff"),
    ("image/bmp", ".bmp"),
    ("image/x-adobe-dng", ".dng"),
    ("video/mp4", ".mp4"),
    ("video/quicktime", ".mov"),
    ("video/webm", ".webm"),
    ("video/x-matroska", ".mkv"),
    ("video/x-msvideo", ".avi"),
    ("video/3gpp", ".3gp"),
    ("video/mpeg", ".mpeg"),
];

pub fn progress_text(collected: usize, target: usize, attempt: u32, max_attempts: u32) -> String {
    format!("🔍 Found {collected}/{target} assets... (Attempt {attempt}/{max_attempts})")
}

pub fn exhausted_text(command: &str, attempts: u32) -> String {
    format!("❌ No matching assets found for command: `{command}` after {attempts} attempts.")
}

pub fn min_exceeds_limit_text(min_bytes: u64, limit: u64) -> String {
    format!(
        "❌ Minimum file size ({}) cannot exceed your account's maximum file size limit ({})",
        format_size(min_bytes),
        format_size(limit)
    )
}

pub fn min_exceeds_max_text(min_bytes: u64, max_bytes: u64) -> String {
    format!(
        "❌ Minimum file size ({}) cannot exceed maximum file size ({})",
        format_size(min_bytes),
        format_size(max_bytes)
    )
}

pub fn too_large_note(bytes: u64, limit: u64) -> String {
    format!(
        "⚠️ File too large for upload (Size: {}, Limit: {})",
        format_size(bytes),
        format_size(limit)
    )
}

/// `03/14/24 - 09:26:53 UTC`
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%m/%d/%y - %H:%M:%S UTC").to_string()
}

/// Multi-line metadata block for one asset.
pub fn file_details(info: &AssetInfo) -> String {
    let mut text = format!(
        "File Details:\nID: {}\nOriginal File Name: {}\nSize: {}\n",
        info.id,
        info.original_file_name,
        format_size(info.byte_size)
    );
    if let (Some(w), Some(h)) = (info.width, info.height) {
        text.push_str(&format!("Resolution: {w}x{h}\n"));
    }
    text.push_str(&format!("Created: {}", format_timestamp(&info.created_at)));
    text
}

/// Caption attached to a delivered asset, at most [`MAX_CAPTION_CHARS`].
///
/// The echoed command is shortened first so the details survive intact.
pub fn asset_caption(command: &str, info: &AssetInfo) -> String {
    let details = file_details(info);
    let frame = "Command Used: ``\n\n".chars().count() + details.chars().count();
    let command = truncate_chars(command, MAX_CAPTION_CHARS.saturating_sub(frame));
    truncate_chars(
        &format!("Command Used: `{command}`\n\n{details}"),
        MAX_CAPTION_CHARS,
    )
}

/// Cut `text` to `max` characters, marking the cut with an ellipsis.
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let Some(keep) = max.checked_sub(1) else {
        return String::new();
    };
    let mut out: String = text.chars().take(keep).collect();
    out.push('…');
    out
}

/// Extension (with the dot) from the file name, else from the content type.
pub fn file_extension(original_file_name: &str, content_type: &str) -> String {
    if let Some(ext) = Path::new(original_file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
    {
        return format!(".{ext}");
    }
    let content_type = content_type.to_ascii_lowercase();
    CONTENT_TYPE_EXTENSIONS
        .iter()
        .find(|(ct, _)| *ct == content_type)
        .map(|(_, ext)| ext.to_string())
        .unwrap_or_default()
}

/// `asset_<id><ext>`
pub fn asset_file_name(info: &AssetInfo) -> String {
    format!(
        "asset_{}{}",
        info.id,
        file_extension(&info.original_file_name, &info.content_type)
    )
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
