// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat command parsing.
//!
//! [`parse_command`] turns one chat message into a [`Command`]. Messages that
//! do not start with the configured prefix, or name a command the bot does
//! not know, parse to `Ok(None)` so the bot stays quiet in shared chats.
//! Malformed arguments are a [`SnapdriftError::Validation`] whose message is
//! shown to the user.

use std::str::FromStr;

use snapdrift_core::{AccountTier, MediaType, SnapdriftError, UserPreferences};
use snapdrift_discovery::parse_size;

/// Shown when a size argument is not `<number>mb` or `<number>kb`.
pub const INVALID_SIZE: &str =
    "Invalid size format. Use a number followed by 'mb' or 'kb' (e.g., 2mb, 500kb)";

/// Either a literal asset id or the user's last delivered asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRef {
    Id(String),
    Last,
}

impl AssetRef {
    fn parse(arg: &str) -> Self {
        if arg.eq_ignore_ascii_case("last") {
            AssetRef::Last
        } else {
            AssetRef::Id(arg.to_string())
        }
    }
}

/// Arguments of a `random` command. Unset filters fall back to preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RandomArgs {
    pub min_bytes: Option<u64>,
    pub max_bytes: Option<u64>,
    pub media_type: Option<MediaType>,
    /// Raw requested count; normalized when the filter is built.
    pub count: i64,
}

/// A user preference that `prefs set` can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefSetting {
    MediaType,
    MinSize,
    MaxSize,
    MaxAttempts,
    UpdateInterval,
    AccountTier,
}

impl PrefSetting {
    pub const ALL: [PrefSetting; 6] = [
        PrefSetting::MediaType,
        PrefSetting::MinSize,
        PrefSetting::MaxSize,
        PrefSetting::MaxAttempts,
        PrefSetting::UpdateInterval,
        PrefSetting::AccountTier,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PrefSetting::MediaType => "media_type",
            PrefSetting::MinSize => "min_size",
            PrefSetting::MaxSize => "max_size",
            PrefSetting::MaxAttempts => "max_attempts",
            PrefSetting::UpdateInterval => "update_interval",
            PrefSetting::AccountTier => "account_tier",
        }
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            PrefSetting::MediaType => &["mt", "type"],
            PrefSetting::MinSize => &["mins", "min"],
            PrefSetting::MaxSize => &["maxs", "max"],
            PrefSetting::MaxAttempts => &["attempts", "retry"],
            PrefSetting::UpdateInterval => &["interval", "update"],
            PrefSetting::AccountTier => &["tier", "account"],
        }
    }

    /// Resolve a setting by canonical name or alias, case-insensitively.
    pub fn from_alias(alias: &str) -> Option<Self> {
        let alias = alias.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|s| s.name() == alias || s.aliases().contains(&alias.as_str()))
    }

    /// Parse `value` and write it into `prefs`.
    pub fn apply(&self, prefs: &mut UserPreferences, value: &str) -> Result<(), SnapdriftError> {
        let value = value.trim();
        match self {
            PrefSetting::MediaType => {
                prefs.default_media_type = match value.to_ascii_lowercase().as_str() {
                    "all" => None,
                    other => Some(MediaType::from_str(other).map_err(|_| {
                        SnapdriftError::Validation(
                            "Media type must be 'image', 'video', or 'all'".into(),
                        )
                    })?),
                };
            }
            PrefSetting::MinSize => {
                prefs.min_size_bytes = Some(parse_size_arg(value)?).filter(|&b| b > 0);
            }
            PrefSetting::MaxSize => {
                prefs.max_size_bytes = Some(parse_size_arg(value)?).filter(|&b| b > 0);
            }
            PrefSetting::MaxAttempts => {
                prefs.max_attempts = parse_positive(value).ok_or_else(|| {
                    SnapdriftError::Validation("Max attempts must be a positive number".into())
                })?;
            }
            PrefSetting::UpdateInterval => {
                prefs.progress_update_interval_secs = parse_positive(value)
                    .map(u64::from)
                    .ok_or_else(|| {
                        SnapdriftError::Validation(
                            "Update interval must be a positive number of seconds".into(),
                        )
                    })?;
            }
            PrefSetting::AccountTier => {
                prefs.account_tier = Some(AccountTier::from_str(value).map_err(|_| {
                    SnapdriftError::Validation(
                        "Account tier must be 'free', 'basic', or 'premium'".into(),
                    )
                })?);
            }
        }
        Ok(())
    }
}

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Random(RandomArgs),
    Cancel,
    Get(AssetRef),
    Delete(AssetRef),
    Favorite(AssetRef),
    Unfavorite(AssetRef),
    Stats,
    Prefs,
    PrefsSet { setting: PrefSetting, value: String },
    PrefsReset,
    HelpPref,
    Help,
}

/// Parse `text` as a command addressed with `prefix`.
///
/// Telegram's `/command@botname` form is accepted.
pub fn parse_command(prefix: &str, text: &str) -> Result<Option<Command>, SnapdriftError> {
    let Some(body) = text.trim().strip_prefix(prefix) else {
        return Ok(None);
    };

    let mut tokens = body.split_whitespace();
    let Some(word) = tokens.next() else {
        return Ok(None);
    };
    let name = word.split('@').next().unwrap_or(word).to_ascii_lowercase();
    let args: Vec<&str> = tokens.collect();

    let command = match name.as_str() {
        "random" => Command::Random(parse_random_args(&args)?),
        "cancel" => Command::Cancel,
        "get" => Command::Get(asset_arg(prefix, "get", &args)?),
        "delete" => Command::Delete(asset_arg(prefix, "delete", &args)?),
        "favorite" => Command::Favorite(asset_arg(prefix, "favorite", &args)?),
        "unfavorite" => Command::Unfavorite(asset_arg(prefix, "unfavorite", &args)?),
        "stats" => Command::Stats,
        "prefs" => parse_prefs(prefix, &args)?,
        "helppref" => Command::HelpPref,
        "help" => Command::Help,
        _ => return Ok(None),
    };
    Ok(Some(command))
}

/// Parse `random` arguments: `min:<size>`, `max:<size>`, `image`, `video`,
/// `count:<n>`. Unknown tokens are ignored.
pub fn parse_random_args(args: &[&str]) -> Result<RandomArgs, SnapdriftError> {
    let mut parsed = RandomArgs {
        count: 1,
        ..RandomArgs::default()
    };

    for arg in args {
        let arg = arg.to_ascii_lowercase();
        if let Some(size) = arg.strip_prefix("min:") {
            parsed.min_bytes = Some(parse_size_arg(size)?);
        } else if let Some(size) = arg.strip_prefix("max:") {
            parsed.max_bytes = Some(parse_size_arg(size)?);
        } else if let Some(count) = arg.strip_prefix("count:") {
            parsed.count = count.parse().unwrap_or(1);
        } else if let Ok(media) = MediaType::from_str(&arg) {
            parsed.media_type = Some(media);
        }
    }

    Ok(parsed)
}

fn parse_prefs(prefix: &str, args: &[&str]) -> Result<Command, SnapdriftError> {
    let Some(sub) = args.first() else {
        return Ok(Command::Prefs);
    };

    match sub.to_ascii_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(SnapdriftError::Validation(format!(
                    "Usage: {prefix}prefs set <setting> <value>"
                )));
            }
            let setting = PrefSetting::from_alias(args[1]).ok_or_else(|| {
                SnapdriftError::Validation(format!(
                    "Invalid setting. Use `{prefix}helppref` to see available settings and their aliases."
                ))
            })?;
            Ok(Command::PrefsSet {
                setting,
                value: args[2..].join(" "),
            })
        }
        "reset" => Ok(Command::PrefsReset),
        _ => Err(SnapdriftError::Validation(format!(
            "Usage: {prefix}prefs [set <setting> <value> | reset]"
        ))),
    }
}

fn asset_arg(prefix: &str, command: &str, args: &[&str]) -> Result<AssetRef, SnapdriftError> {
    match args.first() {
        Some(arg) => Ok(AssetRef::parse(arg)),
        None => Err(SnapdriftError::Validation(format!(
            "Usage: {prefix}{command} <asset_id|last>"
        ))),
    }
}

fn parse_size_arg(text: &str) -> Result<u64, SnapdriftError> {
    parse_size(text).ok_or_else(|| SnapdriftError::Validation(INVALID_SIZE.into()))
}

fn parse_positive(text: &str) -> Option<u32> {
    text.parse::<u32>().ok().filter(|&n| n >= 1)
}
