// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Snapdrift media bot.
//!
//! This crate provides the trait definitions, error types, and common types
//! shared by every other crate in the workspace. Adapters for the chat
//! platform, the asset server, and preference storage implement traits
//! defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{GENERIC_USER_ERROR, SnapdriftError};
pub use types::{
    AccountTier, AdapterType, AssetCandidate, AssetInfo, ChatId, FileUpload, HealthStatus,
    InboundCommand, MediaType, MessageHandle, ServerStats, UserId, UserPreferences,
};

pub use traits::{
    ChannelAdapter, NotificationSink, PluginAdapter, PreferenceStore, RemoteAssetGateway,
};
