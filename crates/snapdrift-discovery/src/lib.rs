// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random asset discovery for the Snapdrift bot.
//!
//! The [`DiscoveryEngine`] runs a bounded, cancellable search over random
//! samples from a [`RemoteAssetGateway`], filters each candidate with
//! [`matches`], enforces the caller's transport ceiling from
//! [`SizeLimitPolicy`], reports progress through a [`NotificationSink`], and
//! delivers what it found. Per-user state lives in [`JobRegistry`] and
//! [`LastAssetRegistry`], both owned by the caller and shared by reference.
//!
//! [`RemoteAssetGateway`]: snapdrift_core::RemoteAssetGateway
//! [`NotificationSink`]: snapdrift_core::NotificationSink

pub mod engine;
pub mod filter;
pub mod format;
pub mod jobs;
pub mod last_asset;
pub mod notice;
pub mod size;

pub use engine::{DiscoveryEngine, DiscoveryOutcome, DiscoveryRequest};
pub use filter::{FilterSpec, MAX_TARGET_COUNT, matches, normalize_count};
pub use jobs::JobRegistry;
pub use last_asset::{LastAssetRecord, LastAssetRegistry};
pub use notice::schedule_delete;
pub use size::{SizeLimitPolicy, format_size, parse_size};
