// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for Snapdrift user preferences.
//!
//! Preferences are stored as one JSON document per user in WAL-mode SQLite,
//! with embedded migrations and a single-writer model via `tokio-rusqlite`.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqlitePreferenceStore;
pub use database::Database;
