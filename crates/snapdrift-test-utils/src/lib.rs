// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Snapdrift integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without a Telegram bot or an asset server.
//!
//! # Components
//!
//! - [`MockGateway`] - Mock asset server with scripted random batches
//! - [`MockChannel`] - Mock messaging channel with command injection and capture
//! - [`TestHarness`] - The full command stack wired to both mocks

pub mod harness;
pub mod mock_channel;
pub mod mock_gateway;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_channel::{MockChannel, SinkEvent};
pub use mock_gateway::MockGateway;
