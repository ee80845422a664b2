// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user discovery job tracking.
//!
//! At most one job is live per user. Starting a new job replaces the old
//! entry, so a cancel issued afterwards reaches only the newest job. Each
//! start hands out a generation number; ending a job by generation leaves a
//! newer job for the same user in place.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use snapdrift_core::{MessageHandle, UserId};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug)]
struct JobState {
    generation: u64,
    cancel: CancellationToken,
    /// Progress notification created when the job started.
    handle: Option<MessageHandle>,
}

/// Concurrent map of live discovery jobs keyed by user.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: DashMap<UserId, JobState>,
    next_generation: AtomicU64,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh, uncancelled job for `user_id`, replacing any prior one.
    ///
    /// Returns the job's generation for use with [`end_job_if`](Self::end_job_if).
    pub fn start_job(&self, user_id: &UserId, handle: Option<MessageHandle>) -> u64 {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let replaced = self.jobs.insert(
            user_id.clone(),
            JobState {
                generation,
                cancel: CancellationToken::new(),
                handle,
            },
        );
        if let Some(old) = replaced {
            debug!(
                user_id = %user_id,
                old_generation = old.generation,
                generation,
                "replaced an active discovery job"
            );
        }
        generation
    }

    /// Flag the user's job for cancellation. Returns whether a job existed.
    pub fn request_cancel(&self, user_id: &UserId) -> bool {
        match self.jobs.get(user_id) {
            Some(job) => {
                job.cancel.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_cancelled(&self, user_id: &UserId) -> bool {
        self.jobs
            .get(user_id)
            .map(|job| job.cancel.is_cancelled())
            .unwrap_or(false)
    }

    /// The progress notification recorded when the job started.
    pub fn get_handle(&self, user_id: &UserId) -> Option<MessageHandle> {
        self.jobs.get(user_id).and_then(|job| job.handle.clone())
    }

    /// Remove the user's job whatever its generation. Idempotent.
    pub fn end_job(&self, user_id: &UserId) {
        self.jobs.remove(user_id);
    }

    /// Remove the user's job only if it is still `generation`.
    ///
    /// Returns whether an entry was removed.
    pub fn end_job_if(&self, user_id: &UserId, generation: u64) -> bool {
        self.jobs
            .remove_if(user_id, |_, job| job.generation == generation)
            .is_some()
    }

    pub fn is_active(&self, user_id: &UserId) -> bool {
        self.jobs.contains_key(user_id)
    }

    pub fn active_count(&self) -> usize {
        self.jobs.len()
    }
}
