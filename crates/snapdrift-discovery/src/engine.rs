// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The random discovery loop.
//!
//! One call to [`DiscoveryEngine::run`] is one job: validate the size window,
//! register the job, sample random candidates in batches until enough match
//! or the attempt budget runs out, then deliver. Cancellation is polled once
//! per batch, so a cancel takes effect after at most one in-flight batch.
//! With no wall-clock timeout, `max_attempts` times the gateway round-trip
//! bounds how long a job can run.
//!
//! Assets that pass the filter but exceed the caller's transport ceiling are
//! kept and delivered as metadata with a size note instead of a file. They
//! count toward the target.

use std::sync::Arc;
use std::time::Duration;

use snapdrift_core::{
    AccountTier, AssetCandidate, AssetInfo, ChatId, FileUpload, GENERIC_USER_ERROR,
    MessageHandle, NotificationSink, RemoteAssetGateway, SnapdriftError, UserId,
};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::filter::{FilterSpec, matches};
use crate::format::{
    SEARCH_CANCELLED, SEARCH_STARTED, asset_caption, asset_file_name, exhausted_text,
    min_exceeds_limit_text, min_exceeds_max_text, progress_text, too_large_note,
};
use crate::jobs::JobRegistry;
use crate::last_asset::LastAssetRegistry;
use crate::notice::schedule_delete;
use crate::size::SizeLimitPolicy;

/// Default upper bound on candidates requested per sampling call.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Parameters of one discovery job, snapshotted when the job starts.
#[derive(Debug, Clone)]
pub struct DiscoveryRequest {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub filter: FilterSpec,
    pub tier: AccountTier,
    pub max_attempts: u32,
    pub progress_interval: Duration,
    /// Command as typed, echoed in captions and notices.
    pub command_text: String,
    /// How long final notices stay in the chat. `None` falls back to the
    /// engine default.
    pub notice_ttl: Option<Duration>,
}

/// How a job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    /// At least one asset reached the chat.
    Delivered {
        delivered: usize,
        failed: usize,
        attempts: u32,
    },
    /// The attempt budget ran out with nothing found.
    Exhausted { attempts: u32 },
    /// The user cancelled; anything collected was discarded.
    Cancelled { attempts: u32 },
    /// Assets were found but none could be delivered.
    Failed { found: usize, attempts: u32 },
}

/// A filtered asset waiting for delivery. `payload` is `None` when the
/// asset is over the transport ceiling.
struct Collected {
    info: AssetInfo,
    payload: Option<Vec<u8>>,
}

enum Search {
    Finished {
        collected: Vec<Collected>,
        attempts: u32,
    },
    Cancelled {
        attempts: u32,
    },
}

/// Removes the job on every exit path, including a dropped future.
///
/// Only this run's generation is removed, so a job the same user started
/// meanwhile stays registered and cancellable.
struct JobGuard<'a> {
    jobs: &'a JobRegistry,
    user_id: &'a UserId,
    generation: u64,
}

impl Drop for JobGuard<'_> {
    fn drop(&mut self) {
        self.jobs.end_job_if(self.user_id, self.generation);
    }
}

/// Runs discovery jobs against a gateway and reports through a sink.
///
/// Holds no per-job state; everything per user lives in the shared
/// registries.
pub struct DiscoveryEngine {
    gateway: Arc<dyn RemoteAssetGateway>,
    sink: Arc<dyn NotificationSink>,
    jobs: Arc<JobRegistry>,
    last_assets: Arc<LastAssetRegistry>,
    limits: SizeLimitPolicy,
    batch_size: usize,
    notice_ttl: Option<Duration>,
}

impl DiscoveryEngine {
    pub fn new(
        gateway: Arc<dyn RemoteAssetGateway>,
        sink: Arc<dyn NotificationSink>,
        jobs: Arc<JobRegistry>,
        last_assets: Arc<LastAssetRegistry>,
        limits: SizeLimitPolicy,
    ) -> Self {
        Self {
            gateway,
            sink,
            jobs,
            last_assets,
            limits,
            batch_size: DEFAULT_BATCH_SIZE,
            notice_ttl: None,
        }
    }

    /// Cap on candidates per sampling call. Zero is treated as one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Delete exhaustion, cancellation, and failure notices after `ttl`
    /// unless the request carries its own.
    pub fn with_notice_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.notice_ttl = ttl;
        self
    }

    pub fn jobs(&self) -> &Arc<JobRegistry> {
        &self.jobs
    }

    pub fn last_assets(&self) -> &Arc<LastAssetRegistry> {
        &self.last_assets
    }

    pub fn limits(&self) -> &SizeLimitPolicy {
        &self.limits
    }

    /// Run one discovery job to completion.
    ///
    /// Returns `Err(SnapdriftError::Validation)` without registering a job
    /// when the minimum size exceeds the caller's ceiling. Every other ending
    /// is an [`DiscoveryOutcome`]; upstream and delivery failures are logged
    /// and absorbed.
    pub async fn run(&self, request: DiscoveryRequest) -> Result<DiscoveryOutcome, SnapdriftError> {
        let limit = self.limits.resolve_limit(request.tier);
        let mut filter = request.filter.clone();

        if let Some(min) = filter.min_bytes {
            if min > limit {
                return Err(SnapdriftError::Validation(min_exceeds_limit_text(
                    min, limit,
                )));
            }
        }
        if let (Some(min), Some(max)) = (filter.min_bytes, filter.max_bytes) {
            if min > max {
                return Err(SnapdriftError::Validation(min_exceeds_max_text(min, max)));
            }
        }
        if let Some(max) = filter.max_bytes {
            if max > limit {
                debug!(user_id = %request.user_id, max, limit, "clamping max size to account limit");
                filter.max_bytes = Some(limit);
            }
        }

        let progress = match self.sink.send_message(&request.chat_id, SEARCH_STARTED).await {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(user_id = %request.user_id, error = %e, "could not send progress message");
                None
            }
        };

        let generation = self.jobs.start_job(&request.user_id, progress.clone());
        let _guard = JobGuard {
            jobs: &self.jobs,
            user_id: &request.user_id,
            generation,
        };

        info!(
            user_id = %request.user_id,
            target = filter.target_count,
            media_type = ?filter.media_type,
            min_bytes = ?filter.min_bytes,
            max_bytes = ?filter.max_bytes,
            max_attempts = request.max_attempts,
            "discovery started"
        );

        let search = self
            .search(&request, &filter, limit, progress.as_ref())
            .await;

        let outcome = match search {
            Search::Cancelled { attempts } => {
                if let Some(handle) = &progress {
                    self.delete_quietly(handle).await;
                }
                self.notice(&request, SEARCH_CANCELLED).await;
                DiscoveryOutcome::Cancelled { attempts }
            }
            Search::Finished {
                collected,
                attempts,
            } if collected.is_empty() => {
                let text = exhausted_text(&request.command_text, attempts);
                self.replace_progress(&request, progress.as_ref(), &text)
                    .await;
                DiscoveryOutcome::Exhausted { attempts }
            }
            Search::Finished {
                collected,
                attempts,
            } => {
                if let Some(handle) = &progress {
                    self.delete_quietly(handle).await;
                }
                self.deliver(&request, collected, limit, attempts).await
            }
        };

        info!(user_id = %request.user_id, outcome = ?outcome, "discovery finished");
        Ok(outcome)
    }

    async fn search(
        &self,
        request: &DiscoveryRequest,
        filter: &FilterSpec,
        limit: u64,
        progress: Option<&MessageHandle>,
    ) -> Search {
        let target = filter.target_count as usize;
        let max_attempts = request.max_attempts;
        let mut collected: Vec<Collected> = Vec::with_capacity(target);
        let mut attempts: u32 = 0;
        let mut last_report = Instant::now();

        while attempts < max_attempts && collected.len() < target {
            if self.jobs.is_cancelled(&request.user_id) {
                debug!(user_id = %request.user_id, attempts, "discovery cancelled");
                return Search::Cancelled { attempts };
            }

            if let Some(handle) = progress {
                if last_report.elapsed() >= request.progress_interval {
                    let text = progress_text(collected.len(), target, attempts + 1, max_attempts);
                    if let Err(e) = self.sink.edit_message(handle, &text).await {
                        debug!(error = %e, "progress update failed");
                    }
                    last_report = Instant::now();
                }
            }

            let wanted = self.batch_size.min(target - collected.len());
            let batch = match self.gateway.get_random_assets(wanted).await {
                Ok(batch) if !batch.is_empty() => batch,
                Ok(_) => {
                    attempts += 1;
                    debug!(attempts, "random sample came back empty");
                    continue;
                }
                Err(e) => {
                    attempts += 1;
                    warn!(attempts, error = %e, "random sample failed");
                    continue;
                }
            };

            for candidate in batch {
                if attempts >= max_attempts {
                    break;
                }
                attempts += 1;

                if let Some(found) = self.evaluate(&candidate, filter, limit).await {
                    collected.push(found);
                    if collected.len() >= target {
                        break;
                    }
                }
            }
        }

        Search::Finished {
            collected,
            attempts,
        }
    }

    /// Fetch, filter, and size-check one candidate.
    async fn evaluate(
        &self,
        candidate: &AssetCandidate,
        filter: &FilterSpec,
        limit: u64,
    ) -> Option<Collected> {
        let info = match self.gateway.get_asset_info(&candidate.id).await {
            Ok(info) => info,
            Err(e) => {
                debug!(asset_id = %candidate.id, error = %e, "skipping candidate without metadata");
                return None;
            }
        };

        if !matches(info.media_type.as_str(), info.byte_size, filter) {
            return None;
        }

        if info.byte_size > limit {
            debug!(asset_id = %info.id, bytes = info.byte_size, limit, "asset too large to attach");
            return Some(Collected {
                info,
                payload: None,
            });
        }

        match self.gateway.get_asset_data(&info.id).await {
            Ok(data) => Some(Collected {
                info,
                payload: Some(data),
            }),
            Err(e) => {
                debug!(asset_id = %info.id, error = %e, "skipping candidate without data");
                None
            }
        }
    }

    async fn deliver(
        &self,
        request: &DiscoveryRequest,
        collected: Vec<Collected>,
        limit: u64,
        attempts: u32,
    ) -> DiscoveryOutcome {
        let found = collected.len();
        let mut delivered = 0;
        let mut failed = 0;

        for item in collected {
            let caption = asset_caption(&request.command_text, &item.info);
            let sent = match item.payload {
                Some(data) => {
                    let upload = FileUpload {
                        data,
                        filename: asset_file_name(&item.info),
                        caption,
                    };
                    self.sink.send_file(&request.chat_id, upload).await
                }
                None => {
                    let text = format!(
                        "{caption}\n\n{}",
                        too_large_note(item.info.byte_size, limit)
                    );
                    self.sink.send_message(&request.chat_id, &text).await
                }
            };

            match sent {
                Ok(handle) => {
                    self.last_assets
                        .record(&request.user_id, &item.info.id, handle);
                    delivered += 1;
                }
                Err(e) => {
                    error!(asset_id = %item.info.id, error = %e, "asset delivery failed");
                    failed += 1;
                    self.notice(request, GENERIC_USER_ERROR).await;
                }
            }
        }

        if delivered == 0 {
            DiscoveryOutcome::Failed { found, attempts }
        } else {
            DiscoveryOutcome::Delivered {
                delivered,
                failed,
                attempts,
            }
        }
    }

    /// Send a notice that is deleted after the request's TTL.
    async fn notice(&self, request: &DiscoveryRequest, text: &str) {
        match self.sink.send_message(&request.chat_id, text).await {
            Ok(handle) => self.expire(request, handle),
            Err(e) => warn!(error = %e, "could not send notice"),
        }
    }

    /// Rewrite the progress message as a final notice, or send a new one.
    async fn replace_progress(
        &self,
        request: &DiscoveryRequest,
        progress: Option<&MessageHandle>,
        text: &str,
    ) {
        if let Some(handle) = progress {
            match self.sink.edit_message(handle, text).await {
                Ok(()) => {
                    self.expire(request, handle.clone());
                    return;
                }
                Err(e) => debug!(error = %e, "progress message could not be edited"),
            }
        }
        self.notice(request, text).await;
    }

    fn expire(&self, request: &DiscoveryRequest, handle: MessageHandle) {
        if let Some(ttl) = request.notice_ttl.or(self.notice_ttl) {
            schedule_delete(Arc::clone(&self.sink), handle, ttl);
        }
    }

    async fn delete_quietly(&self, handle: &MessageHandle) {
        if let Err(e) = self.sink.delete_message(handle).await {
            debug!(error = %e, "progress message could not be deleted");
        }
    }
}
