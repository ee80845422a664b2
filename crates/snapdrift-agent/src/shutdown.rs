// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graceful shutdown coordination with signal handling.
//!
//! Installs handlers for SIGTERM and SIGINT (Ctrl+C), triggering a
//! [`CancellationToken`] that the bot loop monitors. Running discovery jobs
//! get a grace period before they are aborted.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is received.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = ctrl_c => {
                            info!("received SIGINT (Ctrl+C), initiating shutdown");
                        }
                        _ = sigterm.recv() => {
                            info!("received SIGTERM, initiating shutdown");
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "SIGTERM handler unavailable, listening for Ctrl+C only");
                    let _ = ctrl_c.await;
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

/// Waits up to `timeout` for running jobs, then aborts the rest.
pub async fn drain_jobs(jobs: Vec<JoinHandle<()>>, timeout: Duration) {
    let running: Vec<_> = jobs.into_iter().filter(|j| !j.is_finished()).collect();
    if running.is_empty() {
        info!("no running searches to drain");
        return;
    }

    info!(count = running.len(), "waiting for running searches to finish");

    let aborts: Vec<_> = running.iter().map(JoinHandle::abort_handle).collect();
    match tokio::time::timeout(timeout, futures::future::join_all(running)).await {
        Ok(_) => info!("all searches finished"),
        Err(_) => {
            let remaining = aborts.iter().filter(|a| !a.is_finished()).count();
            warn!(remaining, "timeout reached, aborting remaining searches");
            for abort in aborts {
                abort.abort();
            }
        }
    }
}
