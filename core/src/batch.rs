//! Runs one [`Job`] across every resolved target.
//!
//! Each target gets its own blocking worker, at most `jobs` of them at a time. A target
//! that fails, panics or exceeds the timeout only spoils its own result; the batch always
//! returns one result per target, in the order the targets were given.
//!
//! A worker holds its concurrency slot until it actually returns. On timeout the target's
//! [`Interrupt`] fires so the transport gives up, and the slot frees once it has.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::debug;

use orchestrate_common::config::Config;
use orchestrate_common::error::RemoteError;
use orchestrate_common::fleet::outcome::{BatchReport, ExecutionResult};
use orchestrate_common::fleet::target::Target;
use orchestrate_common::session::Interrupt;

use crate::executor::Job;

/// Called after each target finishes with the number of targets done so far.
pub type ProgressCallback = Arc<dyn Fn(usize) + Send + Sync>;

pub struct BatchRunner {
    jobs: usize,
    timeout: Option<Duration>,
    on_progress: Option<ProgressCallback>,
}

impl BatchRunner {
    pub fn new(jobs: usize, timeout: Option<Duration>) -> Self {
        Self {
            jobs: jobs.max(1),
            timeout,
            on_progress: None,
        }
    }

    /// One target at a time, no time limit.
    pub fn sequential() -> Self {
        Self::new(1, None)
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub async fn run(&self, targets: Vec<Target>, job: Arc<dyn Job>) -> BatchReport {
        debug!(
            "starting batch over {} target(s), {} at a time",
            targets.len(),
            self.jobs
        );

        let semaphore = Arc::new(Semaphore::new(self.jobs));
        let done = Arc::new(AtomicUsize::new(0));

        let handles: Vec<(Target, JoinHandle<ExecutionResult>)> = targets
            .into_iter()
            .map(|target| {
                let handle = tokio::spawn(run_one(
                    target.clone(),
                    job.clone(),
                    semaphore.clone(),
                    self.timeout,
                    done.clone(),
                    self.on_progress.clone(),
                ));
                (target, handle)
            })
            .collect();

        let mut results: Vec<ExecutionResult> = Vec::with_capacity(handles.len());
        for (target, handle) in handles {
            let result = handle.await.unwrap_or_else(|e| {
                ExecutionResult::failure(
                    target.identity(),
                    String::new(),
                    RemoteError::Aborted {
                        reason: e.to_string(),
                    },
                )
            });
            if let Some(err) = &result.error {
                debug!("{}: {err}", result.target);
            }
            results.push(result);
        }

        BatchReport { results }
    }
}

impl From<&Config> for BatchRunner {
    fn from(cfg: &Config) -> Self {
        Self::new(cfg.jobs, Some(cfg.timeout))
    }
}

async fn run_one(
    target: Target,
    job: Arc<dyn Job>,
    semaphore: Arc<Semaphore>,
    timeout: Option<Duration>,
    done: Arc<AtomicUsize>,
    on_progress: Option<ProgressCallback>,
) -> ExecutionResult {
    // The semaphore is never closed, so a failed acquire only means running unthrottled.
    let permit = semaphore.acquire_owned().await.ok();
    let identity = target.identity();
    let interrupt = Interrupt::new();

    let worker_interrupt = interrupt.clone();
    let mut worker = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        job.execute(&target, &worker_interrupt)
    });
    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, &mut worker).await {
            Ok(joined) => joined,
            Err(_) => {
                debug!("{identity} timed out after {limit:?}");
                interrupt.trigger();
                Ok(ExecutionResult::failure(
                    identity.clone(),
                    String::new(),
                    RemoteError::Timeout { limit },
                ))
            }
        },
        None => worker.await,
    };

    let result = joined.unwrap_or_else(|e| {
        ExecutionResult::failure(
            identity,
            String::new(),
            RemoteError::Aborted {
                reason: e.to_string(),
            },
        )
    });

    let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
    if let Some(callback) = &on_progress {
        callback(finished);
    }
    result
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
