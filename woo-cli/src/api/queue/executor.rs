//! Request queue executor
//!
//! Runs a list of requests with a fixed pool of worker tasks pulling from one
//! shared FIFO job source. Each job is tagged with its queue position and every
//! worker reports `(position, result)` on a single channel, so the collector
//! fills slots by position and never depends on completion order.
//!
//! Strict mode lets work that was already handed out finish and only then
//! reports the failure. Callers that want to stop early pass a cancellation
//! token: workers stop dequeuing and un-run slots are marked cancelled.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

use super::outcome::QueueOutcome;
use crate::api::client::WooClient;
use crate::api::error::{Result, WooError};
use crate::api::operations::Request;

/// Observes `(completed, total)` after each collected outcome
pub type ProgressFn = dyn Fn(usize, usize) + Send + Sync;

type JobSource = Arc<Mutex<VecDeque<(usize, Request)>>>;
type ResultSink = mpsc::Sender<(usize, Result<Vec<u8>>)>;

/// Per-pass dispatch options
#[derive(Clone, Default)]
pub struct DispatchOptions {
    /// Report failure if any slot failed
    pub strict: bool,
    pub progress: Option<Arc<ProgressFn>>,
    pub cancel: Option<CancellationToken>,
}

impl fmt::Debug for DispatchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchOptions")
            .field("strict", &self.strict)
            .field("progress", &self.progress.is_some())
            .field("cancel", &self.cancel)
            .finish()
    }
}

impl DispatchOptions {
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Default::default()
        }
    }

    pub fn lenient() -> Self {
        Self::default()
    }

    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(progress));
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

#[derive(Debug, Clone)]
pub struct QueueExecutor {
    client: Arc<WooClient>,
    workers: usize,
}

impl QueueExecutor {
    /// Executor sized by the client's `max_concurrent_requests`
    pub fn new(client: Arc<WooClient>) -> Result<Self> {
        let workers = client.config().max_concurrent_requests();
        Self::with_workers(client, workers)
    }

    pub fn with_workers(client: Arc<WooClient>, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(WooError::Configuration(
                "dispatcher needs at least one worker".into(),
            ));
        }
        Ok(Self { client, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Execute every request and return the positional outcome
    pub async fn execute(
        &self,
        requests: Vec<Request>,
        options: &DispatchOptions,
    ) -> Result<QueueOutcome> {
        let total = requests.len();
        if total == 0 {
            debug!("Dispatch requested for an empty queue; nothing to do");
            return Ok(QueueOutcome::default());
        }

        let worker_count = self.workers.min(total);
        info!(
            "{} request(s) scheduled across {} worker(s)",
            total, worker_count
        );

        let jobs: JobSource = Arc::new(Mutex::new(requests.into_iter().enumerate().collect()));
        // Sized so no worker ever blocks on send
        let (tx, mut rx) = mpsc::channel(total);

        let mut handles = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let client = Arc::clone(&self.client);
            let jobs = Arc::clone(&jobs);
            let tx = tx.clone();
            let cancel = options.cancel.clone();
            handles.push(tokio::spawn(run_worker(worker_id, client, jobs, tx, cancel)));
        }
        drop(tx);

        let mut responses: Vec<Option<Vec<u8>>> = vec![None; total];
        let mut reported = vec![false; total];
        let mut failures = Vec::new();
        let mut completed = 0;

        while completed < total {
            let Some((index, result)) = rx.recv().await else {
                break;
            };
            completed += 1;
            reported[index] = true;
            match result {
                Ok(bytes) => responses[index] = Some(bytes),
                Err(err) => failures.push((index, err)),
            }
            if let Some(progress) = &options.progress {
                progress(completed, total);
            }
        }

        for handle in handles {
            if let Err(err) = handle.await {
                error!("Dispatch worker stopped abnormally: {}", err);
            }
        }

        // Only reachable if a worker died mid-job
        for (index, seen) in reported.iter().enumerate() {
            if !seen {
                failures.push((
                    index,
                    WooError::WorkerFailed(format!("no result was reported for request {}", index)),
                ));
            }
        }
        failures.sort_by_key(|(index, _)| *index);

        for (index, err) in &failures {
            warn!("Request {} of {} failed: {}", index, total, err);
        }

        let outcome = QueueOutcome {
            responses,
            failures,
        };

        let first_failure = outcome
            .first_failure()
            .map(|(index, err)| (*index, err.to_string()));
        if options.strict
            && let Some((index, message)) = first_failure
        {
            return Err(WooError::DispatchFailed {
                index,
                message,
                failed: outcome.failed(),
                total,
                partial: Box::new(outcome),
            });
        }

        info!(
            "Dispatch finished: {} succeeded, {} failed",
            outcome.succeeded(),
            outcome.failed()
        );
        Ok(outcome)
    }
}

async fn run_worker(
    worker_id: usize,
    client: Arc<WooClient>,
    jobs: JobSource,
    results: ResultSink,
    cancel: Option<CancellationToken>,
) {
    loop {
        let job = jobs.lock().await.pop_front();
        let Some((index, request)) = job else {
            break;
        };

        let result = if cancel.as_ref().is_some_and(|token| token.is_cancelled()) {
            Err(WooError::Cancelled)
        } else {
            debug!(
                "Worker {} sending request {} ({} {} {})",
                worker_id,
                index,
                request.operation_type(),
                request.http_method(),
                request.endpoint()
            );
            request.send_with(&client, cancel.as_ref()).await
        };

        if results.send((index, result)).await.is_err() {
            break;
        }
    }
}
