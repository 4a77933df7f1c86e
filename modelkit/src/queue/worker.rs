//! Tokio-backed queue with a background worker.

use super::job::{FailedJob, FailedJobLog, Job, JobAck, TaskQueue};
use crate::config::QueueConfig;
use crate::errors::ModelkitError;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A queue whose jobs run on a tokio worker task.
///
/// Each job is handed to [`tokio::task::spawn_blocking`], so a slow pipe
/// occupies a blocking thread rather than the async runtime. Jobs run one at a
/// time in push order. Failures and panics are logged and kept in a bounded
/// failure log; they never reach the code that dispatched the job.
pub struct TokioTaskQueue {
    name: String,
    sender: Mutex<Option<mpsc::UnboundedSender<Box<dyn Job>>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    state: Arc<WorkerState>,
}

#[derive(Debug)]
struct WorkerState {
    processed: AtomicUsize,
    failed: FailedJobLog,
}

impl TokioTaskQueue {
    /// Starts a queue and its worker on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn start(config: &QueueConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let state = Arc::new(WorkerState {
            processed: AtomicUsize::new(0),
            failed: FailedJobLog::new(config.max_failed_jobs),
        });

        let worker = tokio::spawn(run_worker(config.name.clone(), receiver, Arc::clone(&state)));
        tracing::info!(queue = %config.name, "Queue worker started");

        Self {
            name: config.name.clone(),
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
            state,
        }
    }

    /// Returns how many jobs the worker has finished, failed ones included.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.state.processed.load(Ordering::SeqCst)
    }

    /// Returns recorded failures.
    #[must_use]
    pub fn failed_jobs(&self) -> Vec<FailedJob> {
        self.state.failed.entries()
    }

    /// Returns true if the queue still accepts jobs.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.sender.lock().is_some()
    }

    /// Stops accepting jobs and waits for queued work to finish.
    pub async fn shutdown(&self) {
        drop(self.sender.lock().take());

        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            if let Err(err) = worker.await {
                tracing::error!(queue = %self.name, error = %err, "Queue worker terminated abnormally");
            }
        }
        tracing::info!(queue = %self.name, processed = self.processed(), "Queue worker stopped");
    }
}

async fn run_worker(
    queue: String,
    mut receiver: mpsc::UnboundedReceiver<Box<dyn Job>>,
    state: Arc<WorkerState>,
) {
    while let Some(job) = receiver.recv().await {
        let id = job.id();
        let name = job.name().to_string();

        match tokio::task::spawn_blocking(move || job.handle()).await {
            Ok(Ok(())) => {
                tracing::debug!(job_id = %id, job_name = %name, queue = %queue, "Job processed");
            }
            Ok(Err(err)) => state.failed.record(id, &name, &queue, format!("{err:#}")),
            Err(join_err) => state.failed.record(id, &name, &queue, join_err.to_string()),
        }

        state.processed.fetch_add(1, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for TokioTaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioTaskQueue")
            .field("name", &self.name)
            .field("open", &self.is_open())
            .field("processed", &self.processed())
            .finish()
    }
}

impl TaskQueue for TokioTaskQueue {
    fn name(&self) -> &str {
        &self.name
    }

    fn push(&self, job: Box<dyn Job>) -> Result<JobAck, ModelkitError> {
        let ack = JobAck::for_job(job.as_ref(), &self.name);

        let sender = self.sender.lock();
        let Some(sender) = sender.as_ref() else {
            return Err(ModelkitError::QueueClosed(self.name.clone()));
        };
        sender
            .send(job)
            .map_err(|_| ModelkitError::QueueClosed(self.name.clone()))?;

        tracing::debug!(job_id = %ack.job_id, job_name = %ack.job_name, queue = %self.name, "Job queued");
        Ok(ack)
    }
}

impl Drop for TokioTaskQueue {
    fn drop(&mut self) {
        // Dropping the sender lets the worker finish what is queued and exit.
        self.sender.get_mut().take();
    }
}
