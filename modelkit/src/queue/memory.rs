//! In-memory queue that holds jobs until they are worked explicitly.

use super::job::{
    FailedJob, FailedJobLog, Job, JobAck, TaskQueue, DEFAULT_MAX_FAILED_JOBS,
    DEFAULT_MAX_PUSHED_ACKS,
};
use crate::config::QueueConfig;
use crate::errors::ModelkitError;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};

/// A FIFO queue that never runs jobs on push.
///
/// Jobs sit in memory until [`InMemoryTaskQueue::work_next`] or
/// [`InMemoryTaskQueue::drain`] is called, which makes it handy for asserting
/// what was dispatched and for running dispatched work deterministically.
/// The acknowledgement log keeps only the most recent pushes.
pub struct InMemoryTaskQueue {
    name: String,
    pending: Mutex<VecDeque<Box<dyn Job>>>,
    pushed: Mutex<VecDeque<JobAck>>,
    max_pushed: usize,
    failed: FailedJobLog,
}

impl InMemoryTaskQueue {
    /// Creates a new queue with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_max_failed(name, DEFAULT_MAX_FAILED_JOBS)
    }

    /// Creates a queue that remembers at most `max_failed` failures.
    #[must_use]
    pub fn with_max_failed(name: impl Into<String>, max_failed: usize) -> Self {
        Self::with_limits(name.into(), max_failed, DEFAULT_MAX_PUSHED_ACKS)
    }

    /// Creates a queue from configuration.
    #[must_use]
    pub fn from_config(config: &QueueConfig) -> Self {
        Self::with_limits(
            config.name.clone(),
            config.max_failed_jobs,
            config.max_pushed_acks,
        )
    }

    fn with_limits(name: String, max_failed: usize, max_pushed: usize) -> Self {
        Self {
            name,
            pending: Mutex::new(VecDeque::new()),
            pushed: Mutex::new(VecDeque::new()),
            max_pushed: max_pushed.max(1),
            failed: FailedJobLog::new(max_failed),
        }
    }

    /// Returns the number of jobs waiting to run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Returns true if no job is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    /// Returns the retained acknowledgements, oldest first.
    #[must_use]
    pub fn pushed(&self) -> Vec<JobAck> {
        self.pushed.lock().iter().cloned().collect()
    }

    /// Removes and returns the retained acknowledgements, oldest first.
    pub fn take_pushed(&self) -> Vec<JobAck> {
        self.pushed.lock().drain(..).collect()
    }

    /// Returns true if a job with the given name was pushed.
    #[must_use]
    pub fn was_pushed(&self, job_name: &str) -> bool {
        self.pushed.lock().iter().any(|ack| ack.job_name == job_name)
    }

    /// Returns recorded failures.
    #[must_use]
    pub fn failed_jobs(&self) -> Vec<FailedJob> {
        self.failed.entries()
    }

    /// Runs the oldest waiting job.
    ///
    /// Returns `None` when the queue is empty. A failed or panicking job is
    /// recorded in the failure log and its error is also returned.
    pub fn work_next(&self) -> Option<anyhow::Result<()>> {
        // Release the lock before running so jobs may push follow-up work.
        let job = self.pending.lock().pop_front()?;
        let id = job.id();
        let name = job.name().to_string();

        let result = panic::catch_unwind(AssertUnwindSafe(|| job.handle()))
            .unwrap_or_else(|payload| Err(anyhow::anyhow!("job panicked: {}", panic_message(&*payload))));
        match &result {
            Ok(()) => tracing::debug!(job_id = %id, job_name = %name, queue = %self.name, "Job processed"),
            Err(err) => self.failed.record(id, &name, &self.name, format!("{err:#}")),
        }
        Some(result)
    }

    /// Runs jobs until the queue is empty, returning how many ran.
    pub fn drain(&self) -> usize {
        let mut processed = 0;
        while self.work_next().is_some() {
            processed += 1;
        }
        processed
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

impl std::fmt::Debug for InMemoryTaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTaskQueue")
            .field("name", &self.name)
            .field("pending", &self.len())
            .field("failed", &self.failed.len())
            .finish()
    }
}

impl Default for InMemoryTaskQueue {
    fn default() -> Self {
        Self::new("default")
    }
}

impl TaskQueue for InMemoryTaskQueue {
    fn name(&self) -> &str {
        &self.name
    }

    fn push(&self, job: Box<dyn Job>) -> Result<JobAck, ModelkitError> {
        let ack = JobAck::for_job(job.as_ref(), &self.name);
        tracing::debug!(job_id = %ack.job_id, job_name = %ack.job_name, queue = %self.name, "Job queued");

        self.pending.lock().push_back(job);
        let mut pushed = self.pushed.lock();
        if pushed.len() == self.max_pushed {
            pushed.pop_front();
        }
        pushed.push_back(ack.clone());
        Ok(ack)
    }
}
