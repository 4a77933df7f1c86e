//! Job and queue contracts.

use crate::errors::ModelkitError;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Default number of failed jobs a queue remembers.
pub const DEFAULT_MAX_FAILED_JOBS: usize = 100;

/// Default number of acknowledgements an in-memory queue remembers.
pub const DEFAULT_MAX_PUSHED_ACKS: usize = 1_000;

/// A unit of work that a worker runs exactly once.
pub trait Job: Send + 'static {
    /// Returns the job identifier.
    fn id(&self) -> Uuid;

    /// Returns the job name for diagnostics.
    fn name(&self) -> &str;

    /// Runs the job, consuming it.
    fn handle(self: Box<Self>) -> anyhow::Result<()>;
}

/// A queue that accepts jobs for later execution.
///
/// Durability, retries and ordering belong to the implementation.
pub trait TaskQueue: Send + Sync {
    /// Returns the queue name.
    fn name(&self) -> &str;

    /// Hands a job to the queue without running it.
    fn push(&self, job: Box<dyn Job>) -> Result<JobAck, ModelkitError>;
}

/// Acknowledgement returned when a job is queued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobAck {
    /// The queued job.
    pub job_id: Uuid,
    /// The job name.
    pub job_name: String,
    /// The queue the job was pushed onto.
    pub queue: String,
    /// When the job was queued.
    pub queued_at: DateTime<Utc>,
}

impl JobAck {
    /// Creates an acknowledgement for a job pushed onto `queue`.
    #[must_use]
    pub fn for_job(job: &dyn Job, queue: impl Into<String>) -> Self {
        Self {
            job_id: job.id(),
            job_name: job.name().to_string(),
            queue: queue.into(),
            queued_at: Utc::now(),
        }
    }
}

/// A job that ended in an error or a panic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedJob {
    /// The failed job.
    pub job_id: Uuid,
    /// The job name.
    pub job_name: String,
    /// The queue the job ran on.
    pub queue: String,
    /// The error message.
    pub error: String,
    /// When the failure was recorded.
    pub failed_at: DateTime<Utc>,
}

/// Bounded log of failed jobs, oldest evicted first.
#[derive(Debug)]
pub struct FailedJobLog {
    entries: Mutex<VecDeque<FailedJob>>,
    capacity: usize,
}

impl FailedJobLog {
    /// Creates a log keeping at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    /// Records a failure.
    pub fn record(&self, job_id: Uuid, job_name: &str, queue: &str, error: impl Into<String>) {
        let failed = FailedJob {
            job_id,
            job_name: job_name.to_string(),
            queue: queue.to_string(),
            error: error.into(),
            failed_at: Utc::now(),
        };

        tracing::error!(
            job_id = %failed.job_id,
            job_name = %failed.job_name,
            queue = %failed.queue,
            error = %failed.error,
            "Job failed"
        );

        let mut entries = self.entries.lock();
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(failed);
    }

    /// Returns a copy of the recorded failures.
    #[must_use]
    pub fn entries(&self) -> Vec<FailedJob> {
        self.entries.lock().iter().cloned().collect()
    }

    /// Returns the number of recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if nothing has failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for FailedJobLog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FAILED_JOBS)
    }
}
