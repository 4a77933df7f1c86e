//! Mock pipes for testing.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::pipeline::{Next, Pipe, SharedPipe};

/// Shared, ordered log of which steps ran.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    /// Returns the entries in call order.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Returns true if nothing was logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// A pipe that logs its name and passes the subject on unchanged.
#[derive(Debug)]
pub struct RecordingPipe {
    name: String,
    log: CallLog,
    calls: AtomicUsize,
}

impl RecordingPipe {
    /// Creates a recording pipe writing to `log`.
    #[must_use]
    pub fn new(name: impl Into<String>, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Creates a recording pipe ready to be added to a pipeline.
    #[must_use]
    pub fn shared<T, R>(name: impl Into<String>, log: &CallLog) -> SharedPipe<T, R> {
        Arc::new(Self::new(name, log))
    }

    /// Returns how many times the pipe ran.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<T, R> Pipe<T, R> for RecordingPipe {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, subject: T, next: Next<'_, T, R>) -> anyhow::Result<R> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.push(self.name.clone());
        next.run(subject)
    }
}

/// A pipe that returns a fixed value without calling `next`.
#[derive(Debug)]
pub struct ShortCircuitPipe<R> {
    value: R,
    log: Option<CallLog>,
}

impl<R: Clone + Send + Sync> ShortCircuitPipe<R> {
    /// Creates a pipe that always returns `value`.
    #[must_use]
    pub fn new(value: R) -> Self {
        Self { value, log: None }
    }

    /// Logs `"short-circuit"` to `log` when the pipe runs.
    #[must_use]
    pub fn with_log(mut self, log: &CallLog) -> Self {
        self.log = Some(log.clone());
        self
    }
}

impl<T, R: Clone + Send + Sync> Pipe<T, R> for ShortCircuitPipe<R> {
    fn name(&self) -> &str {
        "short-circuit"
    }

    fn handle(&self, _subject: T, _next: Next<'_, T, R>) -> anyhow::Result<R> {
        if let Some(log) = &self.log {
            log.push("short-circuit");
        }
        Ok(self.value.clone())
    }
}

/// Error raised by [`FailingPipe`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct PipeFailure(pub String);

/// A pipe that always fails with a [`PipeFailure`].
#[derive(Debug)]
pub struct FailingPipe {
    message: String,
}

impl FailingPipe {
    /// Creates a pipe failing with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl<T, R> Pipe<T, R> for FailingPipe {
    fn name(&self) -> &str {
        "failing"
    }

    fn handle(&self, _subject: T, _next: Next<'_, T, R>) -> anyhow::Result<R> {
        Err(PipeFailure(self.message.clone()).into())
    }
}
