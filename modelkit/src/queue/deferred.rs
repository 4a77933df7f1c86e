//! Deferred pipeline invocations.

use super::job::Job;
use crate::pipeline::{Pipeline, SharedPipe};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Job name used for deferred pipelines.
pub const DEFERRED_PIPELINE_JOB: &str = "pipeline.deferred";

/// Terminal step a deferred record may carry instead of identity.
pub type DeferredDestination<T> = Arc<dyn Fn(T) -> anyhow::Result<T> + Send + Sync>;

/// A pipeline call captured for later execution.
///
/// The record owns the subject and a snapshot of the pipes taken at dispatch
/// time. Running it consumes it, so a record runs at most once.
pub struct DeferredPipeline<T> {
    id: Uuid,
    subject: T,
    pipes: Vec<SharedPipe<T>>,
    destination: Option<DeferredDestination<T>>,
    dispatched_at: DateTime<Utc>,
}

impl<T> DeferredPipeline<T> {
    /// Captures a subject and its pipes.
    #[must_use]
    pub fn new(subject: T, pipes: Vec<SharedPipe<T>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject,
            pipes,
            destination: None,
            dispatched_at: Utc::now(),
        }
    }

    /// Sets the destination run after the last pipe.
    #[must_use]
    pub fn with_destination<D>(mut self, destination: D) -> Self
    where
        D: Fn(T) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        self.destination = Some(Arc::new(destination));
        self
    }

    /// Returns the record identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the captured subject.
    #[must_use]
    pub fn subject(&self) -> &T {
        &self.subject
    }

    /// Returns the number of captured pipes.
    #[must_use]
    pub fn pipe_count(&self) -> usize {
        self.pipes.len()
    }

    /// Returns when the record was created.
    #[must_use]
    pub fn dispatched_at(&self) -> DateTime<Utc> {
        self.dispatched_at
    }

    /// Runs the captured pipeline and returns its result.
    pub fn run(self) -> anyhow::Result<T> {
        let pipeline = Pipeline::new().through_all(self.pipes);
        match self.destination {
            Some(destination) => pipeline.then(self.subject, |subject| destination(subject)),
            None => pipeline.then_return(self.subject),
        }
    }
}

impl<T> fmt::Debug for DeferredPipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredPipeline")
            .field("id", &self.id)
            .field("subject", &std::any::type_name::<T>())
            .field("pipes", &self.pipes.len())
            .field("has_destination", &self.destination.is_some())
            .field("dispatched_at", &self.dispatched_at)
            .finish()
    }
}

impl<T: Send + 'static> Job for DeferredPipeline<T> {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        DEFERRED_PIPELINE_JOB
    }

    fn handle(self: Box<Self>) -> anyhow::Result<()> {
        let id = self.id;
        tracing::debug!(job_id = %id, pipes = self.pipes.len(), "Running deferred pipeline");
        (*self).run().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{pipe_fn, Next};

    #[test]
    fn test_run_applies_pipes_then_destination() {
        let add_one = pipe_fn(|n: i32, next: Next<'_, i32>| next.run(n + 1));
        let record = DeferredPipeline::new(1, vec![add_one]).with_destination(|n| Ok(n * 10));

        assert_eq!(record.pipe_count(), 1);
        assert_eq!(record.run().unwrap(), 20);
    }

    #[test]
    fn test_handle_discards_result() {
        let record: Box<dyn Job> = Box::new(DeferredPipeline::new(String::from("x"), Vec::new()));
        assert_eq!(record.name(), DEFERRED_PIPELINE_JOB);
        assert!(record.handle().is_ok());
    }

    #[test]
    fn test_handle_surfaces_pipe_error() {
        let fail = pipe_fn(|_: i32, _next: Next<'_, i32>| Err(anyhow::anyhow!("nope")));
        let record: Box<dyn Job> = Box::new(DeferredPipeline::new(0, vec![fail]));

        let err = record.handle().unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }
}
