//! Ordered pipelines that thread a subject through their pipes.

use super::pipe::{named_pipe, run_sync, Next, SharedPipe};
use std::fmt;
use std::sync::Arc;

/// An ordered sequence of pipes.
///
/// The pipeline holds no subject of its own; every call to [`Pipeline::then`]
/// is an independent single pass whose continuation chain lives only for the
/// duration of that call.
pub struct Pipeline<T, R = T> {
    pipes: Vec<SharedPipe<T, R>>,
}

impl<T, R> Pipeline<T, R> {
    /// Creates an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self { pipes: Vec::new() }
    }

    /// Appends a shared pipe.
    #[must_use]
    pub fn through(mut self, pipe: SharedPipe<T, R>) -> Self {
        self.pipes.push(pipe);
        self
    }

    /// Appends a closure as a pipe.
    #[must_use]
    pub fn pipe<F>(self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(T, Next<'_, T, R>) -> anyhow::Result<R> + Send + Sync + 'static,
    {
        self.through(named_pipe(name, func))
    }

    /// Replaces every pipe with the given sequence.
    #[must_use]
    pub fn through_all(mut self, pipes: impl IntoIterator<Item = SharedPipe<T, R>>) -> Self {
        self.pipes = pipes.into_iter().collect();
        self
    }

    /// Returns the pipes in execution order.
    #[must_use]
    pub fn pipes(&self) -> &[SharedPipe<T, R>] {
        &self.pipes
    }

    /// Consumes the pipeline, returning its pipes.
    #[must_use]
    pub fn into_pipes(self) -> Vec<SharedPipe<T, R>> {
        self.pipes
    }

    /// Returns the number of pipes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    /// Returns true if the pipeline has no pipes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    /// Sends the subject through every pipe and finishes with `destination`.
    ///
    /// Returns whatever the destination returns, or the value of the first
    /// pipe that does not call its `next`.
    pub fn then<D>(&self, subject: T, destination: D) -> anyhow::Result<R>
    where
        D: Fn(T) -> anyhow::Result<R>,
    {
        run_sync(subject, &self.pipes, &destination)
    }
}

impl<T> Pipeline<T, T> {
    /// Sends the subject through every pipe and returns the final subject.
    pub fn then_return(&self, subject: T) -> anyhow::Result<T> {
        self.then(subject, Ok)
    }
}

impl<T, R> Default for Pipeline<T, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R> Clone for Pipeline<T, R> {
    fn clone(&self) -> Self {
        Self {
            pipes: self.pipes.iter().map(Arc::clone).collect(),
        }
    }
}

impl<T, R> fmt::Debug for Pipeline<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("pipes", &self.pipes.iter().map(|p| p.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl<T, R> FromIterator<SharedPipe<T, R>> for Pipeline<T, R> {
    fn from_iter<I: IntoIterator<Item = SharedPipe<T, R>>>(iter: I) -> Self {
        Self::new().through_all(iter)
    }
}
