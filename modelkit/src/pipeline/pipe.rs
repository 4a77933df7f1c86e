//! Pipes and the continuation handed to them.

use std::fmt;
use std::sync::Arc;

/// A single step of a pipeline.
///
/// A pipe receives the subject and a [`Next`] continuation for the rest of
/// the pipeline. It may:
///
/// - transform the subject and call `next.run(subject)`,
/// - return without calling `next` to short-circuit the pipeline,
/// - pass the subject through unchanged.
///
/// `Next` is consumed when it runs, so a pipe can hand control forward at
/// most once.
pub trait Pipe<T, R = T>: Send + Sync {
    /// Returns a name for diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Handles the subject, optionally passing it to the next pipe.
    fn handle(&self, subject: T, next: Next<'_, T, R>) -> anyhow::Result<R>;
}

/// A pipe shared between pipelines and deferred records.
pub type SharedPipe<T, R = T> = Arc<dyn Pipe<T, R>>;

/// The terminal step invoked after the last pipe calls its `next`.
pub type Destination<'a, T, R> = dyn Fn(T) -> anyhow::Result<R> + 'a;

/// Continuation representing "the rest of the pipeline".
pub struct Next<'a, T, R = T> {
    pipes: &'a [SharedPipe<T, R>],
    destination: &'a Destination<'a, T, R>,
}

impl<'a, T, R> Next<'a, T, R> {
    pub(crate) fn new(pipes: &'a [SharedPipe<T, R>], destination: &'a Destination<'a, T, R>) -> Self {
        Self { pipes, destination }
    }

    /// Passes the subject to the remaining pipes, then the destination.
    pub fn run(self, subject: T) -> anyhow::Result<R> {
        match self.pipes.split_first() {
            Some((pipe, rest)) => {
                tracing::trace!(pipe = pipe.name(), remaining = rest.len(), "Entering pipe");
                pipe.handle(subject, Next::new(rest, self.destination))
            }
            None => (self.destination)(subject),
        }
    }

    /// Returns the number of pipes still ahead of the destination.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pipes.len()
    }
}

impl<T, R> fmt::Debug for Next<'_, T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("remaining", &self.pipes.len())
            .finish_non_exhaustive()
    }
}

/// A pipe backed by a closure.
pub struct FnPipe<F> {
    name: String,
    func: F,
}

impl<F> FnPipe<F> {
    /// Wraps a closure as a named pipe.
    pub fn named(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> fmt::Debug for FnPipe<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPipe").field("name", &self.name).finish()
    }
}

impl<T, R, F> Pipe<T, R> for FnPipe<F>
where
    F: Fn(T, Next<'_, T, R>) -> anyhow::Result<R> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, subject: T, next: Next<'_, T, R>) -> anyhow::Result<R> {
        (self.func)(subject, next)
    }
}

/// Builds a shared pipe from a closure.
///
/// ```rust
/// use modelkit::pipeline::{pipe_fn, Next, Pipeline};
///
/// let double = pipe_fn(|n: i32, next: Next<'_, i32>| next.run(n * 2));
/// let result = Pipeline::new().through(double).then_return(21).unwrap();
/// assert_eq!(result, 42);
/// ```
pub fn pipe_fn<T, R, F>(func: F) -> SharedPipe<T, R>
where
    F: Fn(T, Next<'_, T, R>) -> anyhow::Result<R> + Send + Sync + 'static,
{
    Arc::new(FnPipe::named("closure", func))
}

/// Builds a named shared pipe from a closure.
pub fn named_pipe<T, R, F>(name: impl Into<String>, func: F) -> SharedPipe<T, R>
where
    F: Fn(T, Next<'_, T, R>) -> anyhow::Result<R> + Send + Sync + 'static,
{
    Arc::new(FnPipe::named(name, func))
}

/// Threads `subject` through `pipes` in order and finishes with `destination`.
///
/// With no pipes this is `destination(subject)`. Errors from any pipe or the
/// destination are returned as-is.
pub fn run_sync<T, R>(
    subject: T,
    pipes: &[SharedPipe<T, R>],
    destination: &Destination<'_, T, R>,
) -> anyhow::Result<R> {
    tracing::debug!(pipes = pipes.len(), "Running pipeline");
    Next::new(pipes, destination).run(subject)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_pipe_name() {
        let pipe: SharedPipe<i32> = named_pipe("double", |n: i32, next: Next<'_, i32, i32>| next.run(n * 2));
        assert_eq!(pipe.name(), "double");
    }

    #[test]
    fn test_next_reports_remaining() {
        let observed = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let log = Arc::clone(&observed);
        let probe = pipe_fn(move |n: i32, next: Next<'_, i32, i32>| {
            log.lock().push(next.remaining());
            next.run(n)
        });
        let pipes = vec![Arc::clone(&probe), Arc::clone(&probe), probe];

        let result = run_sync(7, &pipes, &|n| Ok(n)).unwrap();

        assert_eq!(result, 7);
        assert_eq!(*observed.lock(), vec![2, 1, 0]);
    }

    #[test]
    fn test_run_sync_without_pipes_calls_destination() {
        let result = run_sync::<i32, String>(5, &[], &|n| Ok(format!("n={n}"))).unwrap();
        assert_eq!(result, "n=5");
    }
}
