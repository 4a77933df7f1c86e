//! Capability for types that send themselves through a pipeline.

use super::pipe::SharedPipe;
use super::runner::Pipeline;
use crate::errors::ModelkitError;
use crate::queue::{DeferredPipeline, JobAck, TaskQueue};

/// Lets a value send itself through a pipeline, now or later on a queue.
///
/// Implementors usually override [`PipesThrough::default_pipes`] or
/// [`PipesThrough::make_pipeline`]; every other method has a working default.
///
/// ```rust
/// use modelkit::pipeline::{pipe_fn, Next, PipesThrough};
///
/// #[derive(Debug, Default)]
/// struct Order {
///     total: u32,
/// }
///
/// impl PipesThrough for Order {}
///
/// let add_tax = pipe_fn(|mut order: Order, next: Next<'_, Order>| {
///     order.total += order.total / 10;
///     next.run(order)
/// });
///
/// let order = Order { total: 100 }.pipe(Some(vec![add_tax])).unwrap();
/// assert_eq!(order.total, 110);
/// ```
pub trait PipesThrough: Sized {
    /// Pipes used when a call does not supply its own.
    fn default_pipes(&self) -> Vec<SharedPipe<Self>> {
        Vec::new()
    }

    /// Builds the pipeline this value is sent through.
    fn make_pipeline(&self) -> Pipeline<Self> {
        Pipeline::new().through_all(self.default_pipes())
    }

    /// Resolves the pipeline for one call: explicit pipes replace the defaults.
    fn resolve_pipeline(&self, pipes: Option<Vec<SharedPipe<Self>>>) -> Pipeline<Self> {
        let pipeline = self.make_pipeline();
        match pipes {
            Some(pipes) => pipeline.through_all(pipes),
            None => pipeline,
        }
    }

    /// Sends this value through the pipeline and returns the result.
    fn pipe(self, pipes: Option<Vec<SharedPipe<Self>>>) -> anyhow::Result<Self> {
        self.resolve_pipeline(pipes).then_return(self)
    }

    /// Sends this value through the pipeline, finishing with `destination`.
    fn pipe_to<D>(self, pipes: Option<Vec<SharedPipe<Self>>>, destination: D) -> anyhow::Result<Self>
    where
        D: Fn(Self) -> anyhow::Result<Self>,
    {
        self.resolve_pipeline(pipes).then(self, destination)
    }

    /// Queues this value and its pipes to run later on a worker.
    ///
    /// Nothing runs before this returns. The pipes are captured now, so later
    /// changes to the defaults do not affect the queued record.
    fn dispatch_pipeline(
        self,
        queue: &dyn TaskQueue,
        pipes: Option<Vec<SharedPipe<Self>>>,
    ) -> Result<JobAck, ModelkitError>
    where
        Self: Send + 'static,
    {
        let pipeline = self.resolve_pipeline(pipes);
        let record = DeferredPipeline::new(self, pipeline.into_pipes());
        queue.push(Box::new(record))
    }
}
