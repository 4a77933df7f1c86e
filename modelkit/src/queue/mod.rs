//! Task queues for deferred pipeline execution.
//!
//! This module provides:
//! - The [`Job`] and [`TaskQueue`] contracts
//! - [`DeferredPipeline`], the record queued by `dispatch_pipeline`
//! - An in-memory queue and a tokio-backed worker queue

mod deferred;
mod job;
mod memory;
#[cfg(test)]
mod queue_tests;
mod worker;

pub use deferred::{DeferredDestination, DeferredPipeline, DEFERRED_PIPELINE_JOB};
pub use job::{
    FailedJob, FailedJobLog, Job, JobAck, TaskQueue, DEFAULT_MAX_FAILED_JOBS,
    DEFAULT_MAX_PUSHED_ACKS,
};
pub use memory::InMemoryTaskQueue;
pub use worker::TokioTaskQueue;
