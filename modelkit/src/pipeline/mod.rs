//! Pipelines that thread a subject through middleware-like pipes.
//!
//! This module provides:
//! - The [`Pipe`] trait and the [`Next`] continuation
//! - The [`Pipeline`] runner
//! - The [`PipesThrough`] capability for host types

mod pipe;
mod pipes_through;
mod runner;

pub use pipe::{named_pipe, pipe_fn, run_sync, Destination, FnPipe, Next, Pipe, SharedPipe};
pub use pipes_through::PipesThrough;
pub use runner::Pipeline;
