//! Testing utilities for modelkit.
//!
//! This module provides:
//! - Mock pipes that record, short-circuit or fail
//! - An in-memory query builder for the UUID scope
//! - An in-memory session store (re-exported from [`crate::session`])

mod mocks;
mod table;

pub use crate::session::InMemorySessionStore;
pub use mocks::{CallLog, FailingPipe, PipeFailure, RecordingPipe, ShortCircuitPipe};
pub use table::{InMemoryQuery, InMemoryTable, UuidRow};
