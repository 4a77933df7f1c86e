//! # Modelkit
//!
//! Small reusable behaviours for application model types.
//!
//! - **Pipelines**: thread a value through ordered, middleware-like pipes,
//!   now or later on a task queue
//! - **UUID scope**: find-by-UUID helpers for any query builder
//! - **Session saving**: write a value into a session store using the best
//!   representation it offers
//!
//! ## Quick Start
//!
//! ```rust
//! use modelkit::prelude::*;
//!
//! #[derive(Debug)]
//! struct Signup {
//!     email: String,
//! }
//!
//! impl PipesThrough for Signup {
//!     fn default_pipes(&self) -> Vec<SharedPipe<Self>> {
//!         vec![pipe_fn(|mut signup: Signup, next: Next<'_, Signup>| {
//!             signup.email = signup.email.trim().to_lowercase();
//!             next.run(signup)
//!         })]
//!     }
//! }
//!
//! let signup = Signup { email: " Ada@Example.COM ".into() }.pipe(None).unwrap();
//! assert_eq!(signup.email, "ada@example.com");
//!
//! // Or defer the same work to a queue.
//! let queue = InMemoryTaskQueue::new("signups");
//! let ack = Signup { email: "x@example.com".into() }
//!     .dispatch_pipeline(&queue, None)
//!     .unwrap();
//! assert_eq!(ack.queue, "signups");
//! assert_eq!(queue.drain(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod errors;
pub mod observability;
pub mod pipeline;
pub mod queue;
pub mod scopes;
pub mod session;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{LoggingConfig, ModelkitConfig, QueueConfig};
    pub use crate::errors::{ModelNotFoundError, ModelkitError, SessionKeyError};
    pub use crate::pipeline::{
        named_pipe, pipe_fn, Next, Pipe, Pipeline, PipesThrough, SharedPipe,
    };
    pub use crate::queue::{
        DeferredPipeline, InMemoryTaskQueue, Job, JobAck, TaskQueue, TokioTaskQueue,
    };
    pub use crate::scopes::{QueryBuilder, UuidModel, UuidScope, UuidSelector};
    pub use crate::session::{InMemorySessionStore, SavesToSession, SessionStore};
}
