//! UUID lookup scope for query builders.
//!
//! [`UuidScope`] adds find-by-UUID helpers to anything implementing
//! [`QueryBuilder`], for models that implement [`UuidModel`].

mod builder;
mod model;
mod uuid_scope;

pub use builder::{QueryBuilder, UuidSelector};
pub use model::{UuidModel, DEFAULT_UUID_COLUMN};
pub use uuid_scope::UuidScope;
