//! Saving objects into a session store.

mod saves;
mod store;

pub use saves::SavesToSession;
pub use store::{InMemorySessionStore, SessionStore};

#[cfg(test)]
pub(crate) use store::MockSessionStore;
