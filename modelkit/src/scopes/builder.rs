//! The query builder primitives the UUID scope is layered on.

use super::model::UuidModel;
use crate::errors::ModelkitError;
use uuid::Uuid;

/// Minimal query builder contract.
///
/// Filters consume and return the builder so calls chain; `first` and `all`
/// execute the query.
pub trait QueryBuilder: Sized {
    /// The model the query returns.
    type Model: UuidModel;

    /// Adds `column = value`.
    fn where_equals(self, column: &str, value: Uuid) -> Self;

    /// Adds `column != value`.
    fn where_not_equals(self, column: &str, value: Uuid) -> Self;

    /// Adds `column IN (values)`.
    fn where_in(self, column: &str, values: &[Uuid]) -> Self;

    /// Adds `column NOT IN (values)`.
    fn where_not_in(self, column: &str, values: &[Uuid]) -> Self;

    /// Returns the first matching row.
    fn first(self) -> Result<Option<Self::Model>, ModelkitError>;

    /// Returns every matching row.
    fn all(self) -> Result<Vec<Self::Model>, ModelkitError>;
}

/// One identifier or a batch of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UuidSelector {
    /// A single identifier.
    One(Uuid),
    /// Any of several identifiers.
    Many(Vec<Uuid>),
}

impl UuidSelector {
    /// Returns the identifiers as a slice.
    #[must_use]
    pub fn ids(&self) -> &[Uuid] {
        match self {
            Self::One(id) => std::slice::from_ref(id),
            Self::Many(ids) => ids,
        }
    }
}

impl From<Uuid> for UuidSelector {
    fn from(id: Uuid) -> Self {
        Self::One(id)
    }
}

impl From<Vec<Uuid>> for UuidSelector {
    fn from(ids: Vec<Uuid>) -> Self {
        Self::Many(ids)
    }
}

impl From<&[Uuid]> for UuidSelector {
    fn from(ids: &[Uuid]) -> Self {
        Self::Many(ids.to_vec())
    }
}

impl<const N: usize> From<[Uuid; N]> for UuidSelector {
    fn from(ids: [Uuid; N]) -> Self {
        Self::Many(ids.to_vec())
    }
}
