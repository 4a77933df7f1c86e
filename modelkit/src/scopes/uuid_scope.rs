//! UUID lookups for any [`QueryBuilder`].

use super::builder::{QueryBuilder, UuidSelector};
use super::model::UuidModel;
use crate::errors::{ModelNotFoundError, ModelkitError};
use std::collections::HashSet;
use uuid::Uuid;

/// UUID helpers available on every query builder.
///
/// All lookups go through the model's qualified UUID column.
pub trait UuidScope: QueryBuilder {
    /// Filters to rows whose UUID matches the selector.
    #[must_use]
    fn where_uuid(self, selector: impl Into<UuidSelector>) -> Self {
        let column = Self::Model::qualified_uuid_column();
        match selector.into() {
            UuidSelector::One(id) => self.where_equals(&column, id),
            UuidSelector::Many(ids) => self.where_in(&column, &ids),
        }
    }

    /// Filters to rows whose UUID does not match the selector.
    #[must_use]
    fn where_uuid_not(self, selector: impl Into<UuidSelector>) -> Self {
        let column = Self::Model::qualified_uuid_column();
        match selector.into() {
            UuidSelector::One(id) => self.where_not_equals(&column, id),
            UuidSelector::Many(ids) => self.where_not_in(&column, &ids),
        }
    }

    /// Finds a row by UUID.
    fn find_uuid(self, id: Uuid) -> Result<Option<Self::Model>, ModelkitError> {
        self.where_uuid(id).first()
    }

    /// Finds every row matching the UUIDs. Missing ones are left out.
    ///
    /// An empty list returns an empty result without running a query.
    fn find_many_uuid(self, ids: &[Uuid]) -> Result<Vec<Self::Model>, ModelkitError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.where_uuid(ids).all()
    }

    /// Finds a row by UUID or fails with [`ModelNotFoundError`].
    fn find_uuid_or_fail(self, id: Uuid) -> Result<Self::Model, ModelkitError> {
        self.find_uuid(id)?.ok_or_else(|| {
            ModelNotFoundError::new(Self::Model::model_name())
                .with_ids([id])
                .into()
        })
    }

    /// Finds every row matching the UUIDs or fails with [`ModelNotFoundError`].
    ///
    /// Succeeds when the number of rows equals the number of distinct UUIDs
    /// requested, so duplicates in `ids` do not require duplicate rows.
    fn find_many_uuid_or_fail(self, ids: &[Uuid]) -> Result<Vec<Self::Model>, ModelkitError> {
        let found = self.find_many_uuid(ids)?;
        let unique = ids.iter().collect::<HashSet<_>>().len();

        if found.len() == unique {
            return Ok(found);
        }

        tracing::debug!(
            model = %Self::Model::model_name(),
            requested = unique,
            found = found.len(),
            "Batch UUID lookup came back short"
        );
        Err(ModelNotFoundError::new(Self::Model::model_name())
            .with_ids(ids.iter().copied())
            .into())
    }

    /// Finds a row by UUID, or returns a fresh unsaved instance.
    fn find_uuid_or_new(self, id: Uuid) -> Result<Self::Model, ModelkitError> {
        Ok(self
            .find_uuid(id)?
            .unwrap_or_else(<Self::Model as UuidModel>::new_instance))
    }
}

impl<B: QueryBuilder> UuidScope for B {}
