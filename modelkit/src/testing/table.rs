//! In-memory query builder over a vector of rows.

use crate::errors::ModelkitError;
use crate::scopes::{QueryBuilder, UuidModel};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// A row whose UUID the in-memory table can read back.
pub trait UuidRow {
    /// Returns this row's UUID, if it has one.
    fn uuid(&self) -> Option<Uuid>;
}

/// A table of rows that hands out [`InMemoryQuery`] builders.
///
/// Every executed query (`first` or `all`) is counted and its clauses are
/// recorded, so tests can assert both results and what was asked.
#[derive(Debug)]
pub struct InMemoryTable<M> {
    rows: Arc<Mutex<Vec<M>>>,
    executed: Arc<AtomicUsize>,
    last_clauses: Arc<Mutex<Vec<String>>>,
}

impl<M: UuidModel + UuidRow + Clone> InMemoryTable<M> {
    /// Creates a table holding `rows`.
    #[must_use]
    pub fn new(rows: Vec<M>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(rows)),
            executed: Arc::new(AtomicUsize::new(0)),
            last_clauses: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Inserts a row.
    pub fn insert(&self, row: M) {
        self.rows.lock().push(row);
    }

    /// Starts a query.
    #[must_use]
    pub fn query(&self) -> InMemoryQuery<M> {
        InMemoryQuery {
            rows: Arc::clone(&self.rows),
            executed: Arc::clone(&self.executed),
            last_clauses: Arc::clone(&self.last_clauses),
            filters: Vec::new(),
        }
    }

    /// Returns how many queries have been executed.
    #[must_use]
    pub fn executed_queries(&self) -> usize {
        self.executed.load(Ordering::SeqCst)
    }

    /// Returns the clauses of the most recently executed query.
    #[must_use]
    pub fn last_clauses(&self) -> Vec<String> {
        self.last_clauses.lock().clone()
    }
}

#[derive(Debug, Clone)]
enum Filter {
    Equals(String, Uuid),
    NotEquals(String, Uuid),
    In(String, Vec<Uuid>),
    NotIn(String, Vec<Uuid>),
}

impl Filter {
    fn column(&self) -> &str {
        match self {
            Self::Equals(c, _) | Self::NotEquals(c, _) | Self::In(c, _) | Self::NotIn(c, _) => c,
        }
    }

    fn matches(&self, value: Option<Uuid>) -> bool {
        match (self, value) {
            (Self::Equals(_, id), Some(v)) => v == *id,
            (Self::NotEquals(_, id), Some(v)) => v != *id,
            (Self::In(_, ids), Some(v)) => ids.contains(&v),
            (Self::NotIn(_, ids), Some(v)) => !ids.contains(&v),
            // SQL semantics: NULL never satisfies a comparison.
            (_, None) => false,
        }
    }

    fn describe(&self) -> String {
        let list = |ids: &[Uuid]| {
            ids.iter()
                .map(|id| format!("'{id}'"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        match self {
            Self::Equals(c, id) => format!("{c} = '{id}'"),
            Self::NotEquals(c, id) => format!("{c} != '{id}'"),
            Self::In(c, ids) => format!("{c} in ({})", list(ids.as_slice())),
            Self::NotIn(c, ids) => format!("{c} not in ({})", list(ids.as_slice())),
        }
    }
}

/// A query against an [`InMemoryTable`].
#[derive(Debug)]
pub struct InMemoryQuery<M> {
    rows: Arc<Mutex<Vec<M>>>,
    executed: Arc<AtomicUsize>,
    last_clauses: Arc<Mutex<Vec<String>>>,
    filters: Vec<Filter>,
}

impl<M: UuidModel + UuidRow + Clone> InMemoryQuery<M> {
    fn with(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    fn execute(self) -> Result<Vec<M>, ModelkitError> {
        self.executed.fetch_add(1, Ordering::SeqCst);
        *self.last_clauses.lock() = self.filters.iter().map(Filter::describe).collect();

        let known = M::qualified_uuid_column();
        if let Some(filter) = self.filters.iter().find(|f| f.column() != known) {
            return Err(ModelkitError::Query(format!(
                "Unknown column '{}' on table '{}'",
                filter.column(),
                M::table()
            )));
        }

        let rows = self.rows.lock();
        Ok(rows
            .iter()
            .filter(|row| self.filters.iter().all(|f| f.matches(row.uuid())))
            .cloned()
            .collect())
    }
}

impl<M: UuidModel + UuidRow + Clone> QueryBuilder for InMemoryQuery<M> {
    type Model = M;

    fn where_equals(self, column: &str, value: Uuid) -> Self {
        self.with(Filter::Equals(column.to_string(), value))
    }

    fn where_not_equals(self, column: &str, value: Uuid) -> Self {
        self.with(Filter::NotEquals(column.to_string(), value))
    }

    fn where_in(self, column: &str, values: &[Uuid]) -> Self {
        self.with(Filter::In(column.to_string(), values.to_vec()))
    }

    fn where_not_in(self, column: &str, values: &[Uuid]) -> Self {
        self.with(Filter::NotIn(column.to_string(), values.to_vec()))
    }

    fn first(self) -> Result<Option<M>, ModelkitError> {
        Ok(self.execute()?.into_iter().next())
    }

    fn all(self) -> Result<Vec<M>, ModelkitError> {
        self.execute()
    }
}
