//! Remote table access
//!
//! The backing store is a remote relational database reachable only through
//! request/response calls. This module defines the narrow interface the
//! repository needs from it: reads with an optional equality filter and a
//! single-column sort, bulk inserts returning the stored representations,
//! and filtered updates and deletes. There are no client-visible
//! transactions; every call stands alone.

use serde_json::Value;
use strum::AsRefStr;

use motus_domain::StorageError;

#[derive(AsRefStr, Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[strum(serialize_all = "snake_case")]
pub enum Table {
    Exercises,
    MovementPatterns,
    Directions,
    Muscles,
    ExercisePrimaryMuscles,
    ExerciseSynergistMuscles,
    ExerciseVideos,
    Invitations,
    Profiles,
}

/// Single-column equality filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Filter {
    pub column: &'static str,
    pub value: String,
}

impl Filter {
    #[must_use]
    pub fn eq(column: &'static str, value: String) -> Self {
        Self { column, value }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub descending: bool,
}

impl OrderBy {
    #[must_use]
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            descending: false,
        }
    }

    #[must_use]
    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            descending: true,
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait Client {
    async fn select(
        &self,
        table: Table,
        filter: Option<Filter>,
        order: Option<OrderBy>,
    ) -> Result<Vec<Value>, StorageError>;

    /// Inserts the given rows and returns their stored representations,
    /// including store-generated ids and timestamps.
    async fn insert(&self, table: Table, rows: Vec<Value>) -> Result<Vec<Value>, StorageError>;

    async fn update(&self, table: Table, patch: Value, filter: Filter)
    -> Result<(), StorageError>;

    async fn delete(&self, table: Table, filter: Filter) -> Result<(), StorageError>;
}
